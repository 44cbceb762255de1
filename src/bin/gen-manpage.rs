//! Man page generator for pcimaxctl
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]
//!
//! Writes `pcimaxctl.1` for the options compiled into this build, so
//! disabled features (`--no-default-features`) are left out of the page.

use clap::CommandFactory;
use std::fs;
use std::io;
use std::path::PathBuf;

#[path = "../cli.rs"]
#[allow(dead_code)]
mod cli;

const SECTION: &str = "1";

/// Render the pcimaxctl man page
fn render_manpage() -> io::Result<Vec<u8>> {
    let cmd = cli::Cli::command();
    let name = cmd.get_name().to_string();
    let man = clap_mangen::Man::new(cmd)
        .title(name)
        .section(SECTION)
        .source(format!("pcimaxctl {}", env!("CARGO_PKG_VERSION")))
        .manual("pcimaxfm tools");
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    Ok(buffer)
}

fn main() -> io::Result<()> {
    // Default to ./man directory
    let output_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));

    fs::create_dir_all(&output_dir)?;

    let output_path = output_dir.join(format!("pcimaxctl.{}", SECTION));
    fs::write(&output_path, render_manpage()?)?;

    println!("Man page generated at: {}", output_path.display());
    println!("\nTo view the man page:");
    println!("  man -l {}", output_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_manpage() {
        let page = String::from_utf8(render_manpage().unwrap()).unwrap();
        assert!(page.contains(".TH pcimaxctl 1 "));
        assert!(page.contains("pcimaxfm tools"));
        assert!(page.contains("freq"));
    }
}
