//! pcimaxctl - Control PCI MAX FM transmitter cards
//!
//! Reads and writes the transmitter parameters (frequency, power level,
//! stereo encoder and friends) through the pcimaxfm kernel driver. Options
//! are executed strictly left to right, so
//!
//! ```text
//! pcimaxctl --device=/dev/pcimaxfm1 --freq=100.0 --power
//! ```
//!
//! selects the card, tunes it and then prints its power level.

mod cli;

use pcimaxfm_core::{Capabilities, Config, Console, DeviceBackend, Dispatcher, Outcome, Verbosity};
use pcimaxfm_linux::LinuxBackend;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

const EXIT_FAILURE: u8 = 1;

/// Capabilities compiled into this binary
fn capabilities() -> Capabilities {
    let mut caps = Capabilities::empty();
    if cfg!(feature = "tx-toggle") {
        caps |= Capabilities::TRANSMIT_TOGGLE;
    }
    if cfg!(feature = "rds") {
        caps |= Capabilities::RDS;
    }
    if cfg!(feature = "rds-toggle") {
        caps |= Capabilities::RDS_TOGGLE;
    }
    caps
}

fn main() -> ExitCode {
    // Initialize logger; the console moves the max level with -v/-q
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    log::set_max_level(Verbosity::default().log_level());

    let config = Config::default().with_capabilities(capabilities());
    let status = run(
        std::env::args_os(),
        config,
        LinuxBackend,
        Console::stdio(),
        &mut io::stdout(),
    );
    ExitCode::from(status)
}

/// Run one invocation and return its exit status
///
/// Help and version go to `out` regardless of verbosity.
fn run<I, T, B>(args: I, config: Config, backend: B, console: Console, out: &mut dyn Write) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    B: DeviceBackend,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() <= 1 {
        let _ = write!(out, "{}", cli::help_text());
        return EXIT_FAILURE;
    }

    let actions = match cli::parse_actions(args) {
        Ok(actions) => actions,
        Err(e) => {
            let _ = e.print();
            return u8::try_from(e.exit_code()).unwrap_or(EXIT_FAILURE);
        }
    };

    let mut dispatcher = Dispatcher::new(config, backend, console);
    match dispatcher.run(actions) {
        Ok(Outcome::Completed) => 0,
        Ok(Outcome::Help) => {
            let _ = write!(out, "{}", cli::help_text());
            0
        }
        Ok(Outcome::Version) => {
            let _ = write!(out, "{}", cli::version_text());
            0
        }
        Err(e) => {
            dispatcher.report_error(&e);
            EXIT_FAILURE
        }
    }
}
