//! CLI argument parsing
//!
//! Options are executed in the order they appear, so every option is an
//! appending argument and the final action list is rebuilt from clap's
//! argument indices. Help and version are declared like the other options
//! so they stop processing at their own position.
//!
//! Short options follow getopt: flags can be grouped (`-vq`) and a value
//! is glued to its letter (`-f100.0`, `-d/dev/pcimaxfm1`). Long options
//! take `--freq=100.0`.

use clap::{ArgAction, ArgMatches, CommandFactory, Parser};
use pcimaxfm_core::param::{ParameterKind, FREQUENCY, POWER};
use pcimaxfm_core::{Action, DEFAULT_DEVICE};
use std::ffi::OsString;
use std::path::PathBuf;

/// Value clap records for an option given without one
///
/// argv entries cannot contain NUL, so this never collides with user input.
const NO_VALUE: &str = "\0";

/// Short options whose optional value is glued to the letter
const VALUE_SHORTS: [char; 7] = ['f', 'p', 's', 't', 'g', 'r', 'd'];

/// Flags take no argument; reject `--verbose=1` and friends
fn no_value(s: &str) -> Result<String, String> {
    if s == NO_VALUE {
        Ok(s.to_string())
    } else {
        Err(format!("option takes no argument (got \"{}\")", s))
    }
}

fn freq_help() -> String {
    format!("Get/set frequency in MHz ({})", FREQUENCY.bounds())
}

fn power_help() -> String {
    format!("Get/set power level ({})", POWER.bounds())
}

fn device_help() -> String {
    format!("pcimaxfm device (default: {})", DEFAULT_DEVICE)
}

#[derive(Parser, Debug)]
#[command(name = "pcimaxctl")]
#[command(
    version,
    about = "Control PCI MAX FM transmitter devices.",
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true,
    before_help = "Omitting optional arguments will print the current value.",
    after_help = "Optional arguments are glued to short options (-f100.0) and \
                  attached with '=' to long options (--freq=100.0)."
)]
pub struct Cli {
    #[arg(short, long, value_name = "MHz", help = freq_help(),
          action = ArgAction::Append, num_args = 0..=1, require_equals = true,
          default_missing_value = NO_VALUE)]
    pub freq: Vec<String>,

    #[arg(short, long, value_name = "LVL", help = power_help(),
          action = ArgAction::Append, num_args = 0..=1, require_equals = true,
          default_missing_value = NO_VALUE)]
    pub power: Vec<String>,

    /// Get/toggle stereo encoder (1 = on, 0 = off)
    #[arg(short, long, value_name = "1|0",
          action = ArgAction::Append, num_args = 0..=1, require_equals = true,
          default_missing_value = NO_VALUE)]
    pub stereo: Vec<String>,

    /// Get/toggle transmitter (1 = on, 0 = off)
    #[arg(short, long, value_name = "1|0", hide = !cfg!(feature = "tx-toggle"),
          action = ArgAction::Append, num_args = 0..=1, require_equals = true,
          default_missing_value = NO_VALUE)]
    pub tx: Vec<String>,

    /// Get/toggle RDS signal (1 = on, 0 = off)
    #[arg(short = 'g', long, value_name = "1|0", hide = !cfg!(feature = "rds-toggle"),
          action = ArgAction::Append, num_args = 0..=1, require_equals = true,
          default_missing_value = NO_VALUE)]
    pub rds_signal: Vec<String>,

    /// Set RDS field, or list fields when omitted
    #[arg(short, long, value_name = "NAME=VALUE", hide = !cfg!(feature = "rds"),
          action = ArgAction::Append, num_args = 0..=1, require_equals = true,
          default_missing_value = NO_VALUE)]
    pub rds: Vec<String>,

    #[arg(short, long, value_name = "FILE", help = device_help(),
          action = ArgAction::Append, num_args = 0..=1, require_equals = true,
          default_missing_value = NO_VALUE)]
    pub device: Vec<String>,

    /// Verbose output
    #[arg(short, long, value_parser = no_value,
          action = ArgAction::Append, num_args = 0..=1, require_equals = true,
          default_missing_value = NO_VALUE)]
    pub verbose: Vec<String>,

    /// No output
    #[arg(short, long, value_parser = no_value,
          action = ArgAction::Append, num_args = 0..=1, require_equals = true,
          default_missing_value = NO_VALUE)]
    pub quiet: Vec<String>,

    /// Print version and exit
    #[arg(short = 'e', long, value_parser = no_value,
          action = ArgAction::Append, num_args = 0..=1, require_equals = true,
          default_missing_value = NO_VALUE)]
    pub version: Vec<String>,

    /// Print this text and exit
    #[arg(short, long, value_parser = no_value,
          action = ArgAction::Append, num_args = 0..=1, require_equals = true,
          default_missing_value = NO_VALUE)]
    pub help: Vec<String>,
}

/// Argument ids in declaration order
const OPTION_IDS: [&str; 11] = [
    "freq",
    "power",
    "stereo",
    "tx",
    "rds_signal",
    "rds",
    "device",
    "verbose",
    "quiet",
    "version",
    "help",
];

fn optional(value: &str) -> Option<String> {
    (value != NO_VALUE).then(|| value.to_string())
}

/// Split short option clusters the way getopt reads them
///
/// `-vf100.0` becomes `-v -f=100.0`. Everything after a value letter is its
/// value, so `-f=100` carries `=100`. Arguments after `--` are left alone.
fn expand_short_options(args: Vec<OsString>) -> Vec<OsString> {
    let mut expanded = Vec::with_capacity(args.len());
    let mut args = args.into_iter();
    expanded.extend(args.next());

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str().map(str::to_owned) else {
            expanded.push(arg);
            continue;
        };
        if text == "--" {
            expanded.push(arg);
            expanded.extend(args);
            break;
        }
        let cluster = match text.strip_prefix('-') {
            Some(cluster) if !cluster.is_empty() && !cluster.starts_with('-') => cluster,
            _ => {
                expanded.push(arg);
                continue;
            }
        };

        for (i, letter) in cluster.char_indices() {
            if VALUE_SHORTS.contains(&letter) {
                let value = &cluster[i + letter.len_utf8()..];
                if value.is_empty() {
                    expanded.push(format!("-{}", letter).into());
                } else {
                    expanded.push(format!("-{}={}", letter, value).into());
                }
                break;
            }
            expanded.push(format!("-{}", letter).into());
        }
    }
    expanded
}

fn to_action(id: &str, value: &str) -> Option<Action> {
    let param = |kind| Some(Action::Parameter(kind, optional(value)));
    match id {
        "freq" => param(ParameterKind::Frequency),
        "power" => param(ParameterKind::Power),
        "stereo" => param(ParameterKind::Stereo),
        "tx" => param(ParameterKind::Transmit),
        "rds_signal" => param(ParameterKind::RdsSignal),
        "rds" => Some(Action::Rds(optional(value))),
        "device" => Some(Action::Device(optional(value).map(PathBuf::from))),
        "verbose" => Some(Action::Verbose),
        "quiet" => Some(Action::Quiet),
        "version" => Some(Action::Version),
        "help" => Some(Action::Help),
        _ => None,
    }
}

/// Rebuild the command-line order of every option occurrence
pub fn actions(matches: &ArgMatches) -> Vec<Action> {
    let mut indexed = Vec::new();
    for id in OPTION_IDS {
        let (Some(indices), Some(values)) =
            (matches.indices_of(id), matches.get_many::<String>(id))
        else {
            continue;
        };
        for (index, value) in indices.zip(values) {
            if let Some(action) = to_action(id, value) {
                indexed.push((index, action));
            }
        }
    }
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, action)| action).collect()
}

/// Parse `args` (program name first) into ordered actions
pub fn parse_actions<I, T>(args: I) -> Result<Vec<Action>, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = args.into_iter().map(Into::into).collect();
    let matches = Cli::command().try_get_matches_from(expand_short_options(args))?;
    Ok(actions(&matches))
}

/// Usage text
pub fn help_text() -> String {
    Cli::command().render_help().to_string()
}

/// Version banner
pub fn version_text() -> String {
    format!(
        "pcimaxctl {}\n\
         This is free software. You may redistribute copies of it under the terms of\n\
         the GNU General Public License <http://www.gnu.org/licenses/gpl.html>.\n\
         There is NO WARRANTY, to the extent permitted by law.\n",
        env!("CARGO_PKG_VERSION")
    )
}
