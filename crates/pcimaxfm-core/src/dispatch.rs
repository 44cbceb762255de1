//! Command dispatcher
//!
//! Runs command-line actions strictly in the order given. Every action
//! reports through the console at the verbosity in effect at that point,
//! and the first error stops the run.

use crate::config::{Capabilities, Config};
use crate::console::{Console, Verbosity};
use crate::control::DeviceBackend;
use crate::controller;
use crate::error::{Error, Result};
use crate::param::ParameterKind;
use crate::rds::RdsParam;
use crate::session::DeviceSession;
use std::path::PathBuf;

/// One command-line option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Get (`None`) or set a parameter
    Parameter(ParameterKind, Option<String>),
    /// Set an RDS field from `NAME=VALUE`, or list fields (`None`)
    Rds(Option<String>),
    /// Set (`Some`) or show the device path
    Device(Option<PathBuf>),
    /// Verbose output from here on
    Verbose,
    /// No output from here on
    Quiet,
    /// Print version and stop
    Version,
    /// Print usage and stop
    Help,
}

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All actions ran
    Completed,
    /// Stopped at a version request
    Version,
    /// Stopped at a help request
    Help,
}

/// Executes actions against one device session
pub struct Dispatcher<B: DeviceBackend> {
    session: DeviceSession<B>,
    console: Console,
    capabilities: Capabilities,
}

impl<B: DeviceBackend> Dispatcher<B> {
    /// Create a dispatcher; the device is not opened until needed
    pub fn new(config: Config, backend: B, console: Console) -> Self {
        Self {
            session: DeviceSession::new(backend, config.device),
            console,
            capabilities: config.capabilities,
        }
    }

    /// The device session
    pub fn session(&self) -> &DeviceSession<B> {
        &self.session
    }

    /// Current verbosity
    pub fn verbosity(&self) -> Verbosity {
        self.console.verbosity()
    }

    /// Run `actions` in order
    ///
    /// Stops at the first error or at a version/help request. The device is
    /// closed before returning successfully.
    pub fn run<I>(&mut self, actions: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = Action>,
    {
        for action in actions {
            if let Some(outcome) = self.step(action)? {
                self.session.close();
                return Ok(outcome);
            }
        }
        self.session.close();
        Ok(Outcome::Completed)
    }

    /// Print `err` the way every fatal error is reported
    pub fn report_error(&mut self, err: &Error) {
        log::debug!("{:?}", err);
        self.console.error(err);
    }

    fn require(&self, needed: Capabilities, feature: &'static str) -> Result<()> {
        if self.capabilities.contains(needed) {
            Ok(())
        } else {
            Err(Error::Unsupported(feature))
        }
    }

    fn step(&mut self, action: Action) -> Result<Option<Outcome>> {
        match action {
            Action::Parameter(kind, arg) => {
                let desc = kind.descriptor();
                self.require(desc.requires, desc.label)?;
                let report = controller::get_or_set(kind, &mut self.session, arg.as_deref())?;
                self.console.notice(&report);
            }
            Action::Rds(Some(input)) => {
                self.require(Capabilities::RDS, "RDS")?;
                let assignment = controller::set_rds(&mut self.session, &input)?;
                self.console.notice(&format_args!(
                    "RDS {}: \"{}\"",
                    assignment.param, assignment.value
                ));
            }
            Action::Rds(None) => {
                self.require(Capabilities::RDS, "RDS")?;
                self.console.notice(&"RDS parameters:");
                for param in RdsParam::ALL {
                    self.console
                        .notice(&format_args!("  {:<4} {}", param.name(), param.description()));
                }
            }
            Action::Device(Some(path)) => {
                self.session.set_device_path(path)?;
                self.console.debug(&format_args!(
                    "Using device \"{}\".",
                    self.session.device_path().display()
                ));
            }
            Action::Device(None) => {
                self.console.notice(&format_args!(
                    "Using device \"{}\".",
                    self.session.device_path().display()
                ));
            }
            Action::Verbose => {
                self.console.set_verbosity(Verbosity::Verbose);
                self.console.debug(&"Verbose output.");
            }
            Action::Quiet => self.console.set_verbosity(Verbosity::Quiet),
            Action::Version => return Ok(Some(Outcome::Version)),
            Action::Help => return Ok(Some(Outcome::Help)),
        }
        Ok(None)
    }
}
