//! pcimaxfm-core - Parameter control for PCI MAX FM transmitter cards
//!
//! The kernel driver exposes each card as a character device with a small
//! set of ioctls. This crate holds everything above that boundary:
//!
//! - [`param`]: descriptors, unit conversion and range checks
//! - [`control`]: the closed set of driver requests and the backend traits
//! - [`session`]: the lazily opened device handle
//! - [`dispatch`]: in-order execution of command-line actions
//!
//! Backends implementing [`control::DeviceBackend`] live in separate crates
//! (`pcimaxfm-linux` for real hardware, `pcimaxfm-dummy` for tests).
//!
//! # Example
//!
//! ```ignore
//! use pcimaxfm_core::{Action, Config, Console, Dispatcher, ParameterKind};
//!
//! let mut dispatcher = Dispatcher::new(Config::default(), backend, Console::stdio());
//! dispatcher.run([
//!     Action::Parameter(ParameterKind::Frequency, Some("100.0".into())),
//!     Action::Parameter(ParameterKind::Power, None),
//! ])?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod console;
pub mod control;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod param;
pub mod rds;
pub mod session;

pub use config::{Capabilities, Config, DEFAULT_DEVICE};
pub use console::{Console, Verbosity};
pub use control::{ControlInterface, ControlRequest, DeviceBackend, Reply};
pub use dispatch::{Action, Dispatcher, Outcome};
pub use error::{BoxError, Error, Result};
pub use param::{ParameterKind, Report};
pub use session::DeviceSession;
