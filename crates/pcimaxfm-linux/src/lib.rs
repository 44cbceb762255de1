//! pcimaxfm-linux - Linux device backend
//!
//! This crate talks to the pcimaxfm kernel driver through its character
//! device nodes at `/dev/pcimaxfmN`.
//!
//! # Example
//!
//! ```no_run
//! use pcimaxfm_linux::LinuxDevice;
//! use pcimaxfm_core::control::{ControlInterface, ControlRequest, Reply};
//! use std::path::Path;
//!
//! let mut dev = LinuxDevice::open(Path::new("/dev/pcimaxfm0"))?;
//! if let Reply::Value(steps) = dev.exchange(&ControlRequest::GetFrequency)? {
//!     println!("{} steps", steps);
//! }
//! # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
//! ```
//!
//! # System Requirements
//!
//! - The pcimaxfm kernel module loaded
//! - Read/write access to `/dev/pcimaxfmN`
//! - May require root or a udev rule granting group access

pub mod device;
pub mod error;

// Re-exports
pub use device::{LinuxBackend, LinuxDevice};
pub use error::{LinuxDeviceError, Result};
