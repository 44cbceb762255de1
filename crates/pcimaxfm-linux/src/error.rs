//! Error types for the Linux device backend

use thiserror::Error;

/// Linux device specific errors
#[derive(Debug, Error)]
pub enum LinuxDeviceError {
    /// Failed to open device
    #[error("{path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Path exists but is not a character device
    #[error("{0}: not a character device")]
    NotCharDevice(String),

    /// ioctl call failed
    #[error("{request}: {source}")]
    IoctlFailed {
        request: &'static str,
        #[source]
        source: nix::errno::Errno,
    },

    /// RDS text cannot be passed as a C string
    #[error("RDS value contains a NUL byte")]
    InvalidText,
}

/// Result type for Linux device operations
pub type Result<T> = std::result::Result<T, LinuxDeviceError>;
