//! Error types for pcimaxfm-core
//!
//! Every variant is fatal to the command being run. The dispatcher prints a
//! single line for it and stops.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error produced by a device backend
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Direction of a failed control exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Reading a value from the device
    Read,
    /// Writing a value to the device
    Write,
}

impl Direction {
    fn verb(self) -> &'static str {
        match self {
            Self::Read => "Reading",
            Self::Write => "Setting",
        }
    }
}

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Argument text could not be parsed
    #[error("Invalid {what}. Got \"{input}\", expected {expected}.")]
    InvalidInput {
        /// What was being parsed
        what: &'static str,
        /// Offending text
        input: String,
        /// Description of the accepted form
        expected: String,
    },

    /// Parsed value lies outside the parameter's domain
    #[error("{label} out of range. Got {given}, expected {bounds}.")]
    OutOfRange {
        /// Parameter label
        label: &'static str,
        /// Value as given, in user units
        given: String,
        /// Valid bounds, in user units
        bounds: String,
    },

    /// Device node could not be opened
    #[error("Cannot open device \"{}\": {source}", .path.display())]
    DeviceUnavailable {
        /// Device path
        path: PathBuf,
        /// Backend failure
        #[source]
        source: BoxError,
    },

    /// Device path changed after the handle was opened
    #[error("Device \"{}\" already in use. Set device before any query options.", .path.display())]
    DeviceInUse {
        /// Path of the open device
        path: PathBuf,
    },

    /// The control exchange itself failed
    #[error("{} {what} failed: {source}", .direction.verb())]
    ControlExchangeFailed {
        /// Read or write
        direction: Direction,
        /// Parameter name
        what: &'static str,
        /// Backend failure
        #[source]
        source: BoxError,
    },

    /// Option belongs to a capability that is not enabled
    #[error("{0} support is not enabled.")]
    Unsupported(&'static str),
}

/// Result type for pcimaxfm-core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let e = Error::OutOfRange {
            label: "Frequency",
            given: "200.00".into(),
            bounds: "86.00-108.00".into(),
        };
        assert_eq!(
            e.to_string(),
            "Frequency out of range. Got 200.00, expected 86.00-108.00."
        );
    }

    #[test]
    fn test_exchange_failed_message() {
        let e = Error::ControlExchangeFailed {
            direction: Direction::Read,
            what: "power level",
            source: "Inappropriate ioctl for device".into(),
        };
        assert_eq!(
            e.to_string(),
            "Reading power level failed: Inappropriate ioctl for device"
        );
    }

    #[test]
    fn test_device_in_use_message() {
        let e = Error::DeviceInUse {
            path: PathBuf::from("/dev/pcimaxfm1"),
        };
        assert!(e.to_string().starts_with("Device \"/dev/pcimaxfm1\" already in use"));
    }
}
