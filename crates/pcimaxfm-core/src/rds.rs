//! RDS encoder fields
//!
//! The driver takes RDS fields as `{param, text}` pairs. The driver header
//! defines the `RDS_SET` request but no parameter table, so the numbering
//! and value formats below are this crate's own. Values are validated here
//! so a malformed field never reaches the encoder chip.

use crate::control::RdsAssignment;
use crate::error::{Error, Result};
use core::fmt;

/// Value format accepted by an RDS field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdsFormat {
    /// Fixed number of hex digits
    Hex(usize),
    /// Decimal number up to the given maximum
    Number(u32),
    /// Free text up to the given length
    Text(usize),
}

/// RDS field
///
/// The discriminant is sent as `param`. The order (PI=0 through RT=8) is
/// assumed, not read from the driver; check it against the driver before
/// relying on it with real hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RdsParam {
    /// Programme Identification
    Pi = 0,
    /// Programme Service name
    Ps = 1,
    /// Programme Type
    Pty = 2,
    /// Traffic Programme flag
    Tp = 3,
    /// Traffic Announcement flag
    Ta = 4,
    /// Music/Speech switch
    Ms = 5,
    /// Decoder Identification
    Di = 6,
    /// Alternative Frequencies list
    Af = 7,
    /// RadioText
    Rt = 8,
}

impl RdsParam {
    /// All fields, in table order
    pub const ALL: [RdsParam; 9] = [
        Self::Pi,
        Self::Ps,
        Self::Pty,
        Self::Tp,
        Self::Ta,
        Self::Ms,
        Self::Di,
        Self::Af,
        Self::Rt,
    ];

    /// Table index passed to the driver
    pub fn id(self) -> i32 {
        self as i32
    }

    /// Short field name as typed on the command line
    pub fn name(self) -> &'static str {
        match self {
            Self::Pi => "PI",
            Self::Ps => "PS",
            Self::Pty => "PTY",
            Self::Tp => "TP",
            Self::Ta => "TA",
            Self::Ms => "MS",
            Self::Di => "DI",
            Self::Af => "AF",
            Self::Rt => "RT",
        }
    }

    /// Human-readable description
    pub fn description(self) -> &'static str {
        match self {
            Self::Pi => "Programme Identification (4 hex digits)",
            Self::Ps => "Programme Service name (max 8 characters)",
            Self::Pty => "Programme Type (0-31)",
            Self::Tp => "Traffic Programme (1 or 0)",
            Self::Ta => "Traffic Announcement (1 or 0)",
            Self::Ms => "Music/Speech (1 = music, 0 = speech)",
            Self::Di => "Decoder Identification (0-15)",
            Self::Af => "Alternative Frequencies (max 64 characters)",
            Self::Rt => "RadioText (max 64 characters)",
        }
    }

    /// Accepted value format
    pub fn format(self) -> RdsFormat {
        match self {
            Self::Pi => RdsFormat::Hex(4),
            Self::Ps => RdsFormat::Text(8),
            Self::Pty => RdsFormat::Number(31),
            Self::Tp | Self::Ta | Self::Ms => RdsFormat::Number(1),
            Self::Di => RdsFormat::Number(15),
            Self::Af | Self::Rt => RdsFormat::Text(64),
        }
    }

    /// Look up a field by name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    fn names() -> String {
        Self::ALL.map(|p| p.name()).join(", ")
    }

    fn out_of_range(self, given: &str, bounds: String) -> Error {
        Error::OutOfRange {
            label: self.name(),
            given: format!("\"{}\"", given),
            bounds,
        }
    }

    /// Check `value` against this field's format
    pub fn validate(self, value: &str) -> Result<()> {
        if value.contains('\0') {
            return Err(Error::InvalidInput {
                what: "RDS value",
                input: value.escape_default().to_string(),
                expected: "text without NUL characters".to_string(),
            });
        }
        match self.format() {
            RdsFormat::Hex(digits) => {
                if value.len() != digits || !value.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(self.out_of_range(value, format!("{} hex digits", digits)));
                }
            }
            RdsFormat::Number(max) => match value.parse::<u32>() {
                Ok(n) if n <= max => {}
                _ => return Err(self.out_of_range(value, format!("0-{}", max))),
            },
            RdsFormat::Text(max) => {
                if value.chars().count() > max || !value.is_ascii() {
                    return Err(
                        self.out_of_range(value, format!("at most {} ASCII characters", max))
                    );
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for RdsParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a `NAME=VALUE` assignment and validate the value
pub fn parse_assignment(input: &str) -> Result<RdsAssignment> {
    let invalid = || Error::InvalidInput {
        what: "RDS assignment",
        input: input.to_string(),
        expected: format!("NAME=VALUE with NAME one of {}", RdsParam::names()),
    };
    let (name, value) = input.split_once('=').ok_or_else(invalid)?;
    let param = RdsParam::from_name(name).ok_or_else(invalid)?;
    param.validate(value)?;
    Ok(RdsAssignment {
        param,
        value: value.to_string(),
    })
}
