//! Parameter descriptors and unit conversion
//!
//! Each controllable value of the card is described by a static
//! [`Descriptor`]: its device-unit range, an optional "not configured"
//! sentinel, and how device units map to what the user types and sees.

use crate::config::Capabilities;
use crate::control::ControlRequest;
use crate::error::{Error, Result};
use core::fmt;

/// Lowest frequency, 86.00 MHz in 50 kHz steps
pub const FREQ_MIN: i32 = 1720;
/// Highest frequency, 108.00 MHz in 50 kHz steps
pub const FREQ_MAX: i32 = 2160;
/// Frequency reported before one has been set
pub const FREQ_NA: i32 = 0;

/// Lowest power level
pub const POWER_MIN: i32 = 0x00;
/// Highest power level
pub const POWER_MAX: i32 = 0x0F;
/// Power level reported before one has been set
pub const POWER_NA: i32 = 0x10;

/// Boolean state reported before one has been set
pub const BOOL_NA: i32 = 2;

/// Device steps per MHz (one step is 50 kHz)
pub const STEPS_PER_MHZ: f64 = 20.0;

// Products within this distance of a whole step are taken as that step, so
// decimal input like 87.55 is not truncated to 1750 by binary rounding.
const STEP_SNAP: f64 = 1e-9;

/// Controllable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Carrier frequency
    Frequency,
    /// Transmit power level
    Power,
    /// Stereo encoder
    Stereo,
    /// Transmitter enable
    Transmit,
    /// RDS signal enable
    RdsSignal,
}

/// How device units are entered and shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// 50 kHz steps, entered and shown in MHz
    Steps,
    /// Plain integer level
    Level,
    /// 0 = off, anything else = on
    Flag,
}

/// Static description of a parameter
#[derive(Debug)]
pub struct Descriptor {
    /// Parameter this describes
    pub kind: ParameterKind,
    /// Lower-case name used in diagnostics ("power level")
    pub name: &'static str,
    /// Label used in reports ("Power level")
    pub label: &'static str,
    /// Smallest valid device value
    pub min: i32,
    /// Largest valid device value
    pub max: i32,
    /// Device value meaning "not configured yet"
    pub sentinel: Option<i32>,
    /// Unit mapping
    pub encoding: Encoding,
    /// Capabilities required to use the parameter
    pub requires: Capabilities,
}

/// Frequency descriptor
pub static FREQUENCY: Descriptor = Descriptor {
    kind: ParameterKind::Frequency,
    name: "frequency",
    label: "Frequency",
    min: FREQ_MIN,
    max: FREQ_MAX,
    sentinel: Some(FREQ_NA),
    encoding: Encoding::Steps,
    requires: Capabilities::empty(),
};

/// Power level descriptor
pub static POWER: Descriptor = Descriptor {
    kind: ParameterKind::Power,
    name: "power level",
    label: "Power level",
    min: POWER_MIN,
    max: POWER_MAX,
    sentinel: Some(POWER_NA),
    encoding: Encoding::Level,
    requires: Capabilities::empty(),
};

/// Stereo encoder descriptor
pub static STEREO: Descriptor = Descriptor {
    kind: ParameterKind::Stereo,
    name: "stereo encoder state",
    label: "Stereo encoder",
    min: 0,
    max: 1,
    sentinel: None,
    encoding: Encoding::Flag,
    requires: Capabilities::empty(),
};

/// Transmitter enable descriptor
pub static TRANSMIT: Descriptor = Descriptor {
    kind: ParameterKind::Transmit,
    name: "transmitter state",
    label: "Transmitter",
    min: 0,
    max: 1,
    sentinel: Some(BOOL_NA),
    encoding: Encoding::Flag,
    requires: Capabilities::TRANSMIT_TOGGLE,
};

/// RDS signal descriptor
pub static RDS_SIGNAL: Descriptor = Descriptor {
    kind: ParameterKind::RdsSignal,
    name: "RDS signal state",
    label: "RDS signal",
    min: 0,
    max: 1,
    sentinel: Some(BOOL_NA),
    encoding: Encoding::Flag,
    requires: Capabilities::RDS.union(Capabilities::RDS_TOGGLE),
};

impl ParameterKind {
    /// All parameters, in help-text order
    pub const ALL: [ParameterKind; 5] = [
        Self::Frequency,
        Self::Power,
        Self::Stereo,
        Self::Transmit,
        Self::RdsSignal,
    ];

    /// Static descriptor for this parameter
    pub fn descriptor(self) -> &'static Descriptor {
        match self {
            Self::Frequency => &FREQUENCY,
            Self::Power => &POWER,
            Self::Stereo => &STEREO,
            Self::Transmit => &TRANSMIT,
            Self::RdsSignal => &RDS_SIGNAL,
        }
    }

    /// Request reading this parameter
    pub fn get_request(self) -> ControlRequest {
        match self {
            Self::Frequency => ControlRequest::GetFrequency,
            Self::Power => ControlRequest::GetPower,
            Self::Stereo => ControlRequest::GetStereo,
            Self::Transmit => ControlRequest::GetTransmit,
            Self::RdsSignal => ControlRequest::GetRdsSignal,
        }
    }

    /// Request writing `value` (device units) to this parameter
    pub fn set_request(self, value: i32) -> ControlRequest {
        match self {
            Self::Frequency => ControlRequest::SetFrequency(value),
            Self::Power => ControlRequest::SetPower(value),
            Self::Stereo => ControlRequest::SetStereo(value),
            Self::Transmit => ControlRequest::SetTransmit(value),
            Self::RdsSignal => ControlRequest::SetRdsSignal(value),
        }
    }
}

/// Convert MHz to 50 kHz steps, truncating toward zero
///
/// Saturates for values outside `i64`; NaN maps to 0.
pub fn mhz_to_steps(mhz: f64) -> i64 {
    let scaled = mhz * STEPS_PER_MHZ;
    let nearest = scaled.round();
    if (scaled - nearest).abs() < STEP_SNAP {
        nearest as i64
    } else {
        scaled.trunc() as i64
    }
}

/// Convert 50 kHz steps to MHz
pub fn steps_to_mhz(steps: i32) -> f64 {
    f64::from(steps) / STEPS_PER_MHZ
}

impl Descriptor {
    /// Whether `value` is the "not configured" sentinel
    pub fn is_sentinel(&self, value: i32) -> bool {
        self.sentinel == Some(value)
    }

    /// Valid range in user units, e.g. "86.00-108.00"
    pub fn bounds(&self) -> String {
        match self.encoding {
            Encoding::Steps => format!(
                "{:.2}-{:.2}",
                steps_to_mhz(self.min),
                steps_to_mhz(self.max)
            ),
            Encoding::Level | Encoding::Flag => format!("{}-{}", self.min, self.max),
        }
    }

    fn expected(&self) -> String {
        match self.encoding {
            Encoding::Steps => {
                format!("floating point number in the range of {}", self.bounds())
            }
            Encoding::Level => format!("integer in the range of {}", self.bounds()),
            Encoding::Flag => "integer 1 or 0".to_string(),
        }
    }

    fn invalid(&self, input: &str) -> Error {
        Error::InvalidInput {
            what: self.name,
            input: input.to_string(),
            expected: self.expected(),
        }
    }

    fn check_range(&self, value: i64, given: impl FnOnce() -> String) -> Result<i32> {
        if value < i64::from(self.min) || value > i64::from(self.max) {
            return Err(Error::OutOfRange {
                label: self.label,
                given: given(),
                bounds: self.bounds(),
            });
        }
        // In range, so it fits.
        Ok(value as i32)
    }

    /// Parse user text into a range-checked device value
    pub fn parse(&self, input: &str) -> Result<i32> {
        let text = input.trim();
        match self.encoding {
            Encoding::Steps => {
                let mhz: f64 = text.parse().map_err(|_| self.invalid(input))?;
                self.check_range(mhz_to_steps(mhz), || format!("{:.2}", mhz))
            }
            Encoding::Level | Encoding::Flag => {
                let value: i64 = text.parse().map_err(|_| self.invalid(input))?;
                self.check_range(value, || value.to_string())
            }
        }
    }
}

/// Result of a completed controller operation, ready to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Device holds the sentinel for this parameter
    NotConfigured(ParameterKind),
    /// Current or just-written device value
    Value {
        /// Parameter reported
        kind: ParameterKind,
        /// Value in device units
        raw: i32,
    },
}

fn on_off(raw: i32) -> &'static str {
    if raw == 0 {
        "Off"
    } else {
        "On"
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NotConfigured(kind) => write!(f, "{} not set yet.", kind.descriptor().label),
            Self::Value { kind, raw } => {
                let desc = kind.descriptor();
                match desc.encoding {
                    Encoding::Steps => write!(
                        f,
                        "{}: {:.2} MHz ({} 50 KHz steps)",
                        desc.label,
                        steps_to_mhz(raw),
                        raw
                    ),
                    Encoding::Level => write!(f, "{}: {}/{}", desc.label, raw, desc.max),
                    Encoding::Flag => write!(f, "{}: {}", desc.label, on_off(raw)),
                }
            }
        }
    }
}
