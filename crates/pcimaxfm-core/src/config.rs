//! Session configuration

use bitflags::bitflags;
use std::path::PathBuf;

/// Device node of the first card
pub const DEFAULT_DEVICE: &str = "/dev/pcimaxfm0";

bitflags! {
    /// Optional driver features available to this build
    ///
    /// Resolved once at startup. Options whose capability is missing are
    /// rejected before the device is touched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Transmitter on/off control
        const TRANSMIT_TOGGLE = 1 << 0;
        /// RDS encoder field programming
        const RDS             = 1 << 1;
        /// RDS signal on/off control (needs RDS)
        const RDS_TOGGLE      = 1 << 2;
    }
}

/// Configuration for a control session
#[derive(Debug, Clone)]
pub struct Config {
    /// Device path used until `--device` changes it
    pub device: PathBuf,
    /// Enabled optional features
    pub capabilities: Capabilities,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEFAULT_DEVICE),
            capabilities: Capabilities::all(),
        }
    }
}

impl Config {
    /// Set the initial device path
    pub fn with_device(mut self, device: impl Into<PathBuf>) -> Self {
        self.device = device.into();
        self
    }

    /// Set the enabled capabilities
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}
