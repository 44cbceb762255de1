//! Control requests understood by the pcimaxfm driver
//!
//! Every exchange with the driver is one [`ControlRequest`]. The request
//! carries its own payload, so an invalid code/payload pairing cannot be
//! constructed. Backends translate requests into ioctls using [`codes`].

use crate::error::BoxError;
use crate::rds::RdsParam;
use std::path::Path;

/// Request code encoding, generic Linux `_IOC` layout
pub mod codes {
    use core::mem::size_of;

    /// ioctl magic number used by the driver
    pub const IOC_MAGIC: u8 = b'+';

    const NRSHIFT: u32 = 0;
    const TYPESHIFT: u32 = 8;
    const SIZESHIFT: u32 = 16;
    const DIRSHIFT: u32 = 30;

    const DIR_WRITE: u32 = 1;
    const DIR_READ: u32 = 2;

    // sizeof(int)
    const INT_SIZE: usize = size_of::<i32>();

    /// Equivalent of `_IOC(dir, IOC_MAGIC, nr, size)`
    pub const fn ioc(dir: u32, nr: u8, size: usize) -> u32 {
        (dir << DIRSHIFT)
            | ((size as u32) << SIZESHIFT)
            | ((IOC_MAGIC as u32) << TYPESHIFT)
            | ((nr as u32) << NRSHIFT)
    }

    // The driver header declares setters with _IOR and getters with _IOW.
    // The codes must match it bit for bit, so keep that inversion.
    const fn set_int(nr: u8) -> u32 {
        ioc(DIR_READ, nr, INT_SIZE)
    }

    const fn get_int(nr: u8) -> u32 {
        ioc(DIR_WRITE, nr, INT_SIZE)
    }

    /// `PCIMAXFM_TX_SET`
    pub const TX_SET: u32 = set_int(0);
    /// `PCIMAXFM_TX_GET`
    pub const TX_GET: u32 = get_int(1);
    /// `PCIMAXFM_FREQ_SET`
    pub const FREQ_SET: u32 = set_int(2);
    /// `PCIMAXFM_FREQ_GET`
    pub const FREQ_GET: u32 = get_int(3);
    /// `PCIMAXFM_POWER_SET`
    pub const POWER_SET: u32 = set_int(4);
    /// `PCIMAXFM_POWER_GET`
    pub const POWER_GET: u32 = get_int(5);
    /// `PCIMAXFM_STEREO_SET`
    pub const STEREO_SET: u32 = set_int(6);
    /// `PCIMAXFM_STEREO_GET`
    pub const STEREO_GET: u32 = get_int(7);
    /// `PCIMAXFM_RDSSIGNAL_SET`
    pub const RDSSIGNAL_SET: u32 = set_int(8);
    /// `PCIMAXFM_RDSSIGNAL_GET`
    pub const RDSSIGNAL_GET: u32 = get_int(9);
    /// Declared with a pointer-sized payload (`struct pcimaxfm_rds_set *`)
    pub const RDS_SET: u32 = ioc(DIR_READ, 10, size_of::<*const u8>());
}

/// One RDS field assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdsAssignment {
    /// Field being written
    pub param: RdsParam,
    /// Text value, already validated for the field
    pub value: String,
}

/// A single control exchange with the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    /// Read transmitter enable state
    GetTransmit,
    /// Write transmitter enable state (0/1)
    SetTransmit(i32),
    /// Read frequency in 50 kHz steps
    GetFrequency,
    /// Write frequency in 50 kHz steps
    SetFrequency(i32),
    /// Read power level
    GetPower,
    /// Write power level
    SetPower(i32),
    /// Read stereo encoder state
    GetStereo,
    /// Write stereo encoder state (0/1)
    SetStereo(i32),
    /// Read RDS signal state
    GetRdsSignal,
    /// Write RDS signal state (0/1)
    SetRdsSignal(i32),
    /// Write one RDS field
    SetRds(RdsAssignment),
}

impl ControlRequest {
    /// ioctl request code for this request
    pub fn code(&self) -> u32 {
        match self {
            Self::GetTransmit => codes::TX_GET,
            Self::SetTransmit(_) => codes::TX_SET,
            Self::GetFrequency => codes::FREQ_GET,
            Self::SetFrequency(_) => codes::FREQ_SET,
            Self::GetPower => codes::POWER_GET,
            Self::SetPower(_) => codes::POWER_SET,
            Self::GetStereo => codes::STEREO_GET,
            Self::SetStereo(_) => codes::STEREO_SET,
            Self::GetRdsSignal => codes::RDSSIGNAL_GET,
            Self::SetRdsSignal(_) => codes::RDSSIGNAL_SET,
            Self::SetRds(_) => codes::RDS_SET,
        }
    }

    /// Driver header name of the request, for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetTransmit => "PCIMAXFM_TX_GET",
            Self::SetTransmit(_) => "PCIMAXFM_TX_SET",
            Self::GetFrequency => "PCIMAXFM_FREQ_GET",
            Self::SetFrequency(_) => "PCIMAXFM_FREQ_SET",
            Self::GetPower => "PCIMAXFM_POWER_GET",
            Self::SetPower(_) => "PCIMAXFM_POWER_SET",
            Self::GetStereo => "PCIMAXFM_STEREO_GET",
            Self::SetStereo(_) => "PCIMAXFM_STEREO_SET",
            Self::GetRdsSignal => "PCIMAXFM_RDSSIGNAL_GET",
            Self::SetRdsSignal(_) => "PCIMAXFM_RDSSIGNAL_SET",
            Self::SetRds(_) => "PCIMAXFM_RDS_SET",
        }
    }

    /// Whether the request reads a value back from the driver
    pub fn is_get(&self) -> bool {
        matches!(
            self,
            Self::GetTransmit
                | Self::GetFrequency
                | Self::GetPower
                | Self::GetStereo
                | Self::GetRdsSignal
        )
    }
}

/// Driver response to a successful exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Value returned by a get request
    Value(i32),
    /// Set request accepted
    Done,
}

/// An open connection to a transmitter
///
/// Implementations perform exactly one blocking driver call per exchange.
pub trait ControlInterface {
    /// Perform one control exchange
    fn exchange(&mut self, request: &ControlRequest) -> Result<Reply, BoxError>;
}

/// Opens connections to transmitter device nodes
pub trait DeviceBackend {
    /// Open the device at `path` for reading and writing
    ///
    /// Fails if the path is missing, inaccessible, or not a pcimaxfm device.
    fn open(&mut self, path: &Path) -> Result<Box<dyn ControlInterface>, BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_driver_header() {
        assert_eq!(codes::TX_SET, 0x8004_2b00);
        assert_eq!(codes::TX_GET, 0x4004_2b01);
        assert_eq!(codes::FREQ_SET, 0x8004_2b02);
        assert_eq!(codes::FREQ_GET, 0x4004_2b03);
        assert_eq!(codes::POWER_SET, 0x8004_2b04);
        assert_eq!(codes::POWER_GET, 0x4004_2b05);
        assert_eq!(codes::STEREO_SET, 0x8004_2b06);
        assert_eq!(codes::STEREO_GET, 0x4004_2b07);
        assert_eq!(codes::RDSSIGNAL_SET, 0x8004_2b08);
        assert_eq!(codes::RDSSIGNAL_GET, 0x4004_2b09);
    }

    #[test]
    fn test_rds_code_uses_pointer_size() {
        let size = (codes::RDS_SET >> 16) & 0x3fff;
        assert_eq!(size as usize, core::mem::size_of::<usize>());
        assert_eq!(codes::RDS_SET & 0xffff, 0x2b0a);
    }

    #[test]
    fn test_request_direction() {
        assert!(ControlRequest::GetFrequency.is_get());
        assert!(!ControlRequest::SetFrequency(2000).is_get());
        assert_eq!(ControlRequest::SetPower(3).code(), codes::POWER_SET);
        assert_eq!(ControlRequest::GetStereo.name(), "PCIMAXFM_STEREO_GET");
    }
}
