//! Linux pcimaxfm device implementation
//!
//! This module provides the `LinuxDevice` struct that implements the
//! `ControlInterface` trait on top of the driver's `/dev/pcimaxfmN` node.

use crate::error::{LinuxDeviceError, Result};

use pcimaxfm_core::control::{
    ControlInterface, ControlRequest, DeviceBackend, RdsAssignment, Reply,
};
use pcimaxfm_core::BoxError;

use libc::c_int;
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileTypeExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

/// pcimaxfm ioctl bindings
mod ioctl {
    use libc::{c_char, c_int};
    use nix::ioctl_readwrite_bad;
    use pcimaxfm_core::control::codes;

    /// Must match the driver's `struct pcimaxfm_rds_set`
    #[repr(C)]
    pub struct RdsSet {
        pub param: c_int,
        pub value: *const c_char,
    }

    // Request codes come from the driver header; their direction bits do not
    // describe the data flow, so every call passes a mutable pointer.
    ioctl_readwrite_bad!(tx_set, codes::TX_SET, c_int);
    ioctl_readwrite_bad!(tx_get, codes::TX_GET, c_int);
    ioctl_readwrite_bad!(freq_set, codes::FREQ_SET, c_int);
    ioctl_readwrite_bad!(freq_get, codes::FREQ_GET, c_int);
    ioctl_readwrite_bad!(power_set, codes::POWER_SET, c_int);
    ioctl_readwrite_bad!(power_get, codes::POWER_GET, c_int);
    ioctl_readwrite_bad!(stereo_set, codes::STEREO_SET, c_int);
    ioctl_readwrite_bad!(stereo_get, codes::STEREO_GET, c_int);
    ioctl_readwrite_bad!(rdssignal_set, codes::RDSSIGNAL_SET, c_int);
    ioctl_readwrite_bad!(rdssignal_get, codes::RDSSIGNAL_GET, c_int);
    ioctl_readwrite_bad!(rds_set, codes::RDS_SET, RdsSet);
}

type IntIoctl = unsafe fn(c_int, *mut c_int) -> nix::Result<c_int>;

/// An open pcimaxfm character device
pub struct LinuxDevice {
    /// File handle for the device node
    file: File,
    /// Path, for log messages
    path: String,
}

impl LinuxDevice {
    /// Open the device node at `path`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The path doesn't exist or can't be opened read/write
    /// - The path is not a character device
    pub fn open(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        log::debug!("pcimaxfm: Opening device {}", display);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| LinuxDeviceError::OpenFailed {
                path: display.clone(),
                source: e,
            })?;

        let metadata = file.metadata().map_err(|e| LinuxDeviceError::OpenFailed {
            path: display.clone(),
            source: e,
        })?;
        if !metadata.file_type().is_char_device() {
            return Err(LinuxDeviceError::NotCharDevice(display));
        }

        log::debug!("pcimaxfm: Opened {}", display);
        Ok(Self {
            file,
            path: display,
        })
    }

    fn get_int(&self, request: &ControlRequest, call: IntIoctl) -> Result<i32> {
        let mut value: c_int = 0;
        // SAFETY: the driver reads or writes exactly one int through the pointer.
        unsafe { call(self.file.as_raw_fd(), &mut value) }.map_err(|source| {
            LinuxDeviceError::IoctlFailed {
                request: request.name(),
                source,
            }
        })?;
        Ok(value)
    }

    fn set_int(&self, request: &ControlRequest, call: IntIoctl, value: i32) -> Result<()> {
        let mut value: c_int = value;
        // SAFETY: as above.
        unsafe { call(self.file.as_raw_fd(), &mut value) }.map_err(|source| {
            LinuxDeviceError::IoctlFailed {
                request: request.name(),
                source,
            }
        })?;
        Ok(())
    }

    fn set_rds(&self, request: &ControlRequest, assignment: &RdsAssignment) -> Result<()> {
        let text =
            CString::new(assignment.value.as_str()).map_err(|_| LinuxDeviceError::InvalidText)?;
        let mut arg = ioctl::RdsSet {
            param: assignment.param.id(),
            value: text.as_ptr(),
        };
        // SAFETY: `text` outlives the call and the driver copies the string.
        unsafe { ioctl::rds_set(self.file.as_raw_fd(), &mut arg) }.map_err(|source| {
            LinuxDeviceError::IoctlFailed {
                request: request.name(),
                source,
            }
        })?;
        Ok(())
    }
}

impl ControlInterface for LinuxDevice {
    fn exchange(&mut self, request: &ControlRequest) -> std::result::Result<Reply, BoxError> {
        use ControlRequest::*;

        let reply = match request {
            GetTransmit => Reply::Value(self.get_int(request, ioctl::tx_get)?),
            GetFrequency => Reply::Value(self.get_int(request, ioctl::freq_get)?),
            GetPower => Reply::Value(self.get_int(request, ioctl::power_get)?),
            GetStereo => Reply::Value(self.get_int(request, ioctl::stereo_get)?),
            GetRdsSignal => Reply::Value(self.get_int(request, ioctl::rdssignal_get)?),
            SetTransmit(v) => {
                self.set_int(request, ioctl::tx_set, *v)?;
                Reply::Done
            }
            SetFrequency(v) => {
                self.set_int(request, ioctl::freq_set, *v)?;
                Reply::Done
            }
            SetPower(v) => {
                self.set_int(request, ioctl::power_set, *v)?;
                Reply::Done
            }
            SetStereo(v) => {
                self.set_int(request, ioctl::stereo_set, *v)?;
                Reply::Done
            }
            SetRdsSignal(v) => {
                self.set_int(request, ioctl::rdssignal_set, *v)?;
                Reply::Done
            }
            SetRds(assignment) => {
                self.set_rds(request, assignment)?;
                Reply::Done
            }
        };
        Ok(reply)
    }
}

impl Drop for LinuxDevice {
    fn drop(&mut self) {
        log::debug!("pcimaxfm: Closing {}", self.path);
    }
}

/// Backend opening real device nodes
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxBackend;

impl DeviceBackend for LinuxBackend {
    fn open(&mut self, path: &Path) -> std::result::Result<Box<dyn ControlInterface>, BoxError> {
        Ok(Box::new(LinuxDevice::open(path)?))
    }
}
