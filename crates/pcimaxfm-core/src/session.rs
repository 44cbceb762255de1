//! Device session: the one handle to the transmitter

use crate::control::{ControlInterface, ControlRequest, DeviceBackend, Reply};
use crate::error::{Direction, Error, Result};
use std::path::{Path, PathBuf};

/// Owns the device path and the lazily opened handle
///
/// The path may change freely until the first exchange opens the device;
/// after that it is fixed for the rest of the session.
pub struct DeviceSession<B: DeviceBackend> {
    backend: B,
    path: PathBuf,
    handle: Option<Box<dyn ControlInterface>>,
}

impl<B: DeviceBackend> DeviceSession<B> {
    /// Create a session for `path`, not yet opened
    pub fn new(backend: B, path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            path: path.into(),
            handle: None,
        }
    }

    /// Current device path
    pub fn device_path(&self) -> &Path {
        &self.path
    }

    /// Whether the device is open
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Backend used to open the device
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Change the device path; only allowed before the device is opened
    pub fn set_device_path(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        if self.is_open() {
            return Err(Error::DeviceInUse {
                path: self.path.clone(),
            });
        }
        self.path = path.into();
        Ok(())
    }

    /// Open the device if it is not open yet
    pub fn open(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }

        log::debug!("Opening {}", self.path.display());
        let handle = self
            .backend
            .open(&self.path)
            .map_err(|source| Error::DeviceUnavailable {
                path: self.path.clone(),
                source,
            })?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Release the handle; no-op if not open
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            log::debug!("Closed {}", self.path.display());
        }
    }

    /// Perform one exchange on the open handle
    ///
    /// `what` names the parameter in the error message. The caller must
    /// have called [`open`](Self::open).
    pub fn exchange(&mut self, request: &ControlRequest, what: &'static str) -> Result<Reply> {
        let direction = if request.is_get() {
            Direction::Read
        } else {
            Direction::Write
        };
        let handle = self
            .handle
            .as_mut()
            .ok_or_else(|| Error::ControlExchangeFailed {
                direction,
                what,
                source: "device not open".into(),
            })?;

        log::debug!("{} ({:#010x}): {:?}", request.name(), request.code(), request);
        let reply = handle
            .exchange(request)
            .map_err(|source| Error::ControlExchangeFailed {
                direction,
                what,
                source,
            })?;
        log::debug!("{} -> {:?}", request.name(), reply);
        Ok(reply)
    }
}

impl<B: DeviceBackend> Drop for DeviceSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}
