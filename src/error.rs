//! Error objects for the ft245r-relay crate
use libc::{EACCES, EINVAL, EIO, ENODEV, ENOENT, ETIMEDOUT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for the ft245r-relay crate
#[derive(Debug, Error, PartialEq, Serialize, Deserialize)]
pub enum Error {
    /// Errors accessing the USB device
    /// Note that permission problems and vanished devices are explicitly
    /// handled in DeviceAccess
    #[error("USB error while attempting to communicate with the FT245R: {0}")]
    Usb(SerializableUsbError),

    /// Failure putting the FT245R into bit-bang mode
    #[error("FT245R device initialization failed: {message}")]
    Init { message: String },

    /// Failure in communicating with the FT245R device - may be transient
    #[error("FT245R device communication error: {kind}")]
    Communication { kind: CommunicationKind },

    /// A USB operation timed out
    #[error("FT245R operation timed out after {dur:?}")]
    Timeout { dur: std::time::Duration },

    /// DeviceAccess holds a variety errors relating to accessing the FT245R
    #[error("{kind}")]
    DeviceAccess { kind: DeviceAccessKind },

    /// Failed to write to the console or other output stream
    #[error("Failed to write output: {message}")]
    Output { message: String },

    /// Invalid arguments passed to the ft245r-relay library
    #[error("ft245r-relay library called with invalid arguments: {message}")]
    Args { message: String },
}

/// Used to differentiate between different types of problems accessing the
/// relay board
#[derive(Debug, Error, PartialEq, Serialize, Deserialize)]
pub enum DeviceAccessKind {
    #[error("FT245R device {vid:04x}/{pid:04x} not found - is it connected and do you have permissions to access it?")]
    NotFound { vid: u16, pid: u16 },

    #[error("FT245R device found, but non-matching serial numbers. Found {actual:?}, was looking for {expected}")]
    SerialMismatch {
        actual: Vec<String>,
        expected: String,
    },

    #[error("FT245R device with serial number {serial} is no longer connected")]
    Gone { serial: String },

    #[error("Hit USB permissions error while attempting to access FT245R device.  Are you sure you have suitable permissions?  You may need to reconfigure udev rules in /etc/udev/rules.d/.")]
    Permission,
}

#[derive(Debug, Error, PartialEq, Serialize, Deserialize)]
pub enum CommunicationKind {
    /// Fewer bytes were accepted by the bulk endpoint than were written
    #[error("Device accepted {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// Fewer bytes were returned by a control read than were requested
    #[error("Device returned {read} of {expected} bytes")]
    ShortRead { read: usize, expected: usize },
}

#[derive(Debug, Error, PartialEq, Serialize, Deserialize)]
pub enum SerializableUsbError {
    #[error("{message}")]
    UsbError { message: String },
}

impl Error {
    pub fn to_errno(&self) -> i32 {
        match self {
            Error::Usb { .. } => EIO,
            Error::Init { .. } => EIO,
            Error::Communication { .. } => EIO,
            Error::Timeout { .. } => ETIMEDOUT,
            Error::DeviceAccess { kind } => match kind {
                DeviceAccessKind::NotFound { .. } => ENOENT,
                DeviceAccessKind::SerialMismatch { .. } => ENOENT,
                DeviceAccessKind::Gone { .. } => ENODEV,
                DeviceAccessKind::Permission => EACCES,
            },
            Error::Output { .. } => EIO,
            Error::Args { .. } => EINVAL,
        }
    }
}

// Map rusb::Error to Error.  Access and timeout failures get their own
// variants as callers are likely to want to report them differently
impl From<rusb::Error> for Error {
    fn from(err: rusb::Error) -> Self {
        match err {
            rusb::Error::Access => Self::DeviceAccess {
                kind: DeviceAccessKind::Permission,
            },
            rusb::Error::Timeout => Self::Timeout {
                dur: crate::constants::DEFAULT_CONTROL_TIMEOUT,
            },
            err => Self::Usb(SerializableUsbError::UsbError {
                message: err.to_string(),
            }),
        }
    }
}

// Map CommunicationKind to Error
impl From<CommunicationKind> for Error {
    fn from(kind: CommunicationKind) -> Self {
        Self::Communication { kind }
    }
}

// Map DeviceAccessKind to Error
impl From<DeviceAccessKind> for Error {
    fn from(kind: DeviceAccessKind) -> Self {
        Self::DeviceAccess { kind }
    }
}
