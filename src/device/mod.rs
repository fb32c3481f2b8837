//! The [`device`](crate::device) module provides the low-level interface to
//! FT245R relay boards: the [`Driver`] used to find and connect to boards,
//! and the [`Board`] connection used to switch relays.
//!
//! Both are traits so that the USB implementation can be swapped out for a
//! mock when testing code built on top of them.

#[cfg(test)]
pub(crate) mod mock;
pub mod usb;

use serde::{Deserialize, Serialize};
pub use usb::{UsbBoard, UsbDriver, UsbDriverConfig};

use crate::constants::{FTDI_VID, FT245R_PID, UNKNOWN_SERIAL};
use crate::error::DeviceAccessKind::{NotFound, SerialMismatch};
use crate::{Error, Relay, RelayState, RelayStates};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

/// The relay-control subsystem: enumerates attached boards and connects to
/// one of them.
pub trait Driver: std::fmt::Debug {
    type Board: Board;

    /// Lists all attached relay boards, in the order the bus reports them.
    ///
    /// # Returns
    /// * `Ok(Vec<DeviceInfo>)` - The boards found.  May be empty
    /// * `Err(Error)` - If the bus could not be enumerated
    fn list_devices(&self) -> Result<Vec<DeviceInfo>, Error>;

    /// Connects to a board previously returned by [`Driver::list_devices`].
    ///
    /// # Arguments
    /// * `info` - The board to connect to
    ///
    /// # Returns
    /// * `Ok(Self::Board)` - The live connection, ready to switch relays
    /// * `Err(Error)` - If the board has gone away or couldn't be set up.  A
    ///   board which is no longer on the bus gives
    ///   [`crate::DeviceAccessKind::Gone`]
    fn connect(&self, info: &DeviceInfo) -> Result<Self::Board, Error>;

    /// Finds a single board, either the first one enumerated or the one
    /// with the given serial number.
    ///
    /// # Returns
    /// * `Ok(DeviceInfo)` - The matching board
    /// * `Err(Error)` - [`crate::DeviceAccessKind::NotFound`] if there are
    ///   no boards, [`crate::DeviceAccessKind::SerialMismatch`] if there are
    ///   boards but none with the given serial
    fn find(&self, serial: Option<&str>) -> Result<DeviceInfo, Error> {
        trace!("Driver::find serial {serial:?}");
        let devices = self.list_devices()?;

        let found = match serial {
            Some(serial) => devices
                .iter()
                .find(|d| d.serial_number.as_deref() == Some(serial)),
            None => devices.first(),
        };

        match (found, serial) {
            (Some(info), _) => Ok(info.clone()),
            (None, Some(serial)) if !devices.is_empty() => {
                let actual: Vec<String> =
                    devices.iter().map(|d| d.serial().to_string()).collect();
                info!("No FT245R with serial {serial}, but found {actual:?}");
                Err(SerialMismatch {
                    actual,
                    expected: serial.to_string(),
                }
                .into())
            }
            (None, _) => Err(NotFound {
                vid: FTDI_VID,
                pid: FT245R_PID,
            }
            .into()),
        }
    }
}

/// A live connection to one relay board.
pub trait Board: std::fmt::Debug {
    /// Returns the [`DeviceInfo`] of the board this connection is bound to
    fn info(&self) -> &DeviceInfo;

    /// Sets a single relay, leaving the others in their current state
    fn switch(&mut self, relay: Relay, state: RelayState) -> Result<(), Error>;

    /// Sets all relays at once
    fn switch_all(&mut self, states: RelayStates) -> Result<(), Error>;

    /// Reads the state of all relays from the board
    fn states(&mut self) -> Result<RelayStates, Error>;

    fn switch_on(&mut self, relay: Relay) -> Result<(), Error> {
        self.switch(relay, RelayState::On)
    }

    fn switch_off(&mut self, relay: Relay) -> Result<(), Error> {
        self.switch(relay, RelayState::Off)
    }

    /// Reads the state of a single relay from the board
    fn state(&mut self, relay: Relay) -> Result<RelayState, Error> {
        Ok(self.states()?.get(relay))
    }
}

/// DeviceInfo describes one relay board found on the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Serial number [`String`] from the USB device, if it could be read
    pub serial_number: Option<String>,
    /// Product [`String`] from the USB device, if it could be read
    pub product: Option<String>,
    /// Manufacturer [`String`] from the USB device, if it could be read
    pub manufacturer: Option<String>,
    pub vendor_id: u16,
    pub product_id: u16,
    pub bus_number: u8,
    pub device_address: u8,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        DeviceInfo {
            serial_number: None,
            product: None,
            manufacturer: None,
            vendor_id: FTDI_VID,
            product_id: FT245R_PID,
            bus_number: 0,
            device_address: 0,
        }
    }
}

impl DeviceInfo {
    /// Returns the serial number for display, or [`UNKNOWN_SERIAL`] if it
    /// couldn't be read
    pub fn serial(&self) -> &str {
        self.serial_number.as_deref().unwrap_or(UNKNOWN_SERIAL)
    }

    /// Prints DeviceInfo to stdout in a human-readable format
    pub fn print(&self) {
        println!("  Serial Number: {}", self.serial());
        if let Some(product) = &self.product {
            println!("  Product: {}", product);
        }
        if let Some(manufacturer) = &self.manufacturer {
            println!("  Manufacturer: {}", manufacturer);
        }
        println!("  - device: {:04x}:{:04x}", self.vendor_id, self.product_id);
        println!(
            "  - bus/address: {:03}-{:03}",
            self.bus_number, self.device_address
        );
    }
}
