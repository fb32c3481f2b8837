//! # ft245r-relay
//!
//! This crate provides a Rust interface for driving USB relay boards built
//! around the FTDI FT245R.  These boards wire each of the chip's 8 data pins
//! to a relay driver; with the chip in bit-bang mode each byte written to it
//! sets all 8 relays at once.
//!
//! ## Overview
//!
//! The crate is structured around two traits:
//!
//! - [`Driver`] - enumerates attached boards and connects to one
//! - [`Board`] - a live connection to one board, used to switch relays
//!
//! [`UsbDriver`] and [`UsbBoard`] implement these over libusb, using
//! [`rusb`].  Code written against the traits can be tested with a mock in
//! place of real hardware.
//!
//! The [`workflow`] module contains the relay demo: list boards, print their
//! serial numbers, pick the first and click relays 2 and 4 on and off.
//!
//! ## Getting Started
//!
//! ```rust,no_run
//! use ft245r_relay::{Board, Driver, Relay, UsbDriver};
//!
//! fn main() -> Result<(), ft245r_relay::Error> {
//!     let driver = UsbDriver::new(None)?;
//!
//!     let devices = driver.list_devices()?;
//!     for info in &devices {
//!         println!("{}", info.serial());
//!     }
//!
//!     if let Some(info) = devices.first() {
//!         let mut board = driver.connect(info)?;
//!         board.switch_on(Relay::new(2)?)?;
//!         board.switch_off(Relay::new(2)?)?;
//!     }
//!
//!     // No need to close the board, it will be released when it goes out
//!     // of scope
//!     Ok(())
//! }
//! ```
//!
//! Or, to go straight to a specific board, use [`BoardBuilder`]:
//!
//! ```rust,no_run
//! use ft245r_relay::{Board, BoardBuilder, Relay};
//!
//! let mut board = BoardBuilder::new().serial("A907QJ3S").build().unwrap();
//! board.switch_on(Relay::new(8).unwrap()).unwrap();
//! ```
//!
//! ## Error Handling
//!
//! The library uses a custom [`Error`] type that covers:
//!
//! - Device access errors (not found, serial number mismatch, unplugged,
//!   permissions)
//! - Communication failures (USB errors, timeouts, short transfers)
//! - Failure to put the chip into bit-bang mode
//! - Invalid parameters (relay numbers outside 1-8)
//!
//! ## Logging
//!
//! The library uses the `log` crate for diagnostic output:
//!
//! - Warn: Potential issues, like unreadable serial numbers
//! - Info: Important state changes, like relays switching
//! - Debug: Detailed operation information
//! - Trace: Function entry and protocol-level details
//!
//! To enable logging, use [`env_logger::init`](https://docs.rs/env_logger/latest/env_logger/index.html) and set the `RUST_LOG` environment variable.
//!
//! ## Technical Details
//!
//! - Vendor ID: 0x0403
//! - Product ID: 0x6001
//! - Vendor control requests to reset the chip, set the bit mode and read the pins
//! - Bulk OUT endpoint 0x02 to write the pins
//!
//! ## License
//!
//! This library is licensed under the GNU General Public License Version 3 (GPLv3).

pub mod builder;
pub mod constants;
pub mod device;
pub mod error;
pub mod relay;
pub mod workflow;

pub use crate::builder::BoardBuilder;
pub use crate::device::{Board, DeviceInfo, Driver};
pub use crate::device::{UsbBoard, UsbDriver, UsbDriverConfig};
pub use crate::error::{CommunicationKind, DeviceAccessKind, Error};
pub use crate::relay::{Relay, RelayState, RelayStates};
pub use crate::workflow::{run_demo, DemoOutcome, ThreadWaiter, Waiter};
