#[allow(unused_imports)]
use crate::constants::*;
use crate::error::CommunicationKind;
use crate::DeviceAccessKind::*;
use crate::Error::{self, *};
use crate::{Board, DeviceInfo, Driver, Relay, RelayState, RelayStates};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use rusb::Device as RusbDevice;
use rusb::DeviceHandle as RusbDeviceHandle;
use rusb::{Context, DeviceDescriptor, UsbContext};

/// UsbDriver finds FT245R relay boards attached over USB and connects to
/// them.
///
/// Instead of connecting via [`UsbDriver::connect`] directly it may be
/// simpler to use [`crate::BoardBuilder::build`], which finds and connects to
/// a board in one go.
#[derive(Debug)]
pub struct UsbDriver {
    context: Context,
}

#[derive(Debug, Default)]
pub struct UsbDriverConfig {
    /// The [`rusb::Context`] to use for this driver.  May be None to use
    /// a new default context.
    pub context: Option<Context>,
}

impl UsbDriver {
    /// Creates a new UsbDriver using the provided config, which can be
    /// omitted in order to use a new [`rusb::Context`].
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use ft245r_relay::{Driver, UsbDriver};
    ///
    /// let driver = UsbDriver::new(None).unwrap();
    /// for info in driver.list_devices().unwrap() {
    ///     println!("{}", info.serial());
    /// }
    /// ```
    pub fn new(config: Option<UsbDriverConfig>) -> Result<Self, Error> {
        trace!("UsbDriver::new");
        let config = config.unwrap_or_default();
        let context = match config.context {
            Some(ctx) => ctx,
            None => Context::new()?,
        };
        Ok(Self { context })
    }

    fn is_ft245r(device_desc: &DeviceDescriptor) -> bool {
        device_desc.vendor_id() == FTDI_VID && device_desc.product_id() == FT245R_PID
    }

    /// Builds a DeviceInfo, reading the string descriptors where possible.
    /// A board we can't open (usually a permissions problem) is still
    /// returned, just without strings
    fn read_info(device: &RusbDevice<Context>, device_desc: &DeviceDescriptor) -> DeviceInfo {
        trace!(
            "UsbDriver::read_info bus {} address {}",
            device.bus_number(),
            device.address()
        );
        let mut info = DeviceInfo {
            serial_number: None,
            product: None,
            manufacturer: None,
            vendor_id: device_desc.vendor_id(),
            product_id: device_desc.product_id(),
            bus_number: device.bus_number(),
            device_address: device.address(),
        };

        match device.open() {
            Ok(handle) => {
                info.serial_number = handle.read_serial_number_string_ascii(device_desc).ok();
                info.product = handle.read_product_string_ascii(device_desc).ok();
                info.manufacturer = handle.read_manufacturer_string_ascii(device_desc).ok();
            }
            Err(e) => {
                warn!(
                    "Couldn't open FT245R at {:03}-{:03} to read its serial number: {}",
                    info.bus_number, info.device_address, e
                );
            }
        }
        info
    }

    /// Find the rusb device matching a previously enumerated DeviceInfo.
    /// The bus number and address identify the physical device, the serial
    /// number guards against a different board having taken its place
    fn find_device(&self, info: &DeviceInfo) -> Result<RusbDevice<Context>, Error> {
        trace!("UsbDriver::find_device info {info:?}");
        for device in self.context.devices()?.iter() {
            if device.bus_number() != info.bus_number || device.address() != info.device_address {
                continue;
            }
            let device_desc = device.device_descriptor()?;
            if !Self::is_ft245r(&device_desc) {
                continue;
            }
            debug!(
                "Found FT245R at {:03}-{:03}",
                info.bus_number, info.device_address
            );
            return Ok(device);
        }

        info!(
            "FT245R with serial number {} is no longer connected",
            info.serial()
        );
        Err(DeviceAccess {
            kind: Gone {
                serial: info.serial().to_string(),
            },
        })
    }
}

impl Driver for UsbDriver {
    type Board = UsbBoard;

    fn list_devices(&self) -> Result<Vec<DeviceInfo>, Error> {
        trace!("UsbDriver::list_devices");
        let mut devices = vec![];
        for device in self.context.devices()?.iter() {
            let device_desc = device.device_descriptor()?;
            trace!(
                "Found USB device {:04x}:{:04x}",
                device_desc.vendor_id(),
                device_desc.product_id()
            );
            if Self::is_ft245r(&device_desc) {
                let info = Self::read_info(&device, &device_desc);
                debug!("Found FT245R device with serial number {}", info.serial());
                devices.push(info);
            }
        }
        info!("Found {} FT245R device(s)", devices.len());
        Ok(devices)
    }

    fn connect(&self, info: &DeviceInfo) -> Result<UsbBoard, Error> {
        trace!("UsbDriver::connect serial {}", info.serial());
        let device = self.find_device(info)?;
        let handle = device.open().map_err(|e| match e {
            rusb::Error::NoDevice | rusb::Error::NotFound => DeviceAccess {
                kind: Gone {
                    serial: info.serial().to_string(),
                },
            },
            e => e.into(),
        })?;

        // Check it's still the same board
        if let Some(expected) = &info.serial_number {
            let device_desc = device.device_descriptor()?;
            let actual = handle.read_serial_number_string_ascii(&device_desc).ok();
            if actual.as_ref() != Some(expected) {
                info!(
                    "Board at {:03}-{:03} now has serial number {actual:?}, expected {expected}",
                    info.bus_number, info.device_address
                );
                return Err(DeviceAccess {
                    kind: Gone {
                        serial: expected.clone(),
                    },
                });
            }
        }

        let mut board = UsbBoard {
            handle,
            info: info.clone(),
            states: RelayStates::default(),
        };
        board.setup_bitbang()?;
        board.states = board.read_pins()?;
        info!(
            "Connected to FT245R {} with relay states {}",
            info.serial(),
            board.states
        );
        Ok(board)
    }
}

/// UsbBoard is a live connection to a physical FT245R relay board, with the
/// chip in bit-bang mode.
///
/// The board remembers the last byte written to the data pins, so that
/// switching one relay leaves the others as they are.
#[derive(Debug)]
pub struct UsbBoard {
    handle: RusbDeviceHandle<Context>,
    info: DeviceInfo,
    states: RelayStates,
}

impl Board for UsbBoard {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn switch(&mut self, relay: Relay, state: RelayState) -> Result<(), Error> {
        trace!("Board::switch {relay} {state}");
        let states = self.states.with(relay, state);
        self.write_pins(states)?;
        info!("Switched {relay} {state}");
        Ok(())
    }

    fn switch_all(&mut self, states: RelayStates) -> Result<(), Error> {
        trace!("Board::switch_all {states}");
        self.write_pins(states)
    }

    fn states(&mut self) -> Result<RelayStates, Error> {
        trace!("Board::states");
        let states = self.read_pins()?;
        if states != self.states {
            warn!(
                "Relay pins read {} but last wrote {} - resyncing",
                states, self.states
            );
            self.states = states;
        }
        Ok(states)
    }
}

/// Private Board functions
impl UsbBoard {
    /// Claim the interface and put the FT245R into bit-bang mode with all
    /// data pins as outputs
    fn setup_bitbang(&mut self) -> Result<(), Error> {
        trace!("Board::setup_bitbang");

        // The ftdi_sio kernel driver will usually have bound to the chip
        match self.handle.set_auto_detach_kernel_driver(true) {
            Ok(()) => (),
            Err(rusb::Error::NotSupported) => {
                debug!("Kernel driver auto detach not supported on this platform")
            }
            Err(e) => return Err(e.into()),
        }

        debug!("Claim interface");
        self.handle.claim_interface(FT245R_INTERFACE)?;

        self.write_control(SIO_RESET, SIO_RESET_SIO)
            .map_err(|e| Self::init_error("reset", e))?;
        self.write_control(SIO_SET_BAUDRATE, BITBANG_BAUD_VALUE)
            .map_err(|e| Self::init_error("set baud rate", e))?;

        let value = u16::from(BITMODE_BITBANG) << 8 | u16::from(BITMODE_ALL_OUTPUTS);
        self.write_control(SIO_SET_BITMODE, value)
            .map_err(|e| Self::init_error("set bit-bang mode", e))?;

        debug!("FT245R in bit-bang mode");
        Ok(())
    }

    // Keep permission and vanished device errors as they are, anything else
    // is reported as an initialization failure
    fn init_error(step: &str, e: Error) -> Error {
        match e {
            e @ DeviceAccess { .. } => e,
            e => Init {
                message: format!("Failed to {step}: {e}"),
            },
        }
    }

    fn write_control(&self, request: u8, value: u16) -> Result<(), Error> {
        trace!("Board::write_control request 0x{request:02x} value 0x{value:04x}");
        self.handle
            .write_control(
                VENDOR_OUT,
                request,
                value,
                SIO_INDEX,
                &[],
                DEFAULT_CONTROL_TIMEOUT,
            )
            .map_err(|e| self.map_usb_error(e))?;
        Ok(())
    }

    fn read_pins(&self) -> Result<RelayStates, Error> {
        trace!("Board::read_pins");
        let mut buf = [0u8; 1];
        let len = self
            .handle
            .read_control(
                VENDOR_IN,
                SIO_READ_PINS,
                0,
                SIO_INDEX,
                &mut buf,
                DEFAULT_CONTROL_TIMEOUT,
            )
            .map_err(|e| self.map_usb_error(e))?;
        if len != buf.len() {
            warn!("Read pins returned {len} bytes");
            return Err(CommunicationKind::ShortRead {
                read: len,
                expected: buf.len(),
            }
            .into());
        }
        let states = RelayStates::from_bits(buf[0]);
        debug!("Read pins {}", states);
        Ok(states)
    }

    fn write_pins(&mut self, states: RelayStates) -> Result<(), Error> {
        trace!("Board::write_pins {states}");
        let buf = [states.bits()];
        let written = self
            .handle
            .write_bulk(BULK_OUT_ENDPOINT, &buf, DEFAULT_WRITE_TIMEOUT)
            .map_err(|e| self.map_usb_error(e))?;
        if written != buf.len() {
            warn!("Wrote {written} of {} bytes to pins", buf.len());
            return Err(CommunicationKind::ShortWrite {
                written,
                expected: buf.len(),
            }
            .into());
        }
        self.states = states;
        Ok(())
    }

    // A board unplugged while connected shows up as NoDevice
    fn map_usb_error(&self, e: rusb::Error) -> Error {
        match e {
            rusb::Error::NoDevice => {
                warn!("FT245R {} has been disconnected", self.info.serial());
                DeviceAccess {
                    kind: Gone {
                        serial: self.info.serial().to_string(),
                    },
                }
            }
            e => e.into(),
        }
    }
}

impl Drop for UsbBoard {
    fn drop(&mut self) {
        trace!("Board::drop");
        // Relays are left as they are.  Release interface, ignoring errors
        // since we're in drop
        let _ = self.handle.release_interface(FT245R_INTERFACE);
        trace!("Exited drop");
    }
}
