//! Constants used in the FT245R relay board implementation
use rusb::constants::{
    LIBUSB_ENDPOINT_IN, LIBUSB_ENDPOINT_OUT, LIBUSB_RECIPIENT_DEVICE, LIBUSB_REQUEST_TYPE_VENDOR,
};
use std::time::Duration;

/// FT245R device info

/// FTDI USB vendor ID
pub const FTDI_VID: u16 = 0x0403;
/// FT245R (and FT232R) USB product ID
pub const FT245R_PID: u16 = 0x6001;

/// Relay numbering

/// Lowest relay number on the board.  Relay n is driven by data pin D(n-1)
pub const RELAY_MIN: u8 = 1;
/// Highest relay number on the board
pub const RELAY_MAX: u8 = 8;

/// Relays switched by the demo sequence
pub const DEMO_RELAY_A: u8 = 2;
pub const DEMO_RELAY_B: u8 = 4;

/// FTDI SIO vendor requests

/// Reset the SIO (value 0 = reset, 1 = purge rx, 2 = purge tx)
pub const SIO_RESET: u8 = 0x00;
/// Set the baud rate - in bit-bang mode this sets the pin update clock
pub const SIO_SET_BAUDRATE: u8 = 0x03;
/// Set the bit mode.  High byte of value is the mode, low byte the pin direction mask
pub const SIO_SET_BITMODE: u8 = 0x0b;
/// Read the current state of the data pins
pub const SIO_READ_PINS: u8 = 0x0c;

/// SIO_RESET value which resets the chip
pub const SIO_RESET_SIO: u16 = 0;

/// Asynchronous bit-bang mode
pub const BITMODE_BITBANG: u8 = 0x01;
/// All 8 data pins configured as outputs
pub const BITMODE_ALL_OUTPUTS: u8 = 0xff;

/// Baud rate divisor value for 9600 baud, which gives a pin clock slow enough
/// for the relay drivers
pub const BITBANG_BAUD_VALUE: u16 = 0x4138;

/// wIndex for all vendor requests - interface A on a single interface chip
pub const SIO_INDEX: u16 = 1;

/// bmRequestType for vendor requests sent to the device
pub const VENDOR_OUT: u8 =
    LIBUSB_REQUEST_TYPE_VENDOR | LIBUSB_RECIPIENT_DEVICE | LIBUSB_ENDPOINT_OUT;
/// bmRequestType for vendor requests read from the device
pub const VENDOR_IN: u8 =
    LIBUSB_REQUEST_TYPE_VENDOR | LIBUSB_RECIPIENT_DEVICE | LIBUSB_ENDPOINT_IN;

/// The bulk out endpoint - each byte written here is latched onto the data pins
pub const BULK_OUT_ENDPOINT: u8 = 2 | LIBUSB_ENDPOINT_OUT;

/// USB interface used by the FT245R
pub const FT245R_INTERFACE: u8 = 0;

/// Timeouts

/// Used to wait for the USB device to respond to a write message
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);
/// Used to wait for the USB device to respond to a control message
pub const DEFAULT_CONTROL_TIMEOUT: Duration = Duration::from_secs(5);

/// Delay between relay operations in the demo sequence, long enough for the
/// relays to be seen and heard actuating
pub const DEFAULT_SWITCH_DELAY: Duration = Duration::from_secs(1);

/// Console messages

/// Printed when enumeration finds no boards
pub const NO_DEVICES_MESSAGE: &str = "No FT245R devices found";
/// Shown in place of a serial number which couldn't be read
pub const UNKNOWN_SERIAL: &str = "unknown";
