use crate::{Board, Driver, Error, UsbBoard, UsbDriver, UsbDriverConfig};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use rusb::{Context, UsbContext};

/// A builder pattern for connecting to a [`UsbBoard`] with custom
/// configuration.
///
/// Allows setting optional parameters like serial number and USB context
/// before finding and connecting to the board.
///
/// # Examples
///
/// ## A simple example
///
/// ```no_run
/// use ft245r_relay::BoardBuilder;
///
/// // Connects to the first board found
/// let board = BoardBuilder::new()
///     .build()
///     .unwrap();
/// ```
///
/// ## A more complex example
///
/// ```no_run
/// use ft245r_relay::{Board, BoardBuilder, Relay};
///
/// let mut board = BoardBuilder::new()
///     .serial("A907QJ3S")
///     .build()
///     .unwrap();
/// board.switch_on(Relay::new(1).unwrap()).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct BoardBuilder {
    usb_context: Option<Context>,
    serial_num: Option<String>,
}

impl BoardBuilder {
    /// Creates a new [`BoardBuilder`] instance with default values.
    ///
    /// All fields are initialized to None and can be set using the builder methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the serial number of the board to connect to.
    ///
    /// # Args:
    /// * serial - the serial number to match when finding the board
    ///
    /// # Returns
    /// * `&mut Self` - builder instance for method chaining
    ///
    /// # Note:
    /// If not set, the first board found is used
    pub fn serial(&mut self, serial: &str) -> &mut Self {
        self.serial_num = Some(serial.to_string());
        self
    }

    /// Sets a custom USB context for device communication.
    ///
    /// This allows setting the USB debug log level via context.set_log_level()
    /// using rusb::LogLevel.
    ///
    /// ```rust,no_run
    /// use rusb::{Context, UsbContext};
    /// use ft245r_relay::BoardBuilder;
    ///
    /// let mut context = Context::new().unwrap();
    /// context.set_log_level(rusb::LogLevel::Debug);
    ///
    /// let board = BoardBuilder::new()
    ///     .context(context)
    ///     .build()
    ///     .unwrap();
    /// ```
    ///
    /// # Note:
    /// If not set, a new default [`rusb::Context`] will be created with LogLevel::Info
    pub fn context(&mut self, context: Context) -> &mut Self {
        self.usb_context = Some(context);
        self
    }

    /// Builds the [`UsbDriver`] using the configured context
    pub fn build_driver(&mut self) -> Result<UsbDriver, Error> {
        trace!("BoardBuilder::build_driver");
        let context = match self.usb_context.take() {
            Some(context) => context,
            None => {
                let mut context = Context::new()?;
                context.set_log_level(rusb::LogLevel::Info);
                context
            }
        };
        UsbDriver::new(Some(UsbDriverConfig {
            context: Some(context),
        }))
    }

    /// Finds the board and connects to it.
    ///
    /// # Returns
    /// * `Ok(UsbBoard)` - the connected board, in bit-bang mode
    /// * `Err(Error)` - if no matching board was found or it couldn't be set up
    pub fn build(&mut self) -> Result<UsbBoard, Error> {
        let driver = self.build_driver()?;
        let info = driver.find(self.serial_num.as_deref())?;
        debug!("Connecting to FT245R {}", info.serial());
        let board = driver.connect(&info)?;
        trace!("Connected to {:?}", board.info());
        Ok(board)
    }
}
