//! This Rust `embedded-hal`-based library controls a [HD44780](https://en.wikipedia.org/wiki/Hitachi_HD44780_LCD_controller)
//! compatible character display wired straight to microcontroller GPIO pins in 4-bit mode, in an embedded, `no_std` environment.
//!
//! The display is driven with six lines: register select (RS) and enable (E) on a control port, and the data lines D4-D7
//! on the upper nibble of a data port. RW is assumed tied to ground, so the controller is write-only and all timing is
//! done with fixed delays.
//!
//! Key features include:
//! - Simple API for sending commands, characters and strings
//! - Remapping of the accented letters á, é, ç, ã and õ to custom glyphs, so Portuguese text can be printed directly
//! - Support for custom characters
//! - `core::fmt::Write` implementation for easy use with the `write!` macro
//! - Compatible with the `embedded-hal` traits v1.0 and later
//! - Optional support for the `defmt` and `ufmt` logging frameworks
//!
//! ## Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! gpio-character-display = { version = "0.1", features = ["defmt"] }
//! ```
//! The `features = ["defmt"]` line is optional and enables the `defmt` feature, which traces every byte sent to the
//! controller and allows the library's errors to be used with the `defmt` logging framework. Another optional feature is
//! `features = ["ufmt"]`, which enables the `ufmt` feature, allowing the `uwriteln!` and `uwrite!` macros to be used.
//!
//! Build the GPIO bus from your HAL's output pins, then create the display:
//! ```rust
//! use gpio_character_display::{CharacterDisplay, LcdDisplayType, OutputPinBus};
//!
//! // board setup
//! let bus = OutputPinBus::new(rs, en, d4, d5, d6, d7); // embedded_hal::digital::OutputPin implementations
//! let delay = ...; // DelayNs implementation
//!
//! let mut lcd = CharacterDisplay::new(bus, LcdDisplayType::Lcd16x2, delay);
//! ```
//! If the pins are better written a whole port at a time, implement the `GpioBus` trait for your port type instead.
//!
//! Initialize the display and load the accented letter glyphs:
//! ```rust
//! if let Err(e) = lcd.init() {
//!    panic!("Error initializing LCD: {}", e);
//! }
//! lcd.load_default_custom_characters()?;
//! ```
//! Use the display:
//! ```rust
//! lcd.clear()?.print("Olá, ação!")?;
//! // second line of a 16x2 display
//! lcd.print_at(0xC0, "Hello, world!")?;
//! // can also use the `core::fmt::write!` macro
//! use core::fmt::Write;
//!
//! write!(lcd, "{} °C", 21)?;
//! ```
//! Each method returns a `Result` that wraps the display object in `Ok()`, allowing for easy chaining of commands.
//!
//! ### Text encoding
//! Text is sent byte by byte. The two-byte UTF-8 sequences for á, é, ç, ã and õ are replaced by the custom glyphs in
//! CGRAM slots 0-4 (see `load_default_custom_characters`). Any other `0xC3` sequence is dropped. All remaining bytes are
//! sent as-is and show whatever the controller's character ROM holds for that code.
//!
#![no_std]
#![allow(dead_code, non_camel_case_types, non_upper_case_globals)]
use core::fmt::Display;

use embedded_hal::delay::DelayNs;

pub mod adapter_config;
pub mod charset;
mod driver;

use driver::hd44780::HD44780;
pub use driver::{output_pins::OutputPinBus, GpioBus, GpioPort};

/// HD44780 based character display driven through six individual `embedded-hal` output pins.
pub type CharacterDisplayGpio<RS, EN, D4, D5, D6, D7, DELAY> =
    CharacterDisplay<OutputPinBus<RS, EN, D4, D5, D6, D7>, DELAY>;

#[derive(Debug, PartialEq, Copy, Clone)]
/// Errors that can occur when using the display
pub enum CharacterDisplayError<E> {
    /// GPIO error returned from the underlying pin implementation
    GpioError(E),
    /// Row is out of range
    RowOutOfRange,
    /// Column is out of range
    ColumnOutOfRange,
    /// Formatting error
    FormattingError(core::fmt::Error),
}

impl<E> From<core::fmt::Error> for CharacterDisplayError<E> {
    fn from(err: core::fmt::Error) -> Self {
        CharacterDisplayError::FormattingError(err)
    }
}

impl<E> From<&CharacterDisplayError<E>> for &'static str {
    fn from(err: &CharacterDisplayError<E>) -> Self {
        match err {
            CharacterDisplayError::GpioError(_) => "GPIO error",
            CharacterDisplayError::RowOutOfRange => "Row out of range",
            CharacterDisplayError::ColumnOutOfRange => "Column out of range",
            CharacterDisplayError::FormattingError(_) => "Formatting error",
        }
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for CharacterDisplayError<E> {
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        defmt::write!(fmt, "{}", msg);
    }
}

#[cfg(feature = "ufmt")]
impl<E> ufmt::uDisplay for CharacterDisplayError<E> {
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        ufmt::uwrite!(w, "{}", msg)
    }
}

impl<E> Display for CharacterDisplayError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        write!(f, "{}", msg)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// The type of LCD display. This is used to determine the number of rows and columns, and the row offsets.
pub enum LcdDisplayType {
    /// 20x4 display
    Lcd20x4,
    /// 20x2 display
    Lcd20x2,
    /// 16x2 display
    Lcd16x2,
    /// 16x4 display
    Lcd16x4,
    /// 8x2 display
    Lcd8x2,
    /// 40x2 display
    Lcd40x2,
}

impl From<&LcdDisplayType> for &'static str {
    fn from(display_type: &LcdDisplayType) -> Self {
        match display_type {
            LcdDisplayType::Lcd20x4 => "20x4",
            LcdDisplayType::Lcd20x2 => "20x2",
            LcdDisplayType::Lcd16x2 => "16x2",
            LcdDisplayType::Lcd16x4 => "16x4",
            LcdDisplayType::Lcd8x2 => "8x2",
            LcdDisplayType::Lcd40x2 => "40x2",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LcdDisplayType {
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        defmt::write!(fmt, "{}", msg);
    }
}

#[cfg(feature = "ufmt")]
impl ufmt::uDisplay for LcdDisplayType {
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        ufmt::uwrite!(w, "{}", msg)
    }
}

impl Display for LcdDisplayType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        write!(f, "{}", msg)
    }
}

impl LcdDisplayType {
    /// Get the number of rows for the display type
    const fn rows(&self) -> u8 {
        match self {
            LcdDisplayType::Lcd20x4 => 4,
            LcdDisplayType::Lcd20x2 => 2,
            LcdDisplayType::Lcd16x2 => 2,
            LcdDisplayType::Lcd16x4 => 4,
            LcdDisplayType::Lcd8x2 => 2,
            LcdDisplayType::Lcd40x2 => 2,
        }
    }

    /// Get the number of columns for the display type
    const fn cols(&self) -> u8 {
        match self {
            LcdDisplayType::Lcd20x4 => 20,
            LcdDisplayType::Lcd20x2 => 20,
            LcdDisplayType::Lcd16x2 => 16,
            LcdDisplayType::Lcd16x4 => 16,
            LcdDisplayType::Lcd8x2 => 8,
            LcdDisplayType::Lcd40x2 => 40,
        }
    }

    /// Get the row offsets for the display type. This always returns an array of length 4.
    /// For displays with less than 4 rows, the unused rows will be set to offsets offscreen.
    const fn row_offsets(&self) -> [u8; 4] {
        match self {
            LcdDisplayType::Lcd20x4 => [0x00, 0x40, 0x14, 0x54],
            LcdDisplayType::Lcd20x2 => [0x00, 0x40, 0x00, 0x40],
            LcdDisplayType::Lcd16x2 => [0x00, 0x40, 0x10, 0x50],
            LcdDisplayType::Lcd16x4 => [0x00, 0x40, 0x10, 0x50],
            LcdDisplayType::Lcd8x2 => [0x00, 0x40, 0x00, 0x40],
            LcdDisplayType::Lcd40x2 => [0x00, 0x40, 0x00, 0x40],
        }
    }
}

/// Delays used by the driver. The defaults are conservative enough for slow HD44780 clones.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Timing {
    /// Wait after power-on before the first write, in milliseconds
    pub power_on_delay_ms: u32,
    /// How long the enable line is held high for each nibble, in microseconds
    pub enable_pulse_us: u32,
    /// Extra wait after the clear and return-home commands, in microseconds
    pub clear_settle_us: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            power_on_delay_ms: 15,
            enable_pulse_us: 5_000,
            clear_settle_us: 1_530,
        }
    }
}

pub struct DeviceSetupConfig<BUS, DELAY>
where
    BUS: GpioBus,
    DELAY: DelayNs,
{
    lcd_type: LcdDisplayType,
    timing: Timing,
    bus: BUS,
    delay: DELAY,
}

pub struct CharacterDisplay<BUS, DELAY>
where
    BUS: GpioBus,
    DELAY: DelayNs,
{
    device: HD44780<BUS, DELAY>,
}

impl<BUS, DELAY> CharacterDisplay<BUS, DELAY>
where
    BUS: GpioBus,
    DELAY: DelayNs,
{
    /// Create a new character display object with the default timing.
    pub fn new(bus: BUS, lcd_type: LcdDisplayType, delay: DELAY) -> Self {
        Self::new_with_timing(bus, lcd_type, Timing::default(), delay)
    }

    /// Create a new character display object with specific timing.
    pub fn new_with_timing(bus: BUS, lcd_type: LcdDisplayType, timing: Timing, delay: DELAY) -> Self {
        Self {
            device: HD44780::new(DeviceSetupConfig {
                lcd_type,
                timing,
                bus,
                delay,
            }),
        }
    }

    /// Initialize the display. This must be called before using the display.
    pub fn init(&mut self) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.device.init()?;
        Ok(self)
    }

    /// returns the `LcdDisplayType` used to create the display
    pub fn display_type(&self) -> LcdDisplayType {
        self.device.lcd_type()
    }

    /// Consumes the display and returns the GPIO bus and delay.
    pub fn release(self) -> (BUS, DELAY) {
        self.device.release()
    }

    //--------------------------------------------------------------------------------------------------
    // high level commands, for the user!
    //--------------------------------------------------------------------------------------------------

    /// Clear the display and return the cursor to the home position
    pub fn clear(&mut self) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.device.clear()?;
        Ok(self)
    }

    /// Set the cursor to the home position.
    pub fn home(&mut self) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.device.home()?;
        Ok(self)
    }

    /// Set the cursor position at specified column and row. Columns and rows are zero-indexed.
    pub fn set_cursor(
        &mut self,
        col: u8,
        row: u8,
    ) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.device.set_cursor(col, row)?;
        Ok(self)
    }

    /// Send a raw command byte to the controller.
    pub fn send_command(&mut self, command: u8) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.device.send_command(command)?;
        Ok(self)
    }

    /// Send one character. Accepts a plain byte value or a two-byte UTF-8 sequence packed as `0xC3XX`.
    pub fn send_character(&mut self, code: u32) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.device.send_character(code)?;
        Ok(self)
    }

    /// Send a UTF-8 byte string at the current cursor position. Stops at the first NUL byte.
    pub fn send_string(&mut self, text: &[u8]) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.device.send_string(text)?;
        Ok(self)
    }

    /// Send `position` as a command, then the string. The position is not validated.
    pub fn send_string_at(
        &mut self,
        position: u8,
        text: &[u8],
    ) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.device.send_string_at(position, text)?;
        Ok(self)
    }

    /// Prints a string to the LCD at the current cursor position.
    pub fn print(&mut self, text: &str) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.send_string(text.as_bytes())
    }

    /// Prints a string after sending `position` as a command.
    pub fn print_at(
        &mut self,
        position: u8,
        text: &str,
    ) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.send_string_at(position, text.as_bytes())
    }

    /// Create a new custom character in CGRAM slot `location` (0-7). Other locations are ignored.
    pub fn define_custom_character(
        &mut self,
        location: u8,
        charmap: &[u8; 8],
    ) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.device.create_char(location, charmap)?;
        Ok(self)
    }

    /// Load the glyphs for á, é, ç, ã and õ into CGRAM slots 0-4.
    pub fn load_default_custom_characters(
        &mut self,
    ) -> Result<&mut Self, CharacterDisplayError<BUS::Error>> {
        self.device.load_default_custom_characters()?;
        Ok(self)
    }
}

/// Implement the `core::fmt::Write` trait for the display, allowing it to be used with the `write!` macro.
impl<BUS, DELAY> core::fmt::Write for CharacterDisplay<BUS, DELAY>
where
    BUS: GpioBus,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), core::fmt::Error> {
        if let Err(_e) = self.print(s) {
            return Err(core::fmt::Error);
        }
        Ok(())
    }
}

#[cfg(feature = "ufmt")]
/// Implement the `ufmt::uWrite` trait for the display, allowing it to be used with the `uwriteln!` and `uwrite!` macros.
impl<BUS, DELAY> ufmt::uWrite for CharacterDisplay<BUS, DELAY>
where
    BUS: GpioBus,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), CharacterDisplayError<BUS::Error>> {
        self.print(s)?;
        Ok(())
    }

    type Error = CharacterDisplayError<BUS::Error>;
}
