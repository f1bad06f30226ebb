// HD44780 Support
// This module implements the HD44780 4-bit parallel protocol on top of a `GpioBus`.
// Every byte goes out as two nibbles, high nibble first, each latched by a pulse on the
// enable line. The RS line selects whether the byte is an instruction (low) or data
// for DDRAM/CGRAM (high). There is no RW line in this wiring, so the controller is
// never read back and all timing is done with fixed delays.
//

use embedded_hal::{delay::DelayNs, digital::PinState};

use crate::{
    adapter_config::{DataPortBits, LCD_DATA_MASK, LCD_EN_MASK, LCD_RS_MASK},
    charset::{remap_character_code, Utf8Remap, ACCENTED_GLYPHS, CUSTOM_CHAR_SLOTS},
    driver::{GpioBus, GpioPort},
    CharacterDisplayError, DeviceSetupConfig, LcdDisplayType,
};

// commands
pub const LCD_CMD_CLEARDISPLAY: u8 = 0x01; //  Clear display, set cursor position to zero
pub const LCD_CMD_RETURNHOME: u8 = 0x02; //  Set cursor position to zero
pub const LCD_CMD_ENTRYMODESET: u8 = 0x04; //  Sets the entry mode
pub const LCD_CMD_DISPLAYCONTROL: u8 = 0x08; //  Controls the display; does stuff like turning it off and on
pub const LCD_CMD_FUNCTIONSET: u8 = 0x20; //  Used to send the function to set to the display
pub const LCD_CMD_SETCGRAMADDR: u8 = 0x40; //  Used to set the CGRAM (character generator RAM) with characters
pub const LCD_CMD_SETDDRAMADDR: u8 = 0x80; //  Used to set the DDRAM (Display Data RAM)

// flags for display entry mode
pub const LCD_FLAG_ENTRYLEFT: u8 = 0x02; //  Used to set text to flow from left to right
pub const LCD_FLAG_ENTRYSHIFTDECREMENT: u8 = 0x00; //  Used to 'left justify' text from the cursor

// flags for display on/off control
pub const LCD_FLAG_DISPLAYON: u8 = 0x04; //  Turns the display on
pub const LCD_FLAG_CURSOROFF: u8 = 0x00; //  Turns the cursor off
pub const LCD_FLAG_BLINKOFF: u8 = 0x00; //  Turns off the blinking cursor

// flags for function set
pub const LCD_FLAG_4BITMODE: u8 = 0x00; //  LCD 4 bit mode
pub const LCD_FLAG_2LINE: u8 = 0x08; //  LCD 2 line mode
pub const LCD_FLAG_5x8_DOTS: u8 = 0x00; //  8 pixel high font mode

/// Nibble that switches a freshly powered controller from 8-bit to 4-bit mode. Sent on
/// its own, while the controller still reads all eight data lines.
const LCD_NIBBLE_4BITMODE: u8 = (LCD_CMD_FUNCTIONSET | LCD_FLAG_4BITMODE) >> 4;

/// HD44780 controller driven over a 4-bit GPIO bus.
pub struct HD44780<BUS, DELAY>
where
    BUS: GpioBus,
    DELAY: DelayNs,
{
    config: DeviceSetupConfig<BUS, DELAY>,
}

impl<BUS, DELAY> HD44780<BUS, DELAY>
where
    BUS: GpioBus,
    DELAY: DelayNs,
{
    pub fn new(config: DeviceSetupConfig<BUS, DELAY>) -> Self {
        Self { config }
    }

    pub fn lcd_type(&self) -> LcdDisplayType {
        self.config.lcd_type
    }

    /// returns the GPIO bus. mostly used for testing
    pub fn bus(&mut self) -> &mut BUS {
        &mut self.config.bus
    }

    /// Consumes the driver and returns the bus and delay objects.
    pub fn release(self) -> (BUS, DELAY) {
        (self.config.bus, self.config.delay)
    }

    //--------------------------------------------------------------------------------------------------
    // bus level protocol
    //--------------------------------------------------------------------------------------------------

    fn write_port(
        &mut self,
        port: GpioPort,
        mask: u8,
        level: PinState,
    ) -> Result<(), CharacterDisplayError<BUS::Error>> {
        self.config
            .bus
            .write(port, mask, level)
            .map_err(CharacterDisplayError::GpioError)
    }

    /// Sets the RS line. `false` selects the instruction register, `true` the data register.
    fn set_rs(&mut self, rs_setting: bool) -> Result<(), CharacterDisplayError<BUS::Error>> {
        self.write_port(GpioPort::Control, LCD_RS_MASK, PinState::from(rs_setting))
    }

    /// Pulses the enable line. The controller latches the data lines on the falling edge.
    fn pulse_enable(&mut self) -> Result<(), CharacterDisplayError<BUS::Error>> {
        self.write_port(GpioPort::Control, LCD_EN_MASK, PinState::High)?;
        let pulse_us = self.config.timing.enable_pulse_us;
        self.config.delay.delay_us(pulse_us);
        self.write_port(GpioPort::Control, LCD_EN_MASK, PinState::Low)
    }

    /// Places the low nibble of `value` on D4-D7: bits set in the nibble are driven high
    /// first, then the remaining data lines are driven low.
    fn present_nibble(&mut self, value: u8) -> Result<(), CharacterDisplayError<BUS::Error>> {
        let image = DataPortBits::from_nibble(value).0;
        self.write_port(GpioPort::Data, LCD_DATA_MASK & image, PinState::High)?;
        self.write_port(GpioPort::Data, LCD_DATA_MASK & !image, PinState::Low)
    }

    fn write_nibble(&mut self, value: u8) -> Result<(), CharacterDisplayError<BUS::Error>> {
        self.present_nibble(value)?;
        self.pulse_enable()
    }

    /// writes a full byte to the controller. If `rs_setting` is `true`, the byte is written to the
    /// data register, either the CGRAM or DDRAM, depending on prior command sent. If `rs_setting` is
    /// `false`, the byte is written to the command register.
    fn write_byte(
        &mut self,
        rs_setting: bool,
        value: u8,
    ) -> Result<(), CharacterDisplayError<BUS::Error>> {
        self.set_rs(rs_setting)?;
        self.write_nibble(value >> 4)?;
        self.write_nibble(value & 0x0F)
    }

    //--------------------------------------------------------------------------------------------------
    // controller operations
    //--------------------------------------------------------------------------------------------------

    /// Runs the power-on sequence: switch to 4-bit mode, two lines with 5x8 font, display on with
    /// the cursor hidden, left-to-right entry, and a cleared screen.
    pub fn init(&mut self) -> Result<(), CharacterDisplayError<BUS::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Initializing {} display", self.config.lcd_type);
        let power_on_ms = self.config.timing.power_on_delay_ms;
        self.config.delay.delay_ms(power_on_ms);

        self.set_rs(false)?;
        self.write_port(GpioPort::Data, LCD_DATA_MASK, PinState::Low)?;
        self.write_nibble(LCD_NIBBLE_4BITMODE)?;

        self.send_command(
            LCD_CMD_FUNCTIONSET | LCD_FLAG_4BITMODE | LCD_FLAG_2LINE | LCD_FLAG_5x8_DOTS,
        )?;
        self.send_command(
            LCD_CMD_DISPLAYCONTROL | LCD_FLAG_DISPLAYON | LCD_FLAG_CURSOROFF | LCD_FLAG_BLINKOFF,
        )?;
        self.send_command(
            LCD_CMD_ENTRYMODESET | LCD_FLAG_ENTRYLEFT | LCD_FLAG_ENTRYSHIFTDECREMENT,
        )?;
        self.clear()
    }

    /// Sends a raw instruction byte. The value is not checked.
    pub fn send_command(&mut self, command: u8) -> Result<(), CharacterDisplayError<BUS::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("command {=u8:#x}", command);
        self.write_byte(false, command)
    }

    /// Sends one character. `code` is either a single byte or a two-byte UTF-8 sequence
    /// packed as `0xC3XX`; see [`remap_character_code`].
    pub fn send_character(&mut self, code: u32) -> Result<(), CharacterDisplayError<BUS::Error>> {
        let value = remap_character_code(code);
        #[cfg(feature = "defmt")]
        defmt::trace!("data {=u8:#x}", value);
        self.write_byte(true, value)
    }

    /// Sends a UTF-8 byte string, stopping at the first NUL byte or the end of the slice.
    pub fn send_string(&mut self, text: &[u8]) -> Result<(), CharacterDisplayError<BUS::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Printing {} bytes", text.len());
        for value in Utf8Remap::new(text) {
            self.send_character(value as u32)?;
        }
        Ok(())
    }

    /// Sends `position` as an instruction, then the string. A DDRAM position is written
    /// as `0x80 | address`; the value is passed through unchecked.
    pub fn send_string_at(
        &mut self,
        position: u8,
        text: &[u8],
    ) -> Result<(), CharacterDisplayError<BUS::Error>> {
        self.send_command(position)?;
        self.send_string(text)
    }

    pub fn clear(&mut self) -> Result<(), CharacterDisplayError<BUS::Error>> {
        self.send_command(LCD_CMD_CLEARDISPLAY)?;
        // wait for command to complete
        let settle_us = self.config.timing.clear_settle_us;
        self.config.delay.delay_us(settle_us);
        Ok(())
    }

    pub fn home(&mut self) -> Result<(), CharacterDisplayError<BUS::Error>> {
        self.send_command(LCD_CMD_RETURNHOME)?;
        // wait for command to complete
        let settle_us = self.config.timing.clear_settle_us;
        self.config.delay.delay_us(settle_us);
        Ok(())
    }

    /// Set the cursor position at specified column and row. Columns and rows are zero-indexed.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), CharacterDisplayError<BUS::Error>> {
        let lcd_type = self.config.lcd_type;
        if row >= lcd_type.rows() {
            return Err(CharacterDisplayError::RowOutOfRange);
        }
        if col >= lcd_type.cols() {
            return Err(CharacterDisplayError::ColumnOutOfRange);
        }
        self.send_command(LCD_CMD_SETDDRAMADDR | (col + lcd_type.row_offsets()[row as usize]))
    }

    /// Programs a custom glyph into CGRAM slot `location`. Each byte of `charmap` is one
    /// pixel row. Slots outside 0-7 are ignored. Leaves the address counter in CGRAM, so
    /// position the cursor before printing again.
    pub fn create_char(
        &mut self,
        location: u8,
        charmap: &[u8; 8],
    ) -> Result<(), CharacterDisplayError<BUS::Error>> {
        if location >= CUSTOM_CHAR_SLOTS {
            #[cfg(feature = "defmt")]
            defmt::debug!("Ignoring custom character for slot {}", location);
            return Ok(());
        }
        self.send_command(LCD_CMD_SETCGRAMADDR + location * 8)?;
        for &row in charmap.iter() {
            self.send_character(row as u32)?;
        }
        Ok(())
    }

    /// Loads the accented letter glyphs used by the string remapping into slots 0-4.
    pub fn load_default_custom_characters(
        &mut self,
    ) -> Result<(), CharacterDisplayError<BUS::Error>> {
        for (location, charmap) in ACCENTED_GLYPHS.iter().enumerate() {
            self.create_char(location as u8, charmap)?;
        }
        Ok(())
    }
}
