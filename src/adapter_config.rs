use bitfield::bitfield;

// Fixed wiring of the display to the microcontroller. The control lines live on one
// port and the 4-bit data bus on the upper nibble of another:
//
//      control port:   bit 0 = RS, bit 1 = E
//      data port:      bits 4..7 = D4..D7
//
bitfield! {
    pub struct ControlPortBits(u8);
    impl Debug;
    pub rs, set_rs: 0, 0;
    pub enable, set_enable: 1, 1;
}

bitfield! {
    pub struct DataPortBits(u8);
    impl Debug;
    pub data, set_data: 7, 4;
}

/// Register select pin on the control port
pub const LCD_RS_MASK: u8 = 0x01;
/// Enable pin on the control port
pub const LCD_EN_MASK: u8 = 0x02;
/// Data lines D4-D7 on the data port
pub const LCD_DATA_MASK: u8 = 0xF0;

impl DataPortBits {
    /// Port image with `nibble` placed on the D4-D7 lines and every other bit low.
    pub fn from_nibble(nibble: u8) -> Self {
        let mut bits = DataPortBits(0);
        bits.set_data(nibble & 0x0F);
        bits
    }
}
