use embedded_hal::digital::{OutputPin, PinState};

use crate::{
    adapter_config::{ControlPortBits, DataPortBits},
    driver::{GpioBus, GpioPort},
};

/// `GpioBus` built from six individual `embedded-hal` output pins. Port masks are
/// decoded through the fixed pin layout, so bit 0 of the control port drives `rs`,
/// bit 1 drives `en`, and bits 4..7 of the data port drive `d4`..`d7`. Bits that
/// are not wired to anything are ignored.
pub struct OutputPinBus<RS, EN, D4, D5, D6, D7> {
    rs: RS,
    en: EN,
    d4: D4,
    d5: D5,
    d6: D6,
    d7: D7,
}

impl<RS, EN, D4, D5, D6, D7> OutputPinBus<RS, EN, D4, D5, D6, D7>
where
    RS: OutputPin,
    EN: OutputPin<Error = RS::Error>,
    D4: OutputPin<Error = RS::Error>,
    D5: OutputPin<Error = RS::Error>,
    D6: OutputPin<Error = RS::Error>,
    D7: OutputPin<Error = RS::Error>,
{
    pub fn new(rs: RS, en: EN, d4: D4, d5: D5, d6: D6, d7: D7) -> Self {
        Self {
            rs,
            en,
            d4,
            d5,
            d6,
            d7,
        }
    }

    /// Gives back the pins, in constructor order.
    pub fn release(self) -> (RS, EN, D4, D5, D6, D7) {
        (self.rs, self.en, self.d4, self.d5, self.d6, self.d7)
    }

    fn write_control(&mut self, mask: u8, level: PinState) -> Result<(), RS::Error> {
        let selected = ControlPortBits(mask);
        if selected.rs() != 0 {
            self.rs.set_state(level)?;
        }
        if selected.enable() != 0 {
            self.en.set_state(level)?;
        }
        Ok(())
    }

    fn write_data(&mut self, mask: u8, level: PinState) -> Result<(), RS::Error> {
        let selected = DataPortBits(mask).data();
        if selected & 0b0001 != 0 {
            self.d4.set_state(level)?;
        }
        if selected & 0b0010 != 0 {
            self.d5.set_state(level)?;
        }
        if selected & 0b0100 != 0 {
            self.d6.set_state(level)?;
        }
        if selected & 0b1000 != 0 {
            self.d7.set_state(level)?;
        }
        Ok(())
    }
}

impl<RS, EN, D4, D5, D6, D7> GpioBus for OutputPinBus<RS, EN, D4, D5, D6, D7>
where
    RS: OutputPin,
    EN: OutputPin<Error = RS::Error>,
    D4: OutputPin<Error = RS::Error>,
    D5: OutputPin<Error = RS::Error>,
    D6: OutputPin<Error = RS::Error>,
    D7: OutputPin<Error = RS::Error>,
{
    type Error = RS::Error;

    fn write(&mut self, port: GpioPort, mask: u8, level: PinState) -> Result<(), Self::Error> {
        match port {
            GpioPort::Control => self.write_control(mask, level),
            GpioPort::Data => self.write_data(mask, level),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use crate::adapter_config::{LCD_DATA_MASK, LCD_EN_MASK, LCD_RS_MASK};
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as MockState, Transaction as PinTransaction,
    };

    type MockBus = OutputPinBus<PinMock, PinMock, PinMock, PinMock, PinMock, PinMock>;

    fn mock_bus(expectations: [&[PinTransaction]; 6]) -> MockBus {
        let [rs, en, d4, d5, d6, d7] = expectations;
        OutputPinBus::new(
            PinMock::new(rs),
            PinMock::new(en),
            PinMock::new(d4),
            PinMock::new(d5),
            PinMock::new(d6),
            PinMock::new(d7),
        )
    }

    fn done(bus: MockBus) {
        let (mut rs, mut en, mut d4, mut d5, mut d6, mut d7) = bus.release();
        rs.done();
        en.done();
        d4.done();
        d5.done();
        d6.done();
        d7.done();
    }

    #[test]
    fn test_control_port_writes() {
        let mut bus = mock_bus([
            &[PinTransaction::set(MockState::High)],
            &[
                PinTransaction::set(MockState::High),
                PinTransaction::set(MockState::Low),
            ],
            &[],
            &[],
            &[],
            &[],
        ]);

        assert!(bus.write(GpioPort::Control, LCD_RS_MASK, PinState::High).is_ok());
        assert!(bus.write(GpioPort::Control, LCD_EN_MASK, PinState::High).is_ok());
        assert!(bus.write(GpioPort::Control, LCD_EN_MASK, PinState::Low).is_ok());

        done(bus);
    }

    #[test]
    fn test_data_port_writes_only_selected_pins() {
        let mut bus = mock_bus([
            &[],
            &[],
            &[PinTransaction::set(MockState::Low)],
            &[PinTransaction::set(MockState::High)],
            &[PinTransaction::set(MockState::Low)],
            &[
                PinTransaction::set(MockState::High),
                PinTransaction::set(MockState::Low),
            ],
        ]);

        // nibble 0b1010 presented: D5 and D7 high, D4 and D6 low
        assert!(bus.write(GpioPort::Data, 0b1010_0000, PinState::High).is_ok());
        assert!(bus.write(GpioPort::Data, 0b0101_0000, PinState::Low).is_ok());
        // D7 only
        assert!(bus.write(GpioPort::Data, 0b1000_0000, PinState::Low).is_ok());

        done(bus);
    }

    #[test]
    fn test_unwired_bits_are_ignored() {
        let mut bus = mock_bus([&[], &[], &[], &[], &[], &[]]);

        // empty masks, and bits that are not part of either port layout
        assert!(bus.write(GpioPort::Data, 0, PinState::High).is_ok());
        assert!(bus.write(GpioPort::Data, !LCD_DATA_MASK, PinState::High).is_ok());
        assert!(bus.write(GpioPort::Control, 0b1111_1100, PinState::Low).is_ok());

        done(bus);
    }

    #[test]
    fn test_full_data_mask_touches_every_data_pin_in_order() {
        let high = [PinTransaction::set(MockState::High)];
        let mut bus = mock_bus([&[], &[], &high, &high, &high, &high]);

        assert!(bus.write(GpioPort::Data, LCD_DATA_MASK, PinState::High).is_ok());

        done(bus);
    }
}
