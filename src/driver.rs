pub mod hd44780;
pub mod output_pins;

use embedded_hal::digital::PinState;

/// Selects which of the two GPIO ports a masked write goes to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GpioPort {
    /// Port carrying the RS and enable lines
    Control,
    /// Port carrying the D4-D7 data lines
    Data,
}

#[cfg(feature = "defmt")]
impl defmt::Format for GpioPort {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            GpioPort::Control => defmt::write!(fmt, "Control"),
            GpioPort::Data => defmt::write!(fmt, "Data"),
        }
    }
}

/// Trait for the GPIO hardware the display is wired to. Embodies the one primitive the
/// HD44780 protocol needs: driving a set of pins on a port to a level. Board support code
/// implements this over its port registers, or uses [`output_pins::OutputPinBus`] to
/// build one from individual `embedded-hal` output pins.
///
/// The pin layout of both ports is fixed, see [`crate::adapter_config`].
pub trait GpioBus {
    type Error: core::fmt::Debug;

    /// Drives every pin of `port` whose bit is set in `mask` to `level`. Pins whose bit
    /// is clear are left untouched. An empty mask is a valid no-op.
    fn write(&mut self, port: GpioPort, mask: u8, level: PinState) -> Result<(), Self::Error>;
}

impl<T> GpioBus for &mut T
where
    T: GpioBus + ?Sized,
{
    type Error = T::Error;

    fn write(&mut self, port: GpioPort, mask: u8, level: PinState) -> Result<(), Self::Error> {
        T::write(self, port, mask, level)
    }
}
