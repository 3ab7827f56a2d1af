//! GPIOA pin bank
//!
//! Identifier-based output control over the port A set/reset registers.
//! Only the chip-select line is mapped; any other [`PinId`] is ignored,
//! matching the transport's no-op contract for unrecognized pins.

use stm32f1::stm32f103::GPIOA;
use voltaic_hal::gpio::{PinBank, PinId};

/// Logical identifier of the monitor's chip-select line (PA4)
pub const CS_PIN: PinId = PinId(4);

/// Port A as a [`PinBank`].
///
/// BSRR/BRR writes are atomic set/reset, so no read-modify-write races
/// with other port A users.
pub struct PortAPins {
    gpioa: GPIOA,
}

impl PortAPins {
    /// Take ownership of port A.
    ///
    /// Pin modes are expected to be set already (the SPI bring-up in
    /// [`SpiBus1::new`](crate::spi::SpiBus1::new) configures PA4-PA7).
    pub fn new(gpioa: GPIOA) -> Self {
        Self { gpioa }
    }

    /// The chip-select line as an `embedded-hal` output pin, for
    /// composing with ecosystem drivers.
    pub fn cs_pin(&mut self) -> CsPin<'_> {
        CsPin { port: self }
    }

    /// Release the raw port.
    pub fn free(self) -> GPIOA {
        self.gpioa
    }
}

impl PinBank for PortAPins {
    fn output_high(&mut self, pin: PinId) {
        if pin == CS_PIN {
            self.gpioa.bsrr.write(|w| w.bs4().set_bit());
        }
    }

    fn output_low(&mut self, pin: PinId) {
        if pin == CS_PIN {
            self.gpioa.brr.write(|w| w.br4().set_bit());
        }
    }
}

/// Borrowed view of the chip-select line implementing
/// [`embedded_hal::digital::OutputPin`].
pub struct CsPin<'a> {
    port: &'a mut PortAPins,
}

impl embedded_hal::digital::ErrorType for CsPin<'_> {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for CsPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.port.output_low(CS_PIN);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.port.output_high(CS_PIN);
        Ok(())
    }
}
