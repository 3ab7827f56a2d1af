//! GPIO pin abstractions
//!
//! Provides digital output traits for the chip-select line. The transport
//! addresses pins through a [`PinBank`] by logical identifier, mirroring
//! the way board definitions map one logical line (the monitor's CS) onto
//! one physical pin.

/// Logical identifier for a digital pin
///
/// The numbering is board-defined; a bank simply ignores identifiers it
/// has no mapping for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

/// Digital output pin
///
/// Implementations handle the actual hardware register manipulation for
/// the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// A bank of output pins addressed by [`PinId`]
///
/// Both operations are no-ops for identifiers the bank does not map;
/// there is no error path for an unrecognized pin.
pub trait PinBank {
    /// Drive the identified pin high
    fn output_high(&mut self, pin: PinId);

    /// Drive the identified pin low
    fn output_low(&mut self, pin: PinId);
}

/// Adapter exposing a single [`OutputPin`] as a one-entry [`PinBank`]
pub struct SinglePin<P> {
    pin: P,
    id: PinId,
}

impl<P: OutputPin> SinglePin<P> {
    /// Wrap `pin`, answering only to `id`
    pub fn new(pin: P, id: PinId) -> Self {
        Self { pin, id }
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> PinBank for SinglePin<P> {
    fn output_high(&mut self, pin: PinId) {
        if pin == self.id {
            self.pin.set_high();
        }
    }

    fn output_low(&mut self, pin: PinId) {
        if pin == self.id {
            self.pin.set_low();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingPin {
        high: bool,
        writes: u32,
    }

    impl OutputPin for RecordingPin {
        fn set_high(&mut self) {
            self.high = true;
            self.writes += 1;
        }

        fn set_low(&mut self) {
            self.high = false;
            self.writes += 1;
        }
    }

    #[test]
    fn test_single_pin_answers_to_its_id() {
        let pin = RecordingPin {
            high: true,
            writes: 0,
        };
        let mut bank = SinglePin::new(pin, PinId(4));

        bank.output_low(PinId(4));
        assert!(!bank.pin.high);
        bank.output_high(PinId(4));
        assert!(bank.pin.high);
        assert_eq!(bank.pin.writes, 2);
    }

    #[test]
    fn test_unmapped_id_is_a_no_op() {
        let pin = RecordingPin {
            high: true,
            writes: 0,
        };
        let mut bank = SinglePin::new(pin, PinId(4));

        bank.output_low(PinId(7));
        bank.output_high(PinId(0));
        assert!(bank.pin.high);
        assert_eq!(bank.pin.writes, 0);
    }
}
