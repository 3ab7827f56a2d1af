//! SPI peripheral abstractions
//!
//! Provides the capability-scoped trait the transaction engine is written
//! against, plus the configuration types describing how the peripheral is
//! set up for the monitored IC.

/// Serial peripheral capabilities used by the transaction engine.
///
/// Implementations wrap the concrete register layout of one SPI instance
/// (or a host-side mock). The engine only ever needs these four
/// operations: apply a configuration, push a byte into the transmit data
/// register, pull a byte out of the receive data register, and sample a
/// status flag. All byte-level pacing and retry policy lives above this
/// trait.
pub trait SpiPeripheral {
    /// Apply `config` and enable the peripheral.
    ///
    /// Must be idempotent: applying the same configuration twice leaves
    /// the peripheral in the same enabled state. Implementations that
    /// cannot reconfigure while enabled should disable first.
    fn configure(&mut self, config: &SpiConfig);

    /// Write one byte into the transmit data register.
    ///
    /// Does not wait for the transfer to complete; pair with a
    /// [`SpiFlag::TxEmpty`] poll.
    fn write_data(&mut self, byte: u8);

    /// Read whatever the receive data register currently holds.
    ///
    /// The value is stale or undefined unless [`SpiFlag::RxNotEmpty`]
    /// indicated a completed exchange.
    fn read_data(&mut self) -> u8;

    /// Sample a status flag.
    fn flag(&self, flag: SpiFlag) -> bool;
}

/// Hardware status flags the engine polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiFlag {
    /// Transmit data register empty; the next byte may be written.
    TxEmpty,
    /// Receive data register holds a byte from a completed exchange.
    RxNotEmpty,
}

/// SPI configuration
///
/// The peripheral always runs as a full-duplex bus master with 8-bit
/// frames and software-controlled slave select; those are fixed by the
/// monitored IC's protocol and not configurable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock polarity and phase
    pub mode: Mode,
    /// Bit order on the wire
    pub bit_order: BitOrder,
    /// Peripheral-clock prescaler
    pub divider: ClockDivider,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            // The monitored IC samples on the second edge with the clock
            // idling low.
            mode: Mode::Mode1,
            bit_order: BitOrder::MsbFirst,
            // 72 MHz / 64 = 1.125 MHz, under the IC's 1.5 MHz maximum.
            divider: ClockDivider::Div64,
        }
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

/// Bit order on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first (required by the monitored IC)
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// Peripheral-clock prescaler for the bit clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDivider {
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
    Div256,
}

impl ClockDivider {
    /// Divider as a plain integer
    pub fn ratio(self) -> u32 {
        match self {
            ClockDivider::Div2 => 2,
            ClockDivider::Div4 => 4,
            ClockDivider::Div8 => 8,
            ClockDivider::Div16 => 16,
            ClockDivider::Div32 => 32,
            ClockDivider::Div64 => 64,
            ClockDivider::Div128 => 128,
            ClockDivider::Div256 => 256,
        }
    }

    /// Effective bit rate for a given peripheral clock
    pub fn bit_rate_hz(self, pclk_hz: u32) -> u32 {
        pclk_hz / self.ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_decomposition() {
        let (pol, pha): (Polarity, Phase) = Mode::Mode1.into();
        assert_eq!(pol, Polarity::IdleLow);
        assert_eq!(pha, Phase::CaptureOnSecondTransition);

        let (pol, pha): (Polarity, Phase) = Mode::Mode3.into();
        assert_eq!(pol, Polarity::IdleHigh);
        assert_eq!(pha, Phase::CaptureOnSecondTransition);
    }

    #[test]
    fn test_default_config_stays_under_ic_maximum() {
        let config = SpiConfig::default();
        // 72 MHz APB2 clock on the target board
        let rate = config.divider.bit_rate_hz(72_000_000);
        assert!(rate <= 1_500_000, "bit rate {} exceeds IC limit", rate);
    }
}
