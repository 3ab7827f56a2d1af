//! SPI1 peripheral access
//!
//! Wraps SPI1 as a [`SpiPeripheral`]: full-duplex master, 8-bit frames,
//! software slave management. The constructor does the one-time clock and
//! pin bring-up; `configure` only touches CR1 and is safe to re-apply.

use stm32f1::stm32f103::{GPIOA, RCC, SPI1};
use voltaic_hal::spi::{BitOrder, ClockDivider, Phase, Polarity, SpiConfig, SpiFlag, SpiPeripheral};

/// GPIOA CRL image for the SPI pins: PA4 push-pull output 50 MHz (CS),
/// PA5/PA7 alternate-function push-pull 50 MHz (SCK/MOSI), PA6 floating
/// input (MISO). Low half (PA0-PA3) is left untouched.
const CRL_SPI_PINS: u32 = 0xB4B3_0000;
const CRL_SPI_MASK: u32 = 0xFFFF_0000;

/// SPI1 wired for the battery-stack monitor.
pub struct SpiBus1 {
    spi: SPI1,
}

impl SpiBus1 {
    /// Take SPI1, enable its clock domains and claim the GPIOA pins.
    ///
    /// One-time setup: enables SPI1 and GPIOA on APB2, puts PA5/PA7 under
    /// peripheral control, leaves PA6 floating and drives PA4 high so the
    /// monitor starts deselected. The peripheral itself stays disabled
    /// until [`configure`](SpiPeripheral::configure).
    pub fn new(spi: SPI1, gpioa: &GPIOA, rcc: &RCC) -> Self {
        rcc.apb2enr
            .modify(|_, w| w.spi1en().set_bit().iopaen().set_bit());

        gpioa
            .crl
            .modify(|r, w| unsafe { w.bits((r.bits() & !CRL_SPI_MASK) | CRL_SPI_PINS) });

        // CS idles high before anything clocks
        gpioa.bsrr.write(|w| w.bs4().set_bit());

        Self { spi }
    }

    /// Release the raw peripheral.
    pub fn free(self) -> SPI1 {
        self.spi
    }
}

impl SpiPeripheral for SpiBus1 {
    fn configure(&mut self, config: &SpiConfig) {
        let (polarity, phase) = config.mode.into();

        // Reconfiguration requires the peripheral disabled first
        self.spi.cr1.modify(|_, w| w.spe().clear_bit());

        self.spi.cr1.write(|w| {
            w.mstr().set_bit();
            w.cpol().bit(polarity == Polarity::IdleHigh);
            w.cpha().bit(phase == Phase::CaptureOnSecondTransition);
            w.lsbfirst().bit(config.bit_order == BitOrder::LsbFirst);
            // software slave management, NSS held internally high
            w.ssm().set_bit();
            w.ssi().set_bit();
            // 8-bit frames
            w.dff().clear_bit();
            unsafe {
                w.br().bits(divider_bits(config.divider));
            }
            w.spe().set_bit()
        });
    }

    fn write_data(&mut self, byte: u8) {
        self.spi.dr.write(|w| unsafe { w.dr().bits(byte as u16) });
    }

    fn read_data(&mut self) -> u8 {
        self.spi.dr.read().dr().bits() as u8
    }

    fn flag(&self, flag: SpiFlag) -> bool {
        let sr = self.spi.sr.read();
        match flag {
            SpiFlag::TxEmpty => sr.txe().bit_is_set(),
            SpiFlag::RxNotEmpty => sr.rxne().bit_is_set(),
        }
    }
}

/// CR1.BR encoding for a prescaler
pub fn divider_bits(divider: ClockDivider) -> u8 {
    match divider {
        ClockDivider::Div2 => 0b000,
        ClockDivider::Div4 => 0b001,
        ClockDivider::Div8 => 0b010,
        ClockDivider::Div16 => 0b011,
        ClockDivider::Div32 => 0b100,
        ClockDivider::Div64 => 0b101,
        ClockDivider::Div128 => 0b110,
        ClockDivider::Div256 => 0b111,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divider_bits_encoding() {
        assert_eq!(divider_bits(ClockDivider::Div2), 0b000);
        assert_eq!(divider_bits(ClockDivider::Div64), 0b101);
        assert_eq!(divider_bits(ClockDivider::Div256), 0b111);
    }

    #[test]
    fn test_crl_image_leaves_low_pins_alone() {
        assert_eq!(CRL_SPI_PINS & !CRL_SPI_MASK, 0);
    }

    #[test]
    fn test_crl_image_pin_modes() {
        // nibble = CNF[1:0] << 2 | MODE[1:0]
        let nibble = |pin: u32| (CRL_SPI_PINS >> (pin * 4)) & 0xF;
        assert_eq!(nibble(4), 0x3); // output 50 MHz, push-pull
        assert_eq!(nibble(5), 0xB); // output 50 MHz, AF push-pull
        assert_eq!(nibble(6), 0x4); // input, floating
        assert_eq!(nibble(7), 0xB); // output 50 MHz, AF push-pull
    }
}
