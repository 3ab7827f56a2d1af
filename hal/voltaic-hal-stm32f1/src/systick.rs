//! SysTick as the 1 kHz delay tick
//!
//! The delay service re-arms SysTick on every millisecond delay; the
//! exception handler decrements the shared countdown. Wire the handler up
//! in the firmware crate:
//!
//! ```ignore
//! use cortex_m_rt::exception;
//! use voltaic_hal_stm32f1::systick::DELAY_TICKS;
//!
//! #[exception]
//! fn SysTick() {
//!     DELAY_TICKS.tick();
//! }
//! ```

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use voltaic_hal::time::{TickCounter, TickSource};

/// Countdown shared between the delay service and the SysTick exception.
pub static DELAY_TICKS: TickCounter = TickCounter::new();

/// SysTick's 24-bit reload ceiling
pub const SYST_RELOAD_MAX: u32 = 0x00FF_FFFF;

/// Reload value for one tick per millisecond, or `None` when the period
/// is not representable.
///
/// The 24-bit ceiling would only be hit above ~16.7 GHz, beyond what a
/// `u32` frequency can express; the realistic `None` case is a core
/// clock below 1 kHz, i.e. a miscalibrated `core_hz`.
pub fn reload_for_1khz(core_hz: u32) -> Option<u32> {
    let reload = (core_hz / 1_000).checked_sub(1)?;
    if reload > SYST_RELOAD_MAX {
        return None;
    }
    Some(reload)
}

/// SysTick-backed [`TickSource`].
pub struct SysTickSource {
    syst: SYST,
    core_hz: u32,
}

impl SysTickSource {
    /// Wrap SysTick, clocked from the core at `core_hz`.
    pub fn new(syst: SYST, core_hz: u32) -> Self {
        Self { syst, core_hz }
    }

    /// Release the raw peripheral.
    pub fn free(self) -> SYST {
        self.syst
    }
}

impl TickSource for SysTickSource {
    fn try_arm_1khz(&mut self) -> bool {
        let Some(reload) = reload_for_1khz(self.core_hz) else {
            return false;
        };
        self.syst.set_clock_source(SystClkSource::Core);
        self.syst.set_reload(reload);
        self.syst.clear_current();
        self.syst.enable_interrupt();
        self.syst.enable_counter();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_for_the_target_clock() {
        // 72 MHz core -> 72_000 cycles per millisecond
        assert_eq!(reload_for_1khz(72_000_000), Some(71_999));
    }

    #[test]
    fn test_reload_fits_24_bits_for_any_u32_clock() {
        let reload = reload_for_1khz(u32::MAX).unwrap();
        assert!(reload <= SYST_RELOAD_MAX);
    }

    #[test]
    fn test_reload_for_slow_clocks() {
        assert_eq!(reload_for_1khz(1_000), Some(0));
        // below 1 kHz there is no whole cycle per tick
        assert_eq!(reload_for_1khz(999), None);
    }
}
