//! Blocking delay service
//!
//! Millisecond delays count a shared [`TickCounter`] down under a 1 kHz
//! periodic tick; microsecond delays are an uncalibrated spin loop. Both
//! occupy the processor for their full duration - there is no scheduler
//! to yield to and no cancellation path.

use voltaic_hal::time::{TickCounter, TickSource};

/// Delay calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Spin iterations per requested microsecond.
    ///
    /// Empirically tuned for a 72 MHz Cortex-M3; re-calibrate against the
    /// actual core clock and optimization level before trusting
    /// [`TimingService::delay_us`] on other targets.
    pub spins_per_us: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { spins_per_us: 7 }
    }
}

/// Blocking millisecond/microsecond delay provider.
///
/// Owns the tick generator and borrows the process-wide countdown counter
/// the tick handler decrements. On hardware the counter is a `static`
/// shared with the SysTick exception; tests hand in a local one and drive
/// it from a fake source.
pub struct TimingService<'c, T> {
    source: T,
    counter: &'c TickCounter,
    config: TimingConfig,
}

impl<'c, T: TickSource> TimingService<'c, T> {
    /// Service with the default calibration
    pub fn new(source: T, counter: &'c TickCounter) -> Self {
        Self::with_config(source, counter, TimingConfig::default())
    }

    /// Service with explicit calibration
    pub fn with_config(source: T, counter: &'c TickCounter, config: TimingConfig) -> Self {
        Self {
            source,
            counter,
            config,
        }
    }

    /// Block for at least `ms` tick periods.
    ///
    /// Re-arms the 1 kHz tick on every call. If the generator cannot be
    /// armed the call returns immediately instead of spinning on a
    /// counter nothing will ever decrement. There is no upper bound on
    /// the wait if ticks stop firing mid-delay.
    pub fn delay_ms(&mut self, ms: u32) {
        if !self.source.try_arm_1khz() {
            return;
        }
        self.counter.set(ms);
        while !self.counter.is_zero() {
            self.source.on_wait(self.counter);
        }
    }

    /// Block for one second: exactly 1000 one-millisecond delays.
    pub fn delay_s(&mut self) {
        for _ in 0..1000 {
            self.delay_ms(1);
        }
    }

    /// Spin for roughly `us` microseconds.
    ///
    /// Not tick-based and known-imprecise: the loop count is just
    /// `us * spins_per_us`, so accuracy depends entirely on how the loop
    /// body compiles. Use only for the monitor's short inter-command
    /// gaps, never where real accuracy matters.
    pub fn delay_us(&self, us: u32) {
        let spins = us.saturating_mul(self.config.spins_per_us);
        for _ in 0..spins {
            core::hint::spin_loop();
        }
    }

    /// Access the tick source (primarily for tests)
    pub fn source(&self) -> &T {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Fake tick source: every busy-wait iteration counts one elapsed tick
    // period on a reference clock and decrements the counter, exactly
    // what the hardware interrupt would do once per millisecond.
    struct FakeTick {
        arms: u32,
        elapsed_ticks: u32,
        arm_ok: bool,
    }

    impl FakeTick {
        fn new() -> Self {
            Self {
                arms: 0,
                elapsed_ticks: 0,
                arm_ok: true,
            }
        }
    }

    impl TickSource for FakeTick {
        fn try_arm_1khz(&mut self) -> bool {
            self.arms += 1;
            self.arm_ok
        }

        fn on_wait(&mut self, pending: &TickCounter) {
            self.elapsed_ticks += 1;
            pending.tick();
        }
    }

    #[test]
    fn test_delay_ms_waits_at_least_requested_ticks() {
        let counter = TickCounter::new();
        let mut service = TimingService::new(FakeTick::new(), &counter);

        service.delay_ms(5);
        assert!(service.source().elapsed_ticks >= 5);
        assert!(counter.is_zero());
    }

    #[test]
    fn test_delay_ms_zero_returns_immediately() {
        let counter = TickCounter::new();
        let mut service = TimingService::new(FakeTick::new(), &counter);

        service.delay_ms(0);
        assert_eq!(service.source().elapsed_ticks, 0);
    }

    #[test]
    fn test_delay_ms_rearms_on_every_call() {
        let counter = TickCounter::new();
        let mut service = TimingService::new(FakeTick::new(), &counter);

        service.delay_ms(1);
        service.delay_ms(1);
        service.delay_ms(1);
        assert_eq!(service.source().arms, 3);
    }

    #[test]
    fn test_delay_ms_does_not_block_when_arming_fails() {
        let counter = TickCounter::new();
        let mut source = FakeTick::new();
        source.arm_ok = false;
        let mut service = TimingService::new(source, &counter);

        // Must return, not hang, and must not leave a pending count
        service.delay_ms(50);
        assert_eq!(service.source().elapsed_ticks, 0);
        assert!(counter.is_zero());
    }

    #[test]
    fn test_delay_s_is_one_thousand_milliseconds() {
        let counter = TickCounter::new();
        let mut service = TimingService::new(FakeTick::new(), &counter);

        service.delay_s();
        assert_eq!(service.source().arms, 1000);
        assert_eq!(service.source().elapsed_ticks, 1000);
    }

    #[test]
    fn test_delay_us_terminates() {
        let counter = TickCounter::new();
        let service = TimingService::with_config(
            FakeTick::new(),
            &counter,
            TimingConfig { spins_per_us: 3 },
        );

        // Nothing observable beyond returning; the loop is the product
        service.delay_us(100);
        service.delay_us(0);
    }

    #[test]
    fn test_delay_us_spin_count_saturates() {
        let counter = TickCounter::new();
        let service = TimingService::with_config(
            FakeTick::new(),
            &counter,
            TimingConfig { spins_per_us: 0 },
        );

        // Zero calibration factor degenerates to no spinning at all
        service.delay_us(u32::MAX);
    }

    proptest! {
        // The counter observed from the waiting side never exceeds what
        // was set and never wraps below zero, for any interleaving of
        // set/tick operations.
        #[test]
        fn prop_counter_never_underflows(ops in proptest::collection::vec(0u32..100, 1..200)) {
            let counter = TickCounter::new();
            let mut expected: u32 = 0;
            for op in ops {
                if op == 0 {
                    counter.tick();
                    expected = expected.saturating_sub(1);
                } else {
                    counter.set(op);
                    expected = op;
                }
                prop_assert_eq!(counter.remaining(), expected);
            }
        }

        #[test]
        fn prop_delay_consumes_exactly_requested_ticks(ms in 0u32..500) {
            let counter = TickCounter::new();
            let mut service = TimingService::new(FakeTick::new(), &counter);
            service.delay_ms(ms);
            prop_assert_eq!(service.source().elapsed_ticks, ms);
            prop_assert!(counter.is_zero());
        }
    }
}
