//! Periodic tick abstractions
//!
//! The millisecond delay machinery is split across a shared countdown
//! counter ([`TickCounter`]) and a tick generator ([`TickSource`]). On
//! hardware the generator is SysTick and the counter is decremented from
//! the SysTick exception; on the host a fake source drives the counter
//! deterministically from the busy-wait loop itself.

use core::sync::atomic::{AtomicU32, Ordering};

/// Free-running countdown counter shared with interrupt context.
///
/// The only state shared between the tick interrupt and thread-mode code.
/// Exactly two mutations exist: [`set`](Self::set) by the delay initiator
/// and [`tick`](Self::tick) (decrement-if-nonzero) by the tick handler.
/// The counter never wraps below zero.
#[derive(Debug)]
pub struct TickCounter {
    remaining: AtomicU32,
}

impl TickCounter {
    /// A counter starting at zero (no delay pending)
    pub const fn new() -> Self {
        Self {
            remaining: AtomicU32::new(0),
        }
    }

    /// Arm the countdown with `ticks` periods.
    pub fn set(&self, ticks: u32) {
        // Relaxed is sufficient: single core, and the handler is the
        // only other writer.
        self.remaining.store(ticks, Ordering::Relaxed);
    }

    /// One tick period elapsed: decrement unless already at zero.
    ///
    /// Constant time; safe to call from interrupt context. The tick
    /// handler is the sole caller, so the load/store pair cannot race
    /// with another decrement.
    pub fn tick(&self) {
        let remaining = self.remaining.load(Ordering::Relaxed);
        if remaining > 0 {
            self.remaining.store(remaining - 1, Ordering::Relaxed);
        }
    }

    /// Has the countdown reached zero?
    pub fn is_zero(&self) -> bool {
        self.remaining.load(Ordering::Relaxed) == 0
    }

    /// Ticks still pending
    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Relaxed)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodic tick generator driving a [`TickCounter`].
pub trait TickSource {
    /// (Re)configure the generator to fire once per millisecond.
    ///
    /// Returns `false` when the required period cannot be represented in
    /// the generator's range; the caller must then skip waiting entirely
    /// rather than spin on a counter nothing will decrement.
    fn try_arm_1khz(&mut self) -> bool;

    /// Hook invoked on every iteration of a pending-delay busy wait.
    ///
    /// The hardware implementation just hints a spin loop (the interrupt
    /// does the real decrementing). Deterministic test sources override
    /// this to tick `pending` and advance a reference clock.
    fn on_wait(&mut self, pending: &TickCounter) {
        let _ = pending;
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_counts_down_to_zero() {
        let counter = TickCounter::new();
        counter.set(3);
        assert_eq!(counter.remaining(), 3);

        counter.tick();
        counter.tick();
        assert!(!counter.is_zero());
        counter.tick();
        assert!(counter.is_zero());
    }

    #[test]
    fn test_counter_never_underflows() {
        let counter = TickCounter::new();
        assert!(counter.is_zero());

        // Extra ticks while at zero must not wrap to a huge value
        counter.tick();
        counter.tick();
        assert_eq!(counter.remaining(), 0);
    }

    #[test]
    fn test_set_overrides_pending_count() {
        let counter = TickCounter::new();
        counter.set(10);
        counter.tick();
        counter.set(2);
        assert_eq!(counter.remaining(), 2);
    }
}
