//! Bounded-retry polling policy
//!
//! Hardware-flag waits in the engine are bounded by iteration count, not
//! wall-clock time: under a slower or faster core clock the real elapsed
//! wait scales with clock speed. That is an accepted property of this
//! design, inherited from the firmware it models.

/// Maximum number of poll iterations before a flag wait gives up.
///
/// A poll samples the flag once up front and then up to `attempts` more
/// times. Exhausting the budget is silent: the surrounding transaction
/// carries on with whatever the data register holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryBudget {
    /// Poll iterations after the initial sample
    pub attempts: u32,
}

impl RetryBudget {
    /// A budget of `attempts` iterations
    pub const fn new(attempts: u32) -> Self {
        Self { attempts }
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        // Matches the original firmware's 8-bit loop bound. At the
        // target's 1.125 MHz bit clock a byte completes in ~7 us, well
        // inside this window.
        Self { attempts: 0x100 }
    }
}
