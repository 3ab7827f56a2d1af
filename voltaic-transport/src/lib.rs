//! Board-agnostic transport core for daisy-chained battery-stack monitors
//!
//! Everything above the register layer and below the monitor's command
//! set lives here:
//!
//! - Blocking byte-transaction engine with bounded-retry flag polling
//!   and software chip-select sequencing
//! - Millisecond/microsecond delay service built on a periodic 1 kHz tick
//!
//! Both are generic over the `voltaic-hal` traits, so the whole crate is
//! unit-testable on the host against mock peripherals.
//!
//! # Failure model
//!
//! There is deliberately no error taxonomy in the transaction path. A
//! flag poll that exhausts its [`RetryBudget`](retry::RetryBudget) gives
//! up silently and the call returns stale or zero data; a delay whose
//! tick generator cannot be armed returns without blocking. Callers that
//! need integrity must verify received frames (the monitor's PEC) one
//! layer up.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod engine;
pub mod retry;
pub mod timing;

pub use engine::{Transport, TransportConfig};
pub use retry::RetryBudget;
pub use timing::{TimingConfig, TimingService};
