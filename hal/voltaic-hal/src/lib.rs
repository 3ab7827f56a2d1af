//! Voltaic Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the transport core
//! is written against, so the same transaction and timing logic runs on
//! real silicon and against host-side mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Command layer (wake-up, conversions)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  voltaic-transport (engine + timing)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  voltaic-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ voltaic-hal-  │       │  test mocks   │
//! │   stm32f1     │       │  (host side)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`spi::SpiPeripheral`] - capability-scoped serial peripheral access
//! - [`gpio::OutputPin`], [`gpio::PinBank`] - digital output control
//! - [`time::TickSource`] - periodic 1 kHz tick generation

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;
pub mod time;

// Re-export key traits at crate root for convenience
pub use gpio::{OutputPin, PinBank, PinId};
pub use spi::{SpiConfig, SpiFlag, SpiPeripheral};
pub use time::{TickCounter, TickSource};
