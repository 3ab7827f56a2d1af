//! STM32F103-specific HAL for the Voltaic transport
//!
//! Implements the `voltaic-hal` traits for the reference board: SPI1 on
//! GPIOA talking to the battery-stack monitor, PA4 as the software-driven
//! chip-select, SysTick as the 1 kHz delay tick.
//!
//! Pin assignment (fixed by the board):
//!
//! - PA4 - CS (plain push-pull output, idles high)
//! - PA5 - SCK (alternate-function push-pull)
//! - PA6 - MISO (floating input, pulled up by the monitor)
//! - PA7 - MOSI (alternate-function push-pull)
//!
//! The register-level configuration here is fixed hardware setup; all
//! transaction sequencing and retry policy lives in `voltaic-transport`.

#![no_std]

pub mod gpio;
pub mod spi;
pub mod systick;

pub use gpio::{PortAPins, CS_PIN};
pub use spi::SpiBus1;
pub use systick::SysTickSource;
