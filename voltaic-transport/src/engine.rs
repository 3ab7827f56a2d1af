//! Blocking SPI transaction engine
//!
//! Owns the serial peripheral configuration and the chip-select line, and
//! implements the command/response framing the monitored IC requires: a
//! command byte clocked out first, then payload bytes clocked out of the
//! responder with dummy all-ones writes.
//!
//! Chip-select is never touched inside a byte transaction. Callers bracket
//! their command sequences with [`select`](Transport::select) /
//! [`deselect`](Transport::deselect) themselves; the engine performs no
//! ordering enforcement, so transacting while deselected silently talks to
//! nobody.

use heapless::Vec;
use voltaic_hal::gpio::{PinBank, PinId};
use voltaic_hal::spi::{SpiConfig, SpiFlag, SpiPeripheral};

use crate::retry::RetryBudget;

/// Byte clocked out when the engine only needs bus edges, not data.
///
/// All-ones keeps the data line idle-high while the responder shifts its
/// payload out.
pub const DUMMY_BYTE: u8 = 0xFF;

/// Transaction engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportConfig {
    /// Logical identifier of the chip-select line
    pub cs: PinId,
    /// Peripheral setup applied by [`Transport::init`]
    pub spi: SpiConfig,
    /// Flag-poll bound shared by all transactions
    pub retry: RetryBudget,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            // PA4 on the reference board
            cs: PinId(4),
            spi: SpiConfig::default(),
            retry: RetryBudget::default(),
        }
    }
}

/// Blocking byte-transaction engine over one SPI peripheral.
///
/// # Silent timeouts
///
/// Flag polls are bounded by the configured [`RetryBudget`] and give up
/// without reporting: a caller cannot distinguish a transaction that
/// completed from one that timed out and returned stale bytes. Frame
/// verification belongs to the command layer above.
pub struct Transport<S, B> {
    spi: S,
    pins: B,
    config: TransportConfig,
    selected: bool,
}

impl<S: SpiPeripheral, B: PinBank> Transport<S, B> {
    /// Create an engine over `spi` and the pin bank holding chip-select.
    ///
    /// No hardware is touched until [`init`](Self::init).
    pub fn new(spi: S, pins: B, config: TransportConfig) -> Self {
        Self {
            spi,
            pins,
            config,
            selected: false,
        }
    }

    /// Configure and enable the peripheral, and idle chip-select.
    ///
    /// Safe to call again: the same configuration is re-applied and
    /// chip-select returns to Idle. Do not call with a transaction in
    /// flight.
    pub fn init(&mut self) {
        self.spi.configure(&self.config.spi);
        self.pins.output_high(self.config.cs);
        self.selected = false;
    }

    /// Assert chip-select (drive the line low).
    pub fn select(&mut self) {
        self.pins.output_low(self.config.cs);
        self.selected = true;
    }

    /// Release chip-select (drive the line high).
    pub fn deselect(&mut self) {
        self.pins.output_high(self.config.cs);
        self.selected = false;
    }

    /// Last commanded chip-select state.
    pub fn cs_is_selected(&self) -> bool {
        self.selected
    }

    /// Transmit one byte, then wait (bounded) for the transmit buffer to
    /// drain.
    ///
    /// Returns even if the flag never sets; see the type-level note on
    /// silent timeouts.
    pub fn write_byte(&mut self, byte: u8) {
        self.spi.write_data(byte);
        self.poll_flag(SpiFlag::TxEmpty);
    }

    /// Transmit a buffer byte by byte. An empty buffer performs no bus
    /// exchanges.
    pub fn write_array(&mut self, data: &[u8]) {
        for &byte in data {
            self.write_byte(byte);
        }
    }

    /// Issue `command`, then clock `buf.len()` response bytes out of the
    /// responder.
    ///
    /// The byte received while the command shifts out is stale and is
    /// discarded, so this always costs `buf.len() + 1` byte-times on the
    /// bus. That extra exchange is part of the monitored IC's read
    /// sequence, not overhead to optimize away.
    pub fn read(&mut self, command: u8, buf: &mut [u8]) {
        self.write_byte(command);
        // Whatever shifted in during the command byte is undefined.
        let _ = self.spi.read_data();
        for slot in buf.iter_mut() {
            *slot = self.read_exchange();
        }
    }

    /// [`read`](Self::read) into an owned fixed-capacity buffer.
    ///
    /// `len` is clamped to the buffer capacity `N`.
    pub fn read_vec<const N: usize>(&mut self, command: u8, len: usize) -> Vec<u8, N> {
        let mut buf: Vec<u8, N> = Vec::new();
        let _ = buf.resize_default(len.min(N));
        self.read(command, &mut buf);
        buf
    }

    /// Full transmit phase followed by a full receive phase.
    ///
    /// Unlike [`read`](Self::read) there is no command-discard step: every
    /// receive slot gets the byte captured during its own dummy exchange.
    pub fn write_read(&mut self, tx: &[u8], rx: &mut [u8]) {
        self.write_array(tx);
        for slot in rx.iter_mut() {
            *slot = self.read_exchange();
        }
    }

    /// [`write_read`](Self::write_read) into an owned fixed-capacity
    /// buffer. `rx_len` is clamped to the buffer capacity `N`.
    pub fn write_read_vec<const N: usize>(&mut self, tx: &[u8], rx_len: usize) -> Vec<u8, N> {
        let mut buf: Vec<u8, N> = Vec::new();
        let _ = buf.resize_default(rx_len.min(N));
        self.write_read(tx, &mut buf);
        buf
    }

    /// Shared access to the peripheral
    pub fn spi(&self) -> &S {
        &self.spi
    }

    /// Shared access to the pin bank
    pub fn pins(&self) -> &B {
        &self.pins
    }

    /// Tear down into the owned peripheral and pin bank.
    pub fn into_parts(self) -> (S, B) {
        (self.spi, self.pins)
    }

    /// One dummy exchange: clock out [`DUMMY_BYTE`], capture the byte the
    /// responder shifted in, then wait (bounded) for the receive flag.
    fn read_exchange(&mut self) -> u8 {
        self.write_byte(DUMMY_BYTE);
        let byte = self.spi.read_data();
        self.poll_flag(SpiFlag::RxNotEmpty);
        byte
    }

    /// Sample `flag` until set, at most `1 + attempts` times.
    ///
    /// The return value is deliberately unused by the public operations:
    /// exhausting the budget degrades silently.
    fn poll_flag(&mut self, flag: SpiFlag) -> bool {
        let mut attempts = 0;
        while !self.spi.flag(flag) {
            attempts += 1;
            if attempts > self.config.retry.attempts {
                return false;
            }
        }
        true
    }
}
