//! Port configuration
//!
//! Settings the port is brought up with. Line settings can later be
//! replaced by the host at any time; the rest is fixed for the lifetime
//! of the port.

use isthmus_hal::uart::UartConfig;

/// Transmit queue size used by the firmware
pub const DEFAULT_TX_QUEUE_SIZE: usize = 256;

/// Startup configuration of the serial port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortConfig {
    /// Line settings applied at startup
    pub line: UartConfig,
    /// Consecutive full-queue retries allowed per byte before a write
    /// gives up and returns a short count
    ///
    /// `None` keeps retrying until the interrupt path makes room.
    pub write_retry_limit: Option<u32>,
}

impl PortConfig {
    /// Configuration with the given line settings and unbounded retries
    pub const fn new(line: UartConfig) -> Self {
        Self {
            line,
            write_retry_limit: None,
        }
    }

    /// Check whether `attempts` consecutive retries exhaust the limit
    pub fn retries_exhausted(&self, attempts: u32) -> bool {
        match self.write_retry_limit {
            Some(limit) => attempts >= limit,
            None => false,
        }
    }
}
