//! Configuration word encoding
//!
//! Layout of a write-configuration word:
//!
//! ```text
//!  15 14 13   12   11 10 9  8   7  6  5  4  3..0
//! ┌──┬──┬───┬────┬──┬──┬──┬───┬──┬──┬──┬─┬──────┐
//! │1 │1 │FEN│SHDN│TM│RM│PM│RAM│IR│ST│PE│L│ baud │
//! └──┴──┴───┴────┴──┴──┴──┴───┴──┴──┴──┴─┴──────┘
//! ```
//!
//! The receive interrupt (RM) is always enabled. The transmit interrupt
//! (TM) is owned by the driver at runtime and never set by [`encode_config`].

use isthmus_hal::uart::{DataBits, StopBits, UartConfig};

use crate::baud::baud_index;
use crate::reg;

/// Bits of the configuration the chip echoes back on a read-config command
pub const CONFIG_ECHO_MASK: u16 = 0x0FFF;

/// Build the write-configuration word for the given line settings
pub fn encode_config(config: &UartConfig) -> u16 {
    let mut word = reg::WRITE_CONFIG | reg::RM;
    word |= baud_index(config.baudrate) as u16 & reg::BAUD_MASK;
    if config.stop_bits == StopBits::Two {
        word |= reg::ST;
    }
    if config.parity.is_enabled() {
        word |= reg::PE;
    }
    if config.data_bits == DataBits::Seven {
        word |= reg::L;
    }
    word
}

/// Check a read-config reply against the word that was written
pub fn config_matches(written: u16, echoed: u16) -> bool {
    (written & CONFIG_ECHO_MASK) == (echoed & CONFIG_ECHO_MASK)
}

/// Return `word` with the transmit-empty interrupt mask set or cleared
///
/// The write-config marker bits are always forced on so the result can be
/// sent to the chip as is.
pub fn with_transmit_interrupt(word: u16, enabled: bool) -> u16 {
    let word = word | reg::WRITE_CONFIG;
    if enabled {
        word | reg::TM
    } else {
        word & !reg::TM
    }
}
