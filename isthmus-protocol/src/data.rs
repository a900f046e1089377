//! Data word encoding
//!
//! A write-data word carries one byte for the transmit buffer plus the
//! line control bits:
//!
//! ```text
//!  15 14 13..11  10  9   8   7..0
//! ┌──┬──┬──────┬──┬───┬──┬──────┐
//! │1 │0 │  -   │TE│RTS│Pt│ data │
//! └──┴──┴──────┴──┴───┴──┴──────┘
//! ```
//!
//! The chip does not compute parity itself: in parity mode it sends the Pt
//! bit as the ninth data bit, so the driver works it out per byte.

use isthmus_hal::uart::Parity;

use crate::reg;

/// Data word that releases the line for reception
///
/// TE suppresses transmission, RTS is deasserted so the transceiver goes
/// back to listening.
pub const RECEIVE_ENABLE: u16 = reg::WRITE_DATA | reg::TE | reg::RTS;

/// Parity bit to transmit alongside `byte`
///
/// Even parity sets the bit when the byte has an odd number of ones; odd
/// parity sets it when the count is even. Always `false` without parity.
pub fn parity_bit(byte: u8, parity: Parity) -> bool {
    let odd_ones = byte.count_ones() % 2 == 1;
    match parity {
        Parity::None => false,
        Parity::Even => odd_ones,
        Parity::Odd => !odd_ones,
    }
}

/// Build the write-data word that transmits `byte`
///
/// RTS stays asserted so the transceiver drives the line.
pub fn encode_data(byte: u8, parity: Parity) -> u16 {
    let mut word = reg::WRITE_DATA | byte as u16;
    if parity_bit(byte, parity) {
        word |= reg::PT;
    }
    word
}
