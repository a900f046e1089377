//! Status word decoding

use crate::reg;

/// Flags and data returned by every exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// A received byte is waiting (R, bit 15)
    pub receive_ready: bool,
    /// The transmit buffer can take another byte (T, bit 14)
    pub transmit_empty: bool,
    /// Received byte (bits 7..0), meaningful when `receive_ready` is set
    pub received_byte: u8,
}

impl Status {
    /// Decode a reply word
    pub fn from_word(word: u16) -> Self {
        Self {
            receive_ready: word & reg::R != 0,
            transmit_empty: word & reg::T != 0,
            received_byte: (word & reg::DATA_MASK) as u8,
        }
    }
}

/// Decode a reply word
pub fn decode_status(word: u16) -> Status {
    Status::from_word(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_receive() {
        let status = decode_status(0x8058);
        assert!(status.receive_ready);
        assert!(!status.transmit_empty);
        assert_eq!(status.received_byte, 0x58);
    }

    #[test]
    fn test_decode_both_flags() {
        let status = decode_status(0xC0FF);
        assert!(status.receive_ready);
        assert!(status.transmit_empty);
        assert_eq!(status.received_byte, 0xFF);
    }

    #[test]
    fn test_zero_word_is_idle() {
        // A failed transfer is reported as an all-zero word
        assert_eq!(decode_status(0), Status::default());
    }

    #[test]
    fn test_middle_bits_ignored() {
        let status = decode_status(0x4F00);
        assert!(!status.receive_ready);
        assert!(status.transmit_empty);
        assert_eq!(status.received_byte, 0);
    }
}
