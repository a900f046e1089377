//! SPI bus abstractions
//!
//! The MAX3140 is driven purely through 16-bit full-duplex exchanges: every
//! command word clocked out returns a status or data word at the same time.

/// Single register exchange with an SPI-attached bridge chip
///
/// Each call is one logical exchange: two bytes out, two bytes in, with
/// chip select held for the whole transfer. Byte 0 is the high byte of
/// the 16-bit word on both sides.
pub trait WordTransfer {
    /// Error type for SPI operations
    type Error;

    /// Exchange one word with the device
    fn transceive(&mut self, outgoing: [u8; 2]) -> Result<[u8; 2], Self::Error>;

    /// Exchange one word given as a `u16`
    fn transceive_word(&mut self, word: u16) -> Result<u16, Self::Error> {
        self.transceive(word.to_be_bytes()).map(u16::from_be_bytes)
    }
}

impl<T: WordTransfer + ?Sized> WordTransfer for &mut T {
    type Error = T::Error;

    fn transceive(&mut self, outgoing: [u8; 2]) -> Result<[u8; 2], Self::Error> {
        (**self).transceive(outgoing)
    }
}

/// SPI configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock mode
    pub mode: Mode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self::MAX3140
    }
}

impl SpiConfig {
    /// Bus settings for the MAX3140: 1 MHz, mode 0
    pub const MAX3140: Self = Self {
        frequency: 1_000_000,
        mode: Mode::Mode0,
    };
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl WordTransfer for Echo {
        type Error = ();

        fn transceive(&mut self, outgoing: [u8; 2]) -> Result<[u8; 2], ()> {
            Ok(outgoing)
        }
    }

    #[test]
    fn test_transceive_word_is_big_endian() {
        struct HighByteOnly;

        impl WordTransfer for HighByteOnly {
            type Error = ();

            fn transceive(&mut self, outgoing: [u8; 2]) -> Result<[u8; 2], ()> {
                Ok([outgoing[0], 0])
            }
        }

        assert_eq!(HighByteOnly.transceive_word(0xC40B), Ok(0xC400));
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut echo = Echo;
        let mut by_ref = &mut echo;
        assert_eq!(by_ref.transceive_word(0x1234), Ok(0x1234));
    }

    #[test]
    fn test_max3140_bus_settings() {
        let config = SpiConfig::default();
        assert_eq!(config.frequency, 1_000_000);
        let (polarity, phase): (Polarity, Phase) = config.mode.into();
        assert_eq!(polarity, Polarity::IdleLow);
        assert_eq!(phase, Phase::CaptureOnFirstTransition);
    }
}
