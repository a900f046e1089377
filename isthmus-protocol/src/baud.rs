//! Baud rate divisor table
//!
//! The MAX3140 derives its bit clock from the crystal through a 4-bit
//! divisor. Only ten rates are reachable with the 3.6864 MHz crystal used
//! on the board; anything else resolves to [`BaudRate::DEFAULT`].

/// Baud rates the bridge chip can generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaudRate {
    B600,
    B1200,
    B2400,
    B4800,
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
    B230400,
}

impl BaudRate {
    /// Rate used for unsupported requests
    pub const DEFAULT: Self = BaudRate::B9600;

    /// All supported rates, slowest first
    pub const ALL: [Self; 10] = [
        BaudRate::B600,
        BaudRate::B1200,
        BaudRate::B2400,
        BaudRate::B4800,
        BaudRate::B9600,
        BaudRate::B19200,
        BaudRate::B38400,
        BaudRate::B57600,
        BaudRate::B115200,
        BaudRate::B230400,
    ];

    /// Look up a rate in bits per second
    pub fn from_bps(bps: u32) -> Option<Self> {
        match bps {
            600 => Some(BaudRate::B600),
            1200 => Some(BaudRate::B1200),
            2400 => Some(BaudRate::B2400),
            4800 => Some(BaudRate::B4800),
            9600 => Some(BaudRate::B9600),
            19200 => Some(BaudRate::B19200),
            38400 => Some(BaudRate::B38400),
            57600 => Some(BaudRate::B57600),
            115200 => Some(BaudRate::B115200),
            230400 => Some(BaudRate::B230400),
            _ => None,
        }
    }

    /// Resolve a requested rate, falling back to [`BaudRate::DEFAULT`]
    ///
    /// The fallback is a constant of this type, so resolution is total and
    /// never needs a second lookup.
    pub fn resolve(bps: u32) -> Self {
        Self::from_bps(bps).unwrap_or(Self::DEFAULT)
    }

    /// Rate in bits per second
    pub fn bps(self) -> u32 {
        match self {
            BaudRate::B600 => 600,
            BaudRate::B1200 => 1200,
            BaudRate::B2400 => 2400,
            BaudRate::B4800 => 4800,
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
            BaudRate::B57600 => 57600,
            BaudRate::B115200 => 115200,
            BaudRate::B230400 => 230400,
        }
    }

    /// Divisor field value (B3..B0 of the configuration word)
    pub fn index(self) -> u8 {
        match self {
            BaudRate::B600 => 0xF,
            BaudRate::B1200 => 0xE,
            BaudRate::B2400 => 0xD,
            BaudRate::B4800 => 0xC,
            BaudRate::B9600 => 0xB,
            BaudRate::B19200 => 0xA,
            BaudRate::B38400 => 0x9,
            BaudRate::B57600 => 0x2,
            BaudRate::B115200 => 0x1,
            BaudRate::B230400 => 0x0,
        }
    }

    /// Time to shift out one ten-bit frame, in microseconds
    pub fn frame_time_us(self) -> u32 {
        10_000_000 / self.bps()
    }
}

/// Divisor field for a requested rate
pub fn baud_index(bps: u32) -> u8 {
    BaudRate::resolve(bps).index()
}

/// Software delay before releasing RTS after the last byte
///
/// Covers the time the chip needs to finish shifting the final frame out
/// of its transmit register. Computed from the rate the chip actually runs
/// at, so an unsupported request waits as long as a 9600 baud frame.
pub fn backsleep_us(bps: u32) -> u32 {
    BaudRate::resolve(bps).frame_time_us()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_table() {
        assert_eq!(baud_index(600), 0xF);
        assert_eq!(baud_index(9600), 0xB);
        assert_eq!(baud_index(57600), 0x2);
        assert_eq!(baud_index(230400), 0x0);
    }

    #[test]
    fn test_unsupported_falls_back_to_9600() {
        assert_eq!(baud_index(300), 0xB);
        assert_eq!(baud_index(0), 0xB);
        assert_eq!(baud_index(u32::MAX), 0xB);
        assert_eq!(BaudRate::resolve(14400), BaudRate::B9600);
    }

    #[test]
    fn test_from_bps_roundtrip() {
        for rate in BaudRate::ALL {
            assert_eq!(BaudRate::from_bps(rate.bps()), Some(rate));
        }
    }

    #[test]
    fn test_indices_are_distinct() {
        for (i, a) in BaudRate::ALL.iter().enumerate() {
            for b in &BaudRate::ALL[i + 1..] {
                assert_ne!(a.index(), b.index());
            }
        }
    }

    #[test]
    fn test_backsleep() {
        assert_eq!(backsleep_us(9600), 1041);
        assert_eq!(backsleep_us(115200), 86);
        assert_eq!(backsleep_us(600), 16666);
        // Unsupported rates wait as long as the rate the chip falls back to
        assert_eq!(backsleep_us(0), 1041);
    }
}
