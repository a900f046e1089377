//! Error kinds reported by the serial port

use core::fmt;

/// Errors surfaced to callers of the port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The chip did not echo back the configuration that was written
    ConfigRejected {
        /// Configuration word sent to the chip
        written: u16,
        /// Word returned by the read-config command
        echoed: u16,
    },
    /// The SPI exchange failed
    ///
    /// Absorbed by the driver and retried on the next trigger; reported
    /// only by the driver's transfer check.
    TransferFault,
    /// The transmit queue has no room for another byte
    QueueFull,
    /// A session is already open on the port
    SessionConflict,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigRejected { written, echoed } => write!(
                f,
                "configuration rejected (wrote {:#06x}, read back {:#06x})",
                written, echoed
            ),
            Error::TransferFault => f.write_str("spi transfer failed"),
            Error::QueueFull => f.write_str("transmit queue full"),
            Error::SessionConflict => f.write_str("device busy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::ConfigRejected {
            written: 0xC40B,
            echoed: 0x0000,
        };
        assert_eq!(
            err.to_string(),
            "configuration rejected (wrote 0xc40b, read back 0x0000)"
        );
        assert_eq!(Error::SessionConflict.to_string(), "device busy");
        assert_eq!(Error::TransferFault.to_string(), "spi transfer failed");
    }
}
