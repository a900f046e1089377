//! `embedded-hal` SPI adapter

use embedded_hal::spi::SpiDevice;

use isthmus_hal::WordTransfer;

/// Word exchange over any [`SpiDevice`]
///
/// The device handles chip select, so each exchange is one transaction of
/// two bytes, MSB first.
pub struct SpiWordTransfer<D> {
    device: D,
}

impl<D: SpiDevice> SpiWordTransfer<D> {
    /// Wrap a device whose chip select the driver may toggle per word
    pub fn new(device: D) -> Self {
        Self { device }
    }

    /// Give the device back
    pub fn release(self) -> D {
        self.device
    }
}

impl<D: SpiDevice> WordTransfer for SpiWordTransfer<D> {
    type Error = D::Error;

    fn transceive(&mut self, outgoing: [u8; 2]) -> Result<[u8; 2], Self::Error> {
        let mut incoming = [0u8; 2];
        self.device.transfer(&mut incoming, &outgoing)?;
        Ok(incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, Operation};

    /// Loopback device that answers each byte with its complement
    #[derive(Default)]
    struct Inverter {
        written: Vec<u8>,
        transactions: usize,
    }

    impl ErrorType for Inverter {
        type Error = Infallible;
    }

    impl SpiDevice for Inverter {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
            self.transactions += 1;
            for op in operations {
                if let Operation::Transfer(read, write) = op {
                    self.written.extend_from_slice(write);
                    for (r, w) in read.iter_mut().zip(write.iter()) {
                        *r = !w;
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_word_is_one_big_endian_transaction() {
        let mut bus = SpiWordTransfer::new(Inverter::default());
        assert_eq!(bus.transceive_word(0xC40B), Ok(0x3BF4));

        let device = bus.release();
        assert_eq!(device.written, vec![0xC4, 0x0B]);
        assert_eq!(device.transactions, 1);
    }
}
