//! MAX3140 bus wiring
//!
//! The chip shares nothing with other SPI devices on this board, so chip
//! select is a plain GPIO toggled around each word.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use isthmus_hal::WordTransfer;

/// SPI bus plus a dedicated active-low chip select
pub struct ChipSelectBus<B, CS> {
    spi: B,
    cs: CS,
}

impl<B: SpiBus, CS: OutputPin> ChipSelectBus<B, CS> {
    pub fn new(spi: B, mut cs: CS) -> Self {
        let _ = cs.set_high();
        Self { spi, cs }
    }
}

impl<B: SpiBus, CS: OutputPin> WordTransfer for ChipSelectBus<B, CS> {
    type Error = B::Error;

    fn transceive(&mut self, outgoing: [u8; 2]) -> Result<[u8; 2], Self::Error> {
        let mut incoming = [0u8; 2];
        let _ = self.cs.set_low();
        let result = self
            .spi
            .transfer(&mut incoming, &outgoing)
            .and_then(|()| self.spi.flush());
        let _ = self.cs.set_high();
        result.map(|()| incoming)
    }
}
