//! MAX3140 SPI/UART bridge
//!
//! The chip is driven through 16-bit exchanges only. Its IRQ line goes low
//! when a byte has been received or, if the transmit interrupt is armed,
//! when the transmit buffer can take another byte.
//!
//! # Transmit sequence
//!
//! ```text
//! host write ──► TxQueue ──► kick_transmit: arm TM, send first byte
//!                               │
//!             IRQ (T set) ◄─────┘
//!                │
//!                ├─ queue has a byte ──► send it, stay armed
//!                └─ queue empty ──► clear TM, wait one frame time,
//!                                   deassert RTS (line back to receive)
//! ```
//!
//! RTS must stay asserted until the chip has physically shifted out the
//! last stop bit, otherwise the RS-485 transceiver cuts the frame short.
//! The chip has no "shift register empty" flag, hence the software delay.

mod irq;
mod orchestrator;
mod port;

pub use irq::Irq;
pub use orchestrator::{KickOutcome, LineSettings, Max3140};
pub use port::Port;
