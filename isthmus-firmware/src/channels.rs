//! Inter-task communication channels
//!
//! Bytes received from the RS-485 line travel from the interrupt task to
//! the host TX task through a static channel.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use defmt::*;
use isthmus_core::LineSink;

/// Channel capacity for bytes received on the line
pub const LINE_RX_CHANNEL_SIZE: usize = 128;

/// Bytes received from the MAX3140, waiting to go to the host
pub static LINE_RX_CHANNEL: Channel<CriticalSectionRawMutex, u8, LINE_RX_CHANNEL_SIZE> =
    Channel::new();

/// Line sink feeding [`LINE_RX_CHANNEL`]
///
/// Runs inside the driver's critical section, so it never waits: bytes
/// arriving while the channel is full are dropped.
pub struct ChannelSink;

impl LineSink for ChannelSink {
    fn deliver_received_byte(&mut self, byte: u8) {
        if LINE_RX_CHANNEL.try_send(byte).is_err() {
            warn!("Line RX channel full, dropping {=u8:#x}", byte);
        }
    }
}
