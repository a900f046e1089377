//! Host UART receive task
//!
//! Bytes from the host are queued for transmission on the RS-485 line.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crate::BridgePort;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Host RX task - forwards host bytes to the MAX3140
#[embassy_executor::task]
pub async fn host_rx_task(port: &'static BridgePort, mut rx: BufferedUartRx) {
    info!("Host RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                let queued = port.write_async(&buf[..n]).await;
                if queued < n {
                    warn!("Line TX queue full, dropped {} bytes", n - queued);
                } else {
                    trace!("Host RX: {} bytes queued", n);
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("Host UART read error: {:?}", e);
            }
        }
    }
}
