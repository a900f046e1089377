//! Host UART transmit task
//!
//! Forwards bytes received on the RS-485 line to the host.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;
use heapless::Vec;

use crate::channels::LINE_RX_CHANNEL;

/// Largest batch written to the host in one go
const TX_BATCH_SIZE: usize = 32;

/// Host TX task - drains the line RX channel into the host UART
#[embassy_executor::task]
pub async fn host_tx_task(mut tx: BufferedUartTx) {
    info!("Host TX task started");

    let mut batch: Vec<u8, TX_BATCH_SIZE> = Vec::new();

    loop {
        batch.clear();
        let first = LINE_RX_CHANNEL.receive().await;
        let _ = batch.push(first);
        while !batch.is_full() {
            match LINE_RX_CHANNEL.try_receive() {
                Ok(byte) => {
                    let _ = batch.push(byte);
                }
                Err(_) => break,
            }
        }

        if let Err(e) = tx.write_all(&batch).await {
            warn!("Failed to forward {} bytes to host: {:?}", batch.len(), e);
        }
    }
}
