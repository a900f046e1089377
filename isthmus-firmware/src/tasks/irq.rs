//! MAX3140 interrupt task
//!
//! The chip holds its IRQ line low for as long as it has something to
//! report, so the task keeps servicing until the line goes high again.

use defmt::*;
use embassy_rp::gpio::Input;

use isthmus_drivers::Irq;

use crate::BridgePort;

/// IRQ task - services the chip on every low level of its IRQ line
#[embassy_executor::task]
pub async fn irq_task(port: &'static BridgePort, mut irq: Input<'static>) {
    info!("IRQ task started");

    loop {
        irq.wait_for_low().await;

        while irq.is_low() {
            match port.on_interrupt() {
                Irq::Received(byte) => trace!("line RX {=u8:#x}", byte),
                Irq::Sent(byte) => trace!("line TX {=u8:#x}", byte),
                Irq::Released => debug!("line released"),
                Irq::Spurious => {
                    warn!("spurious IRQ, {} SPI faults so far", port.driver().transfer_faults());
                }
            }
            // Let the host tasks refill the queue between bytes
            embassy_futures::yield_now().await;
        }
    }
}
