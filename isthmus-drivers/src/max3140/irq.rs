//! Interrupt dispatcher
//!
//! Entry point for one falling edge of the chip's IRQ line. A single status
//! probe decides what the chip wants; exactly one branch runs per call.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;

use isthmus_core::{LineSink, TxQueue};
use isthmus_hal::WordTransfer;
use isthmus_protocol::{self as protocol, reg, Status};

use super::orchestrator::{Chip, Max3140};

/// What an interrupt turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Irq {
    /// A byte was received and handed to the line sink
    Received(u8),
    /// The transmit buffer was empty and the next queued byte was sent
    Sent(u8),
    /// The queue ran dry: transmit interrupt disarmed, line back in receive
    Released,
    /// Neither flag was set
    Spurious,
}

impl<T: WordTransfer, D: DelayNs> Chip<T, D> {
    pub(crate) fn service_receive_ready<S: LineSink + ?Sized>(
        &mut self,
        byte: u8,
        sink: &mut S,
    ) -> Irq {
        trace!("irq recv {=u8:#x}", byte);
        sink.deliver_received_byte(byte);
        Irq::Received(byte)
    }

    pub(crate) fn service_transmit_ready<M: RawMutex, const N: usize>(
        &mut self,
        queue: &TxQueue<M, N>,
    ) -> Irq {
        if let Some(byte) = queue.dequeue() {
            self.send_byte(byte);
            trace!("irq sent {=u8:#x}", byte);
            return Irq::Sent(byte);
        }

        let disarmed = protocol::with_transmit_interrupt(self.current_config(), false);
        self.write_config(disarmed);
        // The last stop bit is still on the wire; RTS must outlive it
        self.delay_backsleep();
        self.exchange(protocol::RECEIVE_ENABLE);
        trace!("irq RTS released, receiving");
        Irq::Released
    }
}

impl<M, T, D, const N: usize> Max3140<M, T, D, N>
where
    M: RawMutex,
    T: WordTransfer,
    D: DelayNs,
{
    /// Service one interrupt from the chip
    ///
    /// Probes the status with a read-data exchange, then either hands a
    /// received byte to `sink` or feeds the transmit buffer. Receive takes
    /// priority when both flags are set; the transmit side will interrupt
    /// again. Transmit-empty is ignored until a configuration has been
    /// accepted, so nothing is written over the chip's power-on setup.
    pub fn handle_interrupt<S: LineSink + ?Sized>(&self, sink: &mut S) -> Irq {
        self.with_chip(|chip| {
            let status = Status::from_word(chip.exchange(reg::READ_DATA));
            if status.receive_ready {
                chip.service_receive_ready(status.received_byte, sink)
            } else if status.transmit_empty && chip.is_configured() {
                chip.service_transmit_ready(self.queue())
            } else {
                trace!("irq spurious");
                Irq::Spurious
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::max3140::KickOutcome;
    use crate::mock::{started, Driver, Event, Wire};
    use isthmus_hal::UartConfig;

    #[derive(Default)]
    struct VecSink(Vec<u8>);

    impl LineSink for VecSink {
        fn deliver_received_byte(&mut self, byte: u8) {
            self.0.push(byte);
        }
    }

    fn driver(wire: &Wire) -> Driver<16> {
        started(wire)
    }

    #[test]
    fn test_receive_delivers_without_touching_queue() {
        let wire = Wire::new();
        let uart = driver(&wire);
        assert!(uart.enqueue(0x41));
        let mut sink = VecSink::default();
        wire.reply(reg::R | 0x58);

        assert_eq!(uart.handle_interrupt(&mut sink), Irq::Received(0x58));
        assert_eq!(sink.0, vec![0x58]);
        assert_eq!(wire.words(), vec![reg::READ_DATA]);
        assert_eq!(uart.queue().len(), 1);
    }

    #[test]
    fn test_receive_wins_over_transmit() {
        let wire = Wire::new();
        let uart = driver(&wire);
        assert!(uart.enqueue(0x41));
        let mut sink = VecSink::default();
        wire.reply(reg::R | reg::T | 0x10);

        assert_eq!(uart.handle_interrupt(&mut sink), Irq::Received(0x10));
        assert_eq!(wire.words().len(), 1);
        assert_eq!(uart.queue().len(), 1);
    }

    #[test]
    fn test_kick_then_interrupt_sends_in_order() {
        let wire = Wire::new();
        let uart = driver(&wire);
        assert!(uart.enqueue(0x41));
        assert!(uart.enqueue(0x42));

        // Transmit buffer still busy when armed
        wire.reply(0x0000);
        assert_eq!(uart.kick_transmit(), KickOutcome::Armed);

        wire.reply(reg::T);
        assert_eq!(uart.handle_interrupt(&mut VecSink::default()), Irq::Sent(0x41));
        assert_eq!(wire.words(), vec![0xCC0B, reg::READ_DATA, 0x8041]);
        assert_eq!(uart.queue().dequeue(), Some(0x42));
    }

    #[test]
    fn test_drained_queue_releases_line_after_delay() {
        let wire = Wire::new();
        let uart = driver(&wire);
        wire.reply(reg::T);
        assert_eq!(uart.kick_transmit(), KickOutcome::Armed);
        wire.clear();

        wire.reply(reg::T);
        assert_eq!(uart.handle_interrupt(&mut VecSink::default()), Irq::Released);
        assert_eq!(
            wire.events(),
            vec![
                Event::Word(reg::READ_DATA),
                Event::Word(0xC40B),
                Event::DelayUs(1041),
                Event::Word(0x8600),
            ]
        );
        assert!(!uart.transmit_armed());
        assert_eq!(uart.current_config(), 0xC40B);
    }

    #[test]
    fn test_release_delay_follows_baud_rate() {
        let wire = Wire::new();
        let uart = driver(&wire);
        uart.apply_line_config(&UartConfig::with_baudrate(115200));
        wire.reply(reg::T);

        assert_eq!(uart.handle_interrupt(&mut VecSink::default()), Irq::Released);
        assert!(wire.events().contains(&Event::DelayUs(86)));
    }

    #[test]
    fn test_spurious_interrupt() {
        let wire = Wire::new();
        let uart = driver(&wire);
        assert!(uart.enqueue(0x41));
        wire.reply(0x0000);

        assert_eq!(uart.handle_interrupt(&mut VecSink::default()), Irq::Spurious);
        assert_eq!(wire.words(), vec![reg::READ_DATA]);
        assert_eq!(uart.queue().len(), 1);
    }

    #[test]
    fn test_transmit_empty_ignored_before_configuration() {
        let wire = Wire::new();
        let uart: Driver<16> = Max3140::new(wire.bus(), wire.delay(), &UartConfig::default());
        assert!(uart.enqueue(0x41));
        wire.reply(reg::T);

        assert_eq!(uart.handle_interrupt(&mut VecSink::default()), Irq::Spurious);
        assert_eq!(wire.words(), vec![reg::READ_DATA]);
        assert_eq!(uart.queue().len(), 1);
    }

    #[test]
    fn test_failed_disarm_still_rearms_on_next_kick() {
        let wire = Wire::new();
        let uart = driver(&wire);
        wire.reply(reg::T);
        assert_eq!(uart.kick_transmit(), KickOutcome::Armed);

        // Probe succeeds, the disarming write fails
        wire.reply(reg::T);
        wire.fail();
        assert_eq!(uart.handle_interrupt(&mut VecSink::default()), Irq::Released);
        assert!(!uart.transmit_armed());

        assert!(uart.enqueue(0x41));
        wire.clear();
        wire.set_idle_reply(reg::T);
        assert_eq!(uart.kick_transmit(), KickOutcome::Sent(0x41));
        assert_eq!(wire.words(), vec![0xCC0B, 0x8041]);
    }

    #[test]
    fn test_failed_probe_is_spurious() {
        let wire = Wire::new();
        let uart = driver(&wire);
        wire.fail();

        assert_eq!(uart.handle_interrupt(&mut VecSink::default()), Irq::Spurious);
        assert_eq!(uart.transfer_faults(), 1);
    }

    #[test]
    fn test_full_drain_cycle_rearms_on_next_kick() {
        let wire = Wire::new();
        let uart = driver(&wire);
        let mut sink = VecSink::default();
        wire.set_idle_reply(reg::T);

        for byte in b"hi" {
            assert!(uart.enqueue(*byte));
        }
        assert_eq!(uart.kick_transmit(), KickOutcome::Sent(b'h'));
        assert_eq!(uart.handle_interrupt(&mut sink), Irq::Sent(b'i'));
        assert_eq!(uart.handle_interrupt(&mut sink), Irq::Released);
        assert!(!uart.transmit_armed());

        assert!(uart.enqueue(b'!'));
        assert_eq!(uart.kick_transmit(), KickOutcome::Sent(b'!'));
        assert!(uart.transmit_armed());
    }
}
