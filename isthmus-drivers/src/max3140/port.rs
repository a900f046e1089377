//! Host-facing serial port
//!
//! Wraps the driver with the pieces a terminal layer expects: a single open
//! session that owns the line sink, blocking and async writes with
//! backpressure, and runtime line settings.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;

use isthmus_core::{Error, LineSink, PortConfig, Session};
use isthmus_hal::uart::UartConfig;
use isthmus_hal::WordTransfer;

use super::irq::Irq;
use super::orchestrator::{KickOutcome, Max3140};

/// Serial port on a MAX3140
pub struct Port<M: RawMutex, T, D, S, const N: usize> {
    uart: Max3140<M, T, D, N>,
    session: Session<M, S>,
    line: Mutex<M, Cell<UartConfig>>,
    config: PortConfig,
}

impl<M, T, D, S, const N: usize> Port<M, T, D, S, N>
where
    M: RawMutex,
    T: WordTransfer,
    D: DelayNs,
    S: LineSink,
{
    /// Take the bus and delay provider; the chip is untouched until
    /// [`start`](Self::start)
    pub fn new(bus: T, delay: D, config: PortConfig) -> Self {
        Self {
            uart: Max3140::new(bus, delay, &config.line),
            session: Session::new(),
            line: Mutex::new(Cell::new(config.line)),
            config,
        }
    }

    /// Push the startup line settings to the chip
    ///
    /// Bytes written before this succeeds stay queued and go out once the
    /// chip has accepted its configuration.
    pub fn start(&self) -> Result<(), Error> {
        info!("starting port at {=u32} baud", self.config.line.baudrate);
        self.line.lock(|line| line.set(self.config.line));
        self.uart.configure(&self.config.line)?;
        self.kick_pending();
        Ok(())
    }

    /// Attach the consumer of received bytes
    pub fn open(&self, sink: S) -> Result<(), Error> {
        self.session.open(sink)
    }

    /// Detach the consumer; bytes received afterwards are dropped
    pub fn close(&self) -> Option<S> {
        self.session.close()
    }

    /// Check whether a consumer is attached
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Queue bytes for transmission, spinning while the queue is full
    ///
    /// Returns how many bytes were queued. This is short of `bytes.len()`
    /// only when a write retry limit is configured and ran out.
    pub fn write(&self, bytes: &[u8]) -> usize {
        let mut written = 0;
        for &byte in bytes {
            let mut attempts = 0;
            while !self.uart.enqueue(byte) {
                if self.config.retries_exhausted(attempts) {
                    debug!("write gave up after {=usize} bytes", written);
                    self.uart.kick_transmit();
                    return written;
                }
                self.uart.kick_transmit();
                core::hint::spin_loop();
                attempts += 1;
            }
            written += 1;
        }
        self.uart.kick_transmit();
        written
    }

    /// Like [`write`](Self::write), but yields to the executor while the
    /// queue is full
    pub async fn write_async(&self, bytes: &[u8]) -> usize {
        let mut written = 0;
        for &byte in bytes {
            let mut attempts = 0;
            while !self.uart.enqueue(byte) {
                if self.config.retries_exhausted(attempts) {
                    debug!("write gave up after {=usize} bytes", written);
                    self.uart.kick_transmit();
                    return written;
                }
                self.uart.kick_transmit();
                embassy_futures::yield_now().await;
                attempts += 1;
            }
            written += 1;
        }
        self.uart.kick_transmit();
        written
    }

    /// Queue one byte without waiting
    pub fn try_write_byte(&self, byte: u8) -> Result<KickOutcome, Error> {
        if !self.uart.enqueue(byte) {
            return Err(Error::QueueFull);
        }
        Ok(self.uart.kick_transmit())
    }

    /// Room the host may assume for the next write
    ///
    /// Unlimited: [`write`](Self::write) applies backpressure itself.
    pub fn write_room(&self) -> usize {
        usize::MAX
    }

    /// Bytes queued and not yet handed to the chip
    pub fn chars_in_buffer(&self) -> usize {
        self.uart.queue().len()
    }

    /// Replace the line settings
    ///
    /// The new settings are recorded even if the chip rejects them. A push
    /// disarms the transmit interrupt either way, so bytes still queued are
    /// kicked again afterwards.
    pub fn set_termios(&self, line: &UartConfig) -> Result<(), Error> {
        self.line.lock(|current| current.set(*line));
        let result = self.uart.configure(line);
        self.kick_pending();
        result
    }

    /// Line settings most recently requested
    pub fn line_config(&self) -> UartConfig {
        self.line.lock(|line| line.get())
    }

    /// Service one falling edge of the IRQ line
    pub fn on_interrupt(&self) -> Irq {
        self.session.with_sink(|sink| self.uart.handle_interrupt(sink))
    }

    fn kick_pending(&self) {
        if !self.uart.queue().is_empty() {
            self.uart.kick_transmit();
        }
    }

    /// Underlying driver
    pub fn driver(&self) -> &Max3140<M, T, D, N> {
        &self.uart
    }
}
