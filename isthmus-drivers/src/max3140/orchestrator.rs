//! Transfer orchestrator
//!
//! Holds the configuration word last written to the chip and the SPI bus,
//! and performs every exchange inside a single critical section. The host
//! submit path and the interrupt path both go through here, so their
//! exchanges never interleave.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;

use isthmus_core::{Error, TxQueue};
use isthmus_hal::uart::{Parity, UartConfig};
use isthmus_hal::WordTransfer;
use isthmus_protocol::{self as protocol, reg, Status};

/// Chip settings derived from a line configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineSettings {
    /// Write-configuration word (TM clear)
    pub config_word: u16,
    /// Delay before releasing RTS after the last byte
    pub backsleep_us: u32,
    /// Parity used to compute the Pt bit of outgoing bytes
    pub parity: Parity,
}

impl LineSettings {
    /// Compute the settings for a line configuration
    pub fn from_config(config: &UartConfig) -> Self {
        Self {
            config_word: protocol::encode_config(config),
            backsleep_us: protocol::backsleep_us(config.baudrate),
            parity: config.parity,
        }
    }
}

/// Result of [`Max3140::kick_transmit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KickOutcome {
    /// The transmit interrupt was already armed; nothing was exchanged
    AlreadyArmed,
    /// The transmit interrupt was armed; the chip will interrupt when ready
    Armed,
    /// The interrupt was armed and the chip could take a byte right away
    Sent(u8),
    /// No configuration has been accepted yet; nothing was exchanged
    Unconfigured,
    /// The arming exchange failed; the next kick tries again
    Faulted,
}

/// State guarded by the critical section
pub(crate) struct Chip<T, D> {
    bus: T,
    delay: D,
    /// Configuration word most recently written to the chip
    current_config: u16,
    /// Configuration word to write on the next push
    pending_config: u16,
    backsleep_us: u32,
    parity: Parity,
    /// Set once a pushed configuration has been echoed back
    configured: bool,
    transfer_faults: u32,
    /// `transfer_faults` at the last [`Max3140::check_transfers`]
    faults_reported: u32,
}

impl<T: WordTransfer, D: DelayNs> Chip<T, D> {
    fn new(bus: T, delay: D, settings: LineSettings) -> Self {
        Self {
            bus,
            delay,
            current_config: 0,
            pending_config: settings.config_word,
            backsleep_us: settings.backsleep_us,
            parity: settings.parity,
            configured: false,
            transfer_faults: 0,
            faults_reported: 0,
        }
    }

    /// One exchange; `None` if the transfer failed
    pub(crate) fn try_exchange(&mut self, word: u16) -> Option<u16> {
        match self.bus.transceive_word(word) {
            Ok(reply) => Some(reply),
            Err(_) => {
                self.transfer_faults = self.transfer_faults.wrapping_add(1);
                warn!("spi exchange of {=u16:#x} failed", word);
                None
            }
        }
    }

    /// One exchange; a failed transfer reads as an all-zero reply
    pub(crate) fn exchange(&mut self, word: u16) -> u16 {
        self.try_exchange(word).unwrap_or(0)
    }

    /// Write a configuration word, keeping `current_config` in step
    ///
    /// After a failed exchange the chip may or may not hold `word`, so the
    /// transmit interrupt is recorded as disarmed. A later kick then
    /// re-arms it, which is harmless if the chip was armed after all.
    pub(crate) fn write_config(&mut self, word: u16) -> Option<u16> {
        let reply = self.try_exchange(word);
        self.current_config = match reply {
            Some(_) => word,
            None => protocol::with_transmit_interrupt(word, false),
        };
        reply
    }

    pub(crate) fn transmit_armed(&self) -> bool {
        self.current_config & reg::TM != 0
    }

    pub(crate) fn send_byte(&mut self, byte: u8) -> u16 {
        let word = protocol::encode_data(byte, self.parity);
        self.exchange(word)
    }

    pub(crate) fn is_configured(&self) -> bool {
        self.configured
    }

    pub(crate) fn current_config(&self) -> u16 {
        self.current_config
    }

    pub(crate) fn delay_backsleep(&mut self) {
        self.delay.delay_us(self.backsleep_us);
    }

    fn apply(&mut self, settings: LineSettings) {
        self.pending_config = settings.config_word;
        self.backsleep_us = settings.backsleep_us;
        self.parity = settings.parity;
    }

    fn push_config(&mut self) -> Result<(), Error> {
        let written = self.pending_config;
        self.write_config(written);

        let echoed = self.exchange(reg::READ_CONFIG);
        if !protocol::config_matches(written, echoed) {
            warn!(
                "configuration rejected: wrote {=u16:#x}, read back {=u16:#x}",
                written, echoed
            );
            return Err(Error::ConfigRejected { written, echoed });
        }
        // The echo proves the chip holds the word even if the write
        // exchange itself reported a fault
        self.current_config = written;
        self.configured = true;

        // Line idles in receive mode until the first byte is queued
        self.exchange(protocol::RECEIVE_ENABLE);
        debug!("configuration {=u16:#x} accepted", written);
        Ok(())
    }

    fn kick<M: RawMutex, const N: usize>(&mut self, queue: &TxQueue<M, N>) -> KickOutcome {
        if !self.configured {
            debug!("kick ignored: no configuration accepted yet");
            return KickOutcome::Unconfigured;
        }
        if self.transmit_armed() {
            return KickOutcome::AlreadyArmed;
        }

        let armed = protocol::with_transmit_interrupt(self.current_config, true);
        let Some(reply) = self.write_config(armed) else {
            return KickOutcome::Faulted;
        };
        if Status::from_word(reply).transmit_empty {
            if let Some(byte) = queue.dequeue() {
                self.send_byte(byte);
                trace!("kick sent {=u8:#x}", byte);
                return KickOutcome::Sent(byte);
            }
        }
        KickOutcome::Armed
    }
}

/// MAX3140 transfer orchestrator
///
/// `M` selects the critical section: use `CriticalSectionRawMutex` when the
/// interrupt handler may preempt the submit path. `N` is the transmit
/// queue capacity.
pub struct Max3140<M: RawMutex, T, D, const N: usize> {
    chip: Mutex<M, RefCell<Chip<T, D>>>,
    queue: TxQueue<M, N>,
}

impl<M, T, D, const N: usize> Max3140<M, T, D, N>
where
    M: RawMutex,
    T: WordTransfer,
    D: DelayNs,
{
    /// Take ownership of the bus and delay provider
    ///
    /// Nothing is written to the chip until [`push_config_to_device`]
    /// runs; the pending settings start out as `line`.
    ///
    /// [`push_config_to_device`]: Self::push_config_to_device
    pub fn new(bus: T, delay: D, line: &UartConfig) -> Self {
        Self {
            chip: Mutex::new(RefCell::new(Chip::new(
                bus,
                delay,
                LineSettings::from_config(line),
            ))),
            queue: TxQueue::new(),
        }
    }

    /// Run `f` inside the critical section
    pub(crate) fn with_chip<R>(&self, f: impl FnOnce(&mut Chip<T, D>) -> R) -> R {
        self.chip.lock(|chip| f(&mut chip.borrow_mut()))
    }

    /// Compute new settings and make them the pending target
    ///
    /// The parity used for outgoing bytes and the release delay take effect
    /// immediately; the chip itself is only touched by
    /// [`push_config_to_device`](Self::push_config_to_device).
    pub fn apply_line_config(&self, line: &UartConfig) {
        let settings = LineSettings::from_config(line);
        debug!(
            "line {=u32} baud -> config {=u16:#x}, backsleep {=u32} us",
            line.baudrate, settings.config_word, settings.backsleep_us
        );
        self.with_chip(|chip| chip.apply(settings));
    }

    /// Write the pending configuration and verify the chip's echo
    ///
    /// On success the line is left in receive mode with the transmit
    /// interrupt disarmed.
    pub fn push_config_to_device(&self) -> Result<(), Error> {
        self.with_chip(|chip| chip.push_config())
    }

    /// Apply and push in one step
    pub fn configure(&self, line: &UartConfig) -> Result<(), Error> {
        self.apply_line_config(line);
        self.push_config_to_device()
    }

    /// Make sure the chip will ask for the next queued byte
    ///
    /// Does nothing if the transmit interrupt is already armed. Otherwise
    /// arms it and, if the chip reports an empty transmit buffer, sends the
    /// oldest queued byte right away.
    pub fn kick_transmit(&self) -> KickOutcome {
        self.with_chip(|chip| chip.kick(&self.queue))
    }

    /// Queue a byte for transmission without kicking the chip
    pub fn enqueue(&self, byte: u8) -> bool {
        self.queue.enqueue(byte)
    }

    /// Transmit queue
    pub fn queue(&self) -> &TxQueue<M, N> {
        &self.queue
    }

    /// Configuration word most recently written to the chip
    pub fn current_config(&self) -> u16 {
        self.with_chip(|chip| chip.current_config())
    }

    /// Check whether the transmit interrupt is armed
    pub fn transmit_armed(&self) -> bool {
        self.with_chip(|chip| chip.transmit_armed())
    }

    /// Number of failed SPI exchanges since start
    pub fn transfer_faults(&self) -> u32 {
        self.with_chip(|chip| chip.transfer_faults)
    }

    /// Report whether any SPI exchange failed since the last check
    ///
    /// Failed exchanges never abort an operation; they are absorbed and
    /// retried on the next trigger. This surfaces them as
    /// [`Error::TransferFault`] once per batch.
    pub fn check_transfers(&self) -> Result<(), Error> {
        self.with_chip(|chip| {
            if chip.transfer_faults == chip.faults_reported {
                return Ok(());
            }
            chip.faults_reported = chip.transfer_faults;
            Err(Error::TransferFault)
        })
    }

    /// Check whether a pushed configuration has been accepted
    pub fn is_configured(&self) -> bool {
        self.with_chip(|chip| chip.is_configured())
    }

    /// Shut down, returning the bus and delay provider
    pub fn release(self) -> (T, D) {
        let chip = self.chip.into_inner().into_inner();
        (chip.bus, chip.delay)
    }
}
