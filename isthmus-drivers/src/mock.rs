//! Scripted stand-ins for the bus, the delay and the host side

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::delay::DelayNs;

use isthmus_core::LineSink;
use isthmus_hal::{UartConfig, WordTransfer};
use isthmus_protocol::reg;

use crate::max3140::{Max3140, Port};

pub type Driver<const N: usize> = Max3140<CriticalSectionRawMutex, MockBus, MockDelay, N>;
pub type TestPort<const N: usize> =
    Port<CriticalSectionRawMutex, MockBus, MockDelay, SharedSink, N>;

/// Something that happened on the wire, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Word(u16),
    DelayUs(u32),
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<u16, ()>>,
    idle_reply: u16,
    events: Vec<Event>,
}

/// Shared handle on the scripted bus
#[derive(Clone, Default)]
pub struct Wire(Arc<Mutex<Script>>);

impl Wire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bus(&self) -> MockBus {
        MockBus(self.clone())
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay(self.clone())
    }

    /// Queue the reply to the next unanswered exchange
    pub fn reply(&self, word: u16) {
        self.0.lock().unwrap().replies.push_back(Ok(word));
    }

    /// Queue a failed exchange
    pub fn fail(&self) {
        self.0.lock().unwrap().replies.push_back(Err(()));
    }

    /// Reply used once the script runs out (defaults to zero)
    pub fn set_idle_reply(&self, word: u16) {
        self.0.lock().unwrap().idle_reply = word;
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().events.clone()
    }

    /// Words sent to the chip, delays left out
    pub fn words(&self) -> Vec<u16> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Word(word) => Some(word),
                Event::DelayUs(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().events.clear();
    }
}

pub struct MockBus(Wire);

impl WordTransfer for MockBus {
    type Error = ();

    fn transceive(&mut self, outgoing: [u8; 2]) -> Result<[u8; 2], ()> {
        let mut script = (self.0).0.lock().unwrap();
        script.events.push(Event::Word(u16::from_be_bytes(outgoing)));
        let idle = script.idle_reply;
        script
            .replies
            .pop_front()
            .unwrap_or(Ok(idle))
            .map(u16::to_be_bytes)
    }
}

pub struct MockDelay(Wire);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns / 1000);
    }

    fn delay_us(&mut self, us: u32) {
        (self.0).0.lock().unwrap().events.push(Event::DelayUs(us));
    }
}

/// Line sink whose bytes stay visible after it is handed to a session
#[derive(Clone, Default)]
pub struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    pub fn received(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl LineSink for SharedSink {
    fn deliver_received_byte(&mut self, byte: u8) {
        self.0.lock().unwrap().push(byte);
    }
}

/// Driver at 9600 8N1 with the configuration already pushed
///
/// The wire transcript is cleared afterwards.
pub fn started<const N: usize>(wire: &Wire) -> Driver<N> {
    let uart = Max3140::new(wire.bus(), wire.delay(), &UartConfig::default());
    wire.reply(0x0000);
    wire.reply(0x040B);
    uart.push_config_to_device()
        .expect("scripted echo matches 9600 8N1");
    assert_eq!(uart.current_config() & reg::TM, 0);
    wire.clear();
    uart
}
