//! Transmit queue
//!
//! Bounded FIFO of bytes waiting to go out on the serial line. The host
//! write path fills it and the interrupt path drains it one byte per
//! transmit-empty event. Every operation runs inside its own critical
//! section, so a producer and a consumer on different execution contexts
//! always observe a consistent queue.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Deque;

/// Bounded byte FIFO shared between the submit and interrupt paths
pub struct TxQueue<M: RawMutex, const N: usize> {
    bytes: Mutex<M, RefCell<Deque<u8, N>>>,
}

impl<M: RawMutex, const N: usize> Default for TxQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> TxQueue<M, N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            bytes: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Append a byte
    ///
    /// Returns `false` without blocking if the queue is full.
    pub fn enqueue(&self, byte: u8) -> bool {
        self.bytes
            .lock(|bytes| bytes.borrow_mut().push_back(byte).is_ok())
    }

    /// Remove and return the oldest byte, or `None` if the queue is empty
    pub fn dequeue(&self) -> Option<u8> {
        self.bytes.lock(|bytes| bytes.borrow_mut().pop_front())
    }

    /// Number of bytes waiting
    pub fn len(&self) -> usize {
        self.bytes.lock(|bytes| bytes.borrow().len())
    }

    /// Check if no bytes are waiting
    pub fn is_empty(&self) -> bool {
        self.bytes.lock(|bytes| bytes.borrow().is_empty())
    }

    /// Check if another byte would be rejected
    pub fn is_full(&self) -> bool {
        self.bytes.lock(|bytes| bytes.borrow().is_full())
    }

    /// Maximum number of bytes the queue holds
    pub const fn capacity(&self) -> usize {
        N
    }
}
