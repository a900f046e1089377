//! Open-session marker
//!
//! At most one consumer of received bytes is attached to the port at a
//! time. The session owns that consumer's [`LineSink`]; while no session is
//! open, received bytes have nowhere to go and are dropped.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::error::Error;
use crate::traits::LineSink;

/// Slot for the single active consumer
pub struct Session<M: RawMutex, S> {
    sink: Mutex<M, RefCell<Option<S>>>,
}

impl<M: RawMutex, S> Default for Session<M, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, S> Session<M, S> {
    /// Create a closed session
    pub const fn new() -> Self {
        Self {
            sink: Mutex::new(RefCell::new(None)),
        }
    }

    /// Attach a consumer
    ///
    /// Fails with [`Error::SessionConflict`] if one is already attached;
    /// the existing session is left untouched.
    pub fn open(&self, sink: S) -> Result<(), Error> {
        self.sink.lock(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.is_some() {
                warn!("open rejected: session already active");
                return Err(Error::SessionConflict);
            }
            *slot = Some(sink);
            debug!("session opened");
            Ok(())
        })
    }

    /// Detach the consumer, handing it back
    pub fn close(&self) -> Option<S> {
        let sink = self.sink.lock(|slot| slot.borrow_mut().take());
        if sink.is_some() {
            debug!("session closed");
        }
        sink
    }

    /// Check if a consumer is attached
    pub fn is_open(&self) -> bool {
        self.sink.lock(|slot| slot.borrow().is_some())
    }
}

impl<M: RawMutex, S: LineSink> Session<M, S> {
    /// Run `f` with the current sink
    ///
    /// The sink is an `Option<S>`, which itself implements [`LineSink`] and
    /// drops bytes while the session is closed.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut Option<S>) -> R) -> R {
        self.sink.lock(|slot| f(&mut slot.borrow_mut()))
    }
}
