//! Board-agnostic building blocks for the MAX3140 serial port
//!
//! This crate holds the pieces of the driver that do not touch the chip:
//!
//! - Transmit queue shared between the submit path and the interrupt path
//! - Open-session marker for the single consumer of received bytes
//! - Line sink trait through which received bytes leave the driver
//! - Error kinds surfaced to callers
//! - Port configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go first so the logging macros are visible to later modules
mod fmt;

pub mod config;
pub mod error;
pub mod queue;
pub mod session;
pub mod traits;

pub use config::{PortConfig, DEFAULT_TX_QUEUE_SIZE};
pub use error::Error;
pub use queue::TxQueue;
pub use session::Session;
pub use traits::{Discard, LineSink};
