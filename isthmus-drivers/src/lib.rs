//! MAX3140 driver
//!
//! This crate turns a MAX3140 SPI/UART bridge into an interrupt-driven
//! serial port:
//!
//! - [`max3140::Max3140`] - owns the chip and the shared configuration
//!   word, performs every register exchange inside one critical section
//! - [`max3140::Max3140::handle_interrupt`] - services one falling edge of
//!   the chip's IRQ line
//! - [`max3140::Port`] - host-facing surface: open/close, write, line
//!   settings
//! - [`spi::SpiWordTransfer`] - adapts any `embedded-hal` SPI device to the
//!   word exchange the driver needs

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go first so the logging macros are visible to later modules
mod fmt;

pub mod max3140;
pub mod spi;

#[cfg(test)]
mod mock;

pub use max3140::{Irq, KickOutcome, LineSettings, Max3140, Port};
pub use spi::SpiWordTransfer;
