//! Isthmus Hardware Abstraction Layer
//!
//! This crate defines the hardware seams of the MAX3140 driver so that the
//! protocol and transfer logic can run against a real SPI peripheral on the
//! target and against scripted mocks on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  isthmus-drivers (orchestrator, port)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  isthmus-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │   firmware    │
//! │  SpiDevice    │       │  RP2040 SPI0  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`spi::WordTransfer`] - One 16-bit register exchange with the bridge chip
//! - [`uart::UartConfig`] - Serial line settings requested by the host

#![no_std]
#![deny(unsafe_code)]

pub mod spi;
pub mod uart;

// Re-export key items at crate root for convenience
pub use spi::WordTransfer;
pub use uart::{DataBits, Parity, StopBits, UartConfig};
