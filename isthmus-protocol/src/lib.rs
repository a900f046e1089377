//! MAX3140 Word Codec
//!
//! This crate encodes and decodes the 16-bit words exchanged with the
//! MAX3140 SPI/UART bridge. Every SPI transaction is exactly one word in
//! each direction; the top two bits of the outgoing word select the command.
//!
//! # Command Overview
//!
//! ```text
//! ┌────┬────┬──────────────────────────────┬──────────────────────────────┐
//! │ 15 │ 14 │ command                      │ reply                        │
//! ├────┼────┼──────────────────────────────┼──────────────────────────────┤
//! │ 1  │ 1  │ write configuration          │ R, T, echo of old config     │
//! │ 0  │ 1  │ read configuration           │ R, T, current config (12b)   │
//! │ 1  │ 0  │ write data (TE, RTS, Pt, D)  │ R, T, received byte          │
//! │ 0  │ 0  │ read data                    │ R, T, received byte          │
//! └────┴────┴──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! All functions are pure; no state is kept here.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod baud;
pub mod config;
pub mod data;
pub mod status;

pub use baud::{backsleep_us, baud_index, BaudRate};
pub use config::{config_matches, encode_config, with_transmit_interrupt, CONFIG_ECHO_MASK};
pub use data::{encode_data, parity_bit, RECEIVE_ENABLE};
pub use status::{decode_status, Status};

/// MAX3140 register bits
///
/// Bits 15 and 14 double as command selectors on the way out and as the
/// R (receive ready) / T (transmit buffer empty) flags on the way back.
pub mod reg {
    /// Write command marker / receive data ready
    pub const R: u16 = 1 << 15;
    /// Config command marker / transmit buffer empty
    pub const T: u16 = 1 << 14;
    /// FIFO disable
    pub const FEN: u16 = 1 << 13;
    /// Software shutdown
    pub const SHDN: u16 = 1 << 12;
    /// Transmit buffer empty interrupt mask
    pub const TM: u16 = 1 << 11;
    /// Receive data available interrupt mask
    pub const RM: u16 = 1 << 10;
    /// Parity bit interrupt mask
    pub const PM: u16 = 1 << 9;
    /// Receiver activity interrupt mask
    pub const RAM: u16 = 1 << 8;
    /// IrDA mode
    pub const IR: u16 = 1 << 7;
    /// Two stop bits
    pub const ST: u16 = 1 << 6;
    /// Parity enable
    pub const PE: u16 = 1 << 5;
    /// Seven data bits
    pub const L: u16 = 1 << 4;
    /// Baud rate divisor field (B3..B0)
    pub const BAUD_MASK: u16 = 0x000F;

    /// Transmit enable (data write: set to suppress transmission)
    pub const TE: u16 = 1 << 10;
    /// Request to send (data write: set to release the line)
    pub const RTS: u16 = 1 << 9;
    /// Transmitted parity bit (data write)
    pub const PT: u16 = 1 << 8;
    /// Data byte field
    pub const DATA_MASK: u16 = 0x00FF;

    /// Write configuration command
    pub const WRITE_CONFIG: u16 = R | T;
    /// Read configuration command
    pub const READ_CONFIG: u16 = T;
    /// Write data command
    pub const WRITE_DATA: u16 = R;
    /// Read data command (also used as a status probe)
    pub const READ_DATA: u16 = 0;
}
