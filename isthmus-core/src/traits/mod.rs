//! Collaborator traits
//!
//! These traits define the interface between the driver and the
//! host-facing side of the serial port.

pub mod sink;

pub use sink::{Discard, LineSink};
