//! Port configuration
//!
//! The startup settings are compiled in from `port.toml` and parsed by a
//! small no_std parser. `build.rs` has already rejected malformed files.

pub mod toml;

pub use toml::parse_config;
