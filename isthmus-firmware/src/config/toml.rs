//! Minimal TOML parser for the port configuration
//!
//! Handles only what `port.toml` needs. It does NOT support the full TOML
//! spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [section] headers
//! - Comments (# ...)

use isthmus_core::PortConfig;
use isthmus_hal::uart::{DataBits, Parity, StopBits};

/// Parse error
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is not a `key = value` pair
    InvalidLine,
    /// Key not known in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Line,
    Port,
}

/// Parse TOML configuration into a PortConfig
///
/// Missing keys keep their defaults (9600 8N1, unbounded retries).
pub fn parse_config(input: &str) -> Result<PortConfig, ParseError> {
    let mut config = PortConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "line" => Ok(Section::Line),
        "port" => Ok(Section::Port),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_parity(value: &str) -> Result<Parity, ParseError> {
    match parse_string(value) {
        "none" => Ok(Parity::None),
        "even" => Ok(Parity::Even),
        "odd" => Ok(Parity::Odd),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut PortConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Line, "baud") => config.line.baudrate = parse_int(value)?,
        (Section::Line, "data_bits") => {
            config.line.data_bits =
                DataBits::from_count(parse_int(value)?).ok_or(ParseError::InvalidValue)?
        }
        (Section::Line, "stop_bits") => {
            config.line.stop_bits =
                StopBits::from_count(parse_int(value)?).ok_or(ParseError::InvalidValue)?
        }
        (Section::Line, "parity") => config.line.parity = parse_parity(value)?,
        (Section::Port, "write_retry_limit") => {
            config.write_retry_limit = Some(parse_int(value)?)
        }
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use isthmus_hal::uart::UartConfig;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("baud = 9600"), Some(("baud", "9600")));
        assert_eq!(
            parse_key_value("parity = \"odd\"   # comment"),
            Some(("parity", "\"odd\""))
        );
        assert_eq!(parse_key_value("baud ="), None);
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("line"), Ok(Section::Line));
        assert_eq!(parse_section_header(" port "), Ok(Section::Port));
        assert_eq!(parse_section_header("stepper"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_parse_shipped_config() {
        let config = parse_config(include_str!("../../port.toml")).unwrap();
        assert_eq!(config.line, UartConfig::default());
        assert_eq!(config.write_retry_limit, None);
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
[line]
baud = 115200
data_bits = 7
stop_bits = 2
parity = "even"

[port]
write_retry_limit = 500
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.line.baudrate, 115200);
        assert_eq!(config.line.data_bits, DataBits::Seven);
        assert_eq!(config.line.stop_bits, StopBits::Two);
        assert_eq!(config.line.parity, Parity::Even);
        assert_eq!(config.write_retry_limit, Some(500));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            parse_config("[line]\ndata_bits = 9"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[line]\nparity = \"mark\""),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_config("[port]\nbaud = 9600"), Err(ParseError::UnknownKey));
        assert_eq!(parse_config("baud = 9600"), Err(ParseError::UnknownKey));
    }
}
