//! Build script for isthmus-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates port.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Baud rates the MAX3140 can be set to exactly
const SUPPORTED_BAUD: [i64; 10] = [
    600, 1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200, 230400,
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate port.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=port.toml");

    let config_path = Path::new("port.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: port.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds its startup line settings from port.toml.   ║\n\
            ║  Please create one in the isthmus-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read port.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in port.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_line(&config, &mut errors);
    validate_port(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: port.toml validation failed                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&errors.join("\n"))
        );
    }

    println!("cargo:warning=port.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate the [line] section
fn validate_line(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(line) = config.get("line") else {
        errors.push("Missing [line] section".to_string());
        return;
    };

    match line.get("baud").and_then(|v| v.as_integer()) {
        Some(baud) if SUPPORTED_BAUD.contains(&baud) => {}
        Some(baud) => errors.push(format!(
            "[line] baud = {} is not a MAX3140 rate ({:?})",
            baud, SUPPORTED_BAUD
        )),
        None => errors.push("[line] baud must be an integer".to_string()),
    }

    match line.get("data_bits").map(|v| v.as_integer()) {
        None | Some(Some(7)) | Some(Some(8)) => {}
        _ => errors.push("[line] data_bits must be 7 or 8".to_string()),
    }

    match line.get("stop_bits").map(|v| v.as_integer()) {
        None | Some(Some(1)) | Some(Some(2)) => {}
        _ => errors.push("[line] stop_bits must be 1 or 2".to_string()),
    }

    match line.get("parity").map(|v| v.as_str()) {
        None | Some(Some("none")) | Some(Some("even")) | Some(Some("odd")) => {}
        _ => errors.push("[line] parity must be \"none\", \"even\" or \"odd\"".to_string()),
    }

    for key in line.as_table().into_iter().flat_map(|t| t.keys()) {
        if !matches!(key.as_str(), "baud" | "data_bits" | "stop_bits" | "parity") {
            errors.push(format!("[line] unknown key '{}'", key));
        }
    }
}

/// Validate the optional [port] section
fn validate_port(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(port) = config.get("port") else {
        return;
    };

    match port.get("write_retry_limit").map(|v| v.as_integer()) {
        None => {}
        Some(Some(limit)) if (0..=i64::from(u32::MAX)).contains(&limit) => {}
        _ => errors.push("[port] write_retry_limit must be a u32".to_string()),
    }

    for key in port.as_table().into_iter().flat_map(|t| t.keys()) {
        if key != "write_retry_limit" {
            errors.push(format!("[port] unknown key '{}'", key));
        }
    }
}
