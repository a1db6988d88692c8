//! Build script for gatelink-firmware
//!
//! - Passes the linker scripts provided by cortex-m-rt, embassy-stm32 and defmt
//! - Checks gateway.cfg and the IR code tables at compile time

use std::fs;
use std::path::Path;

/// IR code tables embedded by the firmware, one per port
const IR_TABLES: [&str; 6] = [
    "ir/IR1.txt",
    "ir/IR2.txt",
    "ir/IR3.txt",
    "ir/IR4.txt",
    "ir/IR5.txt",
    "ir/IR6.txt",
];

/// Labels expected on the six configuration lines, for messages only
const CONFIG_LINES: [&str; 6] = ["DeviceID", "IP", "Mask", "Gateway", "RS232_1", "RS232_2"];

fn main() {
    setup_linker();
    check_config();
    check_ir_tables();
}

/// Linker arguments for the firmware binary
fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

fn read_required(path: &str) -> String {
    println!("cargo:rerun-if-changed={}", path);

    match fs::read_to_string(Path::new(path)) {
        Ok(content) => content,
        Err(e) => panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Failed to read {:<42}║\n\
            ║                                                                  ║\n\
            ║  Error: {:<56} ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            path,
            e.to_string()
        ),
    }
}

/// Warn about configuration lines the firmware would replace with defaults
///
/// A malformed file still builds: at runtime each bad line keeps its default.
fn check_config() {
    let content = read_required("gateway.cfg");
    let mut lines = content.lines();

    for label in CONFIG_LINES {
        let value = lines
            .next()
            .and_then(|line| line.split(':').nth(1))
            .map(str::trim)
            .unwrap_or("");

        if value.is_empty() {
            println!(
                "cargo:warning=gateway.cfg: line '{}' has no value, default will be used",
                label
            );
        }
    }
}

/// Warn about IR code lines that will not play
fn check_ir_tables() {
    for path in IR_TABLES {
        let content = read_required(path);

        for (number, line) in content.lines().enumerate() {
            let words: Vec<&str> = line.split_ascii_whitespace().collect();
            if words.is_empty() {
                continue;
            }
            if words.len() < 4 {
                println!(
                    "cargo:warning={}: code {} has fewer than four header words",
                    path,
                    number + 1
                );
                continue;
            }
            if let Some(word) = words.iter().find(|w| u32::from_str_radix(w, 16).is_err()) {
                println!(
                    "cargo:warning={}: code {} has non-hex word '{}'",
                    path,
                    number + 1,
                    word
                );
            }
        }
    }
}
