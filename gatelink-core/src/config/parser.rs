//! Configuration file parser
//!
//! The file has six positional lines, each `label:value`:
//!
//! ```text
//! DeviceID:1
//! IP:192.168.1.100
//! Mask:255.255.255.0
//! Gateway:192.168.1.1
//! RS232_1:9600
//! RS232_2:9600
//! ```
//!
//! Labels are not checked; the line number decides the field. The value is
//! the text between the first `:` and the next `:` (or the end of the line).

use core::str::FromStr;

use heapless::Vec;

use super::types::{ConfigField, ConfigIssue, GatewayConfig, IssueKind};

/// Value part of a `label:value` line
fn line_value(line: &str) -> Option<&str> {
    let value = line.split(':').nth(1)?.trim();
    (!value.is_empty()).then_some(value)
}

fn parse_value<T: FromStr>(value: Option<&str>) -> Result<T, IssueKind> {
    value
        .ok_or(IssueKind::Missing)?
        .parse()
        .map_err(|_| IssueKind::Invalid)
}

fn parse_baud(value: Option<&str>) -> Result<u32, IssueKind> {
    match parse_value::<u32>(value)? {
        0 => Err(IssueKind::Invalid),
        baud => Ok(baud),
    }
}

impl GatewayConfig {
    /// Parse a configuration file
    ///
    /// Fields whose line is missing or malformed keep their defaults and are
    /// listed in the returned issues.
    pub fn parse(text: &str) -> (Self, Vec<ConfigIssue, 6>) {
        let mut config = Self::default();
        let mut issues = Vec::new();
        let mut lines = text.lines();

        for field in ConfigField::ALL {
            let value = lines.next().and_then(line_value);
            let result = match field {
                ConfigField::DeviceId => parse_value(value).map(|id| config.device_id = id),
                ConfigField::Address => parse_value(value).map(|ip| config.address = ip),
                ConfigField::Netmask => parse_value(value).map(|ip| config.netmask = ip),
                ConfigField::Gateway => parse_value(value).map(|ip| config.gateway = ip),
                ConfigField::Serial1Baud => {
                    parse_baud(value).map(|baud| config.serial_baud[0] = baud)
                }
                ConfigField::Serial2Baud => {
                    parse_baud(value).map(|baud| config.serial_baud[1] = baud)
                }
            };
            if let Err(kind) = result {
                // One issue per field at most, and there are six fields
                let _ = issues.push(ConfigIssue { field, kind });
            }
        }

        (config, issues)
    }
}
