//! Configuration type definitions

use core::net::Ipv4Addr;

use gatelink_hal::uart::Parity;
use gatelink_hal::UartConfig;

use crate::traits::SerialPort;

/// UDP port the gateway listens on and sends to
pub const UDP_PORT: u16 = 51984;

/// Network peer that receives status frames
pub const DEFAULT_PEER: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 51);

/// Line settings of the RS-485 bus
pub const BUS_UART: UartConfig = UartConfig::with_baudrate(9600);

/// Field set by each line of the configuration file, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigField {
    DeviceId,
    Address,
    Netmask,
    Gateway,
    Serial1Baud,
    Serial2Baud,
}

impl ConfigField {
    /// Fields in the order their lines appear
    pub const ALL: [ConfigField; 6] = [
        ConfigField::DeviceId,
        ConfigField::Address,
        ConfigField::Netmask,
        ConfigField::Gateway,
        ConfigField::Serial1Baud,
        ConfigField::Serial2Baud,
    ];
}

/// What went wrong with one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IssueKind {
    /// Line absent or without a value
    Missing,
    /// Value present but not usable
    Invalid,
}

/// A line that kept its default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigIssue {
    pub field: ConfigField,
    pub kind: IssueKind,
}

/// Runtime configuration of the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Identifier this gateway answers to and reports as
    pub device_id: u8,
    /// Static IPv4 address
    pub address: Ipv4Addr,
    /// Subnet mask
    pub netmask: Ipv4Addr,
    /// Default gateway
    pub gateway: Ipv4Addr,
    /// Baud rate of each RS-232 link
    pub serial_baud: [u32; 2],
    /// Local and remote UDP port
    pub udp_port: u16,
    /// Receiver of status frames and RS-232 uplink
    pub peer: Ipv4Addr,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            device_id: 1,
            address: Ipv4Addr::new(192, 168, 1, 100),
            netmask: Ipv4Addr::new(255, 255, 255, 0),
            gateway: Ipv4Addr::new(192, 168, 1, 1),
            serial_baud: [9600, 9600],
            udp_port: UDP_PORT,
            peer: DEFAULT_PEER,
        }
    }
}

impl GatewayConfig {
    /// Netmask as a CIDR prefix length
    pub fn prefix_len(&self) -> u8 {
        u32::from(self.netmask).leading_ones() as u8
    }

    /// Line settings for an RS-232 link
    ///
    /// Port 2 runs with odd parity to match the equipment it is wired to.
    pub fn serial_uart(&self, port: SerialPort) -> UartConfig {
        let config = UartConfig::with_baudrate(self.serial_baud[port.index()]);
        match port {
            SerialPort::Port1 => config,
            SerialPort::Port2 => config.parity(Parity::Odd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.device_id, 1);
        assert_eq!(config.address, Ipv4Addr::new(192, 168, 1, 100));
        assert_eq!(config.prefix_len(), 24);
        assert_eq!(config.udp_port, 51984);
        assert_eq!(config.peer, Ipv4Addr::new(192, 168, 1, 51));
    }

    #[test]
    fn test_serial_line_settings() {
        let mut config = GatewayConfig::default();
        config.serial_baud = [19200, 4800];

        let port1 = config.serial_uart(SerialPort::Port1);
        assert_eq!(port1.baudrate, 19200);
        assert_eq!(port1.parity, Parity::None);

        let port2 = config.serial_uart(SerialPort::Port2);
        assert_eq!(port2.baudrate, 4800);
        assert_eq!(port2.parity, Parity::Odd);
    }
}
