//! Side effects a dispatched frame can have

use gatelink_protocol::RelayState;

use crate::ir::{IrCodeError, IR_PORT_COUNT};

/// One of the two RS-232 links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialPort {
    Port1,
    Port2,
}

impl SerialPort {
    /// Port addressed by a channel offset (1 or 2)
    pub const fn from_offset(offset: u8) -> Option<Self> {
        match offset {
            1 => Some(SerialPort::Port1),
            2 => Some(SerialPort::Port2),
            _ => None,
        }
    }

    /// Zero-based index, for tables indexed by port
    pub const fn index(self) -> usize {
        match self {
            SerialPort::Port1 => 0,
            SerialPort::Port2 => 1,
        }
    }
}

/// One of the fitted IR emitters, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrPort(u8);

impl IrPort {
    /// Port addressed by a channel offset (1 to [`IR_PORT_COUNT`])
    pub const fn from_offset(offset: u8) -> Option<Self> {
        if offset >= 1 && offset as usize <= IR_PORT_COUNT {
            Some(IrPort(offset))
        } else {
            None
        }
    }

    /// Port number as printed on the board
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index, for tables indexed by port
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

/// Everything the dispatcher can act on
///
/// Methods take `&self` because one implementation is shared by every
/// listening task; implementations guard their peripherals internally.
#[allow(async_fn_in_trait)]
pub trait Outputs {
    /// Number of fitted relays
    fn relay_count(&self) -> usize;

    /// Switch relay `number` (1-based); `false` if not fitted
    fn set_relay(&self, number: usize, state: RelayState) -> bool;

    /// Switch every relay
    fn set_all_relays(&self, state: RelayState);

    /// Write raw bytes to an RS-232 link
    async fn write_serial(&self, port: SerialPort, bytes: &[u8]);

    /// Play code `code` (1-based line of the port's table) on an IR emitter
    async fn play_ir(&self, port: IrPort, code: u8) -> Result<(), IrCodeError>;

    /// Drive raw bytes onto the RS-485 bus, including turnaround
    async fn write_bus(&self, bytes: &[u8]);

    /// Drive one encoded frame onto the RS-485 bus, sized by its LENGTH field
    async fn send_bus_frame(&self, frame: &[u8]);

    /// Send one datagram to the network peer
    async fn send_network(&self, bytes: &[u8]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_port_offsets() {
        assert_eq!(SerialPort::from_offset(1), Some(SerialPort::Port1));
        assert_eq!(SerialPort::from_offset(2), Some(SerialPort::Port2));
        assert_eq!(SerialPort::from_offset(0), None);
        assert_eq!(SerialPort::from_offset(3), None);
        assert_eq!(SerialPort::Port2.index(), 1);
    }

    #[test]
    fn test_ir_port_offsets() {
        assert_eq!(IrPort::from_offset(0), None);
        assert_eq!(IrPort::from_offset(7), None);

        let port = IrPort::from_offset(6).unwrap();
        assert_eq!(port.number(), 6);
        assert_eq!(port.index(), 5);
    }
}
