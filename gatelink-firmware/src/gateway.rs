//! Board outputs behind the dispatcher
//!
//! One [`Gateway`] is shared by every listening task. It owns the relays,
//! the RS-485 turnaround and the IR emitters, and holds references to the
//! RS-232 transports and the UDP socket.

use defmt::*;
use embassy_net::udp::UdpSocket;
use embassy_net::IpEndpoint;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;
use gatelink_core::ir::IrCodeError;
use gatelink_core::traits::{IrPort, Outputs, SerialPort};
use gatelink_core::transport::DEFAULT_RING_SIZE;
use gatelink_core::{IrBlaster, RelayBank, Rs485Bus};
use gatelink_hal_stm32::{OutputLine, TimerCarrier, UsartPort};
use gatelink_protocol::RelayState;

use crate::serial::Port;

/// Relays fitted on the board
pub const RELAY_COUNT: usize = 3;

pub type Relays = RelayBank<CriticalSectionRawMutex, OutputLine, RELAY_COUNT>;

pub type Bus = Rs485Bus<
    'static,
    CriticalSectionRawMutex,
    UsartPort,
    OutputLine,
    Delay,
    DEFAULT_RING_SIZE,
>;

pub type Blaster = IrBlaster<'static, CriticalSectionRawMutex, TimerCarrier, Delay>;

pub struct Gateway {
    pub relays: Relays,
    pub serial: [&'static Port; 2],
    pub bus: Bus,
    pub ir: Blaster,
    pub socket: &'static UdpSocket<'static>,
    pub peer: IpEndpoint,
}

impl Outputs for Gateway {
    fn relay_count(&self) -> usize {
        self.relays.count()
    }

    fn set_relay(&self, number: usize, state: RelayState) -> bool {
        self.relays.set(number, state)
    }

    fn set_all_relays(&self, state: RelayState) {
        self.relays.set_all(state);
    }

    async fn write_serial(&self, port: SerialPort, bytes: &[u8]) {
        self.serial[port.index()].write(bytes).await;
    }

    async fn play_ir(&self, port: IrPort, code: u8) -> Result<(), IrCodeError> {
        self.ir.trigger(port, code).await
    }

    async fn write_bus(&self, bytes: &[u8]) {
        self.bus.transmit(bytes).await;
    }

    async fn send_bus_frame(&self, frame: &[u8]) {
        self.bus.send_line(frame).await;
    }

    async fn send_network(&self, bytes: &[u8]) {
        if let Err(e) = self.socket.send_to(bytes, self.peer).await {
            warn!("UDP send to peer failed: {:?}", e);
        }
    }
}
