//! RS-232 uplink
//!
//! Frames arriving from equipment on an RS-232 link are passed to the
//! network peer unchanged.

use defmt::*;
use embassy_time::Timer;
use gatelink_core::traits::{Outputs, SerialPort};
use gatelink_protocol::FrameAssembler;

use crate::gateway::Gateway;
use crate::serial::Port;

/// Pause after each frame
const IDLE_MS: u64 = 1000;

#[embassy_executor::task(pool_size = 2)]
pub async fn rs232_task(which: SerialPort, port: &'static Port, gateway: &'static Gateway) {
    info!("RS-232 {:?} uplink started", which);

    let mut assembler = FrameAssembler::new();

    loop {
        let frame = port.read_line(&mut assembler).await;
        debug!("RS-232 {:?}: forwarding {} bytes", which, frame.len());
        gateway.send_network(frame).await;

        let lost = port.take_rx_overruns();
        if lost > 0 {
            warn!("RS-232 {:?}: {} received bytes lost to overrun", which, lost);
        }

        Timer::after_millis(IDLE_MS).await;
    }
}
