//! RS-485 bus listener

use defmt::*;
use embassy_time::Timer;
use gatelink_core::Router;
use gatelink_protocol::FrameAssembler;

use super::log_dispatch;
use crate::gateway::Gateway;
use crate::serial::Port;

/// Pause after each frame
const IDLE_MS: u64 = 100;

#[embassy_executor::task]
pub async fn rs485_task(port: &'static Port, router: Router<'static, Gateway>) {
    info!("RS-485 listener started");

    let mut assembler = FrameAssembler::new();

    loop {
        let frame = port.read_line(&mut assembler).await;
        let outcome = router.handle(frame).await;
        log_dispatch("rs485", &outcome);

        let lost = port.take_rx_overruns();
        if lost > 0 {
            warn!("RS-485: {} received bytes lost to overrun", lost);
        }

        Timer::after_millis(IDLE_MS).await;
    }
}
