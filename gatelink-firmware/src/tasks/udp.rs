//! UDP listener
//!
//! Each datagram is one candidate frame.

use defmt::*;
use embassy_net::udp::UdpSocket;
use embassy_time::Timer;
use gatelink_core::Router;
use gatelink_protocol::MAX_FRAME_SIZE;

use super::log_dispatch;
use crate::gateway::Gateway;

/// Pause after each datagram
const IDLE_MS: u64 = 100;

#[embassy_executor::task]
pub async fn udp_task(socket: &'static UdpSocket<'static>, router: Router<'static, Gateway>) {
    info!("UDP listener started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        match socket.recv_from(&mut buf).await {
            Ok((n, meta)) => {
                trace!("UDP: {} bytes from {:?}", n, meta.endpoint);
                let outcome = router.handle(&buf[..n]).await;
                log_dispatch("udp", &outcome);
            }
            Err(e) => {
                warn!("UDP receive error: {:?}", e);
            }
        }

        Timer::after_millis(IDLE_MS).await;
    }
}
