//! Network stack runner

use embassy_net::Runner;
use embassy_stm32::eth::{Ethernet, GenericPhy};
use embassy_stm32::peripherals::ETH;

/// Ethernet MAC driver type
pub type Device = Ethernet<'static, ETH, GenericPhy>;

/// Drive the embassy-net stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, Device>) -> ! {
    runner.run().await
}
