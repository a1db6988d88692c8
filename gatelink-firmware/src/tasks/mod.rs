//! Embassy async tasks
//!
//! One task per transport plus the GPIO poller and the network stack.
//! Each listener loops: receive one frame, dispatch it, idle.

pub mod gpio;
pub mod net;
pub mod rs232;
pub mod rs485;
pub mod udp;

pub use gpio::gpio_task;
pub use net::net_task;
pub use rs232::rs232_task;
pub use rs485::rs485_task;
pub use udp::udp_task;

use defmt::*;
use gatelink_core::Dispatch;

/// Log the outcome of one dispatched frame
fn log_dispatch(source: &str, outcome: &Dispatch) {
    match outcome {
        Dispatch::Rejected(e) => debug!("{}: frame dropped: {:?}", source, e),
        Dispatch::Filtered { device_id } => {
            trace!("{}: frame for device {}", source, device_id)
        }
        Dispatch::Ignored { .. } | Dispatch::Reserved { .. } => {
            debug!("{}: {:?}", source, outcome)
        }
        Dispatch::Infrared {
            port,
            code,
            result: Err(e),
        } => warn!(
            "{}: IR port {} code {} not played: {:?}",
            source,
            port.number(),
            code,
            e
        ),
        _ => info!("{}: {:?}", source, outcome),
    }
}
