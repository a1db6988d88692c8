//! Board-agnostic core logic for the Gatelink gateway
//!
//! This crate contains everything that does not depend on a specific chip:
//!
//! - Flow-controlled ring buffers shared between tasks and interrupt handlers
//! - The interrupt-driven serial transport and the RS-485 turnaround
//! - Channel routing and dispatch of validated frames
//! - Relay bank, IR code playback and GPIO debouncing
//! - Gateway configuration parsing
//!
//! Concrete hardware is supplied through the `gatelink-hal` traits and the
//! [`traits::Outputs`] port implemented by the firmware.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod config;
pub mod dispatch;
pub mod gpio;
pub mod ir;
pub mod relay;
pub mod ring;
pub mod traits;
pub mod transport;

#[cfg(test)]
mod testing;

pub use bus::Rs485Bus;
pub use config::GatewayConfig;
pub use dispatch::{Dispatch, Router};
pub use ir::IrBlaster;
pub use relay::RelayBank;
pub use ring::RingBuffer;
pub use traits::Outputs;
pub use transport::Transport;
