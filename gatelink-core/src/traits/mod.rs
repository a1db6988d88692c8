//! Ports between the board-agnostic core and the firmware
//!
//! The dispatcher only knows what an output does, not which peripheral
//! carries it. The firmware implements these traits over its transports,
//! socket and pins.

pub mod outputs;

pub use outputs::{IrPort, Outputs, SerialPort};
