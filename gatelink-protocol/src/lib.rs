//! Gatelink frame protocol
//!
//! Every transport of the gateway (UDP, RS-485, both RS-232 links) carries
//! the same compact binary frame, so any medium can command and observe the
//! same devices. Devices are addressed through a channel-number space.
//!
//! # Frame Format
//!
//! ```text
//! ┌─────┬───────────┬──────┬─────────┬────────┬─────────────┬──────────┐
//! │ SOF │ DEVICE ID │ TYPE │ CHANNEL │ LENGTH │ PAYLOAD     │ CHECKSUM │
//! │ '>' │ 1B        │ 1B   │ 1B      │ 1B     │ 0–249B      │ 1B       │
//! └─────┴───────────┴──────┴─────────┴────────┴─────────────┴──────────┘
//! ```
//!
//! The checksum is the sum, modulo 256, of every byte before it. There is no
//! acknowledgement: a frame that fails validation is simply dropped.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{
    checksum, Frame, FrameAssembler, FrameError, FRAME_OVERHEAD, FRAME_START, MAX_FRAME_SIZE,
    MAX_PAYLOAD_SIZE,
};
pub use messages::{DataType, RelayState};
