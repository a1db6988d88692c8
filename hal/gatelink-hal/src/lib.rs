//! Gatelink Hardware Abstraction Layer
//!
//! This crate defines the hardware capabilities the gateway core needs from a
//! chip-specific HAL. The core never touches registers directly; it is
//! instantiated once per physical port with a type implementing these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  gatelink-firmware (tasks, wiring)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  gatelink-core (transport, dispatch)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  gatelink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ gatelink-hal- │
//!             │     stm32     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartPeripheral`] - Register-level UART access used from both
//!   task and interrupt context
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Relays, transceiver direction, sensors
//! - [`carrier::CarrierOutput`] - Modulated IR emitter

#![no_std]
#![deny(unsafe_code)]

pub mod carrier;
pub mod gpio;
pub mod uart;

pub use carrier::CarrierOutput;
pub use gpio::{InputPin, OutputPin};
pub use uart::{UartConfig, UartPeripheral};
