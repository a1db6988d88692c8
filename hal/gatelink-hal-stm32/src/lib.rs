//! STM32F4 implementations of the Gatelink HAL traits
//!
//! embassy-stm32 owns clock, pin and baud setup. Once a peripheral is
//! configured, the types here drive it at register level so that the
//! gateway core can service it from its own interrupt handlers.
//!
//! # Features
//!
//! - `stm32f407vg`, `stm32f407zg` - Chip selection
//! - `defmt` - Enable debug formatting support

#![no_std]

pub mod carrier;
pub mod gpio;
pub mod uart;

pub use carrier::TimerCarrier;
pub use gpio::{InputLine, OutputLine};
pub use uart::{usart_config, UsartPort};
