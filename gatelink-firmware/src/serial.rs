//! Interrupt-driven serial ports
//!
//! Each USART's transport lives in a static so that its interrupt vector
//! can reach it. The vectors are enabled only after the transport is
//! installed.

use embassy_stm32::interrupt;
use embassy_stm32::interrupt::InterruptExt;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::once_lock::OnceLock;
use gatelink_core::transport::DEFAULT_RING_SIZE;
use gatelink_core::Transport;
use gatelink_hal_stm32::UsartPort;

/// Serial transport used by every port of the board
pub type Port = Transport<CriticalSectionRawMutex, UsartPort, DEFAULT_RING_SIZE>;

/// RS-485 bus (USART2)
pub static BUS_PORT: OnceLock<Port> = OnceLock::new();

/// RS-232 link 1 (USART3)
pub static SERIAL1_PORT: OnceLock<Port> = OnceLock::new();

/// RS-232 link 2 (USART6)
pub static SERIAL2_PORT: OnceLock<Port> = OnceLock::new();

/// Install a transport and unmask its interrupt
pub fn install(
    slot: &'static OnceLock<Port>,
    irq: interrupt::Interrupt,
    uart: UsartPort,
) -> &'static Port {
    let port = slot.get_or_init(|| Port::new(uart));
    irq.unpend();
    // SAFETY: the handler only touches `slot`, which is initialized above
    unsafe { irq.enable() };
    port
}

#[interrupt]
fn USART2() {
    if let Some(port) = BUS_PORT.try_get() {
        port.on_interrupt();
    }
}

#[interrupt]
fn USART3() {
    if let Some(port) = SERIAL1_PORT.try_get() {
        port.on_interrupt();
    }
}

#[interrupt]
fn USART6() {
    if let Some(port) = SERIAL2_PORT.try_get() {
        port.on_interrupt();
    }
}
