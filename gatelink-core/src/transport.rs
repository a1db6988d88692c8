//! Interrupt-driven serial transport with flow control
//!
//! A [`Transport`] owns one UART peripheral plus a transmit and a receive
//! [`RingBuffer`]. Task code calls [`Transport::send_line`],
//! [`Transport::write`], [`Transport::read_line`] and [`Transport::flush`];
//! the UART interrupt handler calls [`Transport::on_interrupt`].
//!
//! # Exclusive access
//!
//! Ring indices and peripheral registers are only touched inside
//! `port.lock(..)`. On target the raw mutex is
//! `CriticalSectionRawMutex`, which masks interrupts, so the task side and
//! the interrupt side of one transport can never interleave. Tasks never
//! wait while holding the lock: they leave the section and suspend on a
//! [`Signal`] that the interrupt handler raises.
//!
//! ```text
//!  task                         exclusive section               ISR
//!  ────                         ─────────────────               ───
//!  write()    ── push bytes ──▶ [ tx ring ] ── pop, write THR ◀─ on_interrupt()
//!     ▲ full: wait tx_room                                 signal tx_room ─┐
//!     └────────────────────────────────────────────────────────────────────┘
//!  read_line() ◀─ pop bytes ──  [ rx ring ] ◀─ read RBR, push ── on_interrupt()
//!     ▲ empty: wait rx_ready                              signal rx_ready ─┘
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use gatelink_hal::UartPeripheral;
use gatelink_protocol::{FrameAssembler, FRAME_OVERHEAD};

use crate::ring::RingBuffer;

/// Ring size used by the firmware (holds one maximum-size frame)
pub const DEFAULT_RING_SIZE: usize = 256;

/// Offset of the LENGTH field in a frame
const LENGTH_OFFSET: usize = 4;

/// State shared between task and interrupt handler
struct Port<P, const N: usize> {
    uart: P,
    tx: RingBuffer<N>,
    rx: RingBuffer<N>,
    rx_overruns: u32,
}

impl<P: UartPeripheral, const N: usize> Port<P, N> {
    /// Start an idle transmitter
    ///
    /// An idle UART raises no "register empty" interrupt by itself, so the
    /// first queued byte is written directly when the register can take it.
    fn start_tx(&mut self) {
        if self.tx.is_empty() {
            return;
        }
        if self.uart.is_writable() {
            if let Some(byte) = self.tx.pop() {
                self.uart.write_byte(byte);
            }
        }
        if !self.tx.is_empty() {
            self.uart.set_tx_interrupt(true);
        }
    }
}

/// Total length announced by a frame's LENGTH field, bounded by the slice
pub fn declared_len(frame: &[u8]) -> usize {
    match frame.get(LENGTH_OFFSET) {
        Some(&length) => (length as usize + FRAME_OVERHEAD).min(frame.len()),
        None => frame.len(),
    }
}

/// Serial transport over one UART
///
/// `M` is the raw mutex guarding the shared section, `P` the peripheral and
/// `N` the size of each ring.
pub struct Transport<M: RawMutex, P, const N: usize> {
    port: BlockingMutex<M, RefCell<Port<P, N>>>,
    /// Raised by the ISR when the TX ring has room
    tx_room: Signal<M, ()>,
    /// Raised by the ISR when the TX ring is empty
    tx_drained: Signal<M, ()>,
    /// Raised by the ISR when bytes were received
    rx_ready: Signal<M, ()>,
    /// Serializes writers so frames never interleave on the wire
    writer: Mutex<M, ()>,
}

impl<M: RawMutex, P: UartPeripheral, const N: usize> Transport<M, P, N> {
    /// Create a transport around a UART peripheral
    pub const fn new(uart: P) -> Self {
        Self {
            port: BlockingMutex::new(RefCell::new(Port {
                uart,
                tx: RingBuffer::new(),
                rx: RingBuffer::new(),
                rx_overruns: 0,
            })),
            tx_room: Signal::new(),
            tx_drained: Signal::new(),
            rx_ready: Signal::new(),
            writer: Mutex::new(()),
        }
    }

    fn with_port<R>(&self, f: impl FnOnce(&mut Port<P, N>) -> R) -> R {
        self.port.lock(|port| f(&mut port.borrow_mut()))
    }

    /// Queue one frame for transmission
    ///
    /// The number of bytes sent is taken from the frame's LENGTH field.
    /// Returns once every byte is queued; transmission continues from the
    /// interrupt handler.
    pub async fn send_line(&self, frame: &[u8]) {
        self.write(&frame[..declared_len(frame)]).await;
    }

    /// Queue raw bytes for transmission
    ///
    /// Suspends while the transmit ring is full.
    pub async fn write(&self, bytes: &[u8]) {
        let _writer = self.writer.lock().await;
        let mut pending = bytes;

        while !pending.is_empty() {
            let queued = self.with_port(|port| {
                let mut queued = 0;
                for &byte in pending {
                    if port.tx.push(byte).is_err() {
                        break;
                    }
                    queued += 1;
                }
                port.start_tx();
                queued
            });
            pending = &pending[queued..];

            if !pending.is_empty() {
                self.tx_room.wait().await;
            }
        }
    }

    /// Wait until the interrupt handler has drained the transmit ring
    ///
    /// The last byte may still be shifting out of the peripheral.
    pub async fn flush(&self) {
        while !self.with_port(|port| port.tx.is_empty()) {
            self.tx_drained.wait().await;
        }
    }

    /// Wait for the next complete frame from the byte stream
    ///
    /// The returned bytes are delimited but not validated; pass them to
    /// `Frame::decode`.
    pub async fn read_line<'a>(&self, assembler: &'a mut FrameAssembler) -> &'a [u8] {
        loop {
            while let Some(byte) = self.with_port(|port| port.rx.pop()) {
                if assembler.feed(byte) {
                    return assembler.frame();
                }
            }
            self.rx_ready.wait().await;
        }
    }

    /// Service the UART interrupt
    ///
    /// Moves every received byte into the RX ring and refills the transmit
    /// register from the TX ring while it can accept bytes. Wakes a blocked
    /// writer at most once per call.
    pub fn on_interrupt(&self) {
        let (received, room, drained) = self.with_port(|port| {
            let mut received = false;
            while port.uart.is_readable() {
                let byte = port.uart.read_byte();
                if port.rx.push(byte).is_err() {
                    port.rx_overruns = port.rx_overruns.wrapping_add(1);
                }
                received = true;
            }

            while port.uart.is_writable() {
                match port.tx.pop() {
                    Some(byte) => port.uart.write_byte(byte),
                    None => break,
                }
            }
            if port.tx.is_empty() {
                port.uart.set_tx_interrupt(false);
            }

            (received, !port.tx.is_full(), port.tx.is_empty())
        });

        if received {
            self.rx_ready.signal(());
        }
        if room {
            self.tx_room.signal(());
        }
        if drained {
            self.tx_drained.signal(());
        }
    }

    /// Bytes waiting in the transmit ring
    #[cfg(test)]
    pub fn tx_queued(&self) -> usize {
        self.with_port(|port| port.tx.len())
    }

    /// Bytes waiting in the receive ring
    #[cfg(test)]
    pub fn rx_queued(&self) -> usize {
        self.with_port(|port| port.rx.len())
    }

    /// Number of received bytes dropped because the RX ring was full,
    /// resetting the counter
    pub fn take_rx_overruns(&self) -> u32 {
        self.with_port(|port| core::mem::take(&mut port.rx_overruns))
    }
}
