//! Host-side doubles for the HAL traits

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;
use gatelink_hal::{CarrierOutput, OutputPin, UartPeripheral};

/// Something observable that happened on a mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Pin(&'static str, bool),
    Tx(u8),
    DelayNs(u32),
    Period(u32),
    Carrier(bool),
}

/// Ordered record shared by several mocks
#[derive(Debug, Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub fn record(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }
}

#[derive(Default)]
struct UartState {
    incoming: VecDeque<u8>,
    sent: Vec<u8>,
    /// Bytes the transmit register will still accept
    space: usize,
    tx_interrupt: bool,
    log: Option<Log>,
}

/// UART whose registers are driven by the test through a [`UartHandle`]
pub struct MockUart {
    state: Rc<RefCell<UartState>>,
}

/// Test-side view of a [`MockUart`]
#[derive(Clone)]
pub struct UartHandle {
    state: Rc<RefCell<UartState>>,
}

impl MockUart {
    pub fn new() -> (Self, UartHandle) {
        let state = Rc::new(RefCell::new(UartState::default()));
        (
            Self {
                state: state.clone(),
            },
            UartHandle { state },
        )
    }

    /// Mock that records transmitted bytes into `log` as well
    pub fn logged(log: &Log) -> (Self, UartHandle) {
        let (uart, handle) = Self::new();
        handle.state.borrow_mut().log = Some(log.clone());
        (uart, handle)
    }
}

impl UartHandle {
    /// Let the transmit register accept `bytes` more bytes
    pub fn grant(&self, bytes: usize) {
        let mut state = self.state.borrow_mut();
        state.space = state.space.saturating_add(bytes);
    }

    /// Bytes arriving on the line
    pub fn receive(&self, bytes: &[u8]) {
        self.state.borrow_mut().incoming.extend(bytes.iter().copied());
    }

    pub fn sent(&self) -> Vec<u8> {
        self.state.borrow().sent.clone()
    }

    pub fn tx_interrupt_armed(&self) -> bool {
        self.state.borrow().tx_interrupt
    }
}

impl UartPeripheral for MockUart {
    fn is_readable(&self) -> bool {
        !self.state.borrow().incoming.is_empty()
    }

    fn read_byte(&mut self) -> u8 {
        self.state.borrow_mut().incoming.pop_front().unwrap_or(0)
    }

    fn is_writable(&self) -> bool {
        self.state.borrow().space > 0
    }

    fn write_byte(&mut self, byte: u8) {
        let mut state = self.state.borrow_mut();
        state.space -= 1;
        state.sent.push(byte);
        if let Some(log) = &state.log {
            log.record(Event::Tx(byte));
        }
    }

    fn set_tx_interrupt(&mut self, enabled: bool) {
        self.state.borrow_mut().tx_interrupt = enabled;
    }
}

/// Output pin that records its level
pub struct MockPin {
    name: &'static str,
    level: Rc<RefCell<bool>>,
    log: Log,
}

impl MockPin {
    pub fn new(name: &'static str, log: &Log) -> (Self, Rc<RefCell<bool>>) {
        let level = Rc::new(RefCell::new(false));
        (
            Self {
                name,
                level: level.clone(),
                log: log.clone(),
            },
            level,
        )
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        *self.level.borrow_mut() = true;
        self.log.record(Event::Pin(self.name, true));
    }

    fn set_low(&mut self) {
        *self.level.borrow_mut() = false;
        self.log.record(Event::Pin(self.name, false));
    }
}

/// Delay that completes immediately and records the request
pub struct MockDelay(pub Log);

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.0.record(Event::DelayNs(ns));
    }
}

/// IR emitter that records carrier changes
pub struct MockCarrier(pub Log);

impl CarrierOutput for MockCarrier {
    fn set_period_us(&mut self, period_us: u32) {
        self.0.record(Event::Period(period_us));
    }

    fn carrier_on(&mut self) {
        self.0.record(Event::Carrier(true));
    }

    fn carrier_off(&mut self) {
        self.0.record(Event::Carrier(false));
    }
}
