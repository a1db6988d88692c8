//! UART peripheral abstractions
//!
//! The gateway drives its UARTs from interrupt handlers, so the abstraction
//! is register-shaped rather than stream-shaped: a transport asks whether the
//! holding registers can be read or written and moves one byte at a time.

/// Register-level access to one UART peripheral
///
/// Every method is called with the owning transport's exclusive section
/// held, from either the task or the interrupt handler of that UART.
pub trait UartPeripheral {
    /// Receive register holds at least one byte
    fn is_readable(&self) -> bool;

    /// Take the next byte from the receive register
    fn read_byte(&mut self) -> u8;

    /// Transmit register can accept a byte
    fn is_writable(&self) -> bool;

    /// Place a byte in the transmit register
    fn write_byte(&mut self, byte: u8);

    /// Arm or disarm the "transmit register empty" interrupt
    ///
    /// Peripherals whose empty interrupt is level-triggered must disarm it
    /// once there is nothing left to send. Edge-triggered peripherals can
    /// keep the default no-op.
    fn set_tx_interrupt(&mut self, enabled: bool) {
        let _ = enabled;
    }
}

/// Line settings applied when a port is opened
///
/// Ports are configured once at startup and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    pub baudrate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    /// 9600 8-N-1, the RS-485 bus setting
    fn default() -> Self {
        Self::with_baudrate(9600)
    }
}

impl UartConfig {
    /// 8-N-1 at the given baud rate
    pub const fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }

    /// Same settings with a different parity
    pub const fn parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }
}

/// Character width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
