//! Interrupt-driven USART access
//!
//! [`UsartPort`] keeps the embassy driver alive (so the peripheral stays
//! clocked and its pins stay in alternate mode) and talks to the status and
//! data registers directly. The interrupt vector is left to the firmware,
//! which forwards it to the owning transport.

use embassy_stm32::mode::Blocking;
use embassy_stm32::pac::usart::Usart;
use embassy_stm32::usart::{self, Uart};
use gatelink_hal::uart::{DataBits, Parity, StopBits};
use gatelink_hal::{UartConfig, UartPeripheral};

/// Convert line settings to an embassy driver configuration
pub fn usart_config(config: &UartConfig) -> usart::Config {
    let mut out = usart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => usart::DataBits::DataBits7,
        DataBits::Eight => usart::DataBits::DataBits8,
        DataBits::Nine => usart::DataBits::DataBits9,
    };
    out.parity = match config.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    out
}

/// One USART driven from its interrupt
pub struct UsartPort {
    _driver: Uart<'static, Blocking>,
    regs: Usart,
}

impl UsartPort {
    /// Take over a configured driver and enable the receive interrupt
    ///
    /// `regs` must be the register block of the peripheral `driver` was
    /// created for.
    pub fn new(driver: Uart<'static, Blocking>, regs: Usart) -> Self {
        regs.cr1().modify(|w| w.set_rxneie(true));
        Self {
            _driver: driver,
            regs,
        }
    }
}

impl UartPeripheral for UsartPort {
    fn is_readable(&self) -> bool {
        let sr = self.regs.sr().read();
        // An overrun also needs a data register read to clear
        sr.rxne() || sr.ore()
    }

    fn read_byte(&mut self) -> u8 {
        self.regs.dr().read().dr() as u8
    }

    fn is_writable(&self) -> bool {
        self.regs.sr().read().txe()
    }

    fn write_byte(&mut self, byte: u8) {
        self.regs.dr().write(|w| w.set_dr(byte as u16));
    }

    fn set_tx_interrupt(&mut self, enabled: bool) {
        self.regs.cr1().modify(|w| w.set_txeie(enabled));
    }
}
