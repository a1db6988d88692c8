//! GPIO adapters

use embassy_stm32::gpio::{Input, Output};
use gatelink_hal::{InputPin, OutputPin};

/// Push-pull output (relay coil, transceiver direction)
pub struct OutputLine(Output<'static>);

impl OutputLine {
    pub fn new(output: Output<'static>) -> Self {
        Self(output)
    }
}

impl OutputPin for OutputLine {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }
}

/// Sensor input
pub struct InputLine(Input<'static>);

impl InputLine {
    pub fn new(input: Input<'static>) -> Self {
        Self(input)
    }
}

impl InputPin for InputLine {
    fn is_low(&self) -> bool {
        self.0.is_low()
    }
}
