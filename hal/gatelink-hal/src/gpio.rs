//! Pin capabilities
//!
//! Outputs drive relay coils and the RS-485 transceiver direction line.
//! Inputs are sensor contacts that pull a pulled-up line to ground, so the
//! active reading is "low".

/// Push-pull output
pub trait OutputPin {
    fn set_high(&mut self);

    fn set_low(&mut self);

    /// Drive high when `energized`, low otherwise
    fn set_level(&mut self, energized: bool) {
        match energized {
            true => self.set_high(),
            false => self.set_low(),
        }
    }
}

/// Active-low sensor input
pub trait InputPin {
    /// Contact closed (line pulled to ground)
    fn is_low(&self) -> bool;
}
