//! Modulated carrier output for infrared emitters

/// An output that can emit a square-wave carrier at 50% duty
///
/// IR playback gates the carrier on and off with microsecond delays between
/// calls, so `carrier_on`/`carrier_off` must take effect immediately.
pub trait CarrierOutput {
    /// Set the carrier period in microseconds
    ///
    /// On some parts the period is shared by every channel of a timer.
    fn set_period_us(&mut self, period_us: u32);

    /// Start emitting the carrier
    fn carrier_on(&mut self);

    /// Stop emitting (output held low)
    fn carrier_off(&mut self);
}
