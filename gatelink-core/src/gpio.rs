//! Sensor input debouncing
//!
//! Inputs are pulled up and sampled every [`SAMPLE_PERIOD_MS`]. Each input
//! counts low and high samples. Once more than [`LOW_THRESHOLD`] low samples
//! have accumulated the input reports a single "low" event; it is armed
//! again only after more than [`HIGH_THRESHOLD`] high samples. Both counters
//! restart whenever either threshold is crossed.

/// Number of GPIO inputs on the board
pub const GPIO_INPUT_COUNT: usize = 8;

/// Interval between samples, in milliseconds
pub const SAMPLE_PERIOD_MS: u64 = 5;

/// Low samples needed to report a low event
pub const LOW_THRESHOLD: u16 = 45;

/// High samples needed to re-arm an input
pub const HIGH_THRESHOLD: u16 = 5;

#[derive(Debug, Clone, Copy, Default)]
struct Input {
    low: u16,
    high: u16,
    reported: bool,
}

/// Debounce state for `N` inputs
#[derive(Debug, Clone)]
pub struct Debouncer<const N: usize> {
    inputs: [Input; N],
}

impl<const N: usize> Default for Debouncer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Debouncer<N> {
    pub const fn new() -> Self {
        Self {
            inputs: [Input {
                low: 0,
                high: 0,
                reported: false,
            }; N],
        }
    }

    /// Record one sample of input `index` (0-based)
    ///
    /// Returns `true` when the input has just gone low and should be reported.
    pub fn sample(&mut self, index: usize, is_low: bool) -> bool {
        let Some(input) = self.inputs.get_mut(index) else {
            return false;
        };

        if is_low {
            input.low = input.low.saturating_add(1);
        } else {
            input.high = input.high.saturating_add(1);
        }

        let mut fire = false;
        if input.low > LOW_THRESHOLD {
            fire = !input.reported;
            input.reported = true;
            input.low = 0;
            input.high = 0;
        }
        if input.high > HIGH_THRESHOLD {
            input.reported = false;
            input.low = 0;
            input.high = 0;
        }
        fire
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(debouncer: &mut Debouncer<2>, index: usize, is_low: bool, samples: usize) -> usize {
        (0..samples)
            .filter(|_| debouncer.sample(index, is_low))
            .count()
    }

    #[test]
    fn test_fires_after_threshold() {
        let mut debouncer = Debouncer::<2>::new();

        assert_eq!(run(&mut debouncer, 0, true, 45), 0);
        assert!(debouncer.sample(0, true));
    }

    #[test]
    fn test_fires_once_while_held_low() {
        let mut debouncer = Debouncer::<2>::new();
        assert_eq!(run(&mut debouncer, 0, true, 1000), 1);
    }

    #[test]
    fn test_rearms_after_high_samples() {
        let mut debouncer = Debouncer::<2>::new();
        assert_eq!(run(&mut debouncer, 0, true, 46), 1);

        // Five high samples are not enough
        assert_eq!(run(&mut debouncer, 0, false, 5), 0);
        assert_eq!(run(&mut debouncer, 0, true, 46), 0);

        assert_eq!(run(&mut debouncer, 0, false, 6), 0);
        assert_eq!(run(&mut debouncer, 0, true, 46), 1);
    }

    #[test]
    fn test_short_glitch_ignored() {
        let mut debouncer = Debouncer::<2>::new();
        for _ in 0..20 {
            assert_eq!(run(&mut debouncer, 0, true, 10), 0);
            assert_eq!(run(&mut debouncer, 0, false, 10), 0);
        }
    }

    #[test]
    fn test_inputs_independent() {
        let mut debouncer = Debouncer::<2>::new();
        assert_eq!(run(&mut debouncer, 0, true, 46), 1);
        assert_eq!(run(&mut debouncer, 1, false, 100), 0);
        assert!(!debouncer.sample(5, true));
    }
}
