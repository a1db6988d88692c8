//! Relay output bank
//!
//! Relays are addressed by their 1-based number, which is the offset of a
//! relay channel from its route base (channel 21 is relay 1). The bank is
//! shared between every dispatching task, so the pins live behind one
//! blocking mutex.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use gatelink_hal::OutputPin;
use gatelink_protocol::RelayState;

/// `N` relay outputs driven by GPIO pins
pub struct RelayBank<M: RawMutex, P, const N: usize> {
    pins: Mutex<M, RefCell<[P; N]>>,
}

impl<M: RawMutex, P: OutputPin, const N: usize> RelayBank<M, P, N> {
    /// Take ownership of the pins and drive every relay off
    pub fn new(mut pins: [P; N]) -> Self {
        for pin in pins.iter_mut() {
            pin.set_low();
        }
        Self {
            pins: Mutex::new(RefCell::new(pins)),
        }
    }

    /// Number of fitted relays
    pub const fn count(&self) -> usize {
        N
    }

    /// Switch relay `number` (1-based)
    ///
    /// Returns `false` if no such relay is fitted.
    pub fn set(&self, number: usize, state: RelayState) -> bool {
        if number == 0 || number > N {
            return false;
        }
        self.pins.lock(|pins| pins.borrow_mut()[number - 1].set_level(state.is_on()));
        true
    }

    /// Switch every relay
    pub fn set_all(&self, state: RelayState) {
        self.pins.lock(|pins| {
            for pin in pins.borrow_mut().iter_mut() {
                pin.set_level(state.is_on());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, Log, MockPin};
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Level = Rc<RefCell<bool>>;

    fn bank(log: &Log) -> (RelayBank<CriticalSectionRawMutex, MockPin, 3>, [Level; 3]) {
        let (a, la) = MockPin::new("relay1", log);
        let (b, lb) = MockPin::new("relay2", log);
        let (c, lc) = MockPin::new("relay3", log);
        (RelayBank::new([a, b, c]), [la, lb, lc])
    }

    #[test]
    fn test_starts_off() {
        let log = Log::default();
        let (relays, levels) = bank(&log);

        assert_eq!(relays.count(), 3);
        assert!(levels.iter().all(|level| !*level.borrow()));
        assert_eq!(log.events().len(), 3);
    }

    #[test]
    fn test_set_one_based() {
        let log = Log::default();
        let (relays, levels) = bank(&log);

        assert!(relays.set(1, RelayState::On));
        assert!(*levels[0].borrow());
        assert!(!*levels[1].borrow());
        assert_eq!(log.events().last(), Some(&Event::Pin("relay1", true)));

        assert!(relays.set(1, RelayState::Off));
        assert!(!*levels[0].borrow());
    }

    #[test]
    fn test_out_of_range_ignored() {
        let log = Log::default();
        let (relays, _levels) = bank(&log);
        let before = log.events().len();

        assert!(!relays.set(0, RelayState::On));
        assert!(!relays.set(4, RelayState::On));
        assert_eq!(log.events().len(), before);
    }

    #[test]
    fn test_set_all() {
        let log = Log::default();
        let (relays, levels) = bank(&log);

        relays.set_all(RelayState::On);
        assert!(levels.iter().all(|level| *level.borrow()));

        relays.set_all(RelayState::Off);
        assert!(levels.iter().all(|level| !*level.borrow()));
    }
}
