//! Static channel routing table

/// Subsystem a channel belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Target {
    /// Reserved for system functions
    System,
    /// GPIO inputs; only ever reported, never commanded
    Gpio,
    /// Every relay at once
    RelayAll,
    /// One relay
    Relay,
    /// RS-232 passthrough
    Serial,
    /// IR code trigger
    Infrared,
    /// RS-485 passthrough
    Bus,
}

/// Contiguous range of channels mapped to one subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub first: u8,
    pub last: u8,
    /// Subtracted from the channel to get the output offset
    pub base: u8,
    pub target: Target,
}

impl Route {
    const fn new(first: u8, last: u8, base: u8, target: Target) -> Self {
        Self {
            first,
            last,
            base,
            target,
        }
    }

    pub const fn contains(&self, channel: u8) -> bool {
        channel >= self.first && channel <= self.last
    }
}

/// Base of the GPIO input channels (input 1 reports on channel 11)
pub const GPIO_BASE: u8 = 10;

/// Base of the relay channels (relay 1 is channel 21)
pub const RELAY_BASE: u8 = 20;

/// Channel map of the gateway
pub const ROUTES: [Route; 7] = [
    Route::new(1, 9, 0, Target::System),
    Route::new(11, 19, GPIO_BASE, Target::Gpio),
    Route::new(20, 20, RELAY_BASE, Target::RelayAll),
    Route::new(21, 29, RELAY_BASE, Target::Relay),
    Route::new(31, 39, 30, Target::Serial),
    Route::new(41, 49, 40, Target::Infrared),
    Route::new(50, 50, 50, Target::Bus),
];

/// Find the subsystem and output offset for a channel
pub fn resolve(channel: u8) -> Option<(Target, u8)> {
    ROUTES
        .iter()
        .find(|route| route.contains(channel))
        .map(|route| (route.target, channel - route.base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_offsets() {
        assert_eq!(resolve(21), Some((Target::Relay, 1)));
        assert_eq!(resolve(23), Some((Target::Relay, 3)));
        assert_eq!(resolve(20), Some((Target::RelayAll, 0)));
        assert_eq!(resolve(31), Some((Target::Serial, 1)));
        assert_eq!(resolve(46), Some((Target::Infrared, 6)));
        assert_eq!(resolve(50), Some((Target::Bus, 0)));
        assert_eq!(resolve(12), Some((Target::Gpio, 2)));
        assert_eq!(resolve(5), Some((Target::System, 5)));
    }

    #[test]
    fn test_gaps_unrouted() {
        for channel in [0, 10, 30, 40, 51, 200, 255] {
            assert_eq!(resolve(channel), None, "channel {channel}");
        }
    }

    #[test]
    fn test_routes_do_not_overlap() {
        for channel in 0..=255u8 {
            let matches = ROUTES.iter().filter(|route| route.contains(channel)).count();
            assert!(matches <= 1, "channel {channel}");
        }
    }
}
