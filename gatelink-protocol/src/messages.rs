//! Typed views of single-byte wire fields
//!
//! The codec converts between these enums and raw bytes; everything above the
//! codec works with the enums only.

/// Wire byte for a write command
pub const TYPE_WRITE: u8 = b'W';

/// Wire byte for a status report
pub const TYPE_STATUS: u8 = b'S';

/// Command class carried in the TYPE field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataType {
    /// Command to change an output (`W`)
    Write,
    /// Report of a new state (`S`)
    Status,
    /// Any other class; carried through unchanged
    Other(u8),
}

impl DataType {
    /// Parse from the wire byte
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            TYPE_WRITE => DataType::Write,
            TYPE_STATUS => DataType::Status,
            other => DataType::Other(other),
        }
    }

    /// Convert to the wire byte
    pub const fn to_byte(self) -> u8 {
        match self {
            DataType::Write => TYPE_WRITE,
            DataType::Status => TYPE_STATUS,
            DataType::Other(byte) => byte,
        }
    }
}

/// Relay output state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelayState {
    #[default]
    Off,
    On,
}

impl RelayState {
    /// Interpret a command payload byte (any non-zero value energizes)
    ///
    /// Status frames carry [`RelayState::to_byte`], so a command byte other
    /// than 0 or 1 is reported back as 1.
    pub const fn from_byte(byte: u8) -> Self {
        if byte == 0 {
            RelayState::Off
        } else {
            RelayState::On
        }
    }

    /// Value reported in status frames
    pub const fn to_byte(self) -> u8 {
        match self {
            RelayState::Off => 0,
            RelayState::On => 1,
        }
    }

    /// Coil is energized
    pub const fn is_on(self) -> bool {
        matches!(self, RelayState::On)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_bytes() {
        assert_eq!(DataType::from_byte(b'W'), DataType::Write);
        assert_eq!(DataType::from_byte(b'S'), DataType::Status);
        assert_eq!(DataType::from_byte(b'R'), DataType::Other(b'R'));

        for byte in 0..=255u8 {
            assert_eq!(DataType::from_byte(byte).to_byte(), byte);
        }
    }

    #[test]
    fn test_relay_state_from_payload() {
        assert_eq!(RelayState::from_byte(0), RelayState::Off);
        assert_eq!(RelayState::from_byte(1), RelayState::On);
        assert_eq!(RelayState::from_byte(b'1'), RelayState::On);
        assert_eq!(RelayState::from_byte(0xFF).to_byte(), 1);
    }

    #[test]
    fn test_relay_state_reports_zero_or_one() {
        for byte in [2u8, b'1', 0x7F, 0xFF] {
            assert_eq!(RelayState::from_byte(byte).to_byte(), 1);
        }
        assert_eq!(RelayState::from_byte(0).to_byte(), 0);
    }
}
