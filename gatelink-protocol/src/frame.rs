//! Frame encoding, validation and reassembly.
//!
//! Frame format:
//! - SOF (1 byte): `>` (62) synchronization byte
//! - DEVICE ID (1 byte): target or source device
//! - TYPE (1 byte): command class, see [`DataType`]
//! - CHANNEL (1 byte): logical channel number
//! - LENGTH (1 byte): payload length (0-249)
//! - PAYLOAD (0-249 bytes): channel-specific data
//! - CHECKSUM (1 byte): sum modulo 256 of every preceding byte

use heapless::Vec;

use crate::messages::DataType;

/// Start-of-frame byte (`>`)
pub const FRAME_START: u8 = 62;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 249;

/// Bytes around the payload (SOF, device id, type, channel, length, checksum)
pub const FRAME_OVERHEAD: usize = 6;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + FRAME_OVERHEAD;

/// Offset of the LENGTH field
const LENGTH_OFFSET: usize = 4;

/// Offset of the first payload byte
const PAYLOAD_OFFSET: usize = 5;

/// Total length assumed until the LENGTH field has been seen
const LENGTH_UNKNOWN: usize = 255;

/// Errors that can occur during frame validation or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Fewer bytes than the LENGTH field announces
    Incomplete,
    /// First byte is not [`FRAME_START`]
    InvalidStart,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Sum modulo 256 of `bytes`
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

/// A validated or constructed frame
///
/// This is the value handed from the codec to the dispatcher. It owns its
/// payload, so nothing about one frame can be observed or clobbered by the
/// processing of another.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Target or source device identifier
    pub device_id: u8,
    /// Command class
    pub data_type: DataType,
    /// Logical channel number
    pub channel: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame
    pub fn new(
        device_id: u8,
        data_type: DataType,
        channel: u8,
        payload: &[u8],
    ) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            device_id,
            data_type,
            channel,
            payload,
        })
    }

    /// Create a single-byte status frame
    pub fn status(device_id: u8, channel: u8, value: u8) -> Self {
        let mut payload = Vec::new();
        // Capacity is far above one byte
        let _ = payload.push(value);

        Self {
            device_id,
            data_type: DataType::Status,
            channel,
            payload,
        }
    }

    /// Number of bytes this frame occupies on the wire
    pub fn wire_len(&self) -> usize {
        self.payload.len() + FRAME_OVERHEAD
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.wire_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = FRAME_START;
        buffer[1] = self.device_id;
        buffer[2] = self.data_type.to_byte();
        buffer[3] = self.channel;
        buffer[LENGTH_OFFSET] = self.payload.len() as u8;
        buffer[PAYLOAD_OFFSET..PAYLOAD_OFFSET + self.payload.len()].copy_from_slice(&self.payload);
        buffer[frame_len - 1] = checksum(&buffer[..frame_len - 1]);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }

    /// Validate and decode one candidate frame
    ///
    /// Used directly on datagrams, where a whole frame arrives at once, and
    /// on the output of [`FrameAssembler`] for byte streams. Bytes after the
    /// announced length are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < FRAME_OVERHEAD {
            return Err(FrameError::Incomplete);
        }
        if bytes[0] != FRAME_START {
            return Err(FrameError::InvalidStart);
        }

        let length = bytes[LENGTH_OFFSET] as usize;
        if length > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }

        let total = length + FRAME_OVERHEAD;
        if bytes.len() < total {
            return Err(FrameError::Incomplete);
        }

        if checksum(&bytes[..total - 1]) != bytes[total - 1] {
            return Err(FrameError::InvalidChecksum);
        }

        Self::new(
            bytes[1],
            DataType::from_byte(bytes[2]),
            bytes[3],
            &bytes[PAYLOAD_OFFSET..PAYLOAD_OFFSET + length],
        )
    }
}

/// Reassembly state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssemblyState {
    /// Discarding bytes until SOF
    WaitSync,
    /// Appending bytes until the expected length is reached
    Accumulate,
    /// A complete frame is held in the buffer
    Done,
}

/// Byte-at-a-time frame reassembly for serial streams
///
/// The assembler only delimits frames; it does not validate them. Pass the
/// result of [`FrameAssembler::frame`] to [`Frame::decode`].
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    state: AssemblyState,
    buffer: [u8; MAX_FRAME_SIZE],
    position: usize,
    expected: usize,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Create an assembler waiting for SOF
    pub const fn new() -> Self {
        Self {
            state: AssemblyState::WaitSync,
            buffer: [0u8; MAX_FRAME_SIZE],
            position: 0,
            expected: LENGTH_UNKNOWN,
        }
    }

    /// Drop any partial frame and wait for SOF again
    pub fn reset(&mut self) {
        self.state = AssemblyState::WaitSync;
        self.position = 0;
        self.expected = LENGTH_UNKNOWN;
    }

    /// Feed a single byte
    ///
    /// Returns `true` when the byte completed a frame. Feeding again after
    /// completion starts a new frame.
    pub fn feed(&mut self, byte: u8) -> bool {
        match self.state {
            AssemblyState::Done => {
                self.reset();
                self.feed(byte)
            }
            AssemblyState::WaitSync => {
                if byte == FRAME_START {
                    self.buffer[0] = byte;
                    self.position = 1;
                    self.state = AssemblyState::Accumulate;
                }
                false
            }
            AssemblyState::Accumulate => {
                self.buffer[self.position] = byte;
                if self.position == LENGTH_OFFSET {
                    // Overlong announcements are truncated to the buffer and
                    // then fail validation
                    self.expected = (byte as usize + FRAME_OVERHEAD).min(MAX_FRAME_SIZE);
                }
                self.position += 1;

                if self.position >= self.expected {
                    self.state = AssemblyState::Done;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Bytes collected so far (the whole frame once complete)
    pub fn frame(&self) -> &[u8] {
        &self.buffer[..self.position]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Relay 1 on, device 1
    const RELAY_WRITE: [u8; 7] = [62, 1, b'W', 21, 1, 1, 173];

    fn assemble(bytes: &[u8]) -> Option<std::vec::Vec<u8>> {
        let mut assembler = FrameAssembler::new();
        for &byte in bytes {
            if assembler.feed(byte) {
                return Some(assembler.frame().to_vec());
            }
        }
        None
    }

    #[test]
    fn test_relay_write_checksum() {
        assert_eq!(checksum(&RELAY_WRITE[..6]), 173);
    }

    #[test]
    fn test_decode_relay_write() {
        let frame = Frame::decode(&RELAY_WRITE).unwrap();

        assert_eq!(frame.device_id, 1);
        assert_eq!(frame.data_type, DataType::Write);
        assert_eq!(frame.channel, 21);
        assert_eq!(&frame.payload[..], &[1]);
    }

    #[test]
    fn test_encode_status_frame() {
        let frame = Frame::status(1, 21, 1);
        let encoded = frame.encode_to_vec().unwrap();

        let sum = checksum(&[62, 1, b'S', 21, 1, 1]);
        assert_eq!(&encoded[..], &[62, 1, b'S', 21, 1, 1, sum]);
    }

    #[test]
    fn test_encode_empty_payload() {
        let frame = Frame::new(7, DataType::Write, 5, &[]).unwrap();
        let mut buffer = [0u8; 8];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 6);
        assert_eq!(buffer[4], 0);
        assert_eq!(buffer[5], checksum(&buffer[..5]));
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = Frame::new(1, DataType::Write, 31, b"ABC").unwrap();
        let mut buffer = [0u8; 8];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        let result = Frame::new(1, DataType::Write, 31, &large_payload);
        assert_eq!(result, Err(FrameError::PayloadTooLarge));
    }

    #[test]
    fn test_decode_rejects_zero_checksum() {
        let mut bytes = RELAY_WRITE;
        bytes[6] = 0;
        assert_eq!(Frame::decode(&bytes), Err(FrameError::InvalidChecksum));
    }

    #[test]
    fn test_decode_short_datagram() {
        assert_eq!(Frame::decode(&RELAY_WRITE[..4]), Err(FrameError::Incomplete));
        assert_eq!(Frame::decode(&RELAY_WRITE[..6]), Err(FrameError::Incomplete));
    }

    #[test]
    fn test_decode_bad_start() {
        let mut bytes = RELAY_WRITE;
        bytes[0] = b'<';
        assert_eq!(Frame::decode(&bytes), Err(FrameError::InvalidStart));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        // Datagram buffers are larger than the frame they hold
        let mut datagram = [0u8; 32];
        datagram[..7].copy_from_slice(&RELAY_WRITE);

        let frame = Frame::decode(&datagram).unwrap();
        assert_eq!(frame.channel, 21);
    }

    #[test]
    fn test_assembler_skips_noise_before_sof() {
        let mut stream = std::vec![0x00, 0xFF, b'W', 21];
        stream.extend_from_slice(&RELAY_WRITE);

        assert_eq!(assemble(&stream).unwrap(), RELAY_WRITE.to_vec());
    }

    #[test]
    fn test_assembler_needs_length_field() {
        let mut assembler = FrameAssembler::new();
        for &byte in &RELAY_WRITE[..4] {
            assert!(!assembler.feed(byte));
        }
        assert_eq!(assembler.frame(), &RELAY_WRITE[..4]);
    }

    #[test]
    fn test_assembler_back_to_back_frames() {
        let second = Frame::new(1, DataType::Write, 31, b"ABC")
            .unwrap()
            .encode_to_vec()
            .unwrap();

        let mut assembler = FrameAssembler::new();
        let mut frames = std::vec::Vec::new();
        for &byte in RELAY_WRITE.iter().chain(second.iter()) {
            if assembler.feed(byte) {
                frames.push(assembler.frame().to_vec());
            }
        }

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], RELAY_WRITE.to_vec());
        assert_eq!(&frames[1][..], &second[..]);
    }

    #[test]
    fn test_assembler_sof_inside_frame_is_data() {
        // Payload byte equal to SOF must not restart reassembly
        let frame = Frame::new(1, DataType::Write, 31, &[FRAME_START, FRAME_START])
            .unwrap()
            .encode_to_vec()
            .unwrap();

        let assembled = assemble(&frame).unwrap();
        assert_eq!(Frame::decode(&assembled).unwrap().payload[..], [62, 62]);
    }

    #[test]
    fn test_assembler_truncates_overlong_frame() {
        let mut stream = std::vec![FRAME_START, 1, b'W', 31, 255];
        stream.resize(400, 0xAA);

        let assembled = assemble(&stream).unwrap();
        assert_eq!(assembled.len(), MAX_FRAME_SIZE);
        assert_eq!(Frame::decode(&assembled), Err(FrameError::PayloadTooLarge));
    }

    proptest! {
        #[test]
        fn prop_roundtrip_every_length(
            device_id in any::<u8>(),
            data_type in prop_oneof![Just(b'W'), Just(b'S'), any::<u8>()],
            channel in any::<u8>(),
            payload in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE),
        ) {
            let frame = Frame::new(device_id, DataType::from_byte(data_type), channel, &payload).unwrap();
            let encoded = frame.encode_to_vec().unwrap();
            prop_assert_eq!(encoded.len(), payload.len() + FRAME_OVERHEAD);

            let decoded = Frame::decode(&encoded).unwrap();
            prop_assert_eq!(&decoded, &frame);

            let assembled = assemble(&encoded).unwrap();
            prop_assert_eq!(Frame::decode(&assembled).unwrap(), frame);
        }

        #[test]
        fn prop_single_bit_flip_rejected(
            payload in proptest::collection::vec(any::<u8>(), 0..=32usize),
            index in any::<proptest::sample::Index>(),
            bit in 0u8..8,
        ) {
            let frame = Frame::new(1, DataType::Write, 31, &payload).unwrap();
            let mut encoded = frame.encode_to_vec().unwrap();
            let position = index.index(encoded.len());
            encoded[position] ^= 1 << bit;

            let result = Frame::decode(&encoded);
            if position == LENGTH_OFFSET {
                // A shorter window may checksum by chance, but never to the original
                prop_assert_ne!(result, Ok(frame));
            } else {
                prop_assert!(result.is_err());
            }
        }
    }
}
