//! Infrared code tables and playback
//!
//! Each IR port has a text table with one code per line, in Pronto hex
//! notation:
//!
//! ```text
//! 0000 006D 0000 0022 0157 00AC 0015 0016 0015 0041 ...
//! │    │    │    │    └── on/off durations in carrier cycles, alternating
//! │    │    │    └─────── number of on/off pairs
//! │    │    └──────────── unused
//! │    └───────────────── carrier period, in units of 0.24 µs
//! └────────────────────── format
//! ```
//!
//! A frame selects a code by its 1-based line number.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::delay::DelayNs;
use gatelink_hal::CarrierOutput;
use heapless::Vec;

use crate::traits::IrPort;

/// Number of IR emitters on the board
pub const IR_PORT_COUNT: usize = 6;

/// Longest code accepted, in on/off pairs
pub const MAX_PAIRS: usize = 128;

/// How many times each port sends a code
pub const IR_REPEATS: [u8; IR_PORT_COUNT] = [1, 1, 3, 5, 1, 1];

/// Header words before the first duration
const HEADER_WORDS: usize = 4;

/// Errors from looking up or parsing an IR code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrCodeError {
    /// No table is installed for the port
    NoTable,
    /// The table has no line with this number
    NoSuchCode,
    /// Fewer than four header words
    MissingHeader,
    /// A word is not hexadecimal
    InvalidNumber,
    /// Declared pair count exceeds [`MAX_PAIRS`]
    TooManyPairs,
}

/// One burst of carrier followed by silence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pulse {
    pub on_us: u32,
    pub off_us: u32,
}

/// A parsed IR code, ready to play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrCode {
    period_us: u32,
    pulses: Vec<Pulse, MAX_PAIRS>,
}

fn hex_word(word: &str) -> Result<u32, IrCodeError> {
    u32::from_str_radix(word, 16).map_err(|_| IrCodeError::InvalidNumber)
}

impl IrCode {
    /// Parse one line of a code table
    ///
    /// Durations beyond the declared pair count are ignored; a line with
    /// fewer durations than declared plays the pairs it has.
    pub fn parse(line: &str) -> Result<Self, IrCodeError> {
        let mut words = line.split_ascii_whitespace();
        let mut header = [0u32; HEADER_WORDS];
        for slot in header.iter_mut() {
            *slot = hex_word(words.next().ok_or(IrCodeError::MissingHeader)?)?;
        }

        // Integer microseconds, as the carrier timer is programmed in µs
        let period_us = header[1].saturating_mul(24) / 100;
        let declared = header[3] as usize;
        if declared > MAX_PAIRS {
            return Err(IrCodeError::TooManyPairs);
        }

        let mut pulses = Vec::new();
        while pulses.len() < declared {
            let Some(on) = words.next() else { break };
            let on_us = hex_word(on)?.saturating_mul(period_us);
            let off_us = match words.next() {
                Some(off) => hex_word(off)?.saturating_mul(period_us),
                None => 0,
            };
            // Bounded by `declared <= MAX_PAIRS`
            let _ = pulses.push(Pulse { on_us, off_us });
        }

        Ok(Self { period_us, pulses })
    }

    /// Parse line `number` (1-based) of a code table
    pub fn from_table(table: &str, number: u8) -> Result<Self, IrCodeError> {
        if number == 0 {
            return Err(IrCodeError::NoSuchCode);
        }
        let line = table
            .lines()
            .nth(number as usize - 1)
            .ok_or(IrCodeError::NoSuchCode)?;
        Self::parse(line)
    }

    /// Carrier period in microseconds
    pub fn period_us(&self) -> u32 {
        self.period_us
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }
}

/// Send `code` on `emitter`, `repeats` times back to back
pub async fn play<E, D>(emitter: &mut E, delay: &mut D, code: &IrCode, repeats: u8)
where
    E: CarrierOutput,
    D: DelayNs,
{
    emitter.set_period_us(code.period_us());
    for _ in 0..repeats {
        for pulse in code.pulses() {
            emitter.carrier_on();
            delay.delay_us(pulse.on_us).await;
            emitter.carrier_off();
            delay.delay_us(pulse.off_us).await;
        }
    }
}

struct Emitters<E, D> {
    ports: [E; IR_PORT_COUNT],
    delay: D,
}

/// All IR emitters with their code tables
///
/// Playback holds the emitters for the whole code, so two triggers never
/// mix their carriers (the ports may share one timer).
pub struct IrBlaster<'a, M: RawMutex, E, D> {
    tables: [Option<&'a str>; IR_PORT_COUNT],
    emitters: Mutex<M, Emitters<E, D>>,
}

impl<'a, M, E, D> IrBlaster<'a, M, E, D>
where
    M: RawMutex,
    E: CarrierOutput,
    D: DelayNs,
{
    /// Take the emitters, all silenced
    pub fn new(
        tables: [Option<&'a str>; IR_PORT_COUNT],
        mut ports: [E; IR_PORT_COUNT],
        delay: D,
    ) -> Self {
        for port in ports.iter_mut() {
            port.carrier_off();
        }
        Self {
            tables,
            emitters: Mutex::new(Emitters { ports, delay }),
        }
    }

    /// Look up code `number` for `port` and play it with the port's repeat count
    pub async fn trigger(&self, port: IrPort, number: u8) -> Result<(), IrCodeError> {
        let table = self.tables[port.index()].ok_or(IrCodeError::NoTable)?;
        let code = IrCode::from_table(table, number)?;

        let mut emitters = self.emitters.lock().await;
        let Emitters { ports, delay } = &mut *emitters;
        play(&mut ports[port.index()], delay, &code, IR_REPEATS[port.index()]).await;
        Ok(())
    }
}
