//! RS-485 half-duplex turnaround
//!
//! The bus transceiver listens unless its direction line is driven high.
//! Every transmission is bracketed by guard delays so that the previous
//! talker has released the line before we drive it, and so that the last
//! byte has left the shift register before we release it:
//!
//! ```text
//! guard ─▶ direction high ─▶ queue bytes ─▶ drain ring ─▶ guard ─▶ direction low
//! ```

use core::future::Future;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::delay::DelayNs;
use gatelink_hal::{OutputPin, UartPeripheral};

use crate::transport::Transport;

/// Delay before and after driving the bus, in milliseconds
pub const GUARD_DELAY_MS: u32 = 8;

struct Turnaround<P, D> {
    direction: P,
    delay: D,
}

/// RS-485 transmitter sharing a [`Transport`] with the bus listener
///
/// The listener reads from the transport directly; only transmissions go
/// through the bus so that the direction line is driven correctly.
pub struct Rs485Bus<'a, M: RawMutex, U, P, D, const N: usize> {
    transport: &'a Transport<M, U, N>,
    turnaround: Mutex<M, Turnaround<P, D>>,
}

impl<'a, M, U, P, D, const N: usize> Rs485Bus<'a, M, U, P, D, N>
where
    M: RawMutex,
    U: UartPeripheral,
    P: OutputPin,
    D: DelayNs,
{
    /// Wrap a transport; the direction line is put in receive mode
    pub fn new(transport: &'a Transport<M, U, N>, mut direction: P, delay: D) -> Self {
        direction.set_low();
        Self {
            transport,
            turnaround: Mutex::new(Turnaround { direction, delay }),
        }
    }

    /// Drive raw bytes onto the bus
    ///
    /// Returns with the transceiver back in receive mode.
    pub async fn transmit(&self, bytes: &[u8]) {
        self.driven(self.transport.write(bytes)).await;
    }

    /// Drive one frame onto the bus, sized by its LENGTH field
    pub async fn send_line(&self, frame: &[u8]) {
        self.driven(self.transport.send_line(frame)).await;
    }

    /// Run `send` with the transceiver in write mode, then drain
    async fn driven(&self, send: impl Future<Output = ()>) {
        let mut line = self.turnaround.lock().await;

        line.delay.delay_ms(GUARD_DELAY_MS).await;
        line.direction.set_high();

        send.await;
        self.transport.flush().await;

        line.delay.delay_ms(GUARD_DELAY_MS).await;
        line.direction.set_low();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, Log, MockDelay, MockPin, MockUart};
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_futures::yield_now;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    const GUARD: Event = Event::DelayNs(GUARD_DELAY_MS * 1_000_000);

    #[test]
    fn test_transmit_brackets_payload() {
        let log = Log::default();
        let (uart, hw) = MockUart::logged(&log);
        hw.grant(usize::MAX);
        let transport = Transport::<CriticalSectionRawMutex, _, 16>::new(uart);
        let (pin, level) = MockPin::new("dir", &log);
        let bus = Rs485Bus::new(&transport, pin, MockDelay(log.clone()));

        block_on(join(bus.transmit(b"XYZ"), async {
            for _ in 0..8 {
                yield_now().await;
                transport.on_interrupt();
            }
        }));

        assert_eq!(
            log.events(),
            vec![
                Event::Pin("dir", false),
                GUARD,
                Event::Pin("dir", true),
                Event::Tx(b'X'),
                Event::Tx(b'Y'),
                Event::Tx(b'Z'),
                GUARD,
                Event::Pin("dir", false),
            ]
        );
        assert!(!*level.borrow());
    }

    #[test]
    fn test_send_line_sized_by_length_field() {
        let log = Log::default();
        let (uart, hw) = MockUart::logged(&log);
        hw.grant(usize::MAX);
        let transport = Transport::<CriticalSectionRawMutex, _, 16>::new(uart);
        let (pin, _level) = MockPin::new("dir", &log);
        let bus = Rs485Bus::new(&transport, pin, MockDelay(log.clone()));

        let status = [62, 1, b'S', 21, 1, 1, 87, 0xAA, 0xAA];
        block_on(join(bus.send_line(&status), async {
            for _ in 0..16 {
                yield_now().await;
                transport.on_interrupt();
            }
        }));

        assert_eq!(hw.sent(), status[..7].to_vec());
        assert_eq!(transport.tx_queued(), 0);
        assert_eq!(log.events().first(), Some(&Event::Pin("dir", false)));
        assert_eq!(log.events().last(), Some(&Event::Pin("dir", false)));
    }
}
