//! Frame dispatcher
//!
//! Every listening task owns a [`Router`] over the shared [`Outputs`]. A
//! frame is filtered by device ID, checked for a write command, routed by
//! channel and applied. Relay changes and GPIO events are reported back as
//! status frames on the network and on the RS-485 bus.

use gatelink_protocol::{DataType, Frame, FrameError, RelayState, FRAME_OVERHEAD};

use super::routes::{resolve, Target, GPIO_BASE, RELAY_BASE};
use crate::ir::IrCodeError;
use crate::traits::{IrPort, Outputs, SerialPort};

/// Why a valid frame had no effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IgnoreReason {
    /// Only write commands are acted on
    NotWrite,
    /// Channel belongs to no route
    Unrouted,
    /// Route exists but the addressed output is not fitted
    NoSuchOutput,
    /// The action needs a payload byte and there is none
    EmptyPayload,
}

/// What dispatching one frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// Addressed to another device
    Filtered { device_id: u8 },
    /// Valid frame with no effect
    Ignored { channel: u8, reason: IgnoreReason },
    /// Channel reserved for system or GPIO use
    Reserved { channel: u8 },
    /// Relay switched; `None` means every relay
    Relay { relay: Option<u8>, state: RelayState },
    /// Payload forwarded to an RS-232 link
    Serial { port: SerialPort, len: usize },
    /// IR code triggered
    Infrared {
        port: IrPort,
        code: u8,
        result: Result<(), IrCodeError>,
    },
    /// Payload forwarded to the RS-485 bus
    Bus { len: usize },
    /// Bytes did not form a valid frame
    Rejected(FrameError),
}

/// Applies frames addressed to this gateway
pub struct Router<'a, O> {
    device_id: u8,
    outputs: &'a O,
}

impl<'a, O: Outputs> Router<'a, O> {
    pub const fn new(device_id: u8, outputs: &'a O) -> Self {
        Self { device_id, outputs }
    }

    /// Validate raw bytes and dispatch them
    pub async fn handle(&self, bytes: &[u8]) -> Dispatch {
        match Frame::decode(bytes) {
            Ok(frame) => self.dispatch(&frame).await,
            Err(error) => Dispatch::Rejected(error),
        }
    }

    /// Apply one validated frame
    pub async fn dispatch(&self, frame: &Frame) -> Dispatch {
        let channel = frame.channel;
        let ignored = |reason| Dispatch::Ignored { channel, reason };

        if frame.device_id != self.device_id {
            return Dispatch::Filtered {
                device_id: frame.device_id,
            };
        }
        if frame.data_type != DataType::Write {
            return ignored(IgnoreReason::NotWrite);
        }
        let Some((target, offset)) = resolve(channel) else {
            return ignored(IgnoreReason::Unrouted);
        };
        let first = frame.payload.first().copied();

        match target {
            Target::System | Target::Gpio => Dispatch::Reserved { channel },

            Target::RelayAll => {
                let Some(value) = first else {
                    return ignored(IgnoreReason::EmptyPayload);
                };
                let state = RelayState::from_byte(value);
                self.outputs.set_all_relays(state);
                for number in 1..=self.outputs.relay_count() as u8 {
                    self.publish_status(RELAY_BASE + number, state.to_byte()).await;
                }
                Dispatch::Relay { relay: None, state }
            }

            Target::Relay => {
                let Some(value) = first else {
                    return ignored(IgnoreReason::EmptyPayload);
                };
                let state = RelayState::from_byte(value);
                if !self.outputs.set_relay(offset as usize, state) {
                    return ignored(IgnoreReason::NoSuchOutput);
                }
                self.publish_status(channel, state.to_byte()).await;
                Dispatch::Relay {
                    relay: Some(offset),
                    state,
                }
            }

            Target::Serial => {
                let Some(port) = SerialPort::from_offset(offset) else {
                    return ignored(IgnoreReason::NoSuchOutput);
                };
                self.outputs.write_serial(port, &frame.payload).await;
                Dispatch::Serial {
                    port,
                    len: frame.payload.len(),
                }
            }

            Target::Infrared => {
                let Some(port) = IrPort::from_offset(offset) else {
                    return ignored(IgnoreReason::NoSuchOutput);
                };
                let Some(code) = first else {
                    return ignored(IgnoreReason::EmptyPayload);
                };
                let result = self.outputs.play_ir(port, code).await;
                Dispatch::Infrared { port, code, result }
            }

            Target::Bus => {
                self.outputs.write_bus(&frame.payload).await;
                Dispatch::Bus {
                    len: frame.payload.len(),
                }
            }
        }
    }

    /// Report a new value on `channel` to the network peer and the bus
    pub async fn publish_status(&self, channel: u8, value: u8) {
        let frame = Frame::status(self.device_id, channel, value);
        let mut buffer = [0u8; FRAME_OVERHEAD + 1];
        let Ok(len) = frame.encode(&mut buffer) else {
            return;
        };
        self.outputs.send_network(&buffer[..len]).await;
        self.outputs.send_bus_frame(&buffer[..len]).await;
    }

    /// Report that GPIO input `number` (1-based) went low
    pub async fn report_input(&self, number: u8) {
        self.publish_status(GPIO_BASE + number, 0).await;
    }
}
