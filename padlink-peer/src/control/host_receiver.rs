use crate::control::actuator::Actuator;
use crate::control::apply::{ApplyReport, apply_pad_state};
use crate::transport::TransportEvent;
use padlink_core::{CodecError, ControlMessage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Running totals kept by the [`HostReceiver`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverStats {
    pub applied: u64,
    pub malformed: u64,
    pub unknown_tag: u64,
    pub field_failures: u64,
}

/// Host side of the control channel: decode each inbound message and apply it to the actuator.
pub struct HostReceiver<A> {
    actuator: A,
    stats: ReceiverStats,
}

impl<A: Actuator> HostReceiver<A> {
    pub fn new(actuator: A) -> Self {
        Self {
            actuator,
            stats: ReceiverStats::default(),
        }
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// Consume transport events until the control channel closes or the peer goes away.
    pub async fn run(&mut self, events: &mut mpsc::Receiver<TransportEvent>) -> ReceiverStats {
        info!("Host receive loop started");

        while let Some(event) = events.recv().await {
            match event {
                TransportEvent::Message(data) => {
                    self.handle_message(&data);
                }

                TransportEvent::ControlChannelOpen(label) => {
                    info!("Guest control channel '{}' open", label);
                }

                TransportEvent::Connected => info!("Guest connected"),

                TransportEvent::Interrupted => warn!("Guest connection interrupted, waiting for recovery"),

                TransportEvent::RemoteTrack(track) => {
                    debug!("Ignoring remote track {} on host", track.id());
                }

                TransportEvent::ControlChannelClosed | TransportEvent::Disconnected => {
                    info!("Control session ended ({:?})", event);
                    break;
                }
            }
        }

        info!("Host receive loop finished: {:?}", self.stats);
        self.stats
    }

    /// Decode and apply one payload. Undecodable payloads are counted and dropped.
    pub fn handle_message(&mut self, payload: &[u8]) -> Option<ApplyReport> {
        let message = match ControlMessage::decode(payload) {
            Ok(message) => message,
            Err(CodecError::UnknownTag(tag)) => {
                self.stats.unknown_tag += 1;
                debug!("Dropping control message with unknown tag `{}`", tag);
                return None;
            }
            Err(e @ CodecError::Malformed(_)) => {
                self.stats.malformed += 1;
                debug!("Dropping control message: {}", e);
                return None;
            }
        };

        match message {
            ControlMessage::Pad(state) => {
                let report = apply_pad_state(&mut self.actuator, &state);
                self.stats.applied += 1;
                self.stats.field_failures += report.failures.len() as u64;
                for failure in &report.failures {
                    warn!("Failed to apply {}: {}", failure.field, failure.error);
                }
                Some(report)
            }
        }
    }
}
