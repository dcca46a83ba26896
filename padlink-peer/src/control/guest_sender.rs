use crate::control::pad_source::{ControlToggle, InputKind, InputSampler};
use crate::transport::{ChannelState, ControlChannel, SessionTransport};
use padlink_core::ControlMessage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct SenderConfig {
    pub period: Duration,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SenderStats {
    pub ticks: u64,
    pub sent: u64,
    pub skipped_disabled: u64,
    pub skipped_not_open: u64,
    pub send_failures: u64,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Sent(InputKind),
    Disabled,
    NotOpen,
    SendFailed,
    /// The channel is closed for good; the loop stops.
    Closed,
}

/// Guest side of the control channel: sample the input every period and send it.
pub struct GuestSender {
    transport: Arc<dyn SessionTransport>,
    input: InputSampler,
    toggle: ControlToggle,
    config: SenderConfig,
    stats: SenderStats,
}

impl GuestSender {
    pub fn new(transport: Arc<dyn SessionTransport>, input: InputSampler, toggle: ControlToggle) -> Self {
        Self {
            transport,
            input,
            toggle,
            config: SenderConfig::default(),
            stats: SenderStats::default(),
        }
    }

    pub fn with_config(mut self, config: SenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stats(&self) -> SenderStats {
        self.stats
    }

    pub async fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;

        let channel = self.transport.control_channel().await;
        let state = channel.as_ref().map(|c| c.state());

        if state == Some(ChannelState::Closed) {
            return TickOutcome::Closed;
        }

        if !self.toggle.is_enabled() {
            self.stats.skipped_disabled += 1;
            return TickOutcome::Disabled;
        }

        let Some(channel) = channel.filter(|_| state == Some(ChannelState::Open)) else {
            self.stats.skipped_not_open += 1;
            return TickOutcome::NotOpen;
        };

        let (sample, kind) = self.input.sample();
        let text = match ControlMessage::Pad(sample).encode() {
            Ok(text) => text,
            Err(e) => {
                self.stats.send_failures += 1;
                warn!("Failed to encode control sample: {}", e);
                return TickOutcome::SendFailed;
            }
        };

        // A dropped sample is replaced by the next tick's.
        if let Err(e) = channel.send_text(text).await {
            self.stats.send_failures += 1;
            debug!("Control send failed: {}", e);
            return TickOutcome::SendFailed;
        }

        self.stats.sent += 1;
        TickOutcome::Sent(kind)
    }

    /// Tick every period until the channel closes or `shutdown` becomes `true`.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> SenderStats {
        info!("Guest send loop started ({:?} period)", self.config.period);

        let mut interval = tokio::time::interval(self.config.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut shutdown_open = true;

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = interval.tick() => {
                    if self.tick().await == TickOutcome::Closed {
                        info!("Control channel closed");
                        break;
                    }
                }

                changed = shutdown.changed(), if shutdown_open => {
                    if changed.is_err() {
                        shutdown_open = false;
                    }
                }
            }
        }

        info!("Guest send loop finished: {:?}", self.stats);
        self.stats
    }
}
