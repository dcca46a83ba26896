use crate::session::poll_policy::{PollOrder, PollPolicy, PollStats, poll_for_description};
use crate::signaling::SignalingClient;
use crate::transport::{DescriptionKind, SessionTransport};
use padlink_core::{Invite, NegotiationError, RoomId};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq)]
pub enum GuestState {
    Idle,
    PollingForOffer,
    RemoteDescriptionApplied,
    LocalAnswerReady,
    CandidateGatheringComplete,
    DescriptionPublished,
    Connected,
    Failed(String),
}

impl fmt::Display for GuestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::PollingForOffer => write!(f, "waiting for host offer"),
            Self::RemoteDescriptionApplied => write!(f, "offer applied"),
            Self::LocalAnswerReady => write!(f, "answer created"),
            Self::CandidateGatheringComplete => write!(f, "candidates gathered"),
            Self::DescriptionPublished => write!(f, "answer published"),
            Self::Connected => write!(f, "connected"),
            Self::Failed(msg) => f.write_str(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GuestSession {
    pub room_id: RoomId,
    pub poll_stats: PollStats,
}

/// Drives the guest half: wait for the host's offer, answer it once.
///
/// The guest never creates the control channel. It is announced by the host's offer and picked up by
/// the transport, so it is looked up there once the session is running.
pub struct GuestNegotiator {
    signaling: Arc<dyn SignalingClient>,
    transport: Arc<dyn SessionTransport>,
    invite: Invite,
    poll: PollPolicy,
    state_tx: watch::Sender<GuestState>,
}

impl GuestNegotiator {
    pub fn new(
        signaling: Arc<dyn SignalingClient>,
        transport: Arc<dyn SessionTransport>,
        invite: Invite,
    ) -> Self {
        let (state_tx, _) = watch::channel(GuestState::Idle);
        Self {
            signaling,
            transport,
            invite,
            poll: PollPolicy::default(),
            state_tx,
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll = policy;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<GuestState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> GuestState {
        self.state_tx.borrow().clone()
    }

    fn set_state(&self, state: GuestState) {
        info!("Guest: {}", state);
        self.state_tx.send_replace(state);
    }

    pub async fn run(&self) -> Result<GuestSession, NegotiationError> {
        match self.negotiate().await {
            Ok(session) => Ok(session),
            Err(e) => {
                error!("Guest negotiation failed: {}", e);
                self.set_state(GuestState::Failed(e.status_message()));
                Err(e)
            }
        }
    }

    async fn negotiate(&self) -> Result<GuestSession, NegotiationError> {
        let room_id = &self.invite.room_id;

        self.set_state(GuestState::PollingForOffer);
        let mut poll_stats = PollStats::default();
        let offer = poll_for_description(
            &self.poll,
            PollOrder::FetchFirst,
            "offer",
            &mut poll_stats,
            || self.signaling.fetch_offer(room_id),
        )
        .await?;

        self.transport
            .set_remote_description(DescriptionKind::Offer, &offer)
            .await?;
        self.set_state(GuestState::RemoteDescriptionApplied);

        self.transport.create_answer().await?;
        self.set_state(GuestState::LocalAnswerReady);

        self.transport.wait_gathering_complete().await?;
        self.set_state(GuestState::CandidateGatheringComplete);

        let answer = self.transport.local_description().await?;
        self.signaling
            .publish_answer(room_id, &self.invite.join_key, &answer)
            .await?;
        self.set_state(GuestState::DescriptionPublished);

        // Connectivity is reported by the transport itself; there is nothing to wait for here.
        self.set_state(GuestState::Connected);

        Ok(GuestSession {
            room_id: room_id.clone(),
            poll_stats,
        })
    }
}
