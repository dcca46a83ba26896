use crate::session::poll_policy::{PollOrder, PollPolicy, PollStats, poll_for_description};
use crate::signaling::SignalingClient;
use crate::transport::{ControlChannel, DescriptionKind, SessionTransport};
use padlink_core::{Invite, NegotiationError, RoomCredentials, RoomId};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use url::Url;

/// Where the host side of the handshake currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum HostState {
    Idle,
    RoomCreated { room_id: RoomId, invite: Url },
    LocalDescriptionReady,
    CandidateGatheringComplete,
    DescriptionPublished,
    PollingForRemote,
    Connected,
    Failed(String),
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::RoomCreated { room_id, .. } => write!(f, "room {room_id} created"),
            Self::LocalDescriptionReady => write!(f, "offer created"),
            Self::CandidateGatheringComplete => write!(f, "candidates gathered"),
            Self::DescriptionPublished => write!(f, "offer published"),
            Self::PollingForRemote => write!(f, "waiting for guest"),
            Self::Connected => write!(f, "connected"),
            Self::Failed(msg) => f.write_str(msg),
        }
    }
}

/// Result of a completed host handshake.
pub struct HostSession {
    pub credentials: RoomCredentials,
    pub invite: Invite,
    /// The channel the guest's control messages arrive on.
    pub control: Arc<dyn ControlChannel>,
    pub poll_stats: PollStats,
}

/// Drives the host half: create the room, publish a complete offer, wait for the answer.
pub struct HostNegotiator {
    signaling: Arc<dyn SignalingClient>,
    transport: Arc<dyn SessionTransport>,
    invite_base: Url,
    poll: PollPolicy,
    state_tx: watch::Sender<HostState>,
    invite_tx: watch::Sender<Option<Invite>>,
}

impl HostNegotiator {
    pub fn new(
        signaling: Arc<dyn SignalingClient>,
        transport: Arc<dyn SessionTransport>,
        invite_base: Url,
    ) -> Self {
        let (state_tx, _) = watch::channel(HostState::Idle);
        let (invite_tx, _) = watch::channel(None);
        Self {
            signaling,
            transport,
            invite_base,
            poll: PollPolicy::default(),
            state_tx,
            invite_tx,
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll = policy;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<HostState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> HostState {
        self.state_tx.borrow().clone()
    }

    /// The invite, set once the room exists and kept for the rest of the negotiation.
    pub fn invite(&self) -> watch::Receiver<Option<Invite>> {
        self.invite_tx.subscribe()
    }

    fn set_state(&self, state: HostState) {
        info!("Host: {}", state);
        self.state_tx.send_replace(state);
    }

    pub async fn run(&self) -> Result<HostSession, NegotiationError> {
        match self.negotiate().await {
            Ok(session) => Ok(session),
            Err(e) => {
                error!("Host negotiation failed: {}", e);
                self.set_state(HostState::Failed(e.status_message()));
                Err(e)
            }
        }
    }

    async fn negotiate(&self) -> Result<HostSession, NegotiationError> {
        let credentials = self.signaling.create_room().await?;
        let invite = Invite::new(
            self.invite_base.clone(),
            credentials.room_id.clone(),
            credentials.join_key.clone(),
        );
        self.set_state(HostState::RoomCreated {
            room_id: credentials.room_id.clone(),
            invite: invite.to_url(),
        });
        self.invite_tx.send_replace(Some(invite.clone()));

        // Everything the session will carry is attached before the offer is generated.
        self.transport.attach_media().await?;
        let control = self.transport.create_control_channel().await?;
        self.transport.create_offer().await?;
        self.set_state(HostState::LocalDescriptionReady);

        self.transport.wait_gathering_complete().await?;
        self.set_state(HostState::CandidateGatheringComplete);

        let offer = self.transport.local_description().await?;
        self.signaling
            .publish_offer(&credentials.room_id, &credentials.host_key, &offer)
            .await?;
        self.set_state(HostState::DescriptionPublished);

        self.set_state(HostState::PollingForRemote);
        let mut poll_stats = PollStats::default();
        let room_id = &credentials.room_id;
        let answer = poll_for_description(
            &self.poll,
            PollOrder::SleepFirst,
            "answer",
            &mut poll_stats,
            || self.signaling.fetch_answer(room_id),
        )
        .await?;

        self.transport
            .set_remote_description(DescriptionKind::Answer, &answer)
            .await?;
        self.set_state(HostState::Connected);

        Ok(HostSession {
            credentials,
            invite,
            control,
            poll_stats,
        })
    }
}
