use async_trait::async_trait;
use padlink_core::{SessionDescription, TransportError};
use std::fmt;
use std::sync::Arc;

/// Which half of the exchange a description belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionKind {
    Offer,
    Answer,
}

impl fmt::Display for DescriptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offer => write!(f, "offer"),
            Self::Answer => write!(f, "answer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closing,
    Closed,
}

/// Reliable ordered channel carrying control messages.
#[async_trait]
pub trait ControlChannel: Send + Sync {
    fn label(&self) -> String;

    fn state(&self) -> ChannelState;

    async fn send_text(&self, text: String) -> Result<(), TransportError>;
}

/// Negotiation and media primitives the session negotiators drive.
///
/// Descriptions are generated with everything attached that the session will ever use, and are only
/// read back once candidate gathering has finished: the exchange is one-shot.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Attach the outbound media tracks (host side).
    async fn attach_media(&self) -> Result<(), TransportError>;

    /// Create the reliable ordered control channel (host side). Must run before `create_offer`.
    async fn create_control_channel(&self) -> Result<Arc<dyn ControlChannel>, TransportError>;

    /// Generate an offer and install it as the local description.
    async fn create_offer(&self) -> Result<(), TransportError>;

    /// Generate an answer to the applied remote offer and install it as the local description.
    async fn create_answer(&self) -> Result<(), TransportError>;

    async fn set_remote_description(
        &self,
        kind: DescriptionKind,
        description: &SessionDescription,
    ) -> Result<(), TransportError>;

    /// Resolve once address-candidate gathering is complete.
    async fn wait_gathering_complete(&self) -> Result<(), TransportError>;

    /// Serialized local description including every gathered candidate.
    async fn local_description(&self) -> Result<SessionDescription, TransportError>;

    /// The control channel, whether created locally or announced by the remote side.
    async fn control_channel(&self) -> Option<Arc<dyn ControlChannel>>;

    async fn close(&self) -> Result<(), TransportError>;
}
