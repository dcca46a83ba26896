use std::time::Duration;
use thiserror::Error;

/// Failures of a single signaling call.
///
/// An absent offer/answer is not an error; fetches report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("signaling unavailable: {0}")]
    Unavailable(String),

    #[error("capability key rejected")]
    Unauthorized,

    #[error("room not found")]
    RoomNotFound,

    #[error("description already published for this room")]
    AlreadyPublished,
}

/// Local transport setup failed (description, candidates, channel, tracks).
#[derive(Debug, Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Inbound control payload could not be turned into a message.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed control message: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("unknown control message tag `{0}`")]
    UnknownTag(String),
}

#[derive(Debug, Error)]
pub enum InviteError {
    #[error("invalid invite url: {0}")]
    InvalidUrl(#[source] url::ParseError),

    #[error("url is not an invite (missing p2p=join)")]
    NotAnInvite,

    #[error("invite is missing the `{0}` parameter")]
    MissingParam(&'static str),

    #[error("invite url has no usable origin")]
    OpaqueOrigin,
}

/// A key name outside the fallback layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key `{0}`")]
pub struct UnknownKey(pub String);

/// Fatal outcome of a negotiation attempt.
#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error(transparent)]
    Signaling(#[from] SignalingError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("gave up waiting for the remote description after {0:?}")]
    PollTimeout(Duration),

    #[error(transparent)]
    Invite(#[from] InviteError),
}

impl NegotiationError {
    pub fn is_signaling_unavailable(&self) -> bool {
        matches!(self, Self::Signaling(SignalingError::Unavailable(_)))
    }

    /// Status line suitable for showing to the user.
    pub fn status_message(&self) -> String {
        match self {
            Self::Signaling(SignalingError::Unavailable(_)) => {
                "Error: signaling unavailable. Check the signaling server and try again.".to_owned()
            }
            Self::Signaling(SignalingError::Unauthorized) => {
                "Error: the room rejected this key. The invite link may be wrong.".to_owned()
            }
            Self::Signaling(SignalingError::RoomNotFound) => {
                "Error: the room no longer exists. Ask the host for a new invite.".to_owned()
            }
            Self::Signaling(SignalingError::AlreadyPublished) => {
                "Error: someone already answered this invite.".to_owned()
            }
            Self::Transport(e) => format!("Error: could not set up the connection ({})", e.0),
            Self::PollTimeout(_) => "Error: the other side never showed up.".to_owned(),
            Self::Invite(e) => format!("Error: {}", e),
        }
    }
}
