use bytes::Bytes;
use std::sync::Arc;
use webrtc::track::track_remote::TrackRemote;

/// Events the transport emits from its callbacks for whoever drives the session.
pub enum TransportEvent {
    /// Peer connection reached the connected state.
    Connected,

    /// Connectivity was lost but ICE may still recover.
    Interrupted,

    /// Peer connection failed or closed.
    Disconnected,

    /// The control channel is open and ready to carry messages.
    ControlChannelOpen(String),

    /// The control channel closed.
    ControlChannelClosed,

    /// A message arrived on the control channel.
    Message(Bytes),

    /// The remote side attached a media track (guest side).
    RemoteTrack(Arc<TrackRemote>),
}

impl std::fmt::Debug for TransportEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected => write!(f, "Connected"),
            Self::Interrupted => write!(f, "Interrupted"),
            Self::Disconnected => write!(f, "Disconnected"),
            Self::ControlChannelOpen(label) => write!(f, "ControlChannelOpen({label})"),
            Self::ControlChannelClosed => write!(f, "ControlChannelClosed"),
            Self::Message(data) => write!(f, "Message({} bytes)", data.len()),
            Self::RemoteTrack(track) => write!(f, "RemoteTrack({})", track.id()),
        }
    }
}
