//! Runtime side of a padlink session: the webrtc transport, the HTTP signaling client, the host and
//! guest negotiators and the control channel driver that runs once they connect.

pub mod control;
pub mod session;
pub mod signaling;
pub mod transport;

pub use control::{
    Actuator, ActuatorError, ApplyReport, ControlToggle, GuestSender, HostReceiver, InputKind,
    InputSampler, NoController, NullActuator, PadSource, ReceiverStats, SenderConfig, SenderStats,
    TickOutcome, VirtualPad, apply_pad_state,
};
#[cfg(feature = "gamepad")]
pub use control::GilrsPadSource;
pub use session::{
    GuestNegotiator, GuestSession, GuestState, HostNegotiator, HostSession, HostState, PollPolicy,
    PollStats,
};
pub use signaling::{HttpSignalingClient, HttpSignalingConfig, SignalingClient};
pub use transport::{
    ChannelState, ControlChannel, DescriptionKind, SessionTransport, TransportConfig, TransportEvent,
    WebRtcTransport,
};
