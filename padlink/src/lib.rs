pub use padlink_core::{ControlMessage, PadState, SessionRole};

pub mod model {
    pub use padlink_core::*;
}

#[cfg(feature = "peer")]
pub mod peer {
    pub use padlink_peer::*;
}

#[cfg(feature = "signaling")]
pub mod signaling {
    pub use padlink_signaling::*;
}
