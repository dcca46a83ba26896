//! Protocol types shared by both ends of a padlink session: the control-input sample and its wire
//! envelope, room credentials and invite links, the keyboard fallback sampler and the error taxonomy.

pub mod error;
pub mod input;
pub mod model;

pub use error::{
    CodecError, InviteError, NegotiationError, SignalingError, TransportError, UnknownKey,
};
pub use input::{HeldKeys, Key, KeyboardSampler};
pub use model::*;
