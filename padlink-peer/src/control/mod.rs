mod actuator;
mod apply;
#[cfg(feature = "gamepad")]
mod gamepad;
mod guest_sender;
mod host_receiver;
mod pad_source;

pub use actuator::*;
pub use apply::*;
#[cfg(feature = "gamepad")]
pub use gamepad::*;
pub use guest_sender::*;
pub use host_receiver::*;
pub use pad_source::*;
