mod control_message;
mod description;
mod invite;
mod pad_state;
mod role;
mod room;

pub use control_message::{ControlMessage, PAD_TAG};
pub use description::SessionDescription;
pub use invite::{Invite, Launch};
pub use pad_state::{AXIS_COUNT, BUTTON_COUNT, ButtonState, PadState, clamp_axis, clamp_button};
pub use role::SessionRole;
pub use room::{HostKey, JoinKey, RoomCredentials, RoomId};
