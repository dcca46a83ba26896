mod guest;
mod host;
mod poll_policy;

pub use guest::*;
pub use host::*;
pub use poll_policy::*;
