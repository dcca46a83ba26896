mod http_signaling;
mod signaling_client;

pub use http_signaling::*;
pub use signaling_client::*;
