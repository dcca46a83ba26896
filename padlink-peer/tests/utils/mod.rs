pub mod journal;
pub mod mock_signaling;

pub use journal::*;
pub use mock_signaling::*;
pub use mock_transport::*;
