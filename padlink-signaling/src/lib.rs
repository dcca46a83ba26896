//! Reference room store for padlink signaling: one offer and one answer per room, each written once,
//! served as JSON over HTTP.

mod room_store;
mod router;
mod store_config;

pub use room_store::*;
pub use router::*;
pub use store_config::*;
