pub mod negotiation_tests;
pub mod signaling_tests;
pub mod transport_tests;

use std::sync::Arc;
use tracing::Level;
use url::Url;

use padlink_core::{Invite, JoinKey};
use padlink_peer::{GuestNegotiator, HostNegotiator};

use crate::utils::{Journal, MockSignaling, MockTransport};

pub const OFFER_A: &str = "OFFER_A";
pub const ANSWER_B: &str = "ANSWER_B";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn invite_base() -> Url {
    Url::parse("https://play.example/?custom_saves=1").unwrap()
}

/// Host and guest negotiators over a shared mock room, each with its own mock transport.
pub struct MockPair {
    pub journal: Journal,
    pub signaling: MockSignaling,
    pub host_transport: MockTransport,
    pub guest_transport: MockTransport,
}

impl MockPair {
    pub fn new() -> Self {
        let journal = Journal::new();
        Self {
            signaling: MockSignaling::new(journal.clone()),
            host_transport: MockTransport::new("host", OFFER_A, journal.clone()),
            guest_transport: MockTransport::new("guest", ANSWER_B, journal.clone()),
            journal,
        }
    }

    pub fn host(&self) -> HostNegotiator {
        HostNegotiator::new(
            Arc::new(self.signaling.clone()),
            Arc::new(self.host_transport.clone()),
            invite_base(),
        )
    }

    pub fn guest(&self) -> GuestNegotiator {
        self.guest_with_key("jk")
    }

    pub fn guest_with_key(&self, join_key: &str) -> GuestNegotiator {
        let invite = Invite::new(invite_base(), "r1".into(), JoinKey::from(join_key));
        GuestNegotiator::new(
            Arc::new(self.signaling.clone()),
            Arc::new(self.guest_transport.clone()),
            invite,
        )
    }
}
