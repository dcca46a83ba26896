use async_trait::async_trait;
use padlink_core::{HostKey, JoinKey, RoomCredentials, RoomId, SessionDescription, SignalingError};

/// The room blob store the negotiators talk to.
///
/// Every method is a single remote call with no retry of its own. A description that has not been
/// published yet comes back as `Ok(None)`.
#[async_trait]
pub trait SignalingClient: Send + Sync {
    async fn create_room(&self) -> Result<RoomCredentials, SignalingError>;

    async fn publish_offer(
        &self,
        room_id: &RoomId,
        host_key: &HostKey,
        offer: &SessionDescription,
    ) -> Result<(), SignalingError>;

    async fn fetch_offer(&self, room_id: &RoomId) -> Result<Option<SessionDescription>, SignalingError>;

    async fn publish_answer(
        &self,
        room_id: &RoomId,
        join_key: &JoinKey,
        answer: &SessionDescription,
    ) -> Result<(), SignalingError>;

    async fn fetch_answer(&self, room_id: &RoomId) -> Result<Option<SessionDescription>, SignalingError>;
}
