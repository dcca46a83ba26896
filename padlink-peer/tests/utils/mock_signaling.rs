use async_trait::async_trait;
use padlink_core::{
    HostKey, JoinKey, RoomCredentials, RoomId, SessionDescription, SignalingError,
};
use padlink_peer::SignalingClient;
use std::sync::{Arc, Mutex};

use crate::utils::Journal;

#[derive(Default)]
struct Room {
    offer: Option<SessionDescription>,
    answer: Option<SessionDescription>,
}

#[derive(Default)]
struct Script {
    fail_create: bool,
    failing_fetches: u32,
}

/// In-memory room store with fixed credentials. Clones share the same room.
#[derive(Clone)]
pub struct MockSignaling {
    credentials: RoomCredentials,
    room: Arc<Mutex<Room>>,
    script: Arc<Mutex<Script>>,
    journal: Journal,
}

impl MockSignaling {
    /// Room `r1`, host key `hk`, join key `jk`.
    pub fn new(journal: Journal) -> Self {
        Self {
            credentials: RoomCredentials {
                room_id: RoomId::from("r1"),
                host_key: HostKey::from("hk"),
                join_key: JoinKey::from("jk"),
            },
            room: Arc::default(),
            script: Arc::default(),
            journal,
        }
    }

    pub fn credentials(&self) -> &RoomCredentials {
        &self.credentials
    }

    /// Make `create_room` fail as if the backend were down.
    pub fn fail_create(&self) {
        self.script.lock().unwrap().fail_create = true;
    }

    /// Make the next `count` fetches fail as if the backend were down.
    pub fn fail_fetches(&self, count: u32) {
        self.script.lock().unwrap().failing_fetches = count;
    }

    pub fn offer(&self) -> Option<SessionDescription> {
        self.room.lock().unwrap().offer.clone()
    }

    pub fn answer(&self) -> Option<SessionDescription> {
        self.room.lock().unwrap().answer.clone()
    }

    fn check_room(&self, room_id: &RoomId) -> Result<(), SignalingError> {
        if *room_id != self.credentials.room_id {
            return Err(SignalingError::RoomNotFound);
        }
        Ok(())
    }

    fn scripted_fetch_failure(&self) -> Result<(), SignalingError> {
        let mut script = self.script.lock().unwrap();
        if script.failing_fetches > 0 {
            script.failing_fetches -= 1;
            return Err(SignalingError::Unavailable("scripted outage".into()));
        }
        Ok(())
    }
}

fn put_once(slot: &mut Option<SessionDescription>, value: &SessionDescription) -> Result<(), SignalingError> {
    if slot.is_some() {
        return Err(SignalingError::AlreadyPublished);
    }
    *slot = Some(value.clone());
    Ok(())
}

#[async_trait]
impl SignalingClient for MockSignaling {
    async fn create_room(&self) -> Result<RoomCredentials, SignalingError> {
        self.journal.record("signaling:create_room");
        if self.script.lock().unwrap().fail_create {
            return Err(SignalingError::Unavailable("scripted outage".into()));
        }
        Ok(self.credentials.clone())
    }

    async fn publish_offer(
        &self,
        room_id: &RoomId,
        host_key: &HostKey,
        offer: &SessionDescription,
    ) -> Result<(), SignalingError> {
        self.journal.record("signaling:publish_offer");
        self.check_room(room_id)?;
        if *host_key != self.credentials.host_key {
            return Err(SignalingError::Unauthorized);
        }
        put_once(&mut self.room.lock().unwrap().offer, offer)
    }

    async fn fetch_offer(&self, room_id: &RoomId) -> Result<Option<SessionDescription>, SignalingError> {
        self.journal.record("signaling:fetch_offer");
        self.scripted_fetch_failure()?;
        self.check_room(room_id)?;
        Ok(self.offer())
    }

    async fn publish_answer(
        &self,
        room_id: &RoomId,
        join_key: &JoinKey,
        answer: &SessionDescription,
    ) -> Result<(), SignalingError> {
        self.journal.record("signaling:publish_answer");
        self.check_room(room_id)?;
        if *join_key != self.credentials.join_key {
            return Err(SignalingError::Unauthorized);
        }
        put_once(&mut self.room.lock().unwrap().answer, answer)
    }

    async fn fetch_answer(&self, room_id: &RoomId) -> Result<Option<SessionDescription>, SignalingError> {
        self.journal.record("signaling:fetch_answer");
        self.scripted_fetch_failure()?;
        self.check_room(room_id)?;
        Ok(self.answer())
    }
}
