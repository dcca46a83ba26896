use crate::store_config::StoreConfig;
use dashmap::DashMap;
use padlink_core::{HostKey, JoinKey, RoomCredentials, RoomId, SessionDescription};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("room not found")]
    RoomNotFound,

    #[error("invalid key for this room")]
    InvalidKey,

    #[error("already published")]
    AlreadyPublished,
}

const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

struct RoomRecord {
    host_key: HostKey,
    join_key: JoinKey,
    offer: Option<SessionDescription>,
    answer: Option<SessionDescription>,
    expires_at: Instant,
}

impl RoomRecord {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory rooms keyed by id. Expired rooms read as missing until the sweeper drops them.
pub struct RoomStore {
    rooms: DashMap<RoomId, RoomRecord>,
    config: StoreConfig,
}

impl RoomStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            rooms: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn create_room(&self) -> RoomCredentials {
        let credentials = RoomCredentials {
            room_id: RoomId(Uuid::new_v4().simple().to_string()),
            host_key: HostKey(Uuid::new_v4().simple().to_string()),
            join_key: JoinKey(Uuid::new_v4().simple().to_string()),
        };

        self.rooms.insert(
            credentials.room_id.clone(),
            RoomRecord {
                host_key: credentials.host_key.clone(),
                join_key: credentials.join_key.clone(),
                offer: None,
                answer: None,
                expires_at: self.expiry_from(Instant::now()),
            },
        );

        info!("Created room {}", credentials.room_id);
        credentials
    }

    // A TTL past what `Instant` can represent means the room never expires.
    fn expiry_from(&self, now: Instant) -> Instant {
        now.checked_add(self.config.room_ttl)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now)
    }

    pub fn publish_offer(
        &self,
        room_id: &RoomId,
        host_key: &HostKey,
        offer: SessionDescription,
    ) -> Result<(), StoreError> {
        self.write_once(room_id, |room| {
            if room.host_key != *host_key {
                return Err(StoreError::InvalidKey);
            }
            put_once(&mut room.offer, offer)
        })?;
        debug!("Offer stored for room {}", room_id);
        Ok(())
    }

    pub fn publish_answer(
        &self,
        room_id: &RoomId,
        join_key: &JoinKey,
        answer: SessionDescription,
    ) -> Result<(), StoreError> {
        self.write_once(room_id, |room| {
            if room.join_key != *join_key {
                return Err(StoreError::InvalidKey);
            }
            put_once(&mut room.answer, answer)
        })?;
        debug!("Answer stored for room {}", room_id);
        Ok(())
    }

    /// `None` both for rooms without an offer yet and for unknown or expired rooms.
    pub fn offer(&self, room_id: &RoomId) -> Option<SessionDescription> {
        self.read(room_id, |room| room.offer.clone())
    }

    pub fn answer(&self, room_id: &RoomId) -> Option<SessionDescription> {
        self.read(room_id, |room| room.answer.clone())
    }

    /// Drop every expired room; returns how many went.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.rooms.len();
        self.rooms.retain(|_, room| !room.is_expired(now));
        before.saturating_sub(self.rooms.len())
    }

    fn read<T>(&self, room_id: &RoomId, f: impl FnOnce(&RoomRecord) -> Option<T>) -> Option<T> {
        let room = self.rooms.get(room_id)?;
        if room.is_expired(Instant::now()) {
            return None;
        }
        f(&room)
    }

    fn write_once(
        &self,
        room_id: &RoomId,
        f: impl FnOnce(&mut RoomRecord) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let mut room = self.rooms.get_mut(room_id).ok_or(StoreError::RoomNotFound)?;
        if room.is_expired(Instant::now()) {
            return Err(StoreError::RoomNotFound);
        }
        f(&mut room)
    }
}

fn put_once(slot: &mut Option<SessionDescription>, value: SessionDescription) -> Result<(), StoreError> {
    if slot.is_some() {
        return Err(StoreError::AlreadyPublished);
    }
    *slot = Some(value);
    Ok(())
}

/// Periodically sweep expired rooms until the store is dropped everywhere else.
pub fn spawn_expiry_task(store: &Arc<RoomStore>) -> tokio::task::JoinHandle<()> {
    let weak = Arc::downgrade(store);
    let period = store.config.purge_interval;

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let Some(store) = weak.upgrade() else {
                break;
            };
            let purged = store.purge_expired();
            if purged > 0 {
                info!("Purged {} expired rooms", purged);
            }
        }
    })
}
