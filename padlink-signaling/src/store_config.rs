use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long a room lives after creation.
    pub room_ttl: Duration,
    /// How often expired rooms are swept out of memory.
    pub purge_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            room_ttl: Duration::from_secs(900),
            purge_interval: Duration::from_secs(60),
        }
    }
}

impl StoreConfig {
    pub fn with_room_ttl(mut self, ttl: Duration) -> Self {
        self.room_ttl = ttl;
        self
    }
}
