use std::sync::Arc;

use spotbook_core::{Clock, SpotId};
use tokio::time::Duration;

use crate::{
    auth::Sessions,
    cache::{self, Cache},
    locks::SpotLocks,
    store::Store,
};

pub type SharedState = Arc<AppState>;

pub struct Config {
    pub cache: cache::Config,
    pub session_ttl: Duration,
    /// bcrypt work factor for new password hashes.
    pub hash_cost: u32,
}

pub struct AppState {
    pub store: Store,
    pub sessions: Sessions,
    pub spot_locks: SpotLocks,
    pub calendars: Arc<Cache<SpotId, String>>,
    pub clock: Arc<dyn Clock>,
    pub hash_cost: u32,
}

impl AppState {
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> SharedState {
        Arc::new(Self {
            store: Store::default(),
            sessions: Sessions::new(config.session_ttl),
            spot_locks: SpotLocks::default(),
            calendars: Cache::new(config.cache),
            clock,
            hash_cost: config.hash_cost,
        })
    }
}
