use std::sync::Arc;

use time::OffsetDateTime;

use crate::{
    config::AppConfig,
    dao::{jellyfin::MediaServer, room_store::RoomStore},
    util::{Clock, SystemClock},
};

pub type SharedState = Arc<AppState>;

/// Central application state: persistence, media server and configuration handles.
pub struct AppState {
    store: Arc<dyn RoomStore>,
    media: Arc<dyn MediaServer>,
    config: AppConfig,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        store: Arc<dyn RoomStore>,
        media: Arc<dyn MediaServer>,
        config: AppConfig,
    ) -> SharedState {
        Self::with_clock(store, media, config, Arc::new(SystemClock))
    }

    /// Same as [`AppState::new`] with an explicit time source.
    pub fn with_clock(
        store: Arc<dyn RoomStore>,
        media: Arc<dyn MediaServer>,
        config: AppConfig,
        clock: Arc<dyn Clock>,
    ) -> SharedState {
        Arc::new(Self {
            store,
            media,
            config,
            clock,
        })
    }

    /// Room, candidate and vote persistence.
    pub fn store(&self) -> &dyn RoomStore {
        self.store.as_ref()
    }

    /// Media-server client used to sample movies and start playback.
    pub fn media(&self) -> &dyn MediaServer {
        self.media.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current time according to the configured clock.
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }
}
