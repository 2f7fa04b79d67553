mod client;
mod config;
mod error;
mod models;

use futures::future::BoxFuture;

pub use client::JellyfinClient;
pub use config::JellyfinConfig;
pub use error::{JellyfinError, JellyfinResult};

/// Jellyfin account that can be used to browse libraries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JellyfinUser {
    pub id: String,
    pub name: String,
    pub is_admin: Option<bool>,
}

/// Playback session (device) known to Jellyfin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JellyfinSession {
    pub id: String,
    pub device_name: Option<String>,
    pub client: Option<String>,
    pub user_name: Option<String>,
    pub is_active: Option<bool>,
    pub supports_remote_control: Option<bool>,
    /// Title of the item currently playing on the device.
    pub now_playing: Option<String>,
    pub is_paused: Option<bool>,
}

/// Movie library visible to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JellyfinLibrary {
    pub id: String,
    pub name: String,
}

/// Movie sampled from a library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JellyfinMovie {
    pub item_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: String,
}

/// Operations the application needs from the media server.
pub trait MediaServer: Send + Sync {
    /// All users, sorted by name.
    fn list_users(&self) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinUser>>>;
    /// Sessions carrying an identifier, sorted by device name.
    fn list_sessions(&self) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinSession>>>;
    /// Libraries of the user whose collection type is `movies`, sorted by name.
    fn list_movie_libraries(
        &self,
        user_id: String,
    ) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinLibrary>>>;
    /// Up to `limit` movies in random order, optionally restricted to one library.
    fn sample_movies(
        &self,
        user_id: String,
        limit: u32,
        library_id: Option<String>,
    ) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinMovie>>>;
    /// Start playing `item_id` immediately on the session.
    fn play_item(
        &self,
        session_id: String,
        item_id: String,
    ) -> BoxFuture<'static, JellyfinResult<()>>;
}
