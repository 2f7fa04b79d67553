//! Wire shapes of the Jellyfin REST endpoints the client consumes.

use serde::Deserialize;

use crate::util::collate;

use super::{JellyfinLibrary, JellyfinMovie, JellyfinSession, JellyfinUser};

/// Ticks per second in Jellyfin's runtime unit (100 ns).
const TICKS_PER_SECOND: f64 = 10_000_000.0;

/// `GET /Users` entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub policy: Option<RawUserPolicy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawUserPolicy {
    #[serde(default)]
    pub is_administrator: Option<bool>,
}

impl From<RawUser> for JellyfinUser {
    fn from(raw: RawUser) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            is_admin: raw.policy.and_then(|policy| policy.is_administrator),
        }
    }
}

/// `GET /Sessions` entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSession {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub now_playing_item: Option<RawNowPlaying>,
    #[serde(default)]
    pub play_state: Option<RawPlayState>,
    #[serde(default)]
    pub supports_remote_control: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawNowPlaying {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPlayState {
    #[serde(default)]
    pub is_paused: Option<bool>,
}

impl RawSession {
    /// Sessions without an identifier cannot be targeted and are dropped.
    pub fn into_session(self) -> Option<JellyfinSession> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(JellyfinSession {
            id,
            device_name: self.device_name,
            client: self.client,
            user_name: self.user_name,
            is_active: self.is_active,
            supports_remote_control: self.supports_remote_control,
            now_playing: self.now_playing_item.and_then(|item| item.name),
            is_paused: self.play_state.and_then(|state| state.is_paused),
        })
    }
}

/// Users ordered by name.
pub fn users_by_name(raw: Vec<RawUser>) -> Vec<JellyfinUser> {
    let mut users: Vec<JellyfinUser> = raw.into_iter().map(Into::into).collect();
    users.sort_by(|a, b| collate(&a.name, &b.name));
    users
}

/// Targetable sessions ordered by device name; unnamed devices sort first.
pub fn sessions_by_device(raw: Vec<RawSession>) -> Vec<JellyfinSession> {
    let mut sessions: Vec<JellyfinSession> =
        raw.into_iter().filter_map(RawSession::into_session).collect();
    sessions.sort_by(|a, b| {
        collate(
            a.device_name.as_deref().unwrap_or_default(),
            b.device_name.as_deref().unwrap_or_default(),
        )
    });
    sessions
}

/// Movie libraries ordered by name.
pub fn movie_libraries_by_name(views: Vec<RawView>) -> Vec<JellyfinLibrary> {
    let mut libraries: Vec<JellyfinLibrary> = views
        .into_iter()
        .filter(RawView::is_movie_library)
        .map(Into::into)
        .collect();
    libraries.sort_by(|a, b| collate(&a.name, &b.name));
    libraries
}

/// Envelope used by `/Users/{id}/Views` and `/Users/{id}/Items`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// `GET /Users/{id}/Views` entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub collection_type: Option<String>,
}

impl RawView {
    pub fn is_movie_library(&self) -> bool {
        self.collection_type
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("movies"))
    }
}

impl From<RawView> for JellyfinLibrary {
    fn from(raw: RawView) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
        }
    }
}

/// `GET /Users/{id}/Items` movie entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawMovie {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub production_year: Option<i32>,
    #[serde(default)]
    pub run_time_ticks: Option<i64>,
}

impl RawMovie {
    /// Convert to the domain shape, building the poster URL from `base_url`.
    pub fn into_movie(self, base_url: &str) -> JellyfinMovie {
        JellyfinMovie {
            poster_url: format!("{base_url}/Items/{}/Images/Primary?maxHeight=360", self.id),
            runtime_minutes: self.run_time_ticks.map(ticks_to_minutes),
            year: self.production_year,
            item_id: self.id,
            title: self.name,
        }
    }
}

/// Convert Jellyfin ticks to whole minutes, rounding to the nearest minute.
pub fn ticks_to_minutes(ticks: i64) -> i32 {
    (ticks as f64 / TICKS_PER_SECOND / 60.0).round() as i32
}
