use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    dao::jellyfin::{JellyfinLibrary, JellyfinMovie, JellyfinSession, JellyfinUser},
    dto::validation::validate_not_blank,
};

const DEFAULT_MOVIE_LIMIT: u32 = 10;

/// Start playback of an arbitrary item on a session.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlayItemRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "Missing sessionId"))]
    pub session_id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "Missing itemId"))]
    pub item_id: String,
}

/// Query string of `GET /api/jellyfin/libraries`.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LibrariesQuery {
    /// User whose movie libraries are listed.
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "Missing userId"))]
    pub user_id: String,
}

/// Query string of `GET /api/jellyfin/movies`.
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MoviesQuery {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "Missing userId"))]
    pub user_id: String,
    /// Number of movies to sample. Falls back to 10 when missing or not a positive integer.
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub library_id: Option<String>,
}

impl MoviesQuery {
    pub fn limit(&self) -> u32 {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_MOVIE_LIMIT)
    }

    pub fn library_id(&self) -> Option<String> {
        self.library_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub is_admin: Option<bool>,
}

impl From<JellyfinUser> for UserDto {
    fn from(user: JellyfinUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            is_admin: user.is_admin,
        }
    }
}

/// Playback target a winner can be sent to.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: String,
    pub device_name: Option<String>,
    pub client: Option<String>,
    pub user_name: Option<String>,
    pub is_active: Option<bool>,
    pub supports_remote_control: Option<bool>,
    pub now_playing: Option<String>,
    pub is_paused: Option<bool>,
}

impl From<JellyfinSession> for SessionDto {
    fn from(session: JellyfinSession) -> Self {
        Self {
            id: session.id,
            device_name: session.device_name,
            client: session.client,
            user_name: session.user_name,
            is_active: session.is_active,
            supports_remote_control: session.supports_remote_control,
            now_playing: session.now_playing,
            is_paused: session.is_paused,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LibraryDto {
    pub id: String,
    pub name: String,
}

impl From<JellyfinLibrary> for LibraryDto {
    fn from(library: JellyfinLibrary) -> Self {
        Self {
            id: library.id,
            name: library.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieDto {
    pub item_id: String,
    pub title: String,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub poster_url: String,
}

impl From<JellyfinMovie> for MovieDto {
    fn from(movie: JellyfinMovie) -> Self {
        Self {
            item_id: movie.item_id,
            title: movie.title,
            year: movie.year,
            runtime_minutes: movie.runtime_minutes,
            poster_url: movie.poster_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<UserDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LibrariesResponse {
    pub libraries: Vec<LibraryDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MoviesResponse {
    pub movies: Vec<MovieDto>,
}
