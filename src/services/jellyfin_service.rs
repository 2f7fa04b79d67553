//! Thin pass-through to the media server for the browser's pickers.

use tracing::info;
use validator::Validate;

use crate::{
    dto::{
        jellyfin::{
            LibrariesQuery, LibrariesResponse, MoviesQuery, MoviesResponse, PlayItemRequest,
            SessionsResponse, UsersResponse,
        },
        room::OkResponse,
    },
    error::ServiceError,
    state::SharedState,
};

pub async fn list_users(state: &SharedState) -> Result<UsersResponse, ServiceError> {
    let users = state.media().list_users().await?;
    Ok(UsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    })
}

pub async fn list_sessions(state: &SharedState) -> Result<SessionsResponse, ServiceError> {
    let sessions = state.media().list_sessions().await?;
    Ok(SessionsResponse {
        sessions: sessions.into_iter().map(Into::into).collect(),
    })
}

pub async fn list_libraries(
    state: &SharedState,
    query: LibrariesQuery,
) -> Result<LibrariesResponse, ServiceError> {
    query.validate()?;
    let libraries = state
        .media()
        .list_movie_libraries(query.user_id.trim().to_owned())
        .await?;
    Ok(LibrariesResponse {
        libraries: libraries.into_iter().map(Into::into).collect(),
    })
}

/// Random sample of movies, handy to check credentials and library access.
pub async fn sample_movies(
    state: &SharedState,
    query: MoviesQuery,
) -> Result<MoviesResponse, ServiceError> {
    query.validate()?;
    let movies = state
        .media()
        .sample_movies(query.user_id.trim().to_owned(), query.limit(), query.library_id())
        .await?;
    Ok(MoviesResponse {
        movies: movies.into_iter().map(Into::into).collect(),
    })
}

/// Play any item on a session, outside of a room.
pub async fn play_item(
    state: &SharedState,
    request: PlayItemRequest,
) -> Result<OkResponse, ServiceError> {
    request.validate()?;
    let session_id = request.session_id.trim().to_owned();
    let item_id = request.item_id.trim().to_owned();
    state
        .media()
        .play_item(session_id.clone(), item_id.clone())
        .await?;
    info!(%session_id, %item_id, "item sent to playback session");
    Ok(OkResponse::ok())
}
