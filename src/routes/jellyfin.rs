use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::{
        jellyfin::{
            LibrariesQuery, LibrariesResponse, MoviesQuery, MoviesResponse, PlayItemRequest,
            SessionsResponse, UsersResponse,
        },
        room::OkResponse,
    },
    error::{AppError, ErrorBody},
    routes::extract::{ApiJson, ApiQuery},
    services::jellyfin_service,
    state::SharedState,
};

/// Media-server proxy routes used by the browser's pickers.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/jellyfin/users", get(list_users))
        .route("/api/jellyfin/sessions", get(list_sessions))
        .route("/api/jellyfin/libraries", get(list_libraries))
        .route("/api/jellyfin/movies", get(sample_movies))
        .route("/api/jellyfin/play", post(play_item))
}

#[utoipa::path(
    get,
    path = "/api/jellyfin/users",
    tag = "jellyfin",
    responses(
        (status = 200, description = "Users sorted by name", body = UsersResponse),
        (status = 500, description = "Media server not configured or failing", body = ErrorBody)
    )
)]
pub async fn list_users(State(state): State<SharedState>) -> Result<Json<UsersResponse>, AppError> {
    Ok(Json(jellyfin_service::list_users(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/jellyfin/sessions",
    tag = "jellyfin",
    responses(
        (status = 200, description = "Sessions sorted by device name", body = SessionsResponse),
        (status = 500, description = "Media server not configured or failing", body = ErrorBody)
    )
)]
pub async fn list_sessions(
    State(state): State<SharedState>,
) -> Result<Json<SessionsResponse>, AppError> {
    Ok(Json(jellyfin_service::list_sessions(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/jellyfin/libraries",
    tag = "jellyfin",
    params(LibrariesQuery),
    responses(
        (status = 200, description = "Movie libraries of the user", body = LibrariesResponse),
        (status = 400, description = "Missing userId", body = ErrorBody),
        (status = 500, description = "Media server not configured or failing", body = ErrorBody)
    )
)]
pub async fn list_libraries(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<LibrariesQuery>,
) -> Result<Json<LibrariesResponse>, AppError> {
    Ok(Json(jellyfin_service::list_libraries(&state, query).await?))
}

/// Random movie sample.
#[utoipa::path(
    get,
    path = "/api/jellyfin/movies",
    tag = "jellyfin",
    params(MoviesQuery),
    responses(
        (status = 200, description = "Sampled movies", body = MoviesResponse),
        (status = 400, description = "Missing userId", body = ErrorBody),
        (status = 500, description = "Media server not configured or failing", body = ErrorBody)
    )
)]
pub async fn sample_movies(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<MoviesQuery>,
) -> Result<Json<MoviesResponse>, AppError> {
    Ok(Json(jellyfin_service::sample_movies(&state, query).await?))
}

/// Play an arbitrary item on a session.
#[utoipa::path(
    post,
    path = "/api/jellyfin/play",
    tag = "jellyfin",
    request_body = PlayItemRequest,
    responses(
        (status = 200, description = "Play command accepted", body = OkResponse),
        (status = 400, description = "Missing sessionId or itemId", body = ErrorBody),
        (status = 500, description = "Media server not configured or failing", body = ErrorBody)
    )
)]
pub async fn play_item(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<PlayItemRequest>,
) -> Result<Json<OkResponse>, AppError> {
    Ok(Json(jellyfin_service::play_item(&state, payload).await?))
}
