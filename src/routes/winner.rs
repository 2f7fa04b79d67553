use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::room::{PlayWinnerRequest, PlayWinnerResponse, RoomResponse, WinnerResponse},
    error::{AppError, ErrorBody},
    routes::extract::ApiJson,
    services::winner_service,
    state::SharedState,
};

/// Routes deciding and playing the outcome of a room.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/rooms/{id}/winner", get(get_winner))
        .route("/api/rooms/{id}/playWinner", post(play_winner))
        .route("/api/rooms/{id}/close", post(close_room))
}

/// Tallies plus the winner once the room is closed.
#[utoipa::path(
    get,
    path = "/api/rooms/{id}/winner",
    tag = "winner",
    params(("id" = String, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Winner (null while open) and tallies", body = WinnerResponse),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
pub async fn get_winner(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<WinnerResponse>, AppError> {
    let response = winner_service::get_winner(&state, &id).await?;
    Ok(Json(response))
}

/// Start the winner on a playback session, at most once per room.
#[utoipa::path(
    post,
    path = "/api/rooms/{id}/playWinner",
    tag = "winner",
    params(("id" = String, Path, description = "Room identifier")),
    request_body = PlayWinnerRequest,
    responses(
        (status = 200, description = "Playback started or already started", body = PlayWinnerResponse),
        (status = 400, description = "Missing sessionId, room still open or no winner", body = ErrorBody),
        (status = 404, description = "Room not found", body = ErrorBody),
        (status = 500, description = "Media server failure", body = ErrorBody)
    )
)]
pub async fn play_winner(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<PlayWinnerRequest>,
) -> Result<Json<PlayWinnerResponse>, AppError> {
    let response = winner_service::play_winner(&state, &id, payload).await?;
    Ok(Json(response))
}

/// Close voting immediately.
#[utoipa::path(
    post,
    path = "/api/rooms/{id}/close",
    tag = "winner",
    params(("id" = String, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Room closed", body = RoomResponse),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
pub async fn close_room(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<RoomResponse>, AppError> {
    let response = winner_service::close_room(&state, &id).await?;
    Ok(Json(response))
}
