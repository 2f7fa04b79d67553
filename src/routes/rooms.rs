use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::room::{
        CandidatesResponse, CastVoteRequest, CreateRoomRequest, GenerateCandidatesRequest,
        OkResponse, ResultsResponse, RoomResponse,
    },
    error::{AppError, ErrorBody},
    routes::extract::ApiJson,
    services::room_service,
    state::SharedState,
};

/// Routes covering room creation, candidates and voting.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/rooms", post(create_room))
        .route("/api/rooms/{id}", get(get_room))
        .route(
            "/api/rooms/{id}/candidates/generate",
            post(generate_candidates),
        )
        .route("/api/rooms/{id}/candidates", get(list_candidates))
        .route("/api/rooms/{id}/votes", post(cast_vote))
        .route("/api/rooms/{id}/results", get(get_results))
}

/// Open a new voting room.
#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room created", body = RoomResponse),
        (status = 400, description = "Missing name or invalid deadline", body = ErrorBody)
    )
)]
pub async fn create_room(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<CreateRoomRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let response = room_service::create_room(&state, payload).await?;
    Ok(Json(response))
}

/// Fetch a room, closing it first if its deadline has passed.
#[utoipa::path(
    get,
    path = "/api/rooms/{id}",
    tag = "rooms",
    params(("id" = String, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Room found", body = RoomResponse),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
pub async fn get_room(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<RoomResponse>, AppError> {
    let response = room_service::get_room(&state, &id).await?;
    Ok(Json(response))
}

/// Draw movies from the media server and add them as candidates.
#[utoipa::path(
    post,
    path = "/api/rooms/{id}/candidates/generate",
    tag = "rooms",
    params(("id" = String, Path, description = "Room identifier")),
    request_body = GenerateCandidatesRequest,
    responses(
        (status = 200, description = "All candidates of the room", body = CandidatesResponse),
        (status = 400, description = "Room not open or userId missing", body = ErrorBody),
        (status = 404, description = "Room not found", body = ErrorBody),
        (status = 500, description = "Media server failure", body = ErrorBody)
    )
)]
pub async fn generate_candidates(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<GenerateCandidatesRequest>,
) -> Result<Json<CandidatesResponse>, AppError> {
    let response = room_service::generate_candidates(&state, &id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{id}/candidates",
    tag = "rooms",
    params(("id" = String, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Candidates in insertion order", body = CandidatesResponse),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
pub async fn list_candidates(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<CandidatesResponse>, AppError> {
    let response = room_service::list_candidates(&state, &id).await?;
    Ok(Json(response))
}

/// Cast or replace a vote.
#[utoipa::path(
    post,
    path = "/api/rooms/{id}/votes",
    tag = "rooms",
    params(("id" = String, Path, description = "Room identifier")),
    request_body = CastVoteRequest,
    responses(
        (status = 200, description = "Vote recorded", body = OkResponse),
        (status = 400, description = "Voting closed, missing field or unknown candidate", body = ErrorBody),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
pub async fn cast_vote(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CastVoteRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let response = room_service::cast_vote(&state, &id, payload).await?;
    Ok(Json(response))
}

/// Live tallies while voting is open.
#[utoipa::path(
    get,
    path = "/api/rooms/{id}/results",
    tag = "rooms",
    params(("id" = String, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Tallies and votes", body = ResultsResponse),
        (status = 400, description = "Voting is closed", body = ErrorBody),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
pub async fn get_results(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ResultsResponse>, AppError> {
    let response = room_service::get_results(&state, &id).await?;
    Ok(Json(response))
}
