use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::config::ConfigResponse, state::SharedState};

#[utoipa::path(
    get,
    path = "/api/config",
    tag = "health",
    responses((status = 200, description = "Which media-server settings are present", body = ConfigResponse))
)]
/// Report whether the media-server credentials are configured.
pub async fn get_config(State(state): State<SharedState>) -> Json<ConfigResponse> {
    Json(ConfigResponse::from(&state.config().jellyfin))
}

pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/api/config", get(get_config))
}
