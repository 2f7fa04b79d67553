use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState, util::format_timestamp};

/// Respond with the server time while logging storage connectivity issues.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if let Err(err) = state.store().health_check().await {
        warn!(error = %err, "storage health check failed");
    }

    HealthResponse::ok(format_timestamp(state.now()))
}
