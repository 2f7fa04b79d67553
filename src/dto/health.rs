use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/health` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok" while the process is serving requests.
    pub status: String,
    /// Server time, RFC 3339.
    pub time: String,
}

impl HealthResponse {
    /// Create a health response stamped with `time`.
    pub fn ok(time: String) -> Self {
        Self {
            status: "ok".to_string(),
            time,
        }
    }
}
