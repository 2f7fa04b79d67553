use serde::Serialize;
use utoipa::ToSchema;

use crate::dao::jellyfin::JellyfinConfig;

/// Which media-server settings are present. Values themselves are never exposed.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigResponse {
    pub jellyfin: JellyfinConfigStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JellyfinConfigStatus {
    pub base_url_set: bool,
    pub api_key_set: bool,
}

impl From<&JellyfinConfig> for ConfigResponse {
    fn from(config: &JellyfinConfig) -> Self {
        Self {
            jellyfin: JellyfinConfigStatus {
                base_url_set: !config.base_url.trim().is_empty(),
                api_key_set: !config.api_key.trim().is_empty(),
            },
        }
    }
}
