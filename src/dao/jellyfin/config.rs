/// Connection settings for the Jellyfin server. Both values may be blank, in which
/// case every client call fails with [`super::JellyfinError::NotConfigured`].
#[derive(Debug, Clone, Default)]
pub struct JellyfinConfig {
    pub base_url: String,
    pub api_key: String,
}

impl JellyfinConfig {
    /// Construct a configuration from explicit values.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Base URL without trailing slashes.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Whether both the base URL and the API key are present.
    pub fn is_complete(&self) -> bool {
        !self.normalized_base_url().is_empty() && !self.api_key.trim().is_empty()
    }
}
