use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{
    JellyfinLibrary, JellyfinMovie, JellyfinSession, JellyfinUser, MediaServer,
    config::JellyfinConfig,
    error::{JellyfinError, JellyfinResult},
    models::{
        ItemsEnvelope, RawMovie, RawSession, RawUser, RawView, movie_libraries_by_name,
        sessions_by_device, users_by_name,
    },
};

const TOKEN_HEADER: &str = "X-Emby-Token";
const MOVIE_FIELDS: &str = "PrimaryImageAspectRatio,ProductionYear,RunTimeTicks";

/// Jellyfin REST client authenticating with an API key.
#[derive(Clone)]
pub struct JellyfinClient {
    client: Client,
    config: Arc<JellyfinConfig>,
}

impl JellyfinClient {
    /// Build a client. Missing credentials are only reported when a call is made.
    pub fn new(config: JellyfinConfig) -> JellyfinResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| JellyfinError::ClientBuilder { source })?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> JellyfinResult<Url> {
        if !self.config.is_complete() {
            return Err(JellyfinError::NotConfigured);
        }

        let base_url = self.config.normalized_base_url();
        let invalid = || JellyfinError::InvalidBaseUrl {
            base_url: base_url.to_string(),
        };
        let mut url = Url::parse(base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T>(&self, segments: &[&str], query: &[(&str, String)]) -> JellyfinResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        debug!(%path, "GET Jellyfin");

        let response = self
            .client
            .get(url)
            .header(TOKEN_HEADER, self.config.api_key.trim())
            .query(query)
            .send()
            .await
            .map_err(|source| JellyfinError::RequestSend {
                path: path.clone(),
                source,
            })?;

        let body = read_success(&path, response).await?;
        serde_json::from_str(&body).map_err(|source| JellyfinError::Decode { path, source })
    }

    async fn post_empty(&self, segments: &[&str], query: &[(&str, String)]) -> JellyfinResult<()> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        debug!(%path, "POST Jellyfin");

        let response = self
            .client
            .post(url)
            .header(TOKEN_HEADER, self.config.api_key.trim())
            .query(query)
            .send()
            .await
            .map_err(|source| JellyfinError::RequestSend {
                path: path.clone(),
                source,
            })?;

        read_success(&path, response).await.map(|_| ())
    }

    async fn fetch_users(&self) -> JellyfinResult<Vec<JellyfinUser>> {
        let raw: Vec<RawUser> = self.get_json(&["Users"], &[]).await?;
        Ok(users_by_name(raw))
    }

    async fn fetch_sessions(&self) -> JellyfinResult<Vec<JellyfinSession>> {
        let raw: Vec<RawSession> = self.get_json(&["Sessions"], &[]).await?;
        Ok(sessions_by_device(raw))
    }

    async fn fetch_movie_libraries(&self, user_id: &str) -> JellyfinResult<Vec<JellyfinLibrary>> {
        let envelope: ItemsEnvelope<RawView> =
            self.get_json(&["Users", user_id, "Views"], &[]).await?;
        Ok(movie_libraries_by_name(envelope.items))
    }

    async fn fetch_movies(
        &self,
        user_id: &str,
        limit: u32,
        library_id: Option<&str>,
    ) -> JellyfinResult<Vec<JellyfinMovie>> {
        let mut query = vec![
            ("IncludeItemTypes", "Movie".to_string()),
            ("Recursive", "true".to_string()),
            ("Limit", limit.to_string()),
            ("Fields", MOVIE_FIELDS.to_string()),
            ("SortBy", "Random".to_string()),
        ];
        if let Some(library_id) = library_id {
            query.push(("ParentId", library_id.to_string()));
        }

        let envelope: ItemsEnvelope<RawMovie> =
            self.get_json(&["Users", user_id, "Items"], &query).await?;
        let base_url = self.config.normalized_base_url();
        Ok(envelope
            .items
            .into_iter()
            .map(|movie| movie.into_movie(base_url))
            .collect())
    }

    async fn play_now(&self, session_id: &str, item_id: &str) -> JellyfinResult<()> {
        let query = [
            ("playCommand", "PlayNow".to_string()),
            ("itemIds", item_id.to_string()),
            ("startPositionTicks", "0".to_string()),
        ];
        self.post_empty(&["Sessions", session_id, "Playing"], &query)
            .await
    }
}

/// Return the body of a 2xx response, or an [`JellyfinError::Upstream`] carrying
/// the status and whatever text the server sent back.
async fn read_success(path: &str, response: Response) -> JellyfinResult<String> {
    let status = response.status();
    let body = response.text().await;

    if !status.is_success() {
        let body = body.unwrap_or_default();
        warn!(%path, %status, "Jellyfin returned an error status");
        return Err(JellyfinError::Upstream {
            path: path.to_string(),
            status,
            body,
        });
    }

    body.map_err(|source| JellyfinError::RequestSend {
        path: path.to_string(),
        source,
    })
}

impl MediaServer for JellyfinClient {
    fn list_users(&self) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinUser>>> {
        let client = self.clone();
        Box::pin(async move { client.fetch_users().await })
    }

    fn list_sessions(&self) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinSession>>> {
        let client = self.clone();
        Box::pin(async move { client.fetch_sessions().await })
    }

    fn list_movie_libraries(
        &self,
        user_id: String,
    ) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinLibrary>>> {
        let client = self.clone();
        Box::pin(async move { client.fetch_movie_libraries(&user_id).await })
    }

    fn sample_movies(
        &self,
        user_id: String,
        limit: u32,
        library_id: Option<String>,
    ) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinMovie>>> {
        let client = self.clone();
        Box::pin(async move {
            client
                .fetch_movies(&user_id, limit, library_id.as_deref())
                .await
        })
    }

    fn play_item(
        &self,
        session_id: String,
        item_id: String,
    ) -> BoxFuture<'static, JellyfinResult<()>> {
        let client = self.clone();
        Box::pin(async move { client.play_now(&session_id, &item_id).await })
    }
}
