#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use futures::future::BoxFuture;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use movie_night::{
    config::AppConfig,
    dao::{
        jellyfin::{
            JellyfinError, JellyfinLibrary, JellyfinMovie, JellyfinResult, JellyfinSession,
            JellyfinUser, MediaServer,
        },
        room_store::sqlite::SqliteRoomStore,
    },
    routes,
    state::AppState,
    util::{ManualClock, parse_timestamp},
};

/// Media server double returning a fixed catalogue and recording play commands.
#[derive(Default)]
pub struct RecordingMediaServer {
    movies: Vec<JellyfinMovie>,
    plays: Mutex<Vec<(String, String)>>,
    fail_play: AtomicBool,
    fail_sample: AtomicBool,
}

impl RecordingMediaServer {
    pub fn with_catalogue(size: usize) -> Self {
        let movies = (1..=size)
            .map(|n| JellyfinMovie {
                item_id: format!("item-{n}"),
                title: format!("Feature {n:02}"),
                year: Some(1990 + n as i32),
                runtime_minutes: Some(100 + n as i32),
                poster_url: format!("http://media.test/Items/item-{n}/Images/Primary?maxHeight=360"),
            })
            .collect();
        Self {
            movies,
            ..Default::default()
        }
    }

    /// Make play commands fail like an unknown session would.
    pub fn fail_play(&self, fail: bool) {
        self.fail_play.store(fail, Ordering::SeqCst);
    }

    /// Make catalogue sampling fail with a server error.
    pub fn fail_sample(&self, fail: bool) {
        self.fail_sample.store(fail, Ordering::SeqCst);
    }

    pub fn play_count(&self) -> usize {
        self.plays.lock().unwrap().len()
    }
}

impl MediaServer for RecordingMediaServer {
    fn list_users(&self) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinUser>>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn list_sessions(&self) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinSession>>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn list_movie_libraries(
        &self,
        _user_id: String,
    ) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinLibrary>>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn sample_movies(
        &self,
        _user_id: String,
        limit: u32,
        _library_id: Option<String>,
    ) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinMovie>>> {
        if self.fail_sample.load(Ordering::SeqCst) {
            return Box::pin(async {
                Err(JellyfinError::Upstream {
                    path: "/Users/u1/Items".into(),
                    status: StatusCode::BAD_GATEWAY,
                    body: "library offline".into(),
                })
            });
        }
        let movies: Vec<_> = self.movies.iter().take(limit as usize).cloned().collect();
        Box::pin(async move { Ok(movies) })
    }

    fn play_item(
        &self,
        session_id: String,
        item_id: String,
    ) -> BoxFuture<'static, JellyfinResult<()>> {
        if self.fail_play.load(Ordering::SeqCst) {
            return Box::pin(async move {
                Err(JellyfinError::Upstream {
                    path: format!("/Sessions/{session_id}/Playing"),
                    status: StatusCode::NOT_FOUND,
                    body: "session not found".into(),
                })
            });
        }
        self.plays.lock().unwrap().push((session_id, item_id));
        Box::pin(async { Ok(()) })
    }
}

pub struct TestApp<M = RecordingMediaServer> {
    pub router: Router,
    pub clock: Arc<ManualClock>,
    pub media: Arc<M>,
}

impl<M: MediaServer + 'static> TestApp<M> {
    pub async fn new(media: M) -> Self {
        Self::with_config(media, AppConfig::default()).await
    }

    pub async fn with_config(media: M, config: AppConfig) -> Self {
        let store = SqliteRoomStore::in_memory().await.unwrap();
        let clock = Arc::new(ManualClock::new(
            parse_timestamp("2024-06-07T19:30:00Z").unwrap(),
        ));
        let media = Arc::new(media);
        let state = AppState::with_clock(Arc::new(store), media.clone(), config, clock.clone());
        Self {
            router: routes::router(state),
            clock,
            media,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}
