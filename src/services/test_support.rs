use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use futures::future::BoxFuture;
use reqwest::StatusCode;
use time::OffsetDateTime;

use crate::{
    config::AppConfig,
    dao::{
        jellyfin::{
            JellyfinError, JellyfinLibrary, JellyfinMovie, JellyfinResult, JellyfinSession,
            JellyfinUser, MediaServer,
        },
        room_store::sqlite::SqliteRoomStore,
    },
    state::{AppState, SharedState},
    util::{ManualClock, parse_timestamp},
};

/// In-process stand-in for Jellyfin that records play commands.
#[derive(Default)]
pub struct FakeMediaServer {
    pub movies: Vec<JellyfinMovie>,
    pub libraries: Vec<JellyfinLibrary>,
    /// Make `play_item` answer like a session Jellyfin does not know.
    pub fail_play: AtomicBool,
    /// Make `sample_movies` answer with a server error.
    pub fail_sample: AtomicBool,
    plays: Mutex<Vec<(String, String)>>,
}

impl FakeMediaServer {
    pub fn with_movies(count: usize) -> Self {
        let movies = (1..=count)
            .map(|n| JellyfinMovie {
                item_id: format!("m{n}"),
                title: format!("Movie {n}"),
                year: Some(2000 + n as i32),
                runtime_minutes: Some(90),
                poster_url: format!("http://media.local/Items/m{n}/Images/Primary?maxHeight=360"),
            })
            .collect();
        Self {
            movies,
            libraries: vec![JellyfinLibrary {
                id: "lib1".into(),
                name: "Films".into(),
            }],
            ..Default::default()
        }
    }

    pub fn set_fail_play(&self, fail: bool) {
        self.fail_play.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_sample(&self, fail: bool) {
        self.fail_sample.store(fail, Ordering::SeqCst);
    }

    pub fn plays(&self) -> Vec<(String, String)> {
        self.plays.lock().unwrap().clone()
    }
}

impl MediaServer for FakeMediaServer {
    fn list_users(&self) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinUser>>> {
        Box::pin(async {
            Ok(vec![JellyfinUser {
                id: "u1".into(),
                name: "alice".into(),
                is_admin: Some(true),
            }])
        })
    }

    fn list_sessions(&self) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinSession>>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn list_movie_libraries(
        &self,
        _user_id: String,
    ) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinLibrary>>> {
        let libraries = self.libraries.clone();
        Box::pin(async move { Ok(libraries) })
    }

    fn sample_movies(
        &self,
        _user_id: String,
        limit: u32,
        _library_id: Option<String>,
    ) -> BoxFuture<'static, JellyfinResult<Vec<JellyfinMovie>>> {
        if self.fail_sample.load(Ordering::SeqCst) {
            return Box::pin(async {
                Err(upstream("/Users/u1/Items", StatusCode::INTERNAL_SERVER_ERROR, "boom"))
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
            let path = format!("/Sessions/{session_id}/Playing");
            return Box::pin(async move {
                Err(upstream(&path, StatusCode::NOT_FOUND, "session not found"))
            });
        }
        self.plays.lock().unwrap().push((session_id, item_id));
        Box::pin(async { Ok(()) })
    }
}

fn upstream(path: &str, status: StatusCode, body: &str) -> JellyfinError {
    JellyfinError::Upstream {
        path: path.into(),
        status,
        body: body.into(),
    }
}

pub struct Harness {
    pub state: SharedState,
    pub clock: Arc<ManualClock>,
    pub media: Arc<FakeMediaServer>,
}

pub fn start_time() -> OffsetDateTime {
    parse_timestamp("2024-05-01T18:00:00Z").unwrap()
}

/// Fresh in-memory store, fake media server and a clock frozen at [`start_time`].
pub async fn harness(media: FakeMediaServer) -> Harness {
    let store = SqliteRoomStore::in_memory().await.unwrap();
    let clock = Arc::new(ManualClock::new(start_time()));
    let media = Arc::new(media);
    let state = AppState::with_clock(
        Arc::new(store),
        media.clone(),
        AppConfig::default(),
        clock.clone(),
    );
    Harness {
        state,
        clock,
        media,
    }
}
