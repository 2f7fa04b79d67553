//! Application-level configuration loading: optional JSON file, then environment overrides.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dao::jellyfin::JellyfinConfig;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "MOVIE_NIGHT_CONFIG_PATH";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_PATH: &str = "data.sqlite";
const DEFAULT_ROOM_MINUTES: f64 = 60.0;
const DEFAULT_CANDIDATE_COUNT: u32 = 12;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// TCP port the HTTP server listens on.
    pub port: u16,
    /// Location of the SQLite database file.
    pub db_path: PathBuf,
    /// Jellyfin connection settings.
    pub jellyfin: JellyfinConfig,
    /// Voting window applied when a room is created without `closesAt` or `minutesFromNow`.
    pub default_room_minutes: f64,
    /// Number of candidates generated when the request does not say.
    pub default_candidate_count: u32,
}

impl AppConfig {
    /// Load the configuration file (if any) and apply environment overrides on top.
    pub fn load() -> Self {
        let mut config = Self::from_file();
        config.apply_env(|key| env::var(key).ok());
        config
    }

    fn from_file() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration file");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Override values with the `PORT`, `DB_PATH`, `JELLYFIN_BASE_URL` and
    /// `JELLYFIN_API_KEY` variables when they are set.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("PORT") {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => warn!(value = %raw, "ignoring invalid PORT"),
            }
        }
        if let Some(path) = lookup("DB_PATH").filter(|value| !value.trim().is_empty()) {
            self.db_path = PathBuf::from(path);
        }
        if let Some(base_url) = lookup("JELLYFIN_BASE_URL") {
            self.jellyfin.base_url = base_url;
        }
        if let Some(api_key) = lookup("JELLYFIN_API_KEY") {
            self.jellyfin.api_key = api_key;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            jellyfin: JellyfinConfig::default(),
            default_room_minutes: DEFAULT_ROOM_MINUTES,
            default_candidate_count: DEFAULT_CANDIDATE_COUNT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    port: Option<u16>,
    db_path: Option<String>,
    jellyfin: Option<RawJellyfin>,
    default_room_minutes: Option<f64>,
    default_candidate_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawJellyfin {
    base_url: String,
    api_key: String,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            port: value.port.unwrap_or(defaults.port),
            db_path: value.db_path.map(PathBuf::from).unwrap_or(defaults.db_path),
            jellyfin: value
                .jellyfin
                .map(|raw| JellyfinConfig::new(raw.base_url, raw.api_key))
                .unwrap_or(defaults.jellyfin),
            default_room_minutes: value
                .default_room_minutes
                .filter(|minutes| minutes.is_finite())
                .unwrap_or(defaults.default_room_minutes),
            default_candidate_count: value
                .default_candidate_count
                .unwrap_or(defaults.default_candidate_count),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
