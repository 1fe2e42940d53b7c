//! gifseek: an interactive GIF search session controller.
//!
//! gifseek drives a paginated keyword search against the GIPHY search API:
//! - Cursor pagination with a "load more" flow and an estimated "more results" flag
//! - Optional recency ordering applied to each fetched page
//! - API key resolution from an in-process override, a persisted override, or a built-in default
//! - Persistent favorites backed by JSON file storage
//! - A stale-response guard so only the latest search can update the view

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Front end (main.rs, or any embedding UI)           │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Action emission                                  │
//! │  - Snapshot computation                             │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - Snapshot    │   │ - JSON I/O    │   │ - URL build   │
//! │ - Text render │   │ - Favorites   │   │ - HTTP GET    │
//! │               │   │ - Credentials │   │ - Decoding    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data directory (infrastructure/)                 │
//! │  - Error types (domain/error)                       │
//! │  - Items, sort and pagination policies (domain/)    │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing-subscriber with rotating log file        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Session state machine with event/action model
//! - [`domain`]: Core domain types and pure policies
//! - [`infrastructure`]: Data directory resolution
//! - [`storage`]: Key/value persistence, favorites, and credentials
//! - [`worker`]: Fetch worker and HTTP transport
//! - [`ui`]: Render snapshot and text renderer
//! - [`observability`]: Structured logging setup

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, Notice, SessionStatus, SortMode};
pub use domain::{GifseekError, Result};
pub use ui::RenderSnapshot;

use crate::storage::{JsonStorage, MemoryStorage, SharedStorage, BUILD_DEFAULT_API_KEY};
use crate::worker::{SearchWorker, Transport};
use serde::Deserialize;
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

/// Default search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.giphy.com/v1/gifs/search";

/// Default page size.
pub const DEFAULT_LIMIT: u32 = 24;

/// Query used by the quick search shortcut unless configured otherwise.
pub const DEFAULT_QUICK_QUERY: &str = "Tennessee Volunteers football";

/// Runtime configuration.
///
/// Loaded from a TOML file, a string map of overrides (environment
/// variables), or both. Every field has a default.
///
/// # Example
///
/// ```toml
/// endpoint = "https://api.giphy.com/v1/gifs/search"
/// limit = 24
/// enable_sort = true
/// trace_level = "debug"
///
/// [extra_params]
/// rating = "pg"
/// lang = "en"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Search endpoint URL.
    pub endpoint: String,

    /// API key used when no override is set.
    ///
    /// Defaults to the `GIFSEEK_API_KEY` value baked in at build time.
    pub default_api_key: Option<String>,

    /// Page size. Default: 24
    pub limit: u32,

    /// Extra query parameters appended verbatim to every request
    /// (`rating`, `lang`, ...).
    pub extra_params: BTreeMap<String, String>,

    /// Whether favorites are offered. Default: true
    pub enable_favorites: bool,

    /// Whether the sort control is offered. Default: true
    pub enable_sort: bool,

    /// Placeholder tiles while a fresh search loads.
    ///
    /// `None` derives it from the page size; see
    /// [`effective_skeleton_count`](Self::effective_skeleton_count).
    pub skeleton_count: Option<usize>,

    /// Query used by [`Event::QuickSearch`].
    pub quick_query: String,

    /// Storage and log directory. `None` uses
    /// [`get_data_dir`](infrastructure::get_data_dir).
    pub data_dir: Option<PathBuf>,

    /// Log level filter.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any
    /// `EnvFilter` directive. Default: `"info"`
    pub trace_level: Option<String>,

    /// Whole-request timeout for the HTTP client. Off by default.
    pub timeout_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            default_api_key: BUILD_DEFAULT_API_KEY.map(String::from),
            limit: DEFAULT_LIMIT,
            extra_params: BTreeMap::new(),
            enable_favorites: true,
            enable_sort: true,
            skeleton_count: None,
            quick_query: DEFAULT_QUICK_QUERY.to_string(),
            data_dir: None,
            trace_level: None,
            timeout_seconds: None,
        }
    }
}

impl Config {
    /// Parses configuration from TOML. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GifseekError::Config`] on malformed TOML or unknown fields.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| GifseekError::Config(e.to_string()))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`GifseekError::Config`] if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Builds a configuration from a string map over the defaults.
    ///
    /// See [`merge_map`](Self::merge_map) for the accepted keys.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use gifseek::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("GIFSEEK_LIMIT".to_string(), "12".to_string());
    /// map.insert("extra_params".to_string(), "rating=pg,lang=en".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.limit, 12);
    /// assert_eq!(config.extra_params.get("rating").map(String::as_str), Some("pg"));
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().merge_map(map)
    }

    /// Applies string overrides on top of `self`.
    ///
    /// Keys are matched case-insensitively, with an optional `GIFSEEK_`
    /// prefix, so environment variables can be passed straight through.
    ///
    /// # Parsing Rules
    ///
    /// - `endpoint`, `quick_query`, `trace_level`: taken verbatim
    /// - `api_key` / `default_api_key`: taken verbatim, blank clears it
    /// - `limit`, `skeleton_count`, `timeout_seconds`: unsigned integers (ignored on parse error)
    /// - `enable_favorites`, `enable_sort`: `true`/`false`/`1`/`0`/`yes`/`no` (ignored otherwise)
    /// - `extra_params`: comma-separated `key=value` pairs, merged into the existing map
    /// - `data_dir`: path
    #[must_use]
    pub fn merge_map(mut self, map: &BTreeMap<String, String>) -> Self {
        for (raw_key, value) in map {
            let lowered = raw_key.to_ascii_lowercase();
            let key = lowered.strip_prefix("gifseek_").unwrap_or(&lowered);

            match key {
                "endpoint" => self.endpoint.clone_from(value),
                "api_key" | "default_api_key" => {
                    self.default_api_key = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                }
                "limit" => {
                    if let Ok(limit) = value.trim().parse() {
                        self.limit = limit;
                    }
                }
                "skeleton_count" => {
                    if let Ok(count) = value.trim().parse() {
                        self.skeleton_count = Some(count);
                    }
                }
                "timeout_seconds" => {
                    if let Ok(seconds) = value.trim().parse() {
                        self.timeout_seconds = Some(seconds);
                    }
                }
                "enable_favorites" => {
                    if let Some(flag) = parse_flag(value) {
                        self.enable_favorites = flag;
                    }
                }
                "enable_sort" => {
                    if let Some(flag) = parse_flag(value) {
                        self.enable_sort = flag;
                    }
                }
                "extra_params" => {
                    let pairs = value
                        .split(',')
                        .filter_map(|pair| pair.split_once('='))
                        .map(|(k, v)| (k.trim(), v.trim()))
                        .filter(|(k, _)| !k.is_empty());
                    for (k, v) in pairs {
                        self.extra_params.insert(k.to_string(), v.to_string());
                    }
                }
                "quick_query" => self.quick_query.clone_from(value),
                "data_dir" => self.data_dir = Some(PathBuf::from(value)),
                "trace_level" => self.trace_level = Some(value.clone()),
                _ => {}
            }
        }
        self
    }

    /// Collects `GIFSEEK_*` environment variables and applies them.
    #[must_use]
    pub fn merge_env(self) -> Self {
        let map: BTreeMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("GIFSEEK_"))
            .collect();
        self.merge_map(&map)
    }

    /// Checks the values no request could be built from.
    ///
    /// # Errors
    ///
    /// Returns [`GifseekError::Config`] if `limit` is zero or `endpoint` is
    /// empty or not a URL.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(GifseekError::Config("limit must be at least 1".to_string()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(GifseekError::Config("endpoint must not be empty".to_string()));
        }
        url::Url::parse(&self.endpoint)
            .map_err(|e| GifseekError::Config(format!("invalid endpoint {:?}: {e}", self.endpoint)))?;
        Ok(())
    }

    /// Skeleton tile count: the configured value, else the page size clamped to 6..=12.
    #[must_use]
    pub fn effective_skeleton_count(&self) -> usize {
        self.skeleton_count
            .unwrap_or_else(|| usize::try_from(self.limit).unwrap_or(usize::MAX).clamp(6, 12))
    }

    /// The built-in API key, if any.
    #[must_use]
    pub fn embedded_api_key(&self) -> Option<String> {
        self.default_api_key.clone()
    }

    /// The configured data directory, or the platform default.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(infrastructure::get_data_dir)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Creates the application state for `config`.
///
/// Opens `<data_dir>/store.json` as the shared key/value store for favorites
/// and the persisted credential. An unparsable file is moved aside and the
/// store starts empty at the same path. Only when the file cannot be read or
/// created at all does the session fall back to in-memory storage.
///
/// # Example
///
/// ```rust
/// use gifseek::{initialize, Config, SessionStatus};
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = Config {
///     data_dir: Some(dir.path().to_path_buf()),
///     ..Default::default()
/// };
///
/// let state = initialize(&config);
/// assert_eq!(state.session.status, SessionStatus::Idle);
/// ```
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!("initializing gifseek");

    let store_path = config
        .resolved_data_dir()
        .join(infrastructure::STORE_FILE_NAME);

    let storage = match JsonStorage::new(store_path.clone()) {
        Ok(storage) => SharedStorage::new(storage),
        Err(e) => {
            tracing::warn!(
                path = %store_path.display(),
                error = %e,
                "failed to open store, falling back to memory"
            );
            SharedStorage::new(MemoryStorage::default())
        }
    };

    AppState::new(config, storage)
}

/// Handles `event` and runs every fetch it triggers to completion.
///
/// Fetch actions are executed on `worker` and their responses fed back
/// through [`handle_event`] until none remain. Actions the caller must handle
/// itself (such as [`Action::PromptCredential`]) are returned.
///
/// # Errors
///
/// Propagates errors from [`handle_event`].
pub async fn dispatch<T: Transport>(
    state: &mut AppState,
    worker: &SearchWorker<T>,
    event: Event,
) -> Result<(bool, Vec<Action>)> {
    let (mut needs_render, actions) = handle_event(state, event)?;
    let mut queue: VecDeque<Action> = actions.into();
    let mut unhandled = Vec::new();

    while let Some(action) = queue.pop_front() {
        match action {
            Action::Fetch(request) => {
                let response = worker.handle_message(request).await;
                let (render, follow_up) = handle_event(state, Event::WorkerResponse(response))?;
                needs_render |= render;
                queue.extend(follow_up);
            }
            other => unhandled.push(other),
        }
    }

    Ok((needs_render, unhandled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.limit, 24);
        assert!(config.enable_favorites);
        assert!(config.enable_sort);
        assert_eq!(config.effective_skeleton_count(), 12);
        assert_eq!(config.quick_query, DEFAULT_QUICK_QUERY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn skeleton_count_clamps_to_limit() {
        let small = Config {
            limit: 2,
            ..Config::default()
        };
        assert_eq!(small.effective_skeleton_count(), 6);
        let explicit = Config {
            skeleton_count: Some(3),
            ..Config::default()
        };
        assert_eq!(explicit.effective_skeleton_count(), 3);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = Config::from_toml_str(
            r#"
            limit = 10
            enable_sort = false
            timeout_seconds = 5

            [extra_params]
            rating = "pg"
            "#,
        )
        .unwrap();
        assert_eq!(config.limit, 10);
        assert!(!config.enable_sort);
        assert!(config.enable_favorites);
        assert_eq!(config.timeout_seconds, Some(5));
        assert_eq!(config.extra_params.get("rating").map(String::as_str), Some("pg"));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn toml_rejects_unknown_fields() {
        let err = Config::from_toml_str("scan_depth = 4").unwrap_err();
        assert!(matches!(err, GifseekError::Config(_)));
    }

    #[test]
    fn map_parsing_is_lenient() {
        let map: BTreeMap<String, String> = [
            ("GIFSEEK_LIMIT", "not a number"),
            ("enable_favorites", "no"),
            ("ENABLE_SORT", "maybe"),
            ("gifseek_api_key", "  "),
            ("skeleton_count", "4"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::from_map(&map);
        assert_eq!(config.limit, 24);
        assert!(!config.enable_favorites);
        assert!(config.enable_sort);
        assert_eq!(config.default_api_key, None);
        assert_eq!(config.skeleton_count, Some(4));
    }

    #[test]
    fn validate_rejects_unusable_values() {
        let zero = Config {
            limit: 0,
            ..Config::default()
        };
        assert!(zero.validate().is_err());

        let blank = Config {
            endpoint: " ".into(),
            ..Config::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn initialize_persists_to_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: Some(dir.path().to_path_buf()),
            default_api_key: None,
            ..Config::default()
        };

        let mut state = initialize(&config);
        handle_event(&mut state, Event::SetCredentialOverride("saved".into())).unwrap();
        drop(state);

        let state = initialize(&config);
        assert_eq!(state.credentials.resolve().api_key(), Some("saved"));
        assert!(dir.path().join(infrastructure::STORE_FILE_NAME).exists());
    }

    #[test]
    fn corrupt_store_recovers_and_keeps_persisting() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(infrastructure::STORE_FILE_NAME), "{garbage").unwrap();
        let config = Config {
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };

        let mut state = initialize(&config);
        assert!(state.favorites.list().is_empty());
        let entry = domain::FavoriteEntry::new("a", "https://giphy.com/gifs/a", "A");
        handle_event(&mut state, Event::ToggleFavorite(entry)).unwrap();
        drop(state);

        let state = initialize(&config);
        assert!(state.favorites.is_favorite("a"));
    }
}
