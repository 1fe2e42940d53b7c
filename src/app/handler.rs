//! Event handling and state transition logic.
//!
//! This module implements the search session controller: it takes user
//! intents and worker responses, applies them to [`AppState`], and returns
//! the side effects the runtime must perform.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the front end or from the fetch worker
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `SearchSession` methods and the stores
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Search**: `StartNewSearch`, `QuickSearch`, `SetSort`, `LoadMore`, `Reset`
//! - **Favorites**: `ToggleFavorite`
//! - **Credentials**: `SetCredentialOverride`, `SetSessionCredential`
//! - **Worker**: `WorkerResponse` carrying a fetched page or a failure
//!
//! # Example
//!
//! ```rust
//! use gifseek::app::{handle_event, Action, AppState, Event};
//! use gifseek::storage::{MemoryStorage, SharedStorage};
//! use gifseek::Config;
//!
//! let config = Config { default_api_key: Some("key".into()), ..Config::default() };
//! let mut state = AppState::new(&config, SharedStorage::new(MemoryStorage::default()));
//! let (render, actions) = handle_event(&mut state, Event::StartNewSearch("cats".into()))?;
//! assert!(render);
//! assert!(matches!(actions.as_slice(), [Action::Fetch(_)]));
//! # Ok::<(), gifseek::GifseekError>(())
//! ```

use super::modes::{Notice, SessionStatus, SortMode};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::FavoriteEntry;
use crate::worker::WorkerResponse;

/// Intents from the front end and responses from the fetch worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Starts a fresh search for the given (untrimmed) query.
    StartNewSearch(String),

    /// Starts a fresh search for the configured quick query.
    QuickSearch,

    /// Switches the ordering of incoming pages and re-fetches from the start.
    SetSort(SortMode),

    /// Requests the next page of the current query.
    LoadMore,

    /// Adds or removes a favorite.
    ToggleFavorite(FavoriteEntry),

    /// Saves (or, when blank, removes) the persisted API key override.
    SetCredentialOverride(String),

    /// Sets an API key for the lifetime of this process only.
    SetSessionCredential(String),

    /// Clears the session and returns to the idle home view.
    Reset,

    /// Wraps a response from the fetch worker.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The returned flag says whether the snapshot changed and should be rendered.
///
/// # Errors
///
/// Returns storage errors from favorite toggles and credential saves. Fetch
/// failures are not errors here; they arrive as
/// [`WorkerResponse::FetchFailed`] and become session status.
pub fn handle_event(state: &mut AppState, event: Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(&event)).entered();

    match event {
        Event::StartNewSearch(query) => Ok(start_search(state, &query)),
        Event::QuickSearch => {
            let query = state.quick_query.clone();
            Ok(start_search(state, &query))
        }
        Event::SetSort(mode) => {
            if !state.features.enable_sort {
                tracing::debug!("sorting disabled, ignoring sort change");
                return Ok((false, vec![]));
            }
            if state.session.sort == mode {
                return Ok((false, vec![]));
            }

            state.session.sort = mode;
            tracing::debug!(sort = mode.as_str(), "sort changed");

            if state.session.query.is_empty() {
                return Ok((true, vec![]));
            }
            let query = state.session.query.clone();
            Ok(start_search(state, &query))
        }
        Event::LoadMore => Ok(load_more(state)),
        Event::ToggleFavorite(entry) => {
            if !state.features.enable_favorites {
                tracing::debug!("favorites disabled, ignoring toggle");
                return Ok((false, vec![]));
            }
            let now_favorite = state.favorites.toggle(entry)?;
            tracing::debug!(now_favorite, "favorite toggled");
            Ok((true, vec![]))
        }
        Event::SetCredentialOverride(value) => {
            let stored = state.credentials.save_override(&value)?;
            tracing::info!(stored, "persisted credential override updated");
            Ok((true, vec![]))
        }
        Event::SetSessionCredential(value) => {
            state.credentials.set_session_override(&value);
            Ok((true, vec![]))
        }
        Event::Reset => {
            state.session.reset();
            Ok((true, vec![]))
        }
        Event::WorkerResponse(response) => Ok(apply_response(state, response)),
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::StartNewSearch(_) => "start_new_search",
        Event::QuickSearch => "quick_search",
        Event::SetSort(_) => "set_sort",
        Event::LoadMore => "load_more",
        Event::ToggleFavorite(_) => "toggle_favorite",
        Event::SetCredentialOverride(_) => "set_credential_override",
        Event::SetSessionCredential(_) => "set_session_credential",
        Event::Reset => "reset",
        Event::WorkerResponse(_) => "worker_response",
    }
}

fn start_search(state: &mut AppState, raw_query: &str) -> (bool, Vec<Action>) {
    let query = raw_query.trim();
    if query.is_empty() {
        state.session.notice = Some(Notice::EnterQuery);
        return (true, vec![]);
    }

    state.session.begin_fresh(query.to_string());

    let credential = state.credentials.resolve();
    let Some(api_key) = credential.api_key() else {
        tracing::debug!("no credential available, prompting");
        state.session.status = SessionStatus::Idle;
        state.session.notice = Some(Notice::NeedsCredential);
        return (true, vec![Action::PromptCredential]);
    };

    tracing::debug!(
        query = %state.session.query,
        generation = state.session.generation,
        source = ?credential.source(),
        "starting search"
    );
    let request = state.session.fetch_request(api_key);
    (true, vec![Action::Fetch(request)])
}

fn load_more(state: &mut AppState) -> (bool, Vec<Action>) {
    if state.session.status.is_loading() {
        tracing::debug!("fetch in flight, ignoring load more");
        return (false, vec![]);
    }
    if state.session.query.is_empty() {
        state.session.notice = Some(Notice::EnterQuery);
        return (true, vec![]);
    }

    // Next page exists, or a failed load-more is being retried at the same offset.
    let can_continue = match state.session.status {
        SessionStatus::Success => state.session.has_more,
        SessionStatus::Error => state.session.offset > 0,
        SessionStatus::Idle | SessionStatus::Loading | SessionStatus::Empty => false,
    };
    if !can_continue {
        tracing::debug!(status = ?state.session.status, "no further page, ignoring load more");
        return (false, vec![]);
    }

    let credential = state.credentials.resolve();
    let Some(api_key) = credential.api_key() else {
        state.session.notice = Some(Notice::NeedsCredential);
        return (true, vec![Action::PromptCredential]);
    };

    state.session.begin_append();
    tracing::debug!(offset = state.session.offset, "loading more");
    let request = state.session.fetch_request(api_key);
    (true, vec![Action::Fetch(request)])
}

fn apply_response(state: &mut AppState, response: WorkerResponse) -> (bool, Vec<Action>) {
    let session = &mut state.session;
    if response.generation() != session.generation {
        tracing::debug!(
            response_generation = response.generation(),
            current_generation = session.generation,
            "discarding stale response"
        );
        return (false, vec![]);
    }
    if !session.status.is_loading() {
        tracing::debug!(status = ?session.status, "no fetch pending, discarding response");
        return (false, vec![]);
    }

    match response {
        WorkerResponse::PageFetched { append, batch, .. } => {
            session.apply_page(batch, append);
        }
        WorkerResponse::FetchFailed { message, .. } => {
            tracing::warn!(error = %message, "search request failed");
            session.apply_failure();
        }
    }
    (true, vec![])
}
