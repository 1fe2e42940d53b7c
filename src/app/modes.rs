//! Session status and user-facing notice types.
//!
//! # State Machine
//!
//! ```text
//! Idle ──▶ Loading ──▶ Success | Empty | Error
//!            ▲                    │
//!            └────── next intent ─┘
//! ```
//!
//! There is no terminal state. A missing API key returns a search to `Idle`
//! rather than entering `Error`, which is reserved for transport failures.
//!
//! # Example
//!
//! ```rust
//! use gifseek::app::modes::{Notice, SessionStatus};
//!
//! let status = SessionStatus::Loading;
//! assert!(status.is_loading());
//! assert!(Notice::NoResults { query: "x".into() }.message().contains("x"));
//! ```

pub use crate::domain::SortMode;

/// Lifecycle status of the search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No search has run yet, or the session was reset.
    #[default]
    Idle,

    /// A page request is in flight.
    ///
    /// "Load more" is rejected in this state.
    Loading,

    /// The last page arrived and the session has results to show.
    Success,

    /// A fresh search returned no results.
    Empty,

    /// The last page request failed.
    Error,
}

impl SessionStatus {
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Message surfaced to the user alongside the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The submitted query was blank after trimming.
    EnterQuery,

    /// No API key could be resolved; the request was not sent.
    NeedsCredential,

    /// A fresh search came back empty.
    NoResults {
        /// The query that produced no results.
        query: String,
    },

    /// The page request failed. Details stay in the logs.
    FetchFailed,
}

impl Notice {
    /// Display text for the notice.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::EnterQuery => {
                "Type a search and press Enter (or use the quick search).".to_string()
            }
            Self::NeedsCredential => {
                "No GIPHY API key found. Open Settings to add one, or set GIFSEEK_API_KEY at build time."
                    .to_string()
            }
            Self::NoResults { query } => {
                format!("No results for \u{201c}{query}\u{201d}. Try another keyword.")
            }
            Self::FetchFailed => {
                "Something went wrong fetching results. Please try again.".to_string()
            }
        }
    }
}
