//! Fetch request and response types exchanged with the worker.
//!
//! The session controller never performs I/O itself. It emits a
//! [`FetchRequest`] and later receives the matching [`WorkerResponse`] as an
//! event. Both carry the session generation the request was issued under so
//! the controller can drop responses that a newer search has superseded.

use crate::domain::ResultBatch;
use std::fmt;

/// A single page request produced by the session controller.
#[derive(Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Session generation at the time the request was issued.
    pub generation: u64,

    /// Trimmed, non-empty query text.
    pub query: String,

    /// Page size.
    pub limit: u32,

    /// Number of results already retrieved for this query and sort.
    pub offset: u64,

    /// Whether the page extends the current results or replaces them.
    pub append: bool,

    /// Resolved API key.
    pub api_key: String,
}

impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("generation", &self.generation)
            .field("query", &self.query)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("append", &self.append)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Outcome of a [`FetchRequest`], delivered back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerResponse {
    /// The page was fetched and decoded.
    PageFetched {
        /// Generation copied from the request.
        generation: u64,
        /// Append flag copied from the request.
        append: bool,
        /// Decoded page, in server order.
        batch: ResultBatch,
    },

    /// The request failed at the transport level or returned a non-2xx status.
    FetchFailed {
        /// Generation copied from the request.
        generation: u64,
        /// Append flag copied from the request.
        append: bool,
        /// Diagnostic message for logs. Never shown to the user verbatim.
        message: String,
    },
}

impl WorkerResponse {
    /// Generation of the request this response answers.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        match self {
            Self::PageFetched { generation, .. } | Self::FetchFailed { generation, .. } => {
                *generation
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let request = FetchRequest {
            generation: 1,
            query: "cats".into(),
            limit: 24,
            offset: 0,
            append: false,
            api_key: "super-secret".into(),
        };
        let printed = format!("{request:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("cats"));
    }

    #[test]
    fn generation_accessor() {
        let response = WorkerResponse::FetchFailed {
            generation: 7,
            append: true,
            message: "HTTP 500".into(),
        };
        assert_eq!(response.generation(), 7);
    }
}
