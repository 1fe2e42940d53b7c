//! Fetch worker for outbound search requests.
//!
//! This module executes the page requests the session controller emits and
//! converts the outcome into response events, keeping all network I/O out of
//! the state machine.
//!
//! # Architecture
//!
//! - `messages`: Request/response types tagged with the session generation
//! - `transport`: Single-attempt GET seam and its `reqwest` implementation
//! - `handler`: URL construction, execution, and response decoding

pub mod handler;
pub mod messages;
pub mod transport;

pub use handler::SearchWorker;
pub use messages::{FetchRequest, WorkerResponse};
pub use transport::{HttpReply, HttpTransport, Transport};
