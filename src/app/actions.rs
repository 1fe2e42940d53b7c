//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event. The
//! state machine itself never performs I/O; whoever drives it (the binary, or
//! [`dispatch`](crate::dispatch)) executes these.
//!
//! # Example
//!
//! ```rust
//! use gifseek::app::Action;
//!
//! let actions = vec![Action::PromptCredential];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::worker::FetchRequest;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Executes a page request on the fetch worker.
    ///
    /// The resulting [`WorkerResponse`](crate::worker::WorkerResponse) must be
    /// fed back as [`Event::WorkerResponse`](crate::app::Event::WorkerResponse).
    Fetch(FetchRequest),

    /// Asks the user for an API key (the settings dialog in a graphical UI).
    ///
    /// Emitted when a search was blocked because no key could be resolved.
    PromptCredential,
}
