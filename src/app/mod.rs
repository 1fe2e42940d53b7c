//! Application layer coordinating state, events, and actions.
//!
//! This module is the search session controller. It sits between the front
//! end (the binary, or any embedding UI) and the domain/storage/worker layers.
//!
//! # Architecture
//!
//! ```text
//! Intents → Events → Event Handler → State Mutations → Actions → Fetch Worker
//!                         ↑                                          ↓
//!                         └──────────── Worker Responses ────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Session status and notice types
//! - [`state`]: Central application state container and snapshot computation

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{Notice, SessionStatus, SortMode};
pub use state::{AppState, Features, SearchSession};
