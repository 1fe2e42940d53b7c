//! Presentation layer.
//!
//! ```text
//! AppState → compute_snapshot → RenderSnapshot → render → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Snapshot types handed to any front end
//! - [`renderer`]: Plain-text renderer used by the command-line front end

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_to_string};
pub use viewmodel::{DisplayItem, RenderSnapshot};
