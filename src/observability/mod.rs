//! File-based structured logging.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → RotatingFileWriter → gifseek.log
//! ```
//!
//! # Features
//!
//! - **File Output**: Logs written to `<data_dir>/gifseek.log`, keeping stdout free for the UI
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//!
//! # Configuration
//!
//! Log level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::RotatingFileWriter;
pub use init::{init_tracing, LOG_FILE_NAME};
