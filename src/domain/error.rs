//! Error types for gifseek.
//!
//! This module defines the centralized error type [`GifseekError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented with the
//! `thiserror` crate.
//!
//! Only infrastructure failures are Rust errors. User-facing outcomes such as an
//! empty query, a missing API key, or a failed page fetch are modelled as
//! [`Notice`](crate::app::Notice) values on the session instead.

use thiserror::Error;

/// The main error type for gifseek operations.
///
/// Error messages never contain API keys.
///
/// # Examples
///
/// ```
/// use gifseek::GifseekError;
///
/// fn validate_limit(limit: u32) -> Result<(), GifseekError> {
///     if limit == 0 {
///         return Err(GifseekError::Config("limit must be greater than 0".to_string()));
///     }
///     Ok(())
/// }
/// assert!(validate_limit(0).is_err());
/// ```
#[derive(Debug, Error)]
pub enum GifseekError {
    /// Storage operation failed.
    ///
    /// Occurs when reading from or writing to the key/value backend fails.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An outbound search request could not be completed.
    ///
    /// Covers connection failures and non-success HTTP statuses. The fetch
    /// worker converts these into a failed response before they reach the
    /// session controller.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response body or persisted document could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for gifseek operations.
pub type Result<T> = std::result::Result<T, GifseekError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_storage() {
        let err = GifseekError::Storage("disk full".into());
        assert_eq!(err.to_string(), "Storage error: disk full");
    }

    #[test]
    fn display_transport() {
        let err = GifseekError::Transport("HTTP 500".into());
        assert_eq!(err.to_string(), "Transport error: HTTP 500");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: GifseekError = io.into();
        assert!(matches!(err, GifseekError::Io(_)));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GifseekError>();
    }
}
