//! API credential value and provenance.

use std::fmt;

/// Where a resolved API key came from.
///
/// Used for diagnostics only; no control flow branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Set in-process since startup.
    Override,
    /// Read from the persisted override key.
    PersistedOverride,
    /// Compiled in or taken from configuration.
    EmbeddedDefault,
    /// No source had a value.
    Absent,
}

/// A resolved API key with its provenance.
///
/// The `Debug` implementation redacts the key so credentials never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    value: String,
    source: CredentialSource,
}

impl Credential {
    #[must_use]
    pub fn new(value: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    #[must_use]
    pub const fn absent() -> Self {
        Self {
            value: String::new(),
            source: CredentialSource::Absent,
        }
    }

    /// Returns the key, or `None` when no source provided one.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        if self.source == CredentialSource::Absent || self.value.is_empty() {
            None
        } else {
            Some(&self.value)
        }
    }

    #[must_use]
    pub const fn source(&self) -> CredentialSource {
        self.source
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.api_key().is_none()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &if self.is_absent() { "<none>" } else { "<redacted>" })
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_key() {
        let credential = Credential::new("secret-key", CredentialSource::Override);
        let printed = format!("{credential:?}");
        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn absent_has_no_key() {
        assert_eq!(Credential::absent().api_key(), None);
        assert!(Credential::absent().is_absent());
    }
}
