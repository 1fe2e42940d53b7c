//! API key resolution.
//!
//! The key used for a request is the first non-blank value among, in order:
//!
//! 1. an in-process override set since startup,
//! 2. the persisted override,
//! 3. the embedded default (build-time `GIFSEEK_API_KEY` or config),
//! 4. nothing.
//!
//! The persisted override is read on every resolution so edits made through
//! [`CredentialResolver::save_override`] apply to the very next request.

use crate::domain::error::Result;
use crate::domain::{Credential, CredentialSource};
use crate::storage::backend::Storage;

/// Storage key holding the persisted API key override.
pub const CREDENTIAL_KEY: &str = "credential_override";

/// Key baked in at build time, if any.
pub const BUILD_DEFAULT_API_KEY: Option<&str> = option_env!("GIFSEEK_API_KEY");

/// Resolves the API key from its ordered sources.
pub struct CredentialResolver {
    session_override: Option<String>,
    storage: Box<dyn Storage>,
    embedded_default: Option<String>,
}

impl CredentialResolver {
    /// Creates a resolver over `storage` with an optional embedded default.
    #[must_use]
    pub fn new(storage: Box<dyn Storage>, embedded_default: Option<String>) -> Self {
        Self {
            session_override: None,
            storage,
            embedded_default: non_blank(embedded_default.as_deref()),
        }
    }

    /// Resolves the key to use for the next request.
    ///
    /// # Examples
    ///
    /// ```
    /// use gifseek::domain::CredentialSource;
    /// use gifseek::storage::{CredentialResolver, MemoryStorage, CREDENTIAL_KEY};
    ///
    /// let storage = MemoryStorage::with_entries([(CREDENTIAL_KEY, "persisted")]);
    /// let resolver = CredentialResolver::new(Box::new(storage), Some("embedded".into()));
    ///
    /// let credential = resolver.resolve();
    /// assert_eq!(credential.api_key(), Some("persisted"));
    /// assert_eq!(credential.source(), CredentialSource::PersistedOverride);
    /// ```
    #[must_use]
    pub fn resolve(&self) -> Credential {
        if let Some(value) = &self.session_override {
            return Credential::new(value.clone(), CredentialSource::Override);
        }

        match self.storage.get(CREDENTIAL_KEY) {
            Ok(stored) => {
                if let Some(value) = non_blank(stored.as_deref()) {
                    return Credential::new(value, CredentialSource::PersistedOverride);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "persisted credential unreadable, ignoring");
            }
        }

        self.embedded_default.as_ref().map_or_else(Credential::absent, |value| {
            Credential::new(value.clone(), CredentialSource::EmbeddedDefault)
        })
    }

    /// Sets an in-process override that wins over every other source.
    ///
    /// Blank input is ignored.
    pub fn set_session_override(&mut self, value: &str) {
        match non_blank(Some(value)) {
            Some(value) => {
                tracing::debug!("session credential override set");
                self.session_override = Some(value);
            }
            None => tracing::debug!("ignoring blank session credential override"),
        }
    }

    /// Persists `value` as the override, or removes the override when blank.
    ///
    /// Returns `true` if an override is now stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn save_override(&mut self, value: &str) -> Result<bool> {
        if let Some(value) = non_blank(Some(value)) {
            self.storage.set(CREDENTIAL_KEY, &value)?;
            tracing::debug!("persisted credential override saved");
            Ok(true)
        } else {
            self.storage.remove(CREDENTIAL_KEY)?;
            tracing::debug!("persisted credential override cleared");
            Ok(false)
        }
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("has_session_override", &self.session_override.is_some())
            .field("has_embedded_default", &self.embedded_default.is_some())
            .finish_non_exhaustive()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, SharedStorage};

    fn resolver(persisted: Option<&str>, embedded: Option<&str>) -> (CredentialResolver, SharedStorage) {
        let backend = persisted.map_or_else(MemoryStorage::default, |value| {
            MemoryStorage::with_entries([(CREDENTIAL_KEY, value)])
        });
        let shared = SharedStorage::new(backend);
        let resolver = CredentialResolver::new(Box::new(shared.clone()), embedded.map(String::from));
        (resolver, shared)
    }

    #[test]
    fn persisted_beats_embedded() {
        let (resolver, _) = resolver(Some("persisted"), Some("embedded"));
        let credential = resolver.resolve();
        assert_eq!(credential.api_key(), Some("persisted"));
        assert_eq!(credential.source(), CredentialSource::PersistedOverride);
    }

    #[test]
    fn embedded_used_without_persisted() {
        let (resolver, _) = resolver(None, Some("embedded"));
        let credential = resolver.resolve();
        assert_eq!(credential.api_key(), Some("embedded"));
        assert_eq!(credential.source(), CredentialSource::EmbeddedDefault);
    }

    #[test]
    fn blank_persisted_falls_through() {
        let (resolver, _) = resolver(Some("   "), Some("embedded"));
        assert_eq!(resolver.resolve().source(), CredentialSource::EmbeddedDefault);
    }

    #[test]
    fn session_override_wins() {
        let (mut resolver, _) = resolver(Some("persisted"), Some("embedded"));
        resolver.set_session_override("  session  ");
        let credential = resolver.resolve();
        assert_eq!(credential.api_key(), Some("session"));
        assert_eq!(credential.source(), CredentialSource::Override);
    }

    #[test]
    fn blank_session_override_ignored() {
        let (mut resolver, _) = resolver(None, Some("embedded"));
        resolver.set_session_override("  ");
        assert_eq!(resolver.resolve().source(), CredentialSource::EmbeddedDefault);
    }

    #[test]
    fn nothing_configured_is_absent() {
        let (resolver, _) = resolver(None, Some(""));
        assert!(resolver.resolve().is_absent());
        assert_eq!(resolver.resolve().source(), CredentialSource::Absent);
    }

    #[test]
    fn save_and_clear_override() {
        let (mut resolver, shared) = resolver(None, None);
        assert!(resolver.save_override(" new-key ").unwrap());
        assert_eq!(shared.get(CREDENTIAL_KEY).unwrap().as_deref(), Some("new-key"));
        assert_eq!(resolver.resolve().api_key(), Some("new-key"));

        assert!(!resolver.save_override("").unwrap());
        assert_eq!(shared.get(CREDENTIAL_KEY).unwrap(), None);
        assert!(resolver.resolve().is_absent());
    }
}
