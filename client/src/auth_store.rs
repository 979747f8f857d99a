//! Session token and role, persisted across restarts.
//!
//! The store is the only writer of the HTTP client's bearer token. Values are
//! written to durable storage under [`TOKEN_KEY`] and [`ROLE_KEY`] before the
//! in-memory copy changes, so a failed write leaves the session as it was.

use crate::http::HttpClient;
use std::sync::{Arc, PoisonError, RwLock};
use ticketdesk_core::environment::{KeyValueStorage, StorageError};
use ticketdesk_core::types::UserRole;

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key of the role
pub const ROLE_KEY: &str = "user_role";

/// Snapshot of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Bearer token
    pub token: Option<String>,
    /// Role reported at login
    pub role: Option<UserRole>,
}

impl AuthState {
    /// Whether a token is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

struct Inner {
    storage: Arc<dyn KeyValueStorage>,
    http: HttpClient,
    state: RwLock<AuthState>,
}

/// Shared auth store. Clones refer to the same session.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<Inner>,
}

impl AuthStore {
    /// Store writing to `storage` and authorizing `http`.
    ///
    /// Starts signed out; call [`AuthStore::initialize_auth`] to restore a
    /// persisted session.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, http: HttpClient) -> Self {
        Self {
            inner: Arc::new(Inner {
                storage,
                http,
                state: RwLock::new(AuthState::default()),
            }),
        }
    }

    /// Restore the persisted session and re-apply the authorization header.
    ///
    /// Returns whether a session was found. An unreadable role is dropped with
    /// a warning; the token alone still authenticates.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the storage cannot be read.
    pub fn initialize_auth(&self) -> Result<bool, StorageError> {
        let token = self.inner.storage.get(TOKEN_KEY)?.filter(|t| !t.is_empty());
        let role = match token {
            Some(_) => self
                .inner
                .storage
                .get(ROLE_KEY)?
                .and_then(|raw| match raw.parse::<UserRole>() {
                    Ok(role) => Some(role),
                    Err(err) => {
                        tracing::warn!(error = %err, "Ignoring persisted role");
                        None
                    },
                }),
            None => None,
        };

        let restored = token.is_some();
        self.inner.http.set_bearer_token(token.as_deref());
        *self.write() = AuthState { token, role };
        tracing::info!(restored, "Auth initialized");
        Ok(restored)
    }

    /// Persist `token` and start sending it.
    ///
    /// An empty token signs out, as [`AuthStore::clear_token`] does, since
    /// [`AuthStore::initialize_auth`] would not restore it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the token cannot be persisted.
    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        if token.is_empty() {
            tracing::warn!("Empty token, signing out");
            return self.clear_token();
        }
        self.inner.storage.set(TOKEN_KEY, token)?;
        self.inner.http.set_bearer_token(Some(token));
        self.write().token = Some(token.to_string());
        Ok(())
    }

    /// Persist `role`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the role cannot be persisted.
    pub fn set_role(&self, role: UserRole) -> Result<(), StorageError> {
        self.inner.storage.set(ROLE_KEY, role.as_str())?;
        self.write().role = Some(role);
        Ok(())
    }

    /// Persist a whole session.
    ///
    /// Both values are written before either takes effect. If the role cannot
    /// be written, the previously stored token is put back.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if either value cannot be persisted.
    pub fn set_auth(&self, token: &str, role: UserRole) -> Result<(), StorageError> {
        if token.is_empty() {
            return self.set_token(token);
        }
        let storage = &self.inner.storage;
        let previous = storage.get(TOKEN_KEY)?;
        storage.set(TOKEN_KEY, token)?;
        if let Err(err) = storage.set(ROLE_KEY, role.as_str()) {
            let restored = match previous.as_deref() {
                Some(previous) => storage.set(TOKEN_KEY, previous),
                None => storage.remove(TOKEN_KEY),
            };
            if let Err(rollback) = restored {
                tracing::warn!(error = %rollback, "Stored token could not be restored");
            }
            return Err(err);
        }

        self.inner.http.set_bearer_token(Some(token));
        *self.write() = AuthState {
            token: Some(token.to_string()),
            role: Some(role),
        };
        tracing::info!(role = %role, "Signed in");
        Ok(())
    }

    /// Forget the session: remove both keys and stop sending the token.
    ///
    /// The in-memory session and header are cleared even when storage fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] raised while removing the keys.
    pub fn clear_token(&self) -> Result<(), StorageError> {
        self.inner.http.set_bearer_token(None);
        *self.write() = AuthState::default();
        let token = self.inner.storage.remove(TOKEN_KEY);
        let role = self.inner.storage.remove(ROLE_KEY);
        tracing::info!("Signed out");
        token.and(role)
    }

    /// Whether a token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// Current token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// Current role.
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.read().role
    }

    /// Copy of the whole session.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.read().clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AuthState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AuthState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("AuthStore")
            .field("authenticated", &state.is_authenticated())
            .field("role", &state.role)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use ticketdesk_testing::InMemoryStorage;

    fn store(storage: &InMemoryStorage) -> AuthStore {
        let http = HttpClient::new(&ClientConfig::default()).unwrap();
        AuthStore::new(Arc::new(storage.clone()), http)
    }

    #[test]
    fn test_failed_role_write_restores_previous_token() {
        let storage = InMemoryStorage::with_entries([(TOKEN_KEY, "old"), (ROLE_KEY, "user")]);
        let auth = store(&storage);
        auth.initialize_auth().unwrap();

        storage.fail_writes_to(ROLE_KEY);
        assert!(auth.set_auth("new", UserRole::Admin).is_err());

        assert_eq!(storage.peek(TOKEN_KEY).as_deref(), Some("old"));
        assert_eq!(storage.peek(ROLE_KEY).as_deref(), Some("user"));
        assert_eq!(auth.token().as_deref(), Some("old"));
        assert_eq!(auth.role(), Some(UserRole::User));
        assert_eq!(auth.inner.http.bearer_token().as_deref(), Some("old"));
    }

    #[test]
    fn test_failed_role_write_leaves_no_token_behind() {
        let storage = InMemoryStorage::new();
        let auth = store(&storage);

        storage.fail_writes_to(ROLE_KEY);
        assert!(auth.set_auth("new", UserRole::User).is_err());

        assert!(storage.is_empty());
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_empty_token_signs_out() {
        let storage = InMemoryStorage::with_entries([(TOKEN_KEY, "jwt"), (ROLE_KEY, "admin")]);
        let auth = store(&storage);
        auth.initialize_auth().unwrap();

        auth.set_token("").unwrap();

        assert!(!auth.is_authenticated());
        assert!(storage.is_empty());
        assert_eq!(auth.inner.http.bearer_token(), None);
        assert!(!store(&storage).initialize_auth().unwrap());
    }
}
