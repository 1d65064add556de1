// ABOUTME: Session store owning the single authentication token
// Every read and write of the credential goes through here; views subscribe for invalidation

use crate::config::{AppConfig, CredentialStorage};
use crate::credentials::{
    CredentialBackend, CredentialError, FileBackend, KeyringBackend, MemoryBackend,
};
use std::fmt;
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    SignedOut,
    SignedIn,
}

/// What subscribers observe: the status plus the epoch it was reached at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: AuthStatus,
    pub epoch: u64,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to persist session token ({backend}): {source}")]
    Persist {
        backend: &'static str,
        #[source]
        source: CredentialError,
    },

    #[error("failed to remove persisted session token ({backend}): {source}")]
    Remove {
        backend: &'static str,
        #[source]
        source: CredentialError,
    },
}

struct Inner {
    token: Option<String>,
    epoch: u64,
}

pub struct SessionStore {
    backend: Box<dyn CredentialBackend>,
    inner: RwLock<Inner>,
    notifier: watch::Sender<SessionSnapshot>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("SessionStore")
            .field("backend", &self.backend.name())
            .field("status", &snapshot.status)
            .field("epoch", &snapshot.epoch)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Empty store over the given backend; nothing is read from it
    pub fn new(backend: Box<dyn CredentialBackend>) -> Self {
        let (notifier, _) = watch::channel(SessionSnapshot {
            status: AuthStatus::SignedOut,
            epoch: 0,
        });
        Self {
            backend,
            inner: RwLock::new(Inner {
                token: None,
                epoch: 0,
            }),
            notifier,
        }
    }

    /// Store seeded from whatever the backend has persisted
    pub fn load(backend: Box<dyn CredentialBackend>) -> Self {
        let store = Self::new(backend);
        match store.backend.load() {
            Ok(Some(token)) => {
                info!("Restored session token from {}", store.backend.name());
                store.replace(Some(token));
            }
            Ok(None) => debug!("No persisted session token in {}", store.backend.name()),
            Err(e) => warn!("Could not read persisted session token: {}", e),
        }
        store
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    /// Build the store the config asks for and restore any persisted token
    pub fn from_config(config: &AppConfig, home: &Path) -> Self {
        let backend: Box<dyn CredentialBackend> = match config.credentials.storage {
            CredentialStorage::Keyring => Box::new(KeyringBackend),
            CredentialStorage::File => Box::new(FileBackend::in_home(home)),
        };
        Self::load(backend)
    }

    pub fn get_token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn epoch(&self) -> u64 {
        self.read().epoch
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.read();
        SessionSnapshot {
            status: status_of(inner.token.as_ref()),
            epoch: inner.epoch,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.notifier.subscribe()
    }

    /// Make `token` the current credential. The in-memory value is updated even
    /// when persisting fails, so the running process stays signed in.
    pub fn set_token(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        let persisted = self.backend.store(&token);
        self.replace(Some(token));
        info!("Session started");

        persisted.map_err(|source| {
            warn!("Failed to persist session token: {}", source);
            SessionError::Persist {
                backend: self.backend.name(),
                source,
            }
        })
    }

    /// Drop the credential. Safe to call when already signed out.
    pub fn clear_token(&self) -> Result<(), SessionError> {
        if self.replace(None) {
            info!("Session cleared");
        }

        self.backend.delete().map_err(|source| {
            warn!("Failed to remove persisted session token: {}", source);
            SessionError::Remove {
                backend: self.backend.name(),
                source,
            }
        })
    }

    /// Clear the session after the backend rejected `rejected`. A token that
    /// was replaced in the meantime by a fresh login is left alone.
    pub fn expire_token(&self, rejected: &str) -> Result<bool, SessionError> {
        if self.read().token.as_deref() != Some(rejected) {
            debug!("Ignoring rejection of a token that is no longer current");
            return Ok(false);
        }
        self.clear_token().map(|()| true)
    }

    /// Swap the token, bumping the epoch and notifying only on a real change
    fn replace(&self, token: Option<String>) -> bool {
        let snapshot = {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            if inner.token == token {
                return false;
            }
            inner.token = token;
            inner.epoch += 1;
            SessionSnapshot {
                status: status_of(inner.token.as_ref()),
                epoch: inner.epoch,
            }
        };
        self.notifier.send_replace(snapshot);
        true
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn status_of(token: Option<&String>) -> AuthStatus {
    if token.is_some() {
        AuthStatus::SignedIn
    } else {
        AuthStatus::SignedOut
    }
}
