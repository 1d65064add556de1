// ABOUTME: Persistent storage for the session token
// Keychain backend via the keyring crate, a file fallback, and an in-memory backend

use keyring::Entry;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

const SERVICE_NAME: &str = "gigboard";

/// The single well-known key the session token is stored under
pub const TOKEN_KEY: &str = "auth_token";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("credential file error: {0}")]
    Io(#[from] io::Error),
}

/// Somewhere the session token can survive a restart
#[cfg_attr(test, mockall::automock)]
pub trait CredentialBackend: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    fn load(&self) -> Result<Option<String>, CredentialError>;

    fn store(&self, token: &str) -> Result<(), CredentialError>;

    /// Remove the token; removing a missing token is not an error
    fn delete(&self) -> Result<(), CredentialError>;
}

/// System keychain (macOS Keychain, Linux Secret Service)
#[derive(Debug, Default)]
pub struct KeyringBackend;

impl KeyringBackend {
    fn entry() -> Result<Entry, CredentialError> {
        Ok(Entry::new(SERVICE_NAME, TOKEN_KEY)?)
    }
}

impl CredentialBackend for KeyringBackend {
    fn name(&self) -> &'static str {
        "keyring"
    }

    fn load(&self) -> Result<Option<String>, CredentialError> {
        match Self::entry()?.get_password() {
            Ok(token) => {
                tracing::debug!("Retrieved credential: {}", TOKEN_KEY);
                Ok(Some(token))
            }
            Err(keyring::Error::NoEntry) => {
                tracing::debug!("No credential found for: {}", TOKEN_KEY);
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Failed to retrieve credential {}: {}", TOKEN_KEY, e);
                Err(e.into())
            }
        }
    }

    fn store(&self, token: &str) -> Result<(), CredentialError> {
        Self::entry()?.set_password(token)?;
        tracing::info!("Stored credential: {}", TOKEN_KEY);
        Ok(())
    }

    fn delete(&self) -> Result<(), CredentialError> {
        match Self::entry()?.delete_credential() {
            Ok(()) => {
                tracing::info!("Deleted credential: {}", TOKEN_KEY);
                Ok(())
            }
            // Already gone
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Token kept in a single file, readable only by the owner on unix
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<home>/auth/auth_token`
    pub fn in_home(home: &std::path::Path) -> Self {
        Self::new(home.join("auth").join(TOKEN_KEY))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl CredentialBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    fn load(&self) -> Result<Option<String>, CredentialError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, token: &str) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!("Stored credential file: {}", self.path.display());
        Ok(())
    }

    fn delete(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage, nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryBackend {
    value: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            value: Mutex::new(Some(token.to_string())),
        }
    }
}

impl CredentialBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.value.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone())
    }

    fn store(&self, token: &str) -> Result<(), CredentialError> {
        *self.value.lock().unwrap_or_else(std::sync::PoisonError::into_inner) =
            Some(token.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<(), CredentialError> {
        *self.value.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_backend_roundtrip_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::in_home(temp_dir.path());

        assert_eq!(backend.load().unwrap(), None);

        backend.store("abc123").unwrap();
        assert_eq!(backend.load().unwrap(), Some("abc123".to_string()));

        backend.delete().unwrap();
        assert_eq!(backend.load().unwrap(), None);

        // Deleting twice is fine
        backend.delete().unwrap();
    }

    #[test]
    fn test_file_backend_ignores_blank_file() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::in_home(temp_dir.path());
        fs::create_dir_all(backend.path().parent().unwrap()).unwrap();
        fs::write(backend.path(), "  \n").unwrap();

        assert_eq!(backend.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_backend_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::in_home(temp_dir.path());
        backend.store("secret-token").unwrap();

        let mode = fs::metadata(backend.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    #[ignore] // Touches the real system keychain: cargo test -- --ignored
    fn test_keyring_store_and_retrieve() {
        let backend = KeyringBackend;
        backend.store("gigboard-test-token").expect("Failed to store");
        assert_eq!(backend.load().unwrap(), Some("gigboard-test-token".to_string()));
        backend.delete().expect("Failed to delete");
        assert_eq!(backend.load().unwrap(), None);
    }
}
