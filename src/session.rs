//! Credential persistence.
//!
//! The [`Session`] is the single owner of the current key/secret pair. It is
//! read once from a [`CredentialStore`] at startup and written through on
//! signup, login and logout.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{BookshelfError, Result};
use crate::models::Credentials;

pub trait CredentialStore {
    fn load(&self) -> Result<Option<Credentials>>;
    fn save(&self, credentials: &Credentials) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// On-disk layout: the two entries are stored independently so a hand-edited
/// file with only one of them is detected as incomplete.
#[derive(Serialize, Deserialize, Default)]
struct StoredCredentials {
    key: Option<String>,
    secret: Option<String>,
}

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Option<Credentials>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let stored: StoredCredentials = serde_json::from_str(&content)
            .with_context(|| format!("corrupt credentials file: {}", self.path.display()))?;

        match (stored.key, stored.secret) {
            (Some(key), Some(secret)) => Ok(Some(Credentials::new(key, secret))),
            (None, None) => Ok(None),
            _ => {
                warn!(
                    "Ignoring incomplete credentials in {}",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let stored = StoredCredentials {
            key: Some(credentials.key.clone()),
            secret: Some(credentials.secret.clone()),
        };
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // owner only, the file holds the secret
        #[cfg(unix)]
        std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o600);
        let mut file = options.open(&self.path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(serde_json::to_string_pretty(&stored)?.as_bytes())?;
        debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    credentials: Mutex<Option<Credentials>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: Mutex::new(Some(credentials)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Credentials>> {
        self.credentials
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<Credentials>> {
        Ok(self.slot().clone())
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        *self.slot() = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

pub struct Session<S = FileStore> {
    store: S,
    credentials: Option<Credentials>,
}

impl<S: CredentialStore> Session<S> {
    pub fn load(store: S) -> Result<Self> {
        let credentials = store.load()?.filter(Credentials::is_complete);
        Ok(Self { store, credentials })
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// Stores a complete pair. A pair with an empty half is refused.
    pub fn set(&mut self, credentials: Credentials) -> Result<()> {
        if !credentials.is_complete() {
            return Err(BookshelfError::validation(
                "Both key and secret are required.",
            ));
        }
        self.store.save(&credentials)?;
        self.credentials = Some(credentials);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.credentials = None;
        self.store.clear()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
