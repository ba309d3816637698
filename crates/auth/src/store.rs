//! Token persistence.
//!
//! The access/refresh tokens are the only client-side state that outlives a
//! request. They live behind [`AuthStore`] so the transport never reads them
//! from ambient globals and tests can substitute an in-memory store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TokenPair;

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("token store is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistent key/value home of the session tokens.
///
/// Implementations are shared across concurrent requests and must be
/// internally synchronized.
pub trait AuthStore: Send + Sync + 'static {
    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    /// Store a freshly issued pair.
    ///
    /// A pair without a refresh token keeps the previously stored one.
    fn set_tokens(&self, tokens: &TokenPair) -> Result<(), StoreError>;

    /// Forget both tokens.
    fn clear(&self) -> Result<(), StoreError>;

    fn has_access_token(&self) -> bool {
        self.access_token().is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(rename = "access_token", default, skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(rename = "refresh_token", default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
}

impl StoredTokens {
    fn apply(&mut self, tokens: &TokenPair) {
        self.access = Some(tokens.access_token.clone());
        if let Some(refresh) = &tokens.refresh_token {
            self.refresh = Some(refresh.clone());
        }
    }
}

/// Process-local store; tokens are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryAuthStore {
    inner: RwLock<StoredTokens>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: &TokenPair) -> Self {
        let mut stored = StoredTokens::default();
        stored.apply(tokens);
        Self {
            inner: RwLock::new(stored),
        }
    }
}

impl AuthStore for MemoryAuthStore {
    fn access_token(&self) -> Option<String> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).access.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).refresh.clone()
    }

    fn set_tokens(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).apply(tokens);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = StoredTokens::default();
        Ok(())
    }
}

/// JSON-file backed store: `{"access_token": "...", "refresh_token": "..."}`.
///
/// The file is read once on open and rewritten on every change; reads are
/// served from memory.
#[derive(Debug)]
pub struct FileAuthStore {
    path: PathBuf,
    inner: RwLock<StoredTokens>,
}

impl FileAuthStore {
    /// Open (or lazily create) the store at `path`. A missing file is an
    /// empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let stored = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => StoredTokens::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoredTokens::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            inner: RwLock::new(stored),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, stored: &StoredTokens) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write-then-rename so a crash never leaves a half-written file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(stored)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl AuthStore for FileAuthStore {
    fn access_token(&self) -> Option<String> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).access.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).refresh.clone()
    }

    fn set_tokens(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = guard.clone();
        next.apply(tokens);
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        *guard = StoredTokens::default();
        Ok(())
    }
}
