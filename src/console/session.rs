//! Console session: the bearer token and the admin it belongs to.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::admin::AdminResponse;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Stored {
    token: Option<String>,
    user: Option<AdminResponse>,
}

/// Token state owned by the API client. Populated on login, cleared on
/// logout, and optionally mirrored to a JSON file so it survives restarts.
#[derive(Debug, Clone, Default)]
pub struct Session {
    stored: Stored,
    path: Option<PathBuf>,
}

impl Session {
    /// In-memory session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session backed by `path`, restored from it when the file exists.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let stored = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Stored::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            stored,
            path: Some(path),
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.stored.token.as_deref()
    }

    pub fn user(&self) -> Option<&AdminResponse> {
        self.stored.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.stored.token.is_some()
    }

    pub fn begin(&mut self, token: String, user: AdminResponse) -> Result<(), SessionError> {
        self.stored = Stored {
            token: Some(token),
            user: Some(user),
        };
        self.save()
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.stored = Stored::default();
        match &self.path {
            Some(path) => match fs::remove_file(path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            },
            None => Ok(()),
        }
    }

    fn save(&self) -> Result<(), SessionError> {
        if let Some(path) = &self.path {
            fs::write(path, serde_json::to_string(&self.stored)?)?;
        }
        Ok(())
    }
}
