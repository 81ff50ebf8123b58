//! Session file for gator.
//!
//! The session records the store connection string and the name of the
//! user that commands act on. It is read once at startup and rewritten
//! whenever the current user changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{GatorError, Result};

/// Default session file name, placed in the home directory.
pub const SESSION_FILE_NAME: &str = ".gatorconfig.json";

/// Default store connection string for a fresh session.
pub const DEFAULT_DB_URL: &str = "sqlite://gator.db";

/// Environment variable that overrides the stored connection string.
pub const DB_URL_ENV: &str = "GATOR_DB_URL";

/// Persisted session contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Store connection string.
    pub db_url: String,
    /// Name of the logged-in user, if any.
    #[serde(default)]
    pub current_user_name: Option<String>,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_string(),
            current_user_name: None,
        }
    }
}

/// A session bound to the file it was loaded from.
#[derive(Debug, Clone)]
pub struct Session {
    path: PathBuf,
    data: SessionData,
}

impl Session {
    /// Default session path (`~/.gatorconfig.json`).
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(SESSION_FILE_NAME))
            .ok_or_else(|| GatorError::Config("could not determine home directory".to_string()))
    }

    /// Load the session at `path`, writing a default one if it does not exist.
    pub fn load_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            debug!("Creating new session file at {:?}", path);
            let session = Self {
                path,
                data: SessionData::default(),
            };
            session.save()?;
            return Ok(session);
        }

        let content = std::fs::read_to_string(&path)?;
        let data: SessionData = serde_json::from_str(&content)
            .map_err(|e| GatorError::Config(format!("session parse error: {e}")))?;
        Ok(Self { path, data })
    }

    /// An unsaved session at `path` with the given contents.
    pub fn new(path: impl Into<PathBuf>, data: SessionData) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store connection string, honoring the `GATOR_DB_URL` override.
    pub fn db_url(&self) -> String {
        match std::env::var(DB_URL_ENV) {
            Ok(url) if !url.is_empty() => url,
            _ => self.data.db_url.clone(),
        }
    }

    /// Name of the current user, if one is logged in.
    pub fn current_user_name(&self) -> Option<&str> {
        self.data.current_user_name.as_deref()
    }

    /// Make `name` the current user and persist the session.
    pub fn set_user(&mut self, name: &str) -> Result<()> {
        let previous = self.data.current_user_name.replace(name.to_string());
        if let Err(e) = self.save() {
            self.data.current_user_name = previous;
            return Err(e);
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.data)
            .map_err(|e| GatorError::Config(format!("session encode error: {e}")))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
