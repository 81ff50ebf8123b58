//! Test helpers for command tests.
//!
//! Provides a throwaway State backed by an in-memory database and a
//! session file in a temporary directory.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use gator::command::build_registry;
use gator::{Command, CommandRegistry, Config, Database, Result, Session, SessionData, State};

/// Test environment: state, registry, and the directory holding the session.
pub struct TestEnv {
    pub state: State,
    pub registry: CommandRegistry,
    dir: TempDir,
}

impl TestEnv {
    /// Fresh environment with no users and no current user.
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let session = Session::new(dir.path().join("session.json"), SessionData::default());
        let db = Database::open_in_memory().await.unwrap();

        Self {
            state: State::new(db, session, Config::default()),
            registry: build_registry(),
            dir,
        }
    }

    /// Path of the session file.
    pub fn session_path(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    /// Run a command through the registry.
    pub async fn run(&mut self, name: &str, args: &[&str]) -> Result<()> {
        let cmd = Command::new(name, args.iter().copied());
        self.registry.run(&mut self.state, &cmd).await
    }

    /// Name of the current session user.
    pub fn current_user(&self) -> Option<String> {
        self.state.session.current_user_name().map(str::to_string)
    }

    /// Database handle.
    pub fn db(&self) -> &Database {
        &self.state.db
    }
}
