//! Command registry.

use std::collections::HashMap;

use futures::future::BoxFuture;
use tracing::debug;

use super::{Command, State};
use crate::{GatorError, Result};

/// A command handler.
///
/// Implemented for every
/// `fn(&mut State, &Command) -> BoxFuture<'_, Result<()>>`, and for
/// [`LoggedIn`](super::LoggedIn) wrappers.
pub trait CommandHandler: Send + Sync {
    /// Run the handler.
    fn call<'a>(&'a self, state: &'a mut State, cmd: &'a Command) -> BoxFuture<'a, Result<()>>;
}

impl<F> CommandHandler for F
where
    F: for<'a> Fn(&'a mut State, &'a Command) -> BoxFuture<'a, Result<()>> + Send + Sync,
{
    fn call<'a>(&'a self, state: &'a mut State, cmd: &'a Command) -> BoxFuture<'a, Result<()>> {
        self(state, cmd)
    }
}

/// Maps command names to handlers.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Box<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous handler.
    pub fn register(&mut self, name: impl Into<String>, handler: impl CommandHandler + 'static) {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Dispatch `cmd` to its handler.
    pub async fn run(&self, state: &mut State, cmd: &Command) -> Result<()> {
        let handler = self
            .handlers
            .get(&cmd.name)
            .ok_or_else(|| GatorError::UnknownCommand(cmd.name.clone()))?;

        debug!("Running command {} with {} arg(s)", cmd.name, cmd.args.len());
        handler.call(state, cmd).await
    }
}
