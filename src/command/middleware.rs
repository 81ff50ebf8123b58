//! Login middleware for commands that act on behalf of a user.

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::debug;

use super::registry::CommandHandler;
use super::{Command, State};
use crate::db::{User, UserRepository};
use crate::{GatorError, Result};

/// A handler that runs as a resolved user.
pub trait UserHandler: Send + Sync {
    /// Run the handler as `user`.
    fn call<'a>(
        &'a self,
        state: &'a mut State,
        cmd: &'a Command,
        user: User,
    ) -> BoxFuture<'a, Result<()>>;
}

impl<F> UserHandler for F
where
    F: for<'a> Fn(&'a mut State, &'a Command, User) -> BoxFuture<'a, Result<()>> + Send + Sync,
{
    fn call<'a>(
        &'a self,
        state: &'a mut State,
        cmd: &'a Command,
        user: User,
    ) -> BoxFuture<'a, Result<()>> {
        self(state, cmd, user)
    }
}

/// Wraps a [`UserHandler`] so it only runs with a logged-in user.
pub struct LoggedIn<H>(H);

/// Require a logged-in user before running `handler`.
pub fn logged_in<H: UserHandler>(handler: H) -> LoggedIn<H> {
    LoggedIn(handler)
}

impl<H: UserHandler> CommandHandler for LoggedIn<H> {
    fn call<'a>(&'a self, state: &'a mut State, cmd: &'a Command) -> BoxFuture<'a, Result<()>> {
        async move {
            let name = state
                .session
                .current_user_name()
                .ok_or_else(|| GatorError::Auth("no user logged in".to_string()))?
                .to_string();

            let user = UserRepository::new(state.db.pool())
                .get_by_name(&name)
                .await?
                .ok_or_else(|| GatorError::Auth(format!("user {name} not found")))?;

            debug!("Running {} as {}", cmd.name, user.name);
            self.0.call(state, cmd, user).await
        }
        .boxed()
    }
}
