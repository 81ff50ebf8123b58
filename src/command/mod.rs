//! Command dispatch for gator.
//!
//! A [`Command`] is a name plus positional arguments. Handlers receive the
//! process [`State`] and the command, and are looked up by name in a
//! [`CommandRegistry`]. Handlers that need a logged-in user are wrapped
//! with [`logged_in`].

pub mod agg;
pub mod feeds;
pub mod interval;
pub mod middleware;
pub mod registry;
pub mod users;

pub use interval::parse_interval;
pub use middleware::{logged_in, LoggedIn, UserHandler};
pub use registry::{CommandHandler, CommandRegistry};

use crate::config::Config;
use crate::db::Database;
use crate::session::Session;
use crate::{GatorError, Result};

/// A parsed command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command name, as typed.
    pub name: String,
    /// Positional arguments after the name.
    pub args: Vec<String>,
}

impl Command {
    /// Create a command from a name and its arguments.
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Require exactly `count` arguments, else a usage error showing `usage`.
    pub fn expect_args(&self, count: usize, usage: &str) -> Result<()> {
        if self.args.len() == count {
            Ok(())
        } else {
            Err(GatorError::Usage(usage.to_string()))
        }
    }
}

/// Everything a handler can touch.
pub struct State {
    /// Feed store.
    pub db: Database,
    /// Current session.
    pub session: Session,
    /// Application config.
    pub config: Config,
}

impl State {
    /// Bundle the store, session and config.
    pub fn new(db: Database, session: Session, config: Config) -> Self {
        Self {
            db,
            session,
            config,
        }
    }
}

/// Build the registry with every gator command.
pub fn build_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register("register", users::handle_register);
    registry.register("login", users::handle_login);
    registry.register("reset", users::handle_reset);
    registry.register("users", users::handle_users);
    registry.register("agg", agg::handle_agg);
    registry.register("feeds", feeds::handle_feeds);
    registry.register("addfeed", logged_in(feeds::handle_add_feed));
    registry.register("follow", logged_in(feeds::handle_follow));
    registry.register("following", logged_in(feeds::handle_following));
    registry.register("unfollow", logged_in(feeds::handle_unfollow));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_new() {
        let cmd = Command::new("addfeed", ["Blog", "https://example.com/rss"]);
        assert_eq!(cmd.name, "addfeed");
        assert_eq!(cmd.args, vec!["Blog", "https://example.com/rss"]);
    }

    #[test]
    fn test_expect_args() {
        let cmd = Command::new("login", ["alice"]);
        assert!(cmd.expect_args(1, "login <name>").is_ok());

        let result = cmd.expect_args(0, "reset");
        assert!(matches!(result, Err(GatorError::Usage(ref u)) if u == "reset"));

        let empty = Command::new("login", Vec::<String>::new());
        assert_eq!(
            empty.expect_args(1, "login <name>").unwrap_err().to_string(),
            "usage: login <name>"
        );
    }

    #[test]
    fn test_build_registry_names() {
        let registry = build_registry();
        assert_eq!(
            registry.names(),
            vec![
                "addfeed",
                "agg",
                "feeds",
                "follow",
                "following",
                "login",
                "register",
                "reset",
                "unfollow",
                "users"
            ]
        );
    }
}
