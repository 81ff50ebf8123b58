//! User commands: register, login, reset and users.

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, info};

use super::{Command, State};
use crate::db::{User, UserRepository};
use crate::{GatorError, Result};

/// `register <name>`: create a user and log in as them.
pub fn handle_register<'a>(state: &'a mut State, cmd: &'a Command) -> BoxFuture<'a, Result<()>> {
    async move {
        cmd.expect_args(1, "register <name>")?;
        let name = &cmd.args[0];

        let user = UserRepository::new(state.db.pool()).create(name).await?;
        state.session.set_user(&user.name)?;
        info!("Registered user {}", user.name);

        println!("User created successfully:");
        println!("{user}");
        Ok(())
    }
    .boxed()
}

/// `login <name>`: switch the session to an existing user.
pub fn handle_login<'a>(state: &'a mut State, cmd: &'a Command) -> BoxFuture<'a, Result<()>> {
    async move {
        cmd.expect_args(1, "login <name>")?;
        let name = &cmd.args[0];

        let user = UserRepository::new(state.db.pool())
            .get_by_name(name)
            .await?
            .ok_or_else(|| GatorError::NotRegistered(name.clone()))?;

        state.session.set_user(&user.name)?;
        println!("User has been set to {}", user.name);
        Ok(())
    }
    .boxed()
}

/// `reset`: delete every user, and with them every feed and follow.
pub fn handle_reset<'a>(state: &'a mut State, _cmd: &'a Command) -> BoxFuture<'a, Result<()>> {
    async move {
        let deleted = UserRepository::new(state.db.pool()).delete_all().await?;
        info!("Reset removed {} user(s)", deleted);

        println!("Database reset successfully!");
        Ok(())
    }
    .boxed()
}

/// `users`: list every user, marking the current one.
pub fn handle_users<'a>(state: &'a mut State, _cmd: &'a Command) -> BoxFuture<'a, Result<()>> {
    async move {
        let users = UserRepository::new(state.db.pool()).list_all().await?;
        debug!("Listing {} user(s)", users.len());

        for line in user_lines(&users, state.session.current_user_name()) {
            println!("{line}");
        }
        Ok(())
    }
    .boxed()
}

/// One `* name` line per user, with ` (current)` after the session user.
pub fn user_lines(users: &[User], current: Option<&str>) -> Vec<String> {
    users
        .iter()
        .map(|user| {
            if current == Some(user.name.as_str()) {
                format!("* {} (current)", user.name)
            } else {
                format!("* {}", user.name)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(id: i64, name: &str) -> User {
        let now = Utc::now();
        User {
            id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_user_lines_marks_current() {
        let users = vec![user(1, "alice"), user(2, "bob")];
        assert_eq!(
            user_lines(&users, Some("bob")),
            vec!["* alice", "* bob (current)"]
        );
    }

    #[test]
    fn test_user_lines_without_session_user() {
        let users = vec![user(1, "alice")];
        assert_eq!(user_lines(&users, None), vec!["* alice"]);
        assert_eq!(user_lines(&users, Some("ghost")), vec!["* alice"]);
    }

    #[test]
    fn test_user_lines_empty() {
        assert!(user_lines(&[], Some("alice")).is_empty());
    }
}
