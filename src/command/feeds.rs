//! Feed commands: addfeed, feeds, follow, following and unfollow.

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, info};

use super::{Command, State};
use crate::db::User;
use crate::rss::{validate_url, Feed, FeedFollowRepository, FeedRepository, NewFeed};
use crate::{GatorError, Result};

/// `addfeed <name> <url>`: add a feed and follow it.
pub fn handle_add_feed<'a>(
    state: &'a mut State,
    cmd: &'a Command,
    user: User,
) -> BoxFuture<'a, Result<()>> {
    async move {
        cmd.expect_args(2, "addfeed <name> <url>")?;
        let (name, url) = (&cmd.args[0], &cmd.args[1]);
        validate_url(url)?;

        let (feed, follow) = FeedRepository::new(state.db.pool())
            .create_with_follow(&NewFeed::new(name.as_str(), url.as_str(), user.id))
            .await?;
        info!("User {} added feed {} ({})", user.name, feed.name, feed.url);

        println!("Feed created successfully:");
        println!("{feed}");
        println!();
        println!("{} is now following {}", follow.user_name, follow.feed_name);
        Ok(())
    }
    .boxed()
}

/// `feeds`: list every feed with the user who added it.
pub fn handle_feeds<'a>(state: &'a mut State, _cmd: &'a Command) -> BoxFuture<'a, Result<()>> {
    async move {
        let feeds = FeedRepository::new(state.db.pool()).list_all().await?;
        if feeds.is_empty() {
            println!("No feeds found.");
            return Ok(());
        }

        println!("Found {} feeds:", feeds.len());
        for entry in &feeds {
            println!("{}", entry.feed);
            println!("* User:         {}", entry.user_name);
            println!("=====================================");
        }
        Ok(())
    }
    .boxed()
}

/// `follow <url>`: follow an existing feed.
pub fn handle_follow<'a>(
    state: &'a mut State,
    cmd: &'a Command,
    user: User,
) -> BoxFuture<'a, Result<()>> {
    async move {
        cmd.expect_args(1, "follow <url>")?;
        let feed = find_feed(state, &cmd.args[0]).await?;

        let follow = FeedFollowRepository::new(state.db.pool())
            .create(user.id, feed.id)
            .await?;

        println!("{} is now following {}", follow.user_name, follow.feed_name);
        Ok(())
    }
    .boxed()
}

/// `following`: list the feeds the current user follows.
pub fn handle_following<'a>(
    state: &'a mut State,
    cmd: &'a Command,
    user: User,
) -> BoxFuture<'a, Result<()>> {
    async move {
        cmd.expect_args(0, "following")?;

        let follows = FeedFollowRepository::new(state.db.pool())
            .list_for_user(user.id)
            .await?;
        if follows.is_empty() {
            println!("{} is not following any feeds.", user.name);
            return Ok(());
        }

        println!("Feeds followed by {}:", user.name);
        for follow in &follows {
            println!("* {}", follow.feed_name);
        }
        Ok(())
    }
    .boxed()
}

/// `unfollow <url>`: stop following a feed. Not following it is fine.
pub fn handle_unfollow<'a>(
    state: &'a mut State,
    cmd: &'a Command,
    user: User,
) -> BoxFuture<'a, Result<()>> {
    async move {
        cmd.expect_args(1, "unfollow <url>")?;
        let feed = find_feed(state, &cmd.args[0]).await?;

        let removed = FeedFollowRepository::new(state.db.pool())
            .delete(user.id, feed.id)
            .await?;
        if !removed {
            debug!("{} was not following {}", user.name, feed.url);
        }

        println!("{} unfollowed {}", user.name, feed.name);
        Ok(())
    }
    .boxed()
}

async fn find_feed(state: &State, url: &str) -> Result<Feed> {
    FeedRepository::new(state.db.pool())
        .get_by_url(url)
        .await?
        .ok_or_else(|| GatorError::NotFound(format!("feed with URL {url}")))
}
