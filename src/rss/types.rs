//! Feed types for gator.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::datetime::format_display;

/// A feed registered by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    /// Feed ID.
    pub id: i64,
    /// Feed name given when it was added.
    pub name: String,
    /// Feed URL (unique across all feeds).
    pub url: String,
    /// User ID who added the feed.
    pub user_id: i64,
    /// When the feed was created.
    pub created_at: DateTime<Utc>,
    /// When the feed was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last time the aggregator claimed the feed.
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last_fetched = self
            .last_fetched_at
            .as_ref()
            .map(format_display)
            .unwrap_or_else(|| "never".to_string());
        write!(
            f,
            "* ID:           {}\n* Name:         {}\n* URL:          {}\n* User ID:      {}\n* Created:      {}\n* Last fetched: {}",
            self.id,
            self.name,
            self.url,
            self.user_id,
            format_display(&self.created_at),
            last_fetched
        )
    }
}

/// New feed for creation.
#[derive(Debug, Clone)]
pub struct NewFeed {
    /// Feed name.
    pub name: String,
    /// Feed URL.
    pub url: String,
    /// User ID who is adding the feed.
    pub user_id: i64,
}

impl NewFeed {
    /// Create a new feed request.
    pub fn new(name: impl Into<String>, url: impl Into<String>, user_id: i64) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            user_id,
        }
    }
}

/// A feed together with the name of the user who added it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedWithCreator {
    /// The feed.
    pub feed: Feed,
    /// Name of the creating user.
    pub user_name: String,
}

/// A user's subscription to a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFollow {
    /// Follow ID.
    pub id: i64,
    /// Following user.
    pub user_id: i64,
    /// Followed feed.
    pub feed_id: i64,
    /// When the follow was created.
    pub created_at: DateTime<Utc>,
    /// When the follow was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A follow joined with the names of its user and feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFollowDetails {
    /// The follow itself.
    pub follow: FeedFollow,
    /// Name of the followed feed.
    pub feed_name: String,
    /// Name of the following user.
    pub user_name: String,
}

/// Parsed feed data from fetching.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFeed {
    /// Feed title.
    pub title: String,
    /// Feed description.
    pub description: String,
    /// Site link, if the feed has one.
    pub link: Option<String>,
    /// Feed items.
    pub items: Vec<ParsedItem>,
}

/// Parsed item data from fetching.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedItem {
    /// Item title.
    pub title: String,
    /// Item description.
    pub description: String,
    /// Item link.
    pub link: Option<String>,
    /// Published date.
    pub published_at: Option<DateTime<Utc>>,
}
