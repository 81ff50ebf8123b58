//! Feed and feed-follow repositories for gator.

use chrono::Utc;

use super::types::{Feed, FeedFollow, FeedFollowDetails, FeedWithCreator, NewFeed};
use crate::datetime::{now_timestamp, parse_timestamp};
use crate::db::{map_unique_violation, DbPool};
use crate::{GatorError, Result};

const FEED_COLUMNS: &str = "id, name, url, user_id, created_at, updated_at, last_fetched_at";

/// Row type for feeds as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FeedRow {
    id: i64,
    name: String,
    url: String,
    user_id: i64,
    created_at: String,
    updated_at: String,
    last_fetched_at: Option<String>,
}

impl From<FeedRow> for Feed {
    fn from(row: FeedRow) -> Self {
        Feed {
            id: row.id,
            name: row.name,
            url: row.url,
            user_id: row.user_id,
            created_at: parse_timestamp(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_timestamp(&row.updated_at).unwrap_or_else(Utc::now),
            last_fetched_at: row.last_fetched_at.and_then(|s| parse_timestamp(&s)),
        }
    }
}

/// Row type for a feed joined with its creator's name.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FeedWithCreatorRow {
    #[sqlx(flatten)]
    feed: FeedRow,
    user_name: String,
}

impl From<FeedWithCreatorRow> for FeedWithCreator {
    fn from(row: FeedWithCreatorRow) -> Self {
        FeedWithCreator {
            feed: row.feed.into(),
            user_name: row.user_name,
        }
    }
}

/// Row type for a follow joined with feed and user names.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FeedFollowRow {
    id: i64,
    user_id: i64,
    feed_id: i64,
    created_at: String,
    updated_at: String,
    feed_name: String,
    user_name: String,
}

impl From<FeedFollowRow> for FeedFollowDetails {
    fn from(row: FeedFollowRow) -> Self {
        FeedFollowDetails {
            follow: FeedFollow {
                id: row.id,
                user_id: row.user_id,
                feed_id: row.feed_id,
                created_at: parse_timestamp(&row.created_at).unwrap_or_else(Utc::now),
                updated_at: parse_timestamp(&row.updated_at).unwrap_or_else(Utc::now),
            },
            feed_name: row.feed_name,
            user_name: row.user_name,
        }
    }
}

/// Repository for feed operations.
pub struct FeedRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FeedRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new feed.
    pub async fn create(&self, feed: &NewFeed) -> Result<Feed> {
        let now = now_timestamp();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO feeds (name, url, user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&feed.name)
        .bind(&feed.url)
        .bind(feed.user_id)
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || format!("feed {} already exists", feed.url)))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| GatorError::NotFound("feed".to_string()))
    }

    /// Create a feed and a follow from its creator in one transaction.
    ///
    /// Either both rows exist afterwards or neither does.
    pub async fn create_with_follow(&self, feed: &NewFeed) -> Result<(Feed, FeedFollowDetails)> {
        let now = now_timestamp();
        let mut tx = self.pool.begin().await?;

        let feed_id: i64 = sqlx::query_scalar(
            "INSERT INTO feeds (name, url, user_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&feed.name)
        .bind(&feed.url)
        .bind(feed.user_id)
        .bind(&now)
        .bind(&now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || format!("feed {} already exists", feed.url)))?;

        let follow_id: i64 = sqlx::query_scalar(
            "INSERT INTO feed_follows (user_id, feed_id, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             RETURNING id",
        )
        .bind(feed.user_id)
        .bind(feed_id)
        .bind(&now)
        .bind(&now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let created = self
            .get_by_id(feed_id)
            .await?
            .ok_or_else(|| GatorError::NotFound("feed".to_string()))?;
        let follow = FeedFollowRepository::new(self.pool)
            .get_by_id(follow_id)
            .await?
            .ok_or_else(|| GatorError::NotFound("feed follow".to_string()))?;

        Ok((created, follow))
    }

    /// Get a feed by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Feed>> {
        let query = format!("SELECT {FEED_COLUMNS} FROM feeds WHERE id = ?");
        let row = sqlx::query_as::<_, FeedRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Feed::from))
    }

    /// Get a feed by URL.
    pub async fn get_by_url(&self, url: &str) -> Result<Option<Feed>> {
        let query = format!("SELECT {FEED_COLUMNS} FROM feeds WHERE url = ?");
        let row = sqlx::query_as::<_, FeedRow>(&query)
            .bind(url)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Feed::from))
    }

    /// List all feeds with their creators (ordered by registration order).
    pub async fn list_all(&self) -> Result<Vec<FeedWithCreator>> {
        let rows = sqlx::query_as::<_, FeedWithCreatorRow>(
            r#"
            SELECT f.id, f.name, f.url, f.user_id, f.created_at, f.updated_at,
                   f.last_fetched_at, u.name AS user_name
            FROM feeds f
            JOIN users u ON u.id = f.user_id
            ORDER BY f.id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(FeedWithCreator::from).collect())
    }

    /// Get the single feed most overdue for fetching.
    ///
    /// Feeds never fetched come first, then the oldest `last_fetched_at`.
    /// Ties go to the lowest ID.
    pub async fn get_next_to_fetch(&self) -> Result<Option<Feed>> {
        let query = format!(
            "SELECT {FEED_COLUMNS} FROM feeds
             ORDER BY last_fetched_at ASC NULLS FIRST, id ASC
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, FeedRow>(&query)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Feed::from))
    }

    /// Record that a feed was fetched just now.
    ///
    /// Returns false if the feed no longer exists.
    pub async fn mark_fetched(&self, id: i64) -> Result<bool> {
        let now = now_timestamp();
        let result =
            sqlx::query("UPDATE feeds SET last_fetched_at = ?, updated_at = ? WHERE id = ?")
                .bind(&now)
                .bind(&now)
                .bind(id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for feed-follow operations.
pub struct FeedFollowRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FeedFollowRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Follow a feed.
    ///
    /// Fails with a validation error if the user already follows it.
    pub async fn create(&self, user_id: i64, feed_id: i64) -> Result<FeedFollowDetails> {
        let now = now_timestamp();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO feed_follows (user_id, feed_id, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             RETURNING id",
        )
        .bind(user_id)
        .bind(feed_id)
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || "already following this feed".to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| GatorError::NotFound("feed follow".to_string()))
    }

    /// Get a follow by ID, with names.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FeedFollowDetails>> {
        let row = sqlx::query_as::<_, FeedFollowRow>(
            r#"
            SELECT ff.id, ff.user_id, ff.feed_id, ff.created_at, ff.updated_at,
                   f.name AS feed_name, u.name AS user_name
            FROM feed_follows ff
            JOIN feeds f ON f.id = ff.feed_id
            JOIN users u ON u.id = ff.user_id
            WHERE ff.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(FeedFollowDetails::from))
    }

    /// List the follows of a user, ordered by feed name.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<FeedFollowDetails>> {
        let rows = sqlx::query_as::<_, FeedFollowRow>(
            r#"
            SELECT ff.id, ff.user_id, ff.feed_id, ff.created_at, ff.updated_at,
                   f.name AS feed_name, u.name AS user_name
            FROM feed_follows ff
            JOIN feeds f ON f.id = ff.feed_id
            JOIN users u ON u.id = ff.user_id
            WHERE ff.user_id = ?
            ORDER BY f.name ASC, ff.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(FeedFollowDetails::from).collect())
    }

    /// Check whether a user follows a feed.
    pub async fn exists(&self, user_id: i64, feed_id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM feed_follows WHERE user_id = ? AND feed_id = ?",
        )
        .bind(user_id)
        .bind(feed_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Stop following a feed.
    ///
    /// Returns whether a follow was actually removed.
    pub async fn delete(&self, user_id: i64, feed_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feed_follows WHERE user_id = ? AND feed_id = ?")
            .bind(user_id)
            .bind(feed_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
