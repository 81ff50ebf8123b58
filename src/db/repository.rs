//! User repository for gator.

use super::user::{User, UserRow};
use super::{map_unique_violation, DbPool};
use crate::datetime::now_timestamp;
use crate::{GatorError, Result};

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// Fails with a validation error when the name is already taken.
    pub async fn create(&self, name: &str) -> Result<User> {
        let now = now_timestamp();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (name, created_at, updated_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || format!("user {name} already exists")))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| GatorError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Get a user by name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, created_at, updated_at FROM users WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// List all users ordered by name.
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, created_at, updated_at FROM users ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Delete every user. Feeds and follows go with them.
    ///
    /// Returns the number of users deleted.
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM users").execute(self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create("alice").await.unwrap();
        assert!(user.id > 0);
        assert_eq!(user.name, "alice");
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn test_create_duplicate_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create("alice").await.unwrap();
        let result = repo.create("alice").await;

        match result {
            Err(GatorError::Validation(msg)) => assert!(msg.contains("alice")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let created = repo.create("bob").await.unwrap();
        let found = repo.get_by_name("bob").await.unwrap().unwrap();
        assert_eq!(found, created);

        assert!(repo.get_by_name("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_sorted() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create("carol").await.unwrap();
        repo.create("alice").await.unwrap();
        repo.create("bob").await.unwrap();

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_delete_all() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create("alice").await.unwrap();
        repo.create("bob").await.unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert!(repo.list_all().await.unwrap().is_empty());
        assert_eq!(repo.delete_all().await.unwrap(), 0);
    }
}
