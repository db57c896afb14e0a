use crate::models::{BlogRow, NewUser, Post, User};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// RepoError
///
/// Store-layer failure, classified so the handler layer can pick a status without
/// inspecting driver errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,
    /// A unique constraint rejected the write. Carries the constraint name when known.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::UniqueViolation(db.constraint().unwrap_or("unknown").to_string())
            }
            other => RepoError::Database(other),
        }
    }
}

/// Repository Trait
///
/// Persistence contract consumed by the handlers. Implemented by `PostgresRepository`
/// in production and by in-memory doubles in tests.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    // Exact match on both columns; `None` when either differs.
    async fn find_user_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, RepoError>;
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError>;

    // --- Posts ---
    async fn create_post(
        &self,
        author_id: Uuid,
        title: String,
        content: String,
    ) -> Result<Post, RepoError>;
    /// Partial update; `None` fields keep their value. `RepoError::NotFound` when the id is unknown.
    async fn update_post(
        &self,
        id: Uuid,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Post, RepoError>;
    /// Posts in creation order, joined with the author's display name.
    async fn list_posts(&self, limit: i64, offset: i64) -> Result<Vec<BlogRow>, RepoError>;
    async fn get_post(&self, id: Uuid) -> Result<Option<BlogRow>, RepoError>;
}

/// RepositoryState
///
/// Shared handle to the persistence layer held by the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// `Repository` backed by a Postgres pool. Each operation checks out one connection
/// and returns it to the pool when the guard drops, whichever way the method exits.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BLOG_COLUMNS: &str = r#"
    SELECT p.id, p.title, p.content, u.name AS author_name
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let mut conn = self.pool.acquire().await?;
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(user)
    }

    async fn find_user_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, RepoError> {
        let mut conn = self.pool.acquire().await?;
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password FROM users WHERE email = $1 AND password = $2",
        )
        .bind(email)
        .bind(password)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(user)
    }

    /// create_user
    ///
    /// A concurrent signup with the same email surfaces as `RepoError::UniqueViolation`.
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let mut conn = self.pool.acquire().await?;
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.email)
        .bind(user.name)
        .bind(user.password)
        .fetch_one(&mut *conn)
        .await?;
        Ok(created)
    }

    async fn create_post(
        &self,
        author_id: Uuid,
        title: String,
        content: String,
    ) -> Result<Post, RepoError> {
        let mut conn = self.pool.acquire().await?;
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, title, content, author_id, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, title, content, author_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(content)
        .bind(author_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(post)
    }

    /// update_post
    ///
    /// `COALESCE` keeps the stored column when the new value is NULL. No author check
    /// is applied (see DESIGN.md).
    async fn update_post(
        &self,
        id: Uuid,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Post, RepoError> {
        let mut conn = self.pool.acquire().await?;
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content)
            WHERE id = $1
            RETURNING id, title, content, author_id, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .fetch_optional(&mut *conn)
        .await?;
        post.ok_or(RepoError::NotFound)
    }

    async fn list_posts(&self, limit: i64, offset: i64) -> Result<Vec<BlogRow>, RepoError> {
        let mut conn = self.pool.acquire().await?;
        let query = format!("{BLOG_COLUMNS} ORDER BY p.created_at ASC, p.id ASC LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, BlogRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<BlogRow>, RepoError> {
        let mut conn = self.pool.acquire().await?;
        let query = format!("{BLOG_COLUMNS} WHERE p.id = $1");
        let row = sqlx::query_as::<_, BlogRow>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }
}
