//! Postgres-backed post store.
//!
//! Every session holds one pooled connection; it goes back to the pool when
//! the session is dropped at the end of the request.
//!
//! ## Error Mapping
//!
//! All SQLx failures (connect, acquire, query, row decode) surface as
//! [`StoreError::Database`] tagged with the operation name. Nothing is
//! retried.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row};
use tracing::instrument;

use instawrite_blog::{NewPost, Post, PostChanges};
use instawrite_core::{PostId, UserId};

use super::{PostSession, PostStore, StoreError};

const SCHEMA: &str = include_str!("../../migrations/0001_posts.sql");

#[derive(Debug, Clone)]
pub struct PostgresPostStore {
    pool: PgPool,
}

impl PostgresPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`; fails if the database is unreachable.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::database("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `posts` table if it doesn't exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::database("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn session(&self) -> Result<Box<dyn PostSession>, StoreError> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| StoreError::database("acquire", e))?;
        Ok(Box::new(PostgresPostSession { conn }))
    }
}

struct PostgresPostSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl PostSession for PostgresPostSession {
    #[instrument(skip_all, fields(post_id = %post.id, author_id = %post.author_id), err)]
    async fn insert(&mut self, post: NewPost) -> Result<Post, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, title, content, author_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(post.id.as_uuid())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.author_id.as_uuid())
        .execute(&mut *self.conn)
        .await
        .map_err(|e| StoreError::database("insert", e))?;

        Ok(post.into_post())
    }

    #[instrument(skip_all, fields(post_id = %id, author_id = %author_id), err)]
    async fn update_owned(
        &mut self,
        id: PostId,
        author_id: UserId,
        changes: &PostChanges,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                updated_at = NOW()
            WHERE id = $1 AND author_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(author_id.as_uuid())
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .execute(&mut *self.conn)
        .await
        .map_err(|e| StoreError::database("update_owned", e))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip_all, fields(post_id = %id), err)]
    async fn find(&mut self, id: PostId) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, content, author_id
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| StoreError::database("find", e))?;

        row.map(|r| post_from_row(&r))
            .transpose()
            .map_err(|e| StoreError::database("find", e))
    }

    #[instrument(skip_all, err)]
    async fn list(&mut self) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, author_id
            FROM posts
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| StoreError::database("list", e))?;

        rows.iter()
            .map(post_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::database("list", e))
    }
}

fn post_from_row(row: &PgRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: PostId::from_uuid(row.try_get::<uuid::Uuid, _>("id")?),
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        author_id: UserId::from_uuid(row.try_get::<uuid::Uuid, _>("author_id")?),
    })
}
