//! Post storage abstraction.
//!
//! A [`PostStore`] is the long-lived handle shared by the router. Each request
//! opens its own [`PostSession`] and drops it when the handler returns; for the
//! Postgres backend that is one pooled connection per request.

use async_trait::async_trait;
use thiserror::Error;

use instawrite_blog::{NewPost, Post, PostChanges};
use instawrite_core::{PostId, UserId};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryPostStore;
pub use postgres::PostgresPostStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error in {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("post store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn database(operation: &'static str, source: sqlx::Error) -> Self {
        Self::Database { operation, source }
    }
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Acquire a session for one request.
    async fn session(&self) -> Result<Box<dyn PostSession>, StoreError>;
}

/// Request-scoped store access. Every method is a single round trip.
#[async_trait]
pub trait PostSession: Send {
    async fn insert(&mut self, post: NewPost) -> Result<Post, StoreError>;

    /// Apply `changes` to the post with `id` only if `author_id` owns it.
    ///
    /// Returns the number of rows changed (0 or 1); a missing or foreign post
    /// is not an error.
    async fn update_owned(
        &mut self,
        id: PostId,
        author_id: UserId,
        changes: &PostChanges,
    ) -> Result<u64, StoreError>;

    async fn find(&mut self, id: PostId) -> Result<Option<Post>, StoreError>;

    async fn list(&mut self) -> Result<Vec<Post>, StoreError>;
}
