//! Infrastructure layer: post persistence backends.

pub mod post_store;

pub use post_store::{InMemoryPostStore, PostSession, PostStore, PostgresPostStore, StoreError};
