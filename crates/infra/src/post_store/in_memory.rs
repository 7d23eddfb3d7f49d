use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use instawrite_blog::{NewPost, Post, PostChanges};
use instawrite_core::{Entity, PostId, UserId};

use super::{PostSession, PostStore, StoreError};

/// In-memory post store for tests/dev.
///
/// Keyed by [`PostId`]; ids are UUIDv7 so listing follows creation order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPostStore {
    inner: Arc<RwLock<BTreeMap<PostId, Post>>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn session(&self) -> Result<Box<dyn PostSession>, StoreError> {
        Ok(Box::new(InMemoryPostSession {
            inner: self.inner.clone(),
        }))
    }
}

struct InMemoryPostSession {
    inner: Arc<RwLock<BTreeMap<PostId, Post>>>,
}

#[async_trait]
impl PostSession for InMemoryPostSession {
    async fn insert(&mut self, post: NewPost) -> Result<Post, StoreError> {
        let post = post.into_post();
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(*post.id(), post.clone());
        Ok(post)
    }

    async fn update_owned(
        &mut self,
        id: PostId,
        author_id: UserId,
        changes: &PostChanges,
    ) -> Result<u64, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        match map.get_mut(&id) {
            Some(post) if post.author_id == author_id => {
                changes.apply_to(post);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn find(&mut self, id: PostId) -> Result<Option<Post>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn list(&mut self) -> Result<Vec<Post>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.values().cloned().collect())
    }
}
