use serde::{Deserialize, Serialize};

use instawrite_core::{Entity, PostId, UserId};

/// A stored blog post.
///
/// `author_id` is fixed at creation; updates are filtered on it rather than
/// allowed to change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
}

impl Entity for Post {
    type Id = PostId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A post about to be inserted. The store turns this into a [`Post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
}

impl NewPost {
    pub fn new(author_id: UserId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: PostId::new(),
            title: title.into(),
            content: content.into(),
            author_id,
        }
    }

    pub fn into_post(self) -> Post {
        Post {
            id: self.id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
        }
    }
}

/// Field replacements for an update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            post.content.clone_from(content);
        }
    }
}
