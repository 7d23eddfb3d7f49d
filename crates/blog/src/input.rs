//! Request input schemas.
//!
//! Bodies are parsed straight from bytes into these types. Anything that
//! doesn't fit (bad JSON, missing or mistyped fields, malformed ids, failed
//! [`InputSchema::check`]) is a [`DomainError::Validation`].

use serde::Deserialize;
use serde::de::DeserializeOwned;

use instawrite_core::{DomainError, DomainResult, PostId, UserId};

use crate::post::{NewPost, PostChanges};

/// A statically typed request body with optional extra rules beyond its shape.
pub trait InputSchema: DeserializeOwned {
    fn check(&self) -> DomainResult<()> {
        Ok(())
    }
}

/// Parse and check a raw request body.
pub fn parse_input<T: InputSchema>(body: &[u8]) -> DomainResult<T> {
    let input: T = serde_json::from_slice(body).map_err(|e| DomainError::validation(e.to_string()))?;
    input.check()?;
    Ok(input)
}

/// Body of `POST /blog`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
}

impl InputSchema for CreatePostInput {}

impl CreatePostInput {
    pub fn into_new_post(self, author_id: UserId) -> NewPost {
        NewPost::new(author_id, self.title, self.content)
    }
}

/// Body of `PUT /blog`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdatePostInput {
    pub id: PostId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl InputSchema for UpdatePostInput {
    fn check(&self) -> DomainResult<()> {
        if self.title.is_none() && self.content.is_none() {
            return Err(DomainError::validation("update needs `title` or `content`"));
        }
        Ok(())
    }
}

impl UpdatePostInput {
    pub fn into_changes(self) -> (PostId, PostChanges) {
        (
            self.id,
            PostChanges {
                title: self.title,
                content: self.content,
            },
        )
    }
}

/// Body of `GET /blog`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FetchPostInput {
    pub id: PostId,
}

impl InputSchema for FetchPostInput {}
