//! `instawrite-blog` — the blog post model and its request input schemas.

pub mod input;
pub mod post;

pub use input::{CreatePostInput, FetchPostInput, InputSchema, UpdatePostInput, parse_input};
pub use post::{NewPost, Post, PostChanges};
