use serde::Serialize;

use instawrite_core::{PostId, UserId};

/// Plain-text body returned by `PUT /blog`, whether or not a row changed.
pub const POST_UPDATED: &str = "updated post";

#[derive(Debug, Serialize)]
pub struct CreatedPost {
    pub id: PostId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoAmI {
    pub user_id: UserId,
}
