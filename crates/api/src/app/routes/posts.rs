use std::sync::Arc;

use axum::{Json, Router, extract::Extension, routing::get};

use instawrite_blog::{CreatePostInput, FetchPostInput, Post, UpdatePostInput};

use crate::app::errors::ApiError;
use crate::app::extract::ValidatedJson;
use crate::app::routes::system;
use crate::app::{AppServices, dto};
use crate::context::AuthenticatedIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_post).post(create_post).put(update_post))
        .route("/bulk", get(list_posts))
        .route("/whoami", get(system::whoami))
}

pub async fn create_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    ValidatedJson(body): ValidatedJson<CreatePostInput>,
) -> Result<Json<dto::CreatedPost>, ApiError> {
    let mut session = services.session().await?;
    let post = session.insert(body.into_new_post(identity.user_id())).await?;

    tracing::info!(post_id = %post.id, author_id = %post.author_id, "post created");
    Ok(Json(dto::CreatedPost { id: post.id }))
}

/// Only the author's own post is touched. Anything else is a silent no-op
/// and still answers with the confirmation text.
pub async fn update_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    ValidatedJson(body): ValidatedJson<UpdatePostInput>,
) -> Result<&'static str, ApiError> {
    let (post_id, changes) = body.into_changes();
    let author_id = identity.user_id();

    let mut session = services.session().await?;
    let changed = session.update_owned(post_id, author_id, &changes).await?;

    if changed == 0 {
        tracing::debug!(%post_id, %author_id, "update matched no post owned by caller");
    } else {
        tracing::info!(%post_id, %author_id, "post updated");
    }
    Ok(dto::POST_UPDATED)
}

/// The id comes from the body, not the path. A missing post is `null`.
pub async fn get_post(
    Extension(services): Extension<Arc<AppServices>>,
    ValidatedJson(body): ValidatedJson<FetchPostInput>,
) -> Result<Json<Option<Post>>, ApiError> {
    let mut session = services.session().await?;
    Ok(Json(session.find(body.id).await?))
}

pub async fn list_posts(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let mut session = services.session().await?;
    Ok(Json(session.list().await?))
}
