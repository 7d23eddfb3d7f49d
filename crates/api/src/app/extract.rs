//! Request extractors.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};

use instawrite_blog::{InputSchema, parse_input};
use instawrite_core::DomainError;

use crate::app::errors::ApiError;

/// A request body parsed and checked against its [`InputSchema`].
///
/// Unlike `axum::Json` this ignores `Content-Type` and reports every failure
/// (unreadable body, bad JSON, wrong shape) as [`ApiError::InvalidInput`].
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: InputSchema,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| DomainError::validation(e.to_string()))?;

        Ok(Self(parse_input(&body)?))
    }
}
