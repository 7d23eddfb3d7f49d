use axum::{Json, extract::Extension, http::StatusCode};

use crate::app::dto;
use crate::context::AuthenticatedIdentity;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(identity): Extension<AuthenticatedIdentity>) -> Json<dto::WhoAmI> {
    Json(dto::WhoAmI {
        user_id: identity.user_id(),
    })
}
