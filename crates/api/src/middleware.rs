use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, middleware::Next, response::Response};
use chrono::Utc;

use instawrite_auth::JwtValidator;

use crate::app::errors::ApiError;
use crate::context::AuthenticatedIdentity;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Authorization gate for the blog routes.
///
/// Touches nothing but the request extensions; no store access happens here.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers()).map_err(|reason| {
        tracing::debug!(reason, "rejecting request: bad authorization header");
        ApiError::Unauthorized
    })?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "rejecting request: token failed verification");
        ApiError::Unauthorized
    })?;

    req.extensions_mut()
        .insert(AuthenticatedIdentity::new(claims.sub));

    Ok(next.run(req).await)
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn extract_bearer(headers: &HeaderMap) -> Result<&str, &'static str> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("missing header")?;

    let header = header.to_str().map_err(|_| "header is not visible ASCII")?;

    let mut parts = header.split_whitespace();
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("expected `<scheme> <token>`");
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err("unsupported scheme");
    }

    Ok(token)
}
