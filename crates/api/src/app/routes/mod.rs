use axum::Router;

pub mod posts;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new().nest("/blog", posts::router())
}
