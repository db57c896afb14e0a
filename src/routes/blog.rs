use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Blog Router
///
/// Read-only post endpoints open to anonymous clients.
pub fn public_blog_routes() -> Router<AppState> {
    Router::new()
        // GET /api/v1/blog/bulk
        // First page of posts (10 at most). Registered as a static segment, so it wins
        // over the `{id}` capture below.
        .route("/api/v1/blog/bulk", get(handlers::get_blogs))
        // GET /api/v1/blog/{id}
        .route("/api/v1/blog/{id}", get(handlers::get_blog))
}

/// Authenticated Blog Router
///
/// Post writes. Must be wrapped in the authorization layer, which puts the `AuthUser`
/// the handlers read into the request extensions.
pub fn authenticated_blog_routes() -> Router<AppState> {
    Router::new()
        // POST/PUT /api/v1/blog/
        // Create a post, or update one by the `id` in the body.
        .route(
            "/api/v1/blog/",
            post(handlers::create_blog).put(handlers::update_blog),
        )
        // Same endpoints without the trailing slash.
        .route(
            "/api/v1/blog",
            post(handlers::create_blog).put(handlers::update_blog),
        )
}
