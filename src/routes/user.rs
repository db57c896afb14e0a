use crate::{AppState, handlers};
use axum::{Router, routing::post};

/// User Router Module
///
/// Identity endpoints. Both return a signed token on success and are reachable
/// without one.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        // POST /api/v1/user/signup
        // Creates the account (409 on a taken email) and returns `{ jwt }`.
        .route("/api/v1/user/signup", post(handlers::signup))
        // POST /api/v1/user/signin
        // Exact email + password match, 401 otherwise.
        .route("/api/v1/user/signin", post(handlers::signin))
}
