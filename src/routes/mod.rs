pub mod ai;
pub mod auth;
pub mod docs;
pub mod health;
pub mod users;

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    auth::require_auth,
    cors::cors_layer,
    rate_limit::{rate_limit_middleware, RateLimiter},
    security_headers::with_security_headers,
};
use crate::AppState;

const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Builds the full application router: public and authenticated `/api`
/// routes behind the rate limiter, plus CORS, security headers, tracing
/// and the body limit.
pub fn build_router(state: AppState) -> Router {
    let public_api = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/docs/openapi.json", get(docs::openapi_json))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    let protected_api = Router::new()
        .route("/api/auth/profile", get(auth::profile))
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/users/stats",
            get(users::get_stats).put(users::update_stats),
        )
        .route("/api/users/topics-learned", post(users::add_topic))
        .route(
            "/api/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/api/users/account", delete(users::delete_account))
        .route("/api/ai/explain-topic", post(ai::explain_topic))
        .route("/api/ai/summarize-notes", post(ai::summarize_notes))
        .route("/api/ai/generate-quiz", post(ai::generate_quiz))
        .route("/api/ai/generate-flashcards", post(ai::generate_flashcards))
        .route("/api/ai/ask-question", post(ai::ask_question))
        .route("/api/ai/test-connection", get(ai::test_connection))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let limiter = RateLimiter::new(
        state.config.rate_limit_max,
        Duration::from_secs(state.config.rate_limit_window_secs),
    );

    let api = public_api
        .merge(protected_api)
        .route_layer(from_fn_with_state(limiter, rate_limit_middleware));

    let origins = state.config.allowed_origins();

    let app = api
        .fallback(health::not_found)
        .with_state(state)
        .layer(cors_layer(&origins));

    with_security_headers(app)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}
