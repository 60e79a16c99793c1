use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::utils::token::decode_token;
use crate::AppState;

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Requires `Authorization: Bearer <jwt>` and stores the decoded
/// [`Claims`](crate::utils::token::Claims) in the request extensions.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_whitespace().nth(1))
        .map(str::to_string);

    let Some(token) = token else {
        return reject(StatusCode::UNAUTHORIZED, "Access token required");
    };

    match decode_token(&token, &state.config.jwt_secret) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = ?e, "rejected bearer token");
            reject(StatusCode::FORBIDDEN, "Invalid or expired token")
        }
    }
}
