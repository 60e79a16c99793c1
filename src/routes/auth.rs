use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    database::user_store::NewUser,
    dto::auth_dto::{AuthResponse, LoginPayload, MessageResponse, RegisterPayload, UserResponse, UserSummary},
    error::{Error, Result},
    utils::{
        crypto::{hash_password, verify_password, MIN_PASSWORD_LEN},
        token::{issue_token, Claims},
        validation::validate,
    },
    AppState,
};

fn invalid_credentials() -> Error {
    Error::Unauthorized("Invalid credentials".to_string())
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing fields, password mismatch or duplicate email")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let payload = payload.trimmed();
    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        payload.first_name.clone(),
        payload.last_name.clone(),
        payload.email.clone(),
        payload.password.clone().filter(|p| !p.is_empty()),
    ) else {
        return Err(Error::BadRequest("All fields are required".to_string()));
    };

    if payload.confirm_password.as_deref() != Some(password.as_str()) {
        return Err(Error::BadRequest("Passwords do not match".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    validate(&payload)?;

    let user = state
        .users
        .create(NewUser {
            email: email.to_lowercase(),
            first_name,
            last_name,
            password_hash: hash_password(&password)?,
        })
        .await?;
    tracing::info!(user_id = %user.id, storage = state.users.mode(), "account registered");

    let token = issue_token(&user, &state.config.jwt_secret, state.config.jwt_ttl_hours)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Account created successfully".to_string(),
            token,
            user: UserSummary::from(&user),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>> {
    let (Some(email), Some(password)) = (
        payload.email.as_deref().map(str::trim).filter(|e| !e.is_empty()),
        payload.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(Error::BadRequest("Email and password required".to_string()));
    };

    let user = state
        .users
        .find_by_email(&email.to_lowercase())
        .await?
        .ok_or_else(invalid_credentials)?;
    if !verify_password(password, &user.password_hash) {
        return Err(invalid_credentials());
    }

    let user = state.users.record_login(user.id).await?;
    let token = issue_token(&user, &state.config.jwt_secret, state.config.jwt_ttl_hours)?;
    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: UserSummary::from(&user),
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserResponse>> {
    let user = state.users.get(claims.sub).await?;
    Ok(Json(UserResponse {
        user: UserSummary::from(&user),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
#[axum::debug_handler]
pub async fn logout(Extension(claims): Extension<Claims>) -> Json<MessageResponse> {
    tracing::info!(user_id = %claims.sub, "logout");
    Json(MessageResponse::new("Logout successful"))
}
