use axum::{extract::State, response::Json, Extension};

use crate::{
    dto::{
        auth_dto::{MessageResponse, UserSummary},
        user_dto::{
            AddTopicPayload, ProfileResponse, StatsResponse, TopicsResponse, UpdateProfilePayload,
            UpdateProfileResponse, UpdateStatsPayload, UpdateStatsResponse, UserProfile,
        },
    },
    error::Result,
    utils::{
        token::Claims,
        validation::{require_text, validate},
    },
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/users/stats",
    responses(
        (status = 200, description = "Study statistics", body = StatsResponse),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<StatsResponse>> {
    let user = state.users.get(claims.sub).await?;
    Ok(Json(StatsResponse { stats: user.stats }))
}

#[utoipa::path(
    put,
    path = "/api/users/stats",
    request_body = UpdateStatsPayload,
    responses(
        (status = 200, description = "Statistics updated", body = UpdateStatsResponse),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn update_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateStatsPayload>,
) -> Result<Json<UpdateStatsResponse>> {
    let stats = state
        .users
        .update_stats(claims.sub, |stats| payload.apply(stats))
        .await?;
    Ok(Json(UpdateStatsResponse {
        message: "Stats updated successfully".to_string(),
        stats,
    }))
}

#[utoipa::path(
    post,
    path = "/api/users/topics-learned",
    request_body = AddTopicPayload,
    responses(
        (status = 200, description = "Topic recorded", body = TopicsResponse),
        (status = 400, description = "Topic missing")
    )
)]
#[axum::debug_handler]
pub async fn add_topic(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddTopicPayload>,
) -> Result<Json<TopicsResponse>> {
    let topic = require_text(payload.topic.as_deref(), "Topic is required")?;
    let stats = state
        .users
        .update_stats(claims.sub, |stats| {
            stats.add_topic(topic);
        })
        .await?;
    Ok(Json(TopicsResponse {
        message: "Topic added to learned topics".to_string(),
        topics_learned: stats.topics_learned,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "Detailed profile", body = ProfileResponse),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ProfileResponse>> {
    let user = state.users.get(claims.sub).await?;
    Ok(Json(ProfileResponse {
        user: UserProfile::from(user),
    }))
}

#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Profile updated", body = UpdateProfileResponse),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<UpdateProfileResponse>> {
    validate(&payload)?;
    let user = state.users.update_profile(claims.sub, payload.into()).await?;
    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully".to_string(),
        user: UserSummary::from(&user),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/account",
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MessageResponse>> {
    state.users.delete(claims.sub).await?;
    tracing::info!(user_id = %claims.sub, "account deleted");
    Ok(Json(MessageResponse::new("Account deleted successfully")))
}
