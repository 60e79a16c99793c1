use axum::response::Json;
use utoipa::OpenApi;

use crate::dto::{
    ai_dto::{AiResponse, ConnectionResponse, NotesPayload, QuestionPayload, TopicPayload},
    auth_dto::{AuthResponse, LoginPayload, MessageResponse, RegisterPayload, UserResponse, UserSummary},
    user_dto::{
        AddTopicPayload, ProfileResponse, StatsResponse, TopicsResponse, UpdateProfilePayload,
        UpdateProfileResponse, UpdateStatsPayload, UpdateStatsResponse, UserProfile,
    },
};
use crate::models::{
    study::{Flashcard, QuizQuestion},
    user::{ActivityEntry, ActivityKind, UserStats},
};
use crate::routes::{ai, auth, health, users};

#[derive(OpenApi)]
#[openapi(
    info(title = "ChatBuddy API", description = "AI study assistant backend"),
    paths(
        health::health,
        auth::register,
        auth::login,
        auth::profile,
        auth::logout,
        users::get_stats,
        users::update_stats,
        users::add_topic,
        users::get_profile,
        users::update_profile,
        users::delete_account,
        ai::explain_topic,
        ai::summarize_notes,
        ai::generate_quiz,
        ai::generate_flashcards,
        ai::ask_question,
        ai::test_connection,
    ),
    components(schemas(
        RegisterPayload,
        LoginPayload,
        UserSummary,
        AuthResponse,
        UserResponse,
        MessageResponse,
        StatsResponse,
        UpdateStatsPayload,
        UpdateStatsResponse,
        AddTopicPayload,
        TopicsResponse,
        UserProfile,
        ProfileResponse,
        UpdateProfilePayload,
        UpdateProfileResponse,
        TopicPayload,
        NotesPayload,
        QuestionPayload,
        AiResponse,
        ConnectionResponse,
        QuizQuestion,
        Flashcard,
        UserStats,
        ActivityEntry,
        ActivityKind,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
