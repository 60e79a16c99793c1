use axum::{extract::State, response::Json, Extension};

use crate::{
    dto::ai_dto::{AiResponse, ConnectionResponse, NotesPayload, QuestionPayload, TopicPayload},
    error::Result,
    models::{study::ArtifactKind, user::ActivityKind},
    utils::{token::Claims, validation::require_text},
    AppState,
};

const TOPIC_REQUIRED: &str = "Topic is required";

#[utoipa::path(
    post,
    path = "/api/ai/explain-topic",
    request_body = TopicPayload,
    responses(
        (status = 200, description = "Explanation", body = AiResponse),
        (status = 400, description = "Topic missing"),
        (status = 502, description = "AI provider failed"),
        (status = 503, description = "AI provider not configured")
    )
)]
#[axum::debug_handler]
pub async fn explain_topic(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<TopicPayload>,
) -> Result<Json<AiResponse>> {
    let topic = require_text(payload.topic.as_deref(), TOPIC_REQUIRED)?;
    let result = state.ai_service.explain_topic(topic).await?;
    state
        .activity_service
        .record(claims.sub, ActivityKind::Explain, Some(topic))
        .await;
    Ok(Json(AiResponse::Explanation { result }))
}

#[utoipa::path(
    post,
    path = "/api/ai/summarize-notes",
    request_body = NotesPayload,
    responses(
        (status = 200, description = "Summary", body = AiResponse),
        (status = 400, description = "Notes missing")
    )
)]
#[axum::debug_handler]
pub async fn summarize_notes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NotesPayload>,
) -> Result<Json<AiResponse>> {
    let notes = require_text(payload.notes.as_deref(), "Notes are required")?;
    let result = state.ai_service.summarize_notes(notes).await?;
    state
        .activity_service
        .record(claims.sub, ActivityKind::Summarize, None)
        .await;
    Ok(Json(AiResponse::Summary { result }))
}

#[utoipa::path(
    post,
    path = "/api/ai/generate-quiz",
    request_body = TopicPayload,
    responses(
        (status = 200, description = "One to three questions", body = AiResponse),
        (status = 400, description = "Topic missing")
    )
)]
#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<TopicPayload>,
) -> Result<Json<AiResponse>> {
    let topic = require_text(payload.topic.as_deref(), TOPIC_REQUIRED)?;
    let artifact = state
        .ai_service
        .generate_artifact(ArtifactKind::Quiz, topic)
        .await?;
    state
        .activity_service
        .record(claims.sub, ActivityKind::Quiz, Some(topic))
        .await;
    Ok(Json(artifact.into()))
}

#[utoipa::path(
    post,
    path = "/api/ai/generate-flashcards",
    request_body = TopicPayload,
    responses(
        (status = 200, description = "One to four flashcards", body = AiResponse),
        (status = 400, description = "Topic missing")
    )
)]
#[axum::debug_handler]
pub async fn generate_flashcards(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<TopicPayload>,
) -> Result<Json<AiResponse>> {
    let topic = require_text(payload.topic.as_deref(), TOPIC_REQUIRED)?;
    let artifact = state
        .ai_service
        .generate_artifact(ArtifactKind::Flashcards, topic)
        .await?;
    state
        .activity_service
        .record(claims.sub, ActivityKind::Flashcards, Some(topic))
        .await;
    Ok(Json(artifact.into()))
}

#[utoipa::path(
    post,
    path = "/api/ai/ask-question",
    request_body = QuestionPayload,
    responses(
        (status = 200, description = "Answer", body = AiResponse),
        (status = 400, description = "Question missing")
    )
)]
#[axum::debug_handler]
pub async fn ask_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<QuestionPayload>,
) -> Result<Json<AiResponse>> {
    let question = require_text(payload.question.as_deref(), "Question is required")?;
    let answer = state.ai_service.ask_question(question).await?;
    state
        .activity_service
        .record(claims.sub, ActivityKind::Question, None)
        .await;
    Ok(Json(AiResponse::Answer { answer }))
}

#[utoipa::path(
    get,
    path = "/api/ai/test-connection",
    responses(
        (status = 200, description = "Provider reachable", body = ConnectionResponse),
        (status = 503, description = "AI provider not configured")
    )
)]
#[axum::debug_handler]
pub async fn test_connection(State(state): State<AppState>) -> Result<Json<ConnectionResponse>> {
    let result = state.ai_service.test_connection().await?;
    Ok(Json(ConnectionResponse {
        result,
        status: "AI service is working".to_string(),
    }))
}
