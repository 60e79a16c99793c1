use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::study::{ArtifactKind, StudyArtifact};
use crate::services::study_parser;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;

const APP_TITLE: &str = "ChatBuddy - AI Study Assistant";
const DEFAULT_REFERER: &str = "http://localhost:5173";

const EXPLAIN_SYSTEM: &str = "You are a patient teacher. Explain ideas in plain language, \
    lean on analogies and everyday examples, and keep students curious.";
const SUMMARY_SYSTEM: &str = "You turn raw study notes into short, well organised revision \
    summaries that are easy to review before an exam.";
const QUIZ_SYSTEM: &str = "You write multiple-choice questions that check understanding \
    rather than recall, and you follow output formats exactly.";
const FLASHCARD_SYSTEM: &str = "You write concise study flashcards that build from basic \
    definitions to advanced ideas, and you follow output formats exactly.";
const QUESTION_SYSTEM: &str = "You are a friendly study assistant. Answer academic questions \
    accurately and clearly, and encourage the student.";

struct Completion<'a> {
    system: Option<&'a str>,
    user: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    referer: String,
    timeout: Duration,
}

impl AIService {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            api_key: config.configured_api_key().map(str::to_string),
            base_url: config.openrouter_base_url.trim_end_matches('/').to_string(),
            model: config.openrouter_model.clone(),
            referer: config
                .frontend_url
                .clone()
                .unwrap_or_else(|| DEFAULT_REFERER.to_string()),
            timeout: Duration::from_secs(config.ai_timeout_secs),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn explain_topic(&self, topic: &str) -> Result<String> {
        tracing::info!(topic, "explaining topic");
        let user = format!(
            "Explain \"{topic}\" to a student. Give a clear definition, the key concepts, \
             a few real-world examples, and why it matters. Be concise but complete."
        );
        self.chat(Completion {
            system: Some(EXPLAIN_SYSTEM),
            user,
            max_tokens: 800,
            temperature: 0.7,
        })
        .await
    }

    pub async fn summarize_notes(&self, notes: &str) -> Result<String> {
        let user = format!(
            "Summarise these study notes under the headings Key Points, Important Details \
             and Study Tips, using bullet points.\n\nNotes:\n{notes}"
        );
        self.chat(Completion {
            system: Some(SUMMARY_SYSTEM),
            user,
            max_tokens: 600,
            temperature: 0.5,
        })
        .await
    }

    /// Requests a quiz or flashcard deck and parses the reply. Parsing never
    /// fails; unusable replies become topic fallback content.
    pub async fn generate_artifact(&self, kind: ArtifactKind, topic: &str) -> Result<StudyArtifact> {
        let completion = match kind {
            ArtifactKind::Quiz => Completion {
                system: Some(QUIZ_SYSTEM),
                user: format!(
                    "Write a {count}-question multiple-choice quiz about \"{topic}\".\n\n\
                     Use exactly this layout for every question:\n\
                     Question: <question>\n\
                     A) <option>\nB) <option>\nC) <option>\nD) <option>\n\
                     Correct: <A, B, C or D>\n\n\
                     Put a line containing only --- between questions. \
                     Exactly one option per question must be correct.",
                    count = study_parser::QUIZ_LENGTH,
                ),
                max_tokens: 800,
                temperature: 0.7,
            },
            ArtifactKind::Flashcards => Completion {
                system: Some(FLASHCARD_SYSTEM),
                user: format!(
                    "Write exactly {count} flashcards about \"{topic}\", from basic to advanced.\n\n\
                     Use exactly this layout, with a blank line between cards:\n\
                     Front: <question or concept>\n\
                     Back: <short answer or explanation>\n\n\
                     Do not number the cards or add any other labels.",
                    count = study_parser::FLASHCARD_LIMIT,
                ),
                max_tokens: 600,
                temperature: 0.7,
            },
        };

        let text = self.chat(completion).await?;
        let artifact = study_parser::parse_artifact(&text, kind, topic);
        tracing::info!(kind = ?artifact.kind(), items = artifact.item_count(), "study artifact generated");
        Ok(artifact)
    }

    pub async fn ask_question(&self, question: &str) -> Result<String> {
        self.require_key()?;
        self.chat(Completion {
            system: Some(QUESTION_SYSTEM),
            user: question.to_string(),
            max_tokens: 500,
            temperature: 0.7,
        })
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "answering question failed");
            Error::Upstream("Failed to answer the question. Please try again.".to_string())
        })
    }

    pub async fn test_connection(&self) -> Result<String> {
        let api_key = self.require_key()?;
        tracing::info!("testing OpenRouter connectivity");

        let res = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;
        if !res.status().is_success() {
            tracing::error!(status = %res.status(), "connectivity probe failed");
            return Err(Error::Upstream(format!(
                "API connectivity test failed: {}",
                res.status().as_u16()
            )));
        }

        self.chat(Completion {
            system: None,
            user: "Say 'Hello, AI is working!' and nothing else.".to_string(),
            max_tokens: 50,
            temperature: 0.1,
        })
        .await
    }

    fn require_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::AiNotConfigured(
                "API key not configured. Please set OPENAI_API_KEY in your .env file.".to_string(),
            )
        })
    }

    async fn chat(&self, completion: Completion<'_>) -> Result<String> {
        let api_key = self.require_key()?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = completion.system {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        messages.push(serde_json::json!({"role": "user", "content": completion.user}));

        let payload = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": completion.max_tokens,
            "temperature": completion.temperature,
        });

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", APP_TITLE)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let text = res.text().await.unwrap_or_default();
            tracing::error!(status, body = %text, "OpenRouter returned an error");
            return Err(upstream_error(status, &text));
        }

        let body: JsonValue = res.json().await.map_err(transport_error)?;
        let content = completion_content(&body)
            .ok_or_else(|| Error::Upstream("Invalid response format from AI service".to_string()))?;
        tracing::info!(chars = content.len(), "OpenRouter completion received");
        Ok(content)
    }
}

fn completion_content(body: &JsonValue) -> Option<String> {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.trim().to_string())
}

fn upstream_error(status: u16, body: &str) -> Error {
    if body.contains("quota") || body.contains("insufficient") {
        Error::Upstream(
            "API quota exceeded. You may need to add credits at https://openrouter.ai/credits"
                .to_string(),
        )
    } else if status == 429 {
        Error::Upstream("Rate limit exceeded. Please wait a moment and try again.".to_string())
    } else if status == 401 {
        Error::Upstream("Invalid API key. Please check your API key in the .env file.".to_string())
    } else {
        Error::Upstream(format!("API Error: {} - {}", status, body))
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::UpstreamTimeout(
            "Request timed out. Please check your internet connection.".to_string(),
        )
    } else if err.is_connect() {
        Error::Upstream(
            "Unable to connect to OpenRouter API. Please check your internet connection."
                .to_string(),
        )
    } else {
        Error::Upstream(format!("AI service error: {}", err))
    }
}
