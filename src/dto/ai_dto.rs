use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::study::{Flashcard, QuizQuestion, StudyArtifact};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TopicPayload {
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NotesPayload {
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuestionPayload {
    pub question: Option<String>,
}

/// Every AI route answers with this union; `kind` says which payload is present.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AiResponse {
    Explanation { result: String },
    Summary { result: String },
    Quiz { questions: Vec<QuizQuestion> },
    Flashcards { flashcards: Vec<Flashcard> },
    Answer { answer: String },
}

impl From<StudyArtifact> for AiResponse {
    fn from(artifact: StudyArtifact) -> Self {
        match artifact {
            StudyArtifact::Quiz { questions } => AiResponse::Quiz { questions },
            StudyArtifact::Flashcards { flashcards } => AiResponse::Flashcards { flashcards },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConnectionResponse {
    pub result: String,
    pub status: String,
}
