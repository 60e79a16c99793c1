use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of answer slots every quiz question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuizQuestion {
    #[serde(rename = "question")]
    pub question_text: String,
    pub options: Vec<String>,
    #[serde(rename = "correct")]
    pub correct_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Quiz,
    Flashcards,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StudyArtifact {
    Quiz { questions: Vec<QuizQuestion> },
    Flashcards { flashcards: Vec<Flashcard> },
}

impl StudyArtifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            StudyArtifact::Quiz { .. } => ArtifactKind::Quiz,
            StudyArtifact::Flashcards { .. } => ArtifactKind::Flashcards,
        }
    }

    /// Number of questions or cards.
    pub fn item_count(&self) -> usize {
        match self {
            StudyArtifact::Quiz { questions } => questions.len(),
            StudyArtifact::Flashcards { flashcards } => flashcards.len(),
        }
    }
}
