use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// How many entries `recent_activities` keeps, newest first.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub stats: UserStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub study_sessions: u32,
    pub ai_interactions: u32,
    pub topics_learned: Vec<String>,
    pub daily_activity: BTreeMap<String, u32>,
    pub last_activity_date: Option<String>,
    pub recent_activities: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActivityEntry {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub time: DateTime<Utc>,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Explain,
    Quiz,
    Flashcards,
    Summarize,
    Question,
}

impl ActivityKind {
    pub fn title(self, topic: Option<&str>) -> String {
        let topic = topic.unwrap_or_default();
        match self {
            ActivityKind::Explain => format!("Explained topic: {}", topic),
            ActivityKind::Quiz => format!("Generated quiz for: {}", topic),
            ActivityKind::Flashcards => format!("Created flashcards for: {}", topic),
            ActivityKind::Summarize => "Summarized study notes".to_string(),
            ActivityKind::Question => "Answered study question".to_string(),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ActivityKind::Explain => "📚",
            ActivityKind::Quiz => "🧠",
            ActivityKind::Flashcards => "🎴",
            ActivityKind::Summarize => "📝",
            ActivityKind::Question => "❓",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ActivityKind::Explain => "bg-blue-500",
            ActivityKind::Quiz => "bg-purple-500",
            ActivityKind::Flashcards => "bg-green-500",
            ActivityKind::Summarize => "bg-yellow-500",
            ActivityKind::Question => "bg-red-500",
        }
    }
}

impl UserStats {
    pub fn record_interaction(&mut self, kind: ActivityKind, topic: Option<&str>, now: DateTime<Utc>) {
        let today = now.date_naive().format("%Y-%m-%d").to_string();

        self.ai_interactions = self.ai_interactions.saturating_add(1);
        *self.daily_activity.entry(today.clone()).or_insert(0) += 1;
        self.last_activity_date = Some(today);

        self.recent_activities.insert(
            0,
            ActivityEntry {
                id: now.timestamp_millis(),
                kind,
                title: kind.title(topic),
                time: now,
                icon: kind.icon().to_string(),
                color: kind.color().to_string(),
            },
        );
        self.recent_activities.truncate(RECENT_ACTIVITY_LIMIT);
    }

    /// Returns true when the topic was not yet in the list.
    pub fn add_topic(&mut self, topic: &str) -> bool {
        if self.topics_learned.iter().any(|t| t == topic) {
            return false;
        }
        self.topics_learned.push(topic.to_string());
        true
    }
}
