use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::database::user_store::ProfileUpdate;
use crate::dto::auth_dto::UserSummary;
use crate::models::user::{User, UserStats};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub stats: UserStats,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatsPayload {
    pub study_sessions: Option<u32>,
    pub ai_interactions: Option<u32>,
    pub topics_learned: Option<Vec<String>>,
}

impl UpdateStatsPayload {
    pub fn apply(self, stats: &mut UserStats) {
        if let Some(study_sessions) = self.study_sessions {
            stats.study_sessions = study_sessions;
        }
        if let Some(ai_interactions) = self.ai_interactions {
            stats.ai_interactions = ai_interactions;
        }
        if let Some(topics_learned) = self.topics_learned {
            stats.topics_learned = topics_learned;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatsResponse {
    pub message: String,
    pub stats: UserStats,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddTopicPayload {
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicsResponse {
    pub message: String,
    pub topics_learned: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub stats: UserStats,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
            last_login: user.last_login,
            stats: user.stats,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
}

impl From<UpdateProfilePayload> for ProfileUpdate {
    fn from(payload: UpdateProfilePayload) -> Self {
        Self {
            first_name: payload.first_name,
            last_name: payload.last_name,
            name: payload.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub user: UserSummary,
}
