use chrono::Utc;
use uuid::Uuid;

use crate::database::user_store::UserStore;
use crate::models::user::ActivityKind;

#[derive(Clone)]
pub struct ActivityService {
    users: UserStore,
}

impl ActivityService {
    pub fn new(users: UserStore) -> Self {
        Self { users }
    }

    /// Records a completed AI interaction. A failure here never fails the
    /// request that produced the interaction.
    pub async fn record(&self, user_id: Uuid, kind: ActivityKind, topic: Option<&str>) {
        let now = Utc::now();
        let result = self
            .users
            .update_stats(user_id, |stats| stats.record_interaction(kind, topic, now))
            .await;
        match result {
            Ok(stats) => tracing::debug!(
                %user_id,
                ?kind,
                ai_interactions = stats.ai_interactions,
                "activity recorded"
            ),
            Err(e) => tracing::warn!(%user_id, ?kind, error = ?e, "failed to record activity"),
        }
    }
}
