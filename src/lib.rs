pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;

use crate::config::Config;
use crate::database::user_store::UserStore;
use crate::error::{Error, Result};
use crate::services::{activity_service::ActivityService, ai_service::AIService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: UserStore,
    pub ai_service: AIService,
    pub activity_service: ActivityService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, users: UserStore) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.ai_timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {}", e)))?;

        let ai_service = AIService::new(&config, http_client);
        let activity_service = ActivityService::new(users.clone());

        Ok(Self {
            config: Arc::new(config),
            users,
            ai_service,
            activity_service,
            started_at: Instant::now(),
        })
    }
}
