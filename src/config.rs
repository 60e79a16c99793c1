use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;

const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub openai_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub openrouter_model: String,
    pub ai_timeout_secs: u64,
    pub frontend_url: Option<String>,
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:5000"),
            database_url: get_env_opt("DATABASE_URL"),
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_ttl_hours: get_env_parse_or("JWT_TTL_HOURS", 168)?,
            openai_api_key: get_env_opt("OPENAI_API_KEY"),
            openrouter_base_url: get_env_or("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1"),
            openrouter_model: get_env_or("OPENROUTER_MODEL", "microsoft/wizardlm-2-8x22b"),
            ai_timeout_secs: get_env_parse_or("AI_TIMEOUT_SECS", 30)?,
            frontend_url: get_env_opt("FRONTEND_URL"),
            rate_limit_max: get_env_parse_or("RATE_LIMIT_MAX", 100)?,
            rate_limit_window_secs: get_env_parse_or("RATE_LIMIT_WINDOW_SECS", 900)?,
        })
    }

    /// Configuration for in-process tests: in-memory store, no upstream key.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            server_address: "127.0.0.1:0".to_string(),
            database_url: None,
            jwt_secret: jwt_secret.to_string(),
            jwt_ttl_hours: 1,
            openai_api_key: None,
            openrouter_base_url: "http://127.0.0.1:9/api/v1".to_string(),
            openrouter_model: "test-model".to_string(),
            ai_timeout_secs: 1,
            frontend_url: None,
            rate_limit_max: 1000,
            rate_limit_window_secs: 60,
        }
    }

    /// Returns the API key only when it looks like a real OpenRouter/OpenAI key.
    pub fn configured_api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| is_usable_api_key(key))
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![
            "http://localhost:5173".to_string(),
            "http://127.0.0.1:5173".to_string(),
        ];
        if let Some(url) = &self.frontend_url {
            origins.push(url.clone());
        }
        origins
    }
}

pub fn is_usable_api_key(key: &str) -> bool {
    !key.is_empty() && key != PLACEHOLDER_API_KEY && key.starts_with("sk-")
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or(name: &str, default: &str) -> String {
    get_env_opt(name).unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}
