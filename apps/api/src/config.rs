use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails immediately if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub mistral_api_key: String,
    pub webhook_secret: String,
    pub port: u16,
    pub rust_log: String,
    /// Match-score weight overrides. Defaults: 0.40 / 0.35 / 0.25.
    pub weight_similarity: f64,
    pub weight_experience: f64,
    pub weight_skills: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            mistral_api_key: require_env("MISTRAL_API_KEY")?,
            webhook_secret: require_env("WEBHOOK_SECRET")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            weight_similarity: weight_env("MATCH_WEIGHT_SIMILARITY", 0.40)?,
            weight_experience: weight_env("MATCH_WEIGHT_EXPERIENCE", 0.35)?,
            weight_skills: weight_env("MATCH_WEIGHT_SKILLS", 0.25)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn weight_env(key: &str, default: f64) -> Result<f64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("{key} must be a number")),
        Err(_) => Ok(default),
    }
}
