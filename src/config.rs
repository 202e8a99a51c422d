use anyhow::Result;
use chrono::{Datelike, Utc};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub environment: String,
    pub seed_sample_data: bool,
    pub allocation_year: i32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://hris.db".to_string()),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            seed_sample_data: env::var("SEED_SAMPLE_DATA")
                .map(|value| parse_flag(&value))
                .unwrap_or(false),
            allocation_year: env::var("ALLOCATION_YEAR")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or_else(|| Utc::now().year()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
