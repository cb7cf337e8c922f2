use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    /// `None` runs on the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting, requests per minute and client IP. 0 disables.
    pub rate_attendance_per_min: u32,
    pub rate_api_per_min: u32,

    pub max_page_size: u64,
    pub log_dir: String,
    pub log_level: tracing::Level,
    pub seed_demo_data: bool,
}

fn var_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            db_max_connections: var_or("DB_MAX_CONNECTIONS", 10)?,
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            rate_attendance_per_min: var_or("RATE_ATTENDANCE_PER_MIN", 120)?,
            rate_api_per_min: var_or("RATE_API_PER_MIN", 1000)?,

            max_page_size: var_or("MAX_PAGE_SIZE", 1000)?,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: var_or("LOG_LEVEL", tracing::Level::INFO)?,
            seed_demo_data: var_or("SEED_DEMO_DATA", false)?,
        })
    }
}

#[cfg(test)]
impl Config {
    /// In-memory store, limiters off.
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            db_max_connections: 1,
            server_addr: "127.0.0.1:0".to_string(),
            api_prefix: "/api".to_string(),
            rate_attendance_per_min: 0,
            rate_api_per_min: 0,
            max_page_size: 1000,
            log_dir: "logs".to_string(),
            log_level: tracing::Level::INFO,
            seed_demo_data: false,
        }
    }
}
