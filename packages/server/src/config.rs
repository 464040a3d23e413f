use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Postgres or SQLite connection URL.
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued session tokens, in days.
    pub token_ttl_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranscriptConfig {
    /// Caption language requested from YouTube. No fallback to other languages.
    pub language: String,
    pub request_timeout_secs: u64,
}

/// Settings for the generative language API used to write articles.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub transcript: TranscriptConfig,
    pub generation: GenerationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("TUBEBLOG_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        Self::builder()?
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., TUBEBLOG__GENERATION__API_KEY)
            .add_source(
                Environment::with_prefix("TUBEBLOG")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults for everything except secrets.
    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://tubeblog.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("auth.token_ttl_days", 7)?
            .set_default("transcript.language", "en")?
            .set_default("transcript.request_timeout_secs", 30)?
            .set_default(
                "generation.base_url",
                "https://generativelanguage.googleapis.com",
            )?
            .set_default("generation.model", "gemini-1.5-flash")?
            .set_default("generation.temperature", 1.0)?
            .set_default("generation.top_p", 0.95)?
            .set_default("generation.top_k", 64)?
            .set_default("generation.max_output_tokens", 1024)?
            .set_default("generation.request_timeout_secs", 120)
    }
}
