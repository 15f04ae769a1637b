use std::env;
use std::str::FromStr;

/// Worker configuration loaded from environment variables. Everything has
/// a local-development default except the database URL and the primary
/// model API key.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub redis: RedisSettings,
    pub database: DatabaseSettings,
    pub llm: LlmSettings,
    pub stt: SttSettings,
    pub grading: GradingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub url: String,
    pub grading_queue: String,
    pub dead_letter_queue: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub model: String,
    pub api_base: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub retries: u32,
    pub temperature: f32,
    pub fallback_model: Option<String>,
    pub fallback_api_base: Option<String>,
    pub fallback_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SttSettings {
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: Option<String>,
    pub download_timeout_secs: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct GradingSettings {
    pub max_retries: u32,
    pub pop_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(Self {
            server: ServerSettings {
                port: parsed_var("SERVER_PORT", 3001)?,
            },
            redis: RedisSettings {
                url: var_or("REDIS_URL", "redis://localhost:6379/0"),
                grading_queue: var_or("GRADING_QUEUE", "grading:tasks"),
                dead_letter_queue: var_or("DEAD_LETTER_QUEUE", "grading:dead_letter"),
            },
            database: DatabaseSettings {
                url: required_var("DATABASE_URL")?,
                max_connections: parsed_var("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            llm: LlmSettings {
                model: var_or("LLM_MODEL", "gpt-4o-mini"),
                api_base: var_or("LLM_API_BASE", "https://api.openai.com/v1"),
                api_key: required_var("LLM_API_KEY")?,
                timeout_secs: parsed_var("LLM_TIMEOUT_SECS", 60)?,
                retries: parsed_var("LLM_RETRIES", 1)?,
                temperature: parsed_var("LLM_TEMPERATURE", 0.3)?,
                fallback_model: optional_var("LLM_FALLBACK_MODEL"),
                fallback_api_base: optional_var("LLM_FALLBACK_API_BASE"),
                fallback_api_key: optional_var("LLM_FALLBACK_API_KEY"),
            },
            stt: SttSettings {
                api_key: var_or("STT_API_KEY", ""),
                api_base: optional_var("STT_API_BASE"),
                model: optional_var("STT_MODEL"),
                download_timeout_secs: parsed_var("AUDIO_DOWNLOAD_TIMEOUT_SECS", 120)?,
                timeout_secs: parsed_var("STT_TIMEOUT_SECS", 120)?,
            },
            grading: GradingSettings {
                max_retries: parsed_var("MAX_RETRIES", 3)?,
                pop_timeout_secs: parsed_var("QUEUE_POP_TIMEOUT_SECS", 5)?,
            },
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn required_var(name: &str) -> Result<String, SettingsError> {
    env::var(name).map_err(|_| SettingsError::Missing(name.to_string()))
}

fn parsed_var<T: FromStr>(name: &str, default: T) -> Result<T, SettingsError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| SettingsError::Invalid(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required environment variable {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}
