use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.jobyaari.com/category";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_COMPLETION_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

pub const RAW_TABLE_FILE: &str = "jobyaari_jobs.csv";
pub const CLEANED_TABLE_FILE: &str = "jobyaari_jobs_cleaned.csv";
pub const LOG_FILE: &str = "jobyaari-board.log";

/// Scraper settings.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Completion endpoint settings.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_url: String,
    /// `None` makes every chat request fail with an error reply.
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_COMPLETION_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 500,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub fetch: FetchConfig,
    pub assistant: AssistantConfig,
    pub data_dir: PathBuf,
    pub refresh_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            assistant: AssistantConfig::default(),
            data_dir: PathBuf::from("data"),
            refresh_interval: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first
    /// when present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();

        let defaults = Config::default();
        Ok(Self {
            fetch: FetchConfig {
                base_url: var_or("JOBYAARI_BASE_URL", defaults.fetch.base_url),
                user_agent: var_or("JOBYAARI_USER_AGENT", defaults.fetch.user_agent),
                timeout: Duration::from_secs(parsed_or("JOBYAARI_FETCH_TIMEOUT_SECS", 10)?),
            },
            assistant: AssistantConfig {
                api_url: var_or("GROQ_API_URL", defaults.assistant.api_url),
                api_key: non_blank_var("GROQ_API_KEY"),
                model: var_or("GROQ_MODEL", defaults.assistant.model),
                max_tokens: parsed_or("GROQ_MAX_TOKENS", defaults.assistant.max_tokens)?,
                timeout: Duration::from_secs(parsed_or("GROQ_TIMEOUT_SECS", 60)?),
            },
            data_dir: non_blank_var("JOBYAARI_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            refresh_interval: Duration::from_secs(parsed_or("JOBYAARI_REFRESH_SECS", 60)?),
        })
    }

    pub fn raw_table_path(&self) -> PathBuf {
        self.data_dir.join(RAW_TABLE_FILE)
    }

    pub fn cleaned_table_path(&self) -> PathBuf {
        self.data_dir.join(CLEANED_TABLE_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

/// The variable's value, or `None` when it is unset or blank.
fn non_blank_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(key: &str, default: String) -> String {
    non_blank_var(key).unwrap_or(default)
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_blank_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got {raw:?}")),
        None => Ok(default),
    }
}
