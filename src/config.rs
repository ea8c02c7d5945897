// src/config.rs

use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Seconds each quiz question may stay on screen before it is auto-advanced.
pub const QUESTION_TIME_LIMIT: u32 = 30;

/// Ticks (seconds) a completed session stays viewable without any request.
pub const COMPLETED_SESSION_TTL: u32 = 600;

/// Number of completed quizzes kept in the history collection.
pub const HISTORY_LIMIT: usize = 10;

/// Reading speed used for the estimated read time of a summary.
pub const WORDS_PER_MINUTE: usize = 200;

/// A finished quiz counts as passed from this percentage upwards.
pub const PASSING_SCORE_PERCENTAGE: u32 = 70;

/// Length of the abstract excerpt used when a paper summary can't be generated.
pub const ABSTRACT_FALLBACK_CHARS: usize = 300;

/// Storage keys of the two persisted collections.
pub const FLASHCARDS_KEY: &str = "mindmate-flashcards";
pub const QUIZ_HISTORY_KEY: &str = "mindmate-quiz-history";

#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the completion API. Missing means every LLM-backed
    /// endpoint answers with a configuration error.
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub openai_model: String,
    pub arxiv_api_url: String,
    pub arxiv_max_results: u32,
    pub storage_dir: String,
    pub bind_addr: String,
    pub quiz_time_limit: u32,
    pub max_upload_bytes: usize,
    pub rust_log: String,
}

impl Config {
    /// Reads the environment (and `.env`). Invalid values fall back to their
    /// defaults; the returned messages describe each one so they can be
    /// logged once tracing is up.
    pub fn from_env() -> (Self, Vec<String>) {
        dotenv().ok();
        let mut warnings = Vec::new();

        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let config = Self {
            openai_api_key,
            openai_api_base: env_or("OPENAI_API_BASE", "https://api.openai.com/v1"),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            arxiv_api_url: env_or("ARXIV_API_URL", "http://export.arxiv.org/api/query"),
            arxiv_max_results: parsed_or("ARXIV_MAX_RESULTS", 5, &mut warnings),
            storage_dir: env_or("STORAGE_DIR", "data"),
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:3000"),
            quiz_time_limit: parsed_or("QUIZ_TIME_LIMIT", QUESTION_TIME_LIMIT, &mut warnings),
            max_upload_bytes: parsed_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024, &mut warnings),
            rust_log: env_or("RUST_LOG", "info"),
        };
        (config, warnings)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_api_base: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            arxiv_api_url: "http://export.arxiv.org/api/query".to_string(),
            arxiv_max_results: 5,
            storage_dir: "data".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            quiz_time_limit: QUESTION_TIME_LIMIT,
            max_upload_bytes: 10 * 1024 * 1024,
            rust_log: "info".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: FromStr>(key: &str, default: T, warnings: &mut Vec<String>) -> T {
    parse_setting(key, env::var(key).ok(), default, warnings)
}

fn parse_setting<T: FromStr>(
    key: &str,
    raw: Option<String>,
    default: T,
    warnings: &mut Vec<String>,
) -> T {
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warnings.push(format!("Ignoring invalid value for {}: {:?}", key, raw));
            default
        }),
        None => default,
    }
}
