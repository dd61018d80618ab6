use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub num_predict: u32,
    pub tokens_per_question: u32,
    /// No timeout is applied to the model call unless this is set.
    pub ollama_timeout_secs: Option<u64>,
    pub max_questions: usize,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1:3000".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "mistral:7b".to_string(),
            temperature: 0.2,
            top_p: 0.9,
            num_predict: 1500,
            tokens_per_question: 300,
            ollama_timeout_secs: None,
            max_questions: 50,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", defaults.server_address),
            ollama_url: get_env_or("OLLAMA_URL", defaults.ollama_url),
            ollama_model: get_env_or("OLLAMA_MODEL", defaults.ollama_model),
            temperature: get_env_parse_or("OLLAMA_TEMPERATURE", defaults.temperature)?,
            top_p: get_env_parse_or("OLLAMA_TOP_P", defaults.top_p)?,
            num_predict: get_env_parse_or("OLLAMA_NUM_PREDICT", defaults.num_predict)?,
            tokens_per_question: get_env_parse_or(
                "OLLAMA_TOKENS_PER_QUESTION",
                defaults.tokens_per_question,
            )?,
            ollama_timeout_secs: get_env_parse_opt("OLLAMA_TIMEOUT_SECS")?,
            max_questions: get_env_parse_or("MAX_QUESTIONS", defaults.max_questions)?,
        })
    }
}

fn get_env_or(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}

fn get_env_parse_opt<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(None),
    }
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(get_env_parse_opt(name)?.unwrap_or(default))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
