use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    /// Unset means the process keeps quizzes in memory only.
    pub database_url: Option<String>,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub openai_timeout_secs: u64,
    pub max_questions: usize,
    pub pdftotext_bin: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:8000"),
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            openai_api_key: get_env("OPENAI_API_KEY")?,
            openai_base_url: get_env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            llm_model: get_env_or("LLM_MODEL", "gpt-4o-mini"),
            openai_timeout_secs: get_env_parse_or("OPENAI_TIMEOUT_SECS", 120)?,
            max_questions: get_env_parse_or("MAX_QUESTIONS", 50)?,
            pdftotext_bin: get_env_or("PDFTOTEXT_BIN", "pdftotext"),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_trims_and_parses() {
        let n: usize = parse_value("MAX_QUESTIONS", " 25 ").unwrap();
        assert_eq!(n, 25);
    }

    #[test]
    fn parse_value_reports_variable_name() {
        let err = parse_value::<u64>("OPENAI_TIMEOUT_SECS", "soon").unwrap_err();
        match err {
            Error::Config(msg) => assert!(msg.contains("OPENAI_TIMEOUT_SECS")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
