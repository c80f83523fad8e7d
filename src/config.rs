//! Configuration management for the AI Tutor annotation service

use serde::Deserialize;
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub annotation_api: AnnotationApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Where overlay clients reach the annotation service
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite:./ai-tutor.db".to_string(),
            },
            annotation_api: AnnotationApiConfig {
                base_url: "http://localhost:3000".to_string(),
                token: None,
                timeout_secs: 10,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port)?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            annotation_api: AnnotationApiConfig {
                base_url: env::var("ANNOTATION_API_URL").unwrap_or(defaults.annotation_api.base_url),
                token: env::var("ANNOTATION_API_TOKEN").ok().filter(|t| !t.is_empty()),
                timeout_secs: parse_var(
                    "ANNOTATION_API_TIMEOUT_SECS",
                    defaults.annotation_api.timeout_secs,
                )?,
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_falls_back_to_default() {
        let port: u16 = parse_var("AI_TUTOR_TEST_UNSET_PORT", 4321).unwrap();
        assert_eq!(port, 4321);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("AI_TUTOR_TEST_BAD_PORT", "not-a-port");
        let result: Result<u16, _> = parse_var("AI_TUTOR_TEST_BAD_PORT", 3000);
        assert!(matches!(result, Err(ConfigError::InvalidValue { key: "AI_TUTOR_TEST_BAD_PORT", .. })));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert!(config.database.url.starts_with("sqlite:"));
        assert_eq!(config.annotation_api.timeout_secs, 10);
    }
}
