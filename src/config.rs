//! Configuration management for the docs server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// One year, for immutable build-time content
const DEFAULT_CACHE_MAX_AGE: u64 = 31_536_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// Root of the Markdown/MDX tree
    pub dir: PathBuf,
    /// `max-age` for llms responses, in seconds
    pub cache_max_age: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            content: ContentConfig {
                dir: PathBuf::from("content/docs"),
                cache_max_age: DEFAULT_CACHE_MAX_AGE,
            },
        }
    }
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// Unset variables take their defaults and unparsable numbers fall back
    /// to the default. Non-unicode values are an error.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            server: ServerConfig {
                host: var_or("SERVER_HOST", "0.0.0.0")?,
                port: var_or("SERVER_PORT", "3000")?.parse().unwrap_or(3000),
            },
            content: ContentConfig {
                dir: PathBuf::from(var_or("DOCS_CONTENT_DIR", "content/docs")?),
                cache_max_age: var_or("DOCS_CACHE_MAX_AGE", "")?
                    .parse()
                    .unwrap_or(DEFAULT_CACHE_MAX_AGE),
            },
        })
    }

    /// `Cache-Control` value for generated text
    pub fn cache_control(&self) -> String {
        format!(
            "public, max-age={}, immutable",
            self.content.cache_max_age
        )
    }
}

fn var_or(name: &str, default: &str) -> Result<String, env::VarError> {
    match env::var(name) {
        Ok(value) => Ok(value),
        Err(env::VarError::NotPresent) => Ok(default.to_string()),
        Err(e) => Err(e),
    }
}
