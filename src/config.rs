//! Configuration for the Dhonk Craft chat backend
//!
//! All tunables live in one TOML file. Secrets are never stored in the file
//! itself; the config names the environment variables that hold them and the
//! values are read at runtime.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatConfig {
    #[serde(default)]
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub llm: LlmSection,
    /// Optional overrides for the built-in contact directory
    pub contacts: Option<ContactsSection>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Port to listen on (the PORT environment variable wins over this)
    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_server_port(),
        }
    }
}

fn default_server_port() -> u16 {
    5000
}

/// Postgres content store settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseSection {
    #[serde(default = "default_database_host")]
    pub host: String,
    #[serde(default = "default_database_port")]
    pub port: u16,
    /// Database name
    pub name: String,
    /// Role to connect as
    pub user: String,
    /// Environment variable containing the password
    #[serde(default = "default_database_password_env")]
    pub password_env: String,
}

fn default_database_host() -> String {
    "localhost".to_string()
}

fn default_database_port() -> u16 {
    5432
}

fn default_database_password_env() -> String {
    "DB_PASSWORD".to_string()
}

/// LLM fallback settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmSection {
    /// Provider name (e.g., "openai", "anthropic")
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Environment variable containing the API key
    pub api_key_env: String,
    /// Sampling temperature (0.0 to 2.0)
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    /// Optional max tokens
    pub max_tokens: Option<u32>,
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_temperature() -> f32 {
    0.6
}

/// Contact directory overrides
///
/// Each entry replaces the corresponding built-in contact wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactsSection {
    pub founder: Option<ContactEntry>,
    pub general_manager: Option<ContactEntry>,
}

/// A single person in the contact directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactEntry {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ChatConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ChatConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field ranges and cross-field consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidConfig(
                "server.port must be non-zero".to_string(),
            ));
        }

        match self.llm.provider.as_str() {
            "openai" | "anthropic" => {}
            other => {
                return Err(ConfigError::InvalidConfig(format!(
                    "Unknown LLM provider '{other}' (expected 'openai' or 'anthropic')"
                )));
            }
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidConfig(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        Ok(())
    }

    /// Helper method to get environment variable without error propagation
    fn get_env_var_optional(env_var_name: &str) -> Option<String> {
        std::env::var(env_var_name).ok()
    }

    /// Helper method to get environment variable with error propagation
    fn get_env_var_required(env_var_name: &str) -> Result<String, ConfigError> {
        std::env::var(env_var_name)
            .map_err(|_| ConfigError::EnvVarNotFound(env_var_name.to_string()))
    }

    /// Get the database password from its environment variable, if set
    pub fn get_database_password(&self) -> Option<String> {
        Self::get_env_var_optional(&self.database.password_env)
    }

    /// Get the LLM API key from its environment variable
    pub fn get_llm_api_key(&self) -> Result<String, ConfigError> {
        Self::get_env_var_required(&self.llm.api_key_env)
    }

    /// Create a test configuration for unit testing
    #[cfg(test)]
    pub fn test_config() -> Self {
        let toml_content = r#"
[server]
port = 5000

[database]
host = "localhost"
name = "dhonk"
user = "dhonk"

[llm]
provider = "openai"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"
temperature = 0.6
"#;
        toml::from_str(toml_content).expect("Test config should parse")
    }
}
