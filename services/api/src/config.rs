use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub api_key: Option<String>,
    pub api_base: String,
    pub chat_model: String,
    pub log_level: Level,
}

// The key is left out so it never ends up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("api_base", &self.api_base)
            .field("chat_model", &self.chat_model)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// This function will look for a `.env` file in the current directory
    /// and load the following variables:
    ///
    /// *   `BIND_ADDRESS`: The address and port to bind the server to. Defaults to "0.0.0.0:8001".
    /// *   `GROQ_API_KEY`: Key for the chat-completions provider. Without it `/debate` answers 500.
    /// *   `CHAT_API_BASE`: (Optional) OpenAI-compatible API base. Defaults to "https://api.groq.com/openai/v1".
    /// *   `CHAT_MODEL`: (Optional) The model generating rebuttals. Defaults to "llama-3.3-70b-versatile".
    /// *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8001".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let api_key = lookup("GROQ_API_KEY").filter(|key| !key.trim().is_empty());

        let api_base = lookup("CHAT_API_BASE")
            .unwrap_or_else(|| "https://api.groq.com/openai/v1".to_string())
            .trim_end_matches('/')
            .to_string();

        let chat_model =
            lookup("CHAT_MODEL").unwrap_or_else(|| "llama-3.3-70b-versatile".to_string());

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            api_key,
            api_base,
            chat_model,
            log_level,
        })
    }
}
