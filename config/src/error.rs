use std::fmt;

/// Fatal configuration problems, detected before any provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No API key in the environment or settings file
    MissingApiKey,

    /// Empty or otherwise unusable model identifier
    InvalidModel(String),

    /// Sampling temperature outside the accepted [0, 2] range
    InvalidTemperature(String),

    /// Output token limit must be a positive integer
    InvalidMaxTokens(String),

    /// History cap too small to hold a system turn plus one exchange
    InvalidHistoryCap(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey => {
                write!(f, "No API key configured (set LIMERA_API_KEY or API_KEY)")
            }
            ConfigError::InvalidModel(msg) => write!(f, "Invalid model: {}", msg),
            ConfigError::InvalidTemperature(msg) => write!(f, "Invalid temperature: {}", msg),
            ConfigError::InvalidMaxTokens(msg) => write!(f, "Invalid max output tokens: {}", msg),
            ConfigError::InvalidHistoryCap(msg) => write!(f, "Invalid history cap: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
