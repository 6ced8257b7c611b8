//! Application settings management

use crate::{ConfigError, PathManager};
use serde::{Deserialize, Serialize};
use std::fs;

/// Default Socratic tutoring instruction, sent once per conversation as the
/// system preamble.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert limerick writer helping a student \
learn to write limericks using the Socratic method. Never directly provide the answer or write \
the student's limerick for them. Your responses must consist of carefully guided questions or \
hints that lead the student toward discovering rhyme, meter, and structure on their own.";

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.5
}

fn default_max_output_tokens() -> u32 {
    256
}

fn default_max_history_turns() -> usize {
    50
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_completions_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_rhyme_url() -> String {
    "https://api.datamuse.com".to_string()
}

/// Application settings stored in settings.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// API key for the completion provider. Usually supplied via the
    /// LIMERA_API_KEY (or API_KEY) environment variable rather than the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Completion model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature, valid range [0, 2]
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on reply length, in tokens
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Conversation length cap, counting the system turn
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
    /// System preamble for every conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Base URL of the completion provider
    #[serde(default = "default_completions_url")]
    pub completions_url: String,
    /// Base URL of the rhyme provider
    #[serde(default = "default_rhyme_url")]
    pub rhyme_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            max_history_turns: default_max_history_turns(),
            system_prompt: default_system_prompt(),
            completions_url: default_completions_url(),
            rhyme_url: default_rhyme_url(),
        }
    }
}

impl Settings {
    /// Load settings from the settings file, or return defaults if not found.
    /// The API key environment variables always win over the file.
    pub fn load() -> Self {
        let mut settings = Self::load_file();
        if let Some(key) = Self::api_key_from_env() {
            settings.api_key = Some(key);
        }
        settings
    }

    fn load_file() -> Self {
        let Some(path) = PathManager::settings_path() else {
            return Self::default();
        };

        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };

        toml::from_str(&content).unwrap_or_default()
    }

    fn api_key_from_env() -> Option<String> {
        std::env::var("LIMERA_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    /// Save settings to the settings file
    pub fn save(&self) -> Result<(), String> {
        let path = PathManager::settings_path().ok_or("Could not determine settings path")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        fs::write(&path, content).map_err(|e| format!("Failed to write settings: {}", e))?;
        Ok(())
    }

    /// Check everything a provider call depends on. A failure here is fatal:
    /// no provider call may be made with an invalid configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.api_key {
            Some(key) if !key.trim().is_empty() => {}
            _ => return Err(ConfigError::MissingApiKey),
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel("model id is empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(format!(
                "{} is outside [0, 2]",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(
                "must be positive".to_string(),
            ));
        }
        if self.max_history_turns < 2 {
            return Err(ConfigError::InvalidHistoryCap(format!(
                "{} leaves no room for a user turn",
                self.max_history_turns
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        Settings {
            api_key: Some("sk-test".to_string()),
            ..Settings::default()
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.model, "gpt-4o-mini");
        assert_eq!(s.temperature, 0.5);
        assert_eq!(s.max_output_tokens, 256);
        assert_eq!(s.max_history_turns, 50);
        assert!(s.system_prompt.contains("Socratic"));
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let s = Settings::default();
        assert_eq!(s.validate(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn blank_api_key_is_fatal() {
        let s = Settings {
            api_key: Some("   ".to_string()),
            ..Settings::default()
        };
        assert_eq!(s.validate(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn valid_settings_pass() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn temperature_out_of_range_is_rejected() {
        let s = Settings {
            temperature: 2.5,
            ..valid_settings()
        };
        assert!(matches!(
            s.validate(),
            Err(ConfigError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn zero_max_tokens_is_rejected() {
        let s = Settings {
            max_output_tokens: 0,
            ..valid_settings()
        };
        assert!(matches!(s.validate(), Err(ConfigError::InvalidMaxTokens(_))));
    }

    #[test]
    fn partial_settings_file_fills_in_defaults() {
        let s: Settings = toml::from_str("model = \"gpt-4o\"").unwrap();
        assert_eq!(s.model, "gpt-4o");
        assert_eq!(s.max_history_turns, 50);
        assert_eq!(s.temperature, 0.5);
    }
}
