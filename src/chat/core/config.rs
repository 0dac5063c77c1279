//! Configuration for the chat session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chat::core::errors::{ChatError, ChatResult};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "MEETING_ASSISTANT_";

/// Top-level configuration for a chat session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Characters kept in a conversation preview before the ellipsis.
    pub preview_max_chars: usize,
    /// Marker appended to truncated previews.
    pub preview_ellipsis: String,
    /// Lower bound of the simulated reply delay.
    pub reply_delay_min_ms: u64,
    /// Upper bound of the simulated reply delay (inclusive).
    pub reply_delay_max_ms: u64,
    /// Polling cadence of the async reply pump.
    pub pump_tick_ms: u64,
    /// Title given to conversations started by the user.
    pub new_conversation_title: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            preview_max_chars: 50,
            preview_ellipsis: "...".to_string(),
            reply_delay_min_ms: 1500,
            reply_delay_max_ms: 2500,
            pump_tick_ms: 100,
            new_conversation_title: "New Conversation".to_string(),
        }
    }
}

impl ChatConfig {
    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ChatResult<()> {
        if self.preview_max_chars == 0 {
            return Err(ChatError::InvalidConfig(
                "preview_max_chars must be > 0".to_string(),
            ));
        }

        if self.reply_delay_min_ms > self.reply_delay_max_ms {
            return Err(ChatError::InvalidConfig(format!(
                "reply_delay_min_ms ({}) must be <= reply_delay_max_ms ({})",
                self.reply_delay_min_ms, self.reply_delay_max_ms
            )));
        }

        if self.pump_tick_ms == 0 {
            return Err(ChatError::InvalidConfig(
                "pump_tick_ms must be > 0".to_string(),
            ));
        }

        if self.new_conversation_title.trim().is_empty() {
            return Err(ChatError::InvalidConfig(
                "new_conversation_title must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a JSON document. Missing keys take defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is invalid or fails validation.
    pub fn from_json_str(raw: &str) -> ChatResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `MEETING_ASSISTANT_*` environment variables.
    ///
    /// # Errors
    /// Returns an error if an override does not parse or validation fails.
    pub fn from_env() -> ChatResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`, keyed by full variable name.
    ///
    /// # Errors
    /// Returns an error if an override does not parse or validation fails.
    pub fn from_lookup<F>(lookup: F) -> ChatResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(raw) = var("PREVIEW_MAX_CHARS") {
            config.preview_max_chars = parse_number("PREVIEW_MAX_CHARS", &raw)?;
        }
        if let Some(raw) = var("REPLY_MIN_MS") {
            config.reply_delay_min_ms = parse_number("REPLY_MIN_MS", &raw)?;
        }
        if let Some(raw) = var("REPLY_MAX_MS") {
            config.reply_delay_max_ms = parse_number("REPLY_MAX_MS", &raw)?;
        }
        if let Some(raw) = var("PUMP_TICK_MS") {
            config.pump_tick_ms = parse_number("PUMP_TICK_MS", &raw)?;
        }
        if let Some(title) = var("NEW_CONVERSATION_TITLE") {
            config.new_conversation_title = title;
        }

        config.validate()?;
        Ok(config)
    }

    /// Pump polling interval.
    #[must_use]
    pub const fn pump_tick(&self) -> Duration {
        Duration::from_millis(self.pump_tick_ms)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> ChatResult<T> {
    raw.trim().parse().map_err(|_| {
        ChatError::InvalidConfig(format!("{ENV_PREFIX}{name} is not a number: {raw:?}"))
    })
}

/// Builder for chat configuration.
#[derive(Debug, Clone, Default)]
pub struct ChatConfigBuilder {
    preview_max_chars: Option<usize>,
    reply_delay_ms: Option<(u64, u64)>,
    pump_tick_ms: Option<u64>,
    new_conversation_title: Option<String>,
}

impl ChatConfigBuilder {
    /// Create a new builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preview truncation threshold.
    #[must_use]
    pub const fn preview_max_chars(mut self, chars: usize) -> Self {
        self.preview_max_chars = Some(chars);
        self
    }

    /// Set the simulated reply delay bounds in milliseconds.
    #[must_use]
    pub const fn reply_delay_ms(mut self, min: u64, max: u64) -> Self {
        self.reply_delay_ms = Some((min, max));
        self
    }

    /// Set the pump polling interval in milliseconds.
    #[must_use]
    pub const fn pump_tick_ms(mut self, tick: u64) -> Self {
        self.pump_tick_ms = Some(tick);
        self
    }

    /// Set the title used for new conversations.
    #[must_use]
    pub fn new_conversation_title(mut self, title: impl Into<String>) -> Self {
        self.new_conversation_title = Some(title.into());
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    /// Returns an error if the resulting configuration is invalid.
    pub fn build(self) -> ChatResult<ChatConfig> {
        let default = ChatConfig::default();
        let (min, max) = self
            .reply_delay_ms
            .unwrap_or((default.reply_delay_min_ms, default.reply_delay_max_ms));
        let config = ChatConfig {
            preview_max_chars: self.preview_max_chars.unwrap_or(default.preview_max_chars),
            preview_ellipsis: default.preview_ellipsis,
            reply_delay_min_ms: min,
            reply_delay_max_ms: max,
            pump_tick_ms: self.pump_tick_ms.unwrap_or(default.pump_tick_ms),
            new_conversation_title: self
                .new_conversation_title
                .unwrap_or(default.new_conversation_title),
        };
        config.validate()?;
        Ok(config)
    }
}
