#![forbid(unsafe_code)]

//! Bridge configuration.
//!
//! Every field has a default, so `{}` is a valid configuration and hosts only
//! spell out what they change.

use core::time::Duration;

use serde::{Deserialize, Serialize};
use skypal_core::lang::HOST_STORAGE_KEY;
use skypal_widgets::command_palette::PaletteText;

use crate::BridgeError;

/// Origin the palette is allowed to open on.
pub const DEFAULT_HOST_ORIGIN: &str = "https://bsky.app/";

/// Configuration for [`crate::PaletteHost`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Tabs whose URL starts with this prefix get the palette.
    pub host_origin: String,
    /// Client-side storage key holding the host app's preferences.
    pub storage_key: String,
    /// Delay between a focus request and each focus attempt.
    pub focus_retry_delay_ms: u64,
    /// Focus attempts per request before giving up.
    pub focus_max_attempts: u32,
    /// Rows visible without scrolling.
    pub max_visible: usize,
    /// Query input placeholder.
    pub placeholder: String,
    /// Shown when no command matches.
    pub empty_message: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let text = PaletteText::default();
        Self {
            host_origin: DEFAULT_HOST_ORIGIN.to_owned(),
            storage_key: HOST_STORAGE_KEY.to_owned(),
            focus_retry_delay_ms: 100,
            focus_max_attempts: 5,
            max_visible: 6,
            placeholder: text.placeholder,
            empty_message: text.empty_message,
        }
    }
}

impl PaletteConfig {
    /// Parse a (possibly partial) JSON configuration and validate it.
    pub fn from_json_str(s: &str) -> Result<Self, BridgeError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the palette cannot work with.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.max_visible == 0 {
            return Err(BridgeError::Invalid("max_visible must be at least 1"));
        }
        if self.focus_max_attempts == 0 {
            return Err(BridgeError::Invalid("focus_max_attempts must be at least 1"));
        }
        if self.host_origin.is_empty() {
            return Err(BridgeError::Invalid("host_origin must not be empty"));
        }
        Ok(())
    }

    /// Set the allowed host origin (builder).
    #[must_use]
    pub fn with_host_origin(mut self, origin: impl Into<String>) -> Self {
        self.host_origin = origin.into();
        self
    }

    /// Set the storage key (builder).
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the focus retry policy (builder).
    #[must_use]
    pub fn with_focus_retry(mut self, delay: Duration, max_attempts: u32) -> Self {
        self.focus_retry_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.focus_max_attempts = max_attempts;
        self
    }

    /// Set the visible row count (builder).
    #[must_use]
    pub fn with_max_visible(mut self, n: usize) -> Self {
        self.max_visible = n;
        self
    }

    /// Delay between focus attempts.
    #[must_use]
    pub fn focus_retry_delay(&self) -> Duration {
        Duration::from_millis(self.focus_retry_delay_ms)
    }

    /// Palette strings.
    #[must_use]
    pub fn text(&self) -> PaletteText {
        PaletteText {
            placeholder: self.placeholder.clone(),
            empty_message: self.empty_message.clone(),
        }
    }
}
