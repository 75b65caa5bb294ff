#![forbid(unsafe_code)]

//! Runtime messages exchanged with the extension scripts.
//!
//! Both directions use a `type` tag with kebab-case names, matching what the
//! page, content and background scripts already post to each other.

use serde::{Deserialize, Serialize};
use skypal_core::lang::Language;
use skypal_widgets::command_palette::{CommandAction, HostSetting};

use crate::BridgeError;

/// Messages the palette receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundMessage {
    /// The keyboard shortcut or context menu asked for the palette.
    OpenPalette,
    /// The host app's display language (re)detected.
    BskyLang {
        /// Language code; unsupported codes fall back to the base language.
        lang: String,
    },
}

impl InboundMessage {
    /// Language announcement for `lang`.
    #[must_use]
    pub fn bsky_lang(lang: Language) -> Self {
        Self::BskyLang {
            lang: lang.code().to_owned(),
        }
    }

    /// Decode a message from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Encode as a JSON string.
    pub fn to_json_string(&self) -> Result<String, BridgeError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Messages the palette asks the host to deliver or act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OutboundMessage {
    /// Visibility changed; drives the page's focus guard.
    PaletteOpenState {
        /// Whether the palette is now open.
        open: bool,
    },
    /// Client-side route change inside the host app.
    Navigate {
        /// Absolute path, e.g. `/messages`.
        path: String,
    },
    /// Ask the extension runtime to open its keyboard-shortcut settings.
    EditShortcut,
    /// Focus the palette's query input now.
    FocusInput,
}

impl OutboundMessage {
    /// Encode as a JSON string.
    pub fn to_json_string(&self) -> Result<String, BridgeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a message from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(s)?)
    }
}

impl From<CommandAction> for OutboundMessage {
    fn from(action: CommandAction) -> Self {
        match action {
            CommandAction::Navigate(path) => Self::Navigate {
                path: path.into_owned(),
            },
            CommandAction::OpenHostSetting(HostSetting::KeyboardShortcut) => Self::EditShortcut,
        }
    }
}
