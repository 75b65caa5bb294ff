#![forbid(unsafe_code)]

//! Supported display languages and host language detection.
//!
//! The set of languages is closed. [`Language::BASE`] is the reference
//! language: every command name exists in it and it comes first wherever
//! languages are iterated.
//!
//! The host application keeps its preferences as JSON in client-side storage
//! under [`HOST_STORAGE_KEY`]. [`detect_language`] reads the nested
//! `languagePrefs.appLanguage` field and falls back to the base language for
//! anything missing, malformed or unsupported.

use std::borrow::Cow;
use std::fmt;

use serde::Deserialize;

/// Storage key under which the host app keeps its preferences.
pub const HOST_STORAGE_KEY: &str = "BSKY_STORAGE";

/// A supported display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// English (base language).
    #[default]
    En,
    /// Japanese.
    Ja,
}

impl Language {
    /// Every supported language, base language first.
    pub const ALL: [Self; 2] = [Self::En, Self::Ja];

    /// Number of supported languages.
    pub const COUNT: usize = Self::ALL.len();

    /// The base/reference language.
    pub const BASE: Self = Self::ALL[0];

    /// Language code as used by the host app.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ja => "ja",
        }
    }

    /// Parse a language code. Unsupported codes yield `None`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Parse a language code, falling back to [`Language::BASE`].
    #[must_use]
    pub fn from_code_or_base(code: &str) -> Self {
        Self::from_code(code).unwrap_or(Self::BASE)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A string with one entry per supported language.
///
/// Holding a fixed slot per language makes "every language has an entry" a
/// property of the type rather than a runtime check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localized {
    entries: [Cow<'static, str>; Language::COUNT],
}

impl Localized {
    /// Localized text from static strings, in [`Language::ALL`] order.
    #[must_use]
    pub const fn new(en: &'static str, ja: &'static str) -> Self {
        Self {
            entries: [Cow::Borrowed(en), Cow::Borrowed(ja)],
        }
    }

    /// Localized text from owned strings.
    #[must_use]
    pub fn owned(en: impl Into<String>, ja: impl Into<String>) -> Self {
        Self {
            entries: [Cow::Owned(en.into()), Cow::Owned(ja.into())],
        }
    }

    /// Text for `lang`.
    #[must_use]
    pub fn get(&self, lang: Language) -> &str {
        &self.entries[lang.index()]
    }

    /// Text in the base language.
    #[must_use]
    pub fn base(&self) -> &str {
        self.get(Language::BASE)
    }
}

#[derive(Debug, Default, Deserialize)]
struct HostStorage {
    #[serde(rename = "languagePrefs", default)]
    language_prefs: Option<LanguagePrefs>,
}

#[derive(Debug, Default, Deserialize)]
struct LanguagePrefs {
    #[serde(rename = "appLanguage", default)]
    app_language: Option<String>,
}

/// Detect the active language from the raw host storage value.
///
/// `None` (key absent), malformed JSON, unexpected shapes and unsupported
/// codes all yield [`Language::BASE`]. Never fails.
#[must_use]
pub fn detect_language(raw: Option<&str>) -> Language {
    let Some(raw) = raw else {
        return Language::BASE;
    };
    let storage: HostStorage = match serde_json::from_str(raw) {
        Ok(storage) => storage,
        Err(_err) => {
            crate::debug!(error = %_err, "host storage is not valid preferences JSON");
            return Language::BASE;
        }
    };
    storage
        .language_prefs
        .and_then(|prefs| prefs.app_language)
        .map_or(Language::BASE, |code| Language::from_code_or_base(&code))
}
