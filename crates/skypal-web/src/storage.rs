#![forbid(unsafe_code)]

//! Host language detection from client-side storage.
//!
//! The page script reads the host app's preferences once at startup and again
//! on every `storage` event for the preferences key, and announces the result
//! as a `bsky-lang` message.

use skypal_core::lang::{Language, detect_language};

use crate::message::InboundMessage;

/// Language announcement for the raw preferences value read at startup.
///
/// `raw` is `None` when the key is absent.
#[must_use]
pub fn initial_language_message(raw: Option<&str>) -> InboundMessage {
    InboundMessage::bsky_lang(detect_language(raw))
}

/// Language announcement for a `storage` event.
///
/// Returns `None` unless `key` is the preferences key. `key` is `None` when
/// the whole storage area was cleared. A removed value announces the base
/// language.
#[must_use]
pub fn storage_changed(
    storage_key: &str,
    key: Option<&str>,
    new_value: Option<&str>,
) -> Option<InboundMessage> {
    if key != Some(storage_key) {
        return None;
    }
    let lang = detect_language(new_value);
    tracing::debug!(lang = lang.code(), "host preferences changed");
    Some(InboundMessage::bsky_lang(lang))
}

/// Resolve the language carried by a `bsky-lang` message.
#[must_use]
pub fn announced_language(code: &str) -> Language {
    Language::from_code_or_base(code)
}
