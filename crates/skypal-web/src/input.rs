#![forbid(unsafe_code)]

//! DOM keyboard event schema and normalization.
//!
//! The content script forwards `keydown`/`keyup` events from the palette's
//! input as JSON using the DOM property names:
//!
//! ```json
//! {"type":"keydown","key":"ArrowDown","code":"ArrowDown","ctrlKey":false,
//!  "altKey":false,"shiftKey":false,"metaKey":false,"repeat":false,
//!  "isComposing":false}
//! ```
//!
//! Events that belong to an IME composition are dropped: the Enter that
//! confirms a conversion candidate must never run a command.

use serde::{Deserialize, Serialize};
use skypal_core::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};

use crate::BridgeError;

/// DOM keyboard event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPhase {
    /// `keydown`.
    #[default]
    Keydown,
    /// `keyup`.
    Keyup,
}

/// A DOM `KeyboardEvent`, as forwarded by the content script.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomKeyEvent {
    /// `event.type`.
    #[serde(rename = "type")]
    pub phase: KeyPhase,
    /// `event.key`: the logical key, already shifted.
    pub key: String,
    /// `event.code`: the physical key.
    pub code: String,
    /// `event.ctrlKey`.
    pub ctrl_key: bool,
    /// `event.altKey`.
    pub alt_key: bool,
    /// `event.shiftKey`.
    pub shift_key: bool,
    /// `event.metaKey`.
    pub meta_key: bool,
    /// `event.repeat`.
    pub repeat: bool,
    /// `event.isComposing`.
    pub is_composing: bool,
}

impl DomKeyEvent {
    /// Plain `keydown` for `key`.
    #[must_use]
    pub fn keydown(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Decode a forwarded event.
    pub fn from_json_str(s: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Modifier flags held during the event.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        let mut mods = Modifiers::NONE;
        mods.set(Modifiers::SHIFT, self.shift_key);
        mods.set(Modifiers::ALT, self.alt_key);
        mods.set(Modifiers::CTRL, self.ctrl_key);
        mods.set(Modifiers::SUPER, self.meta_key);
        mods
    }

    /// Whether this event is part of an IME composition.
    ///
    /// Some browsers report the composition's final keydown with
    /// `isComposing == false` but `key == "Process"`.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.is_composing || self.key == "Process"
    }

    /// Canonical key event, or `None` when the event must be ignored.
    #[must_use]
    pub fn to_key_event(&self) -> Option<KeyEvent> {
        normalize_dom_key(self)
    }
}

/// Deterministic normalization of a DOM keyboard event.
///
/// Returns `None` for composition events and for keys with no canonical code
/// (dead keys, bare modifiers, `Unidentified`).
#[must_use]
pub fn normalize_dom_key(event: &DomKeyEvent) -> Option<KeyEvent> {
    if event.is_composing() {
        return None;
    }
    let mods = event.modifiers();
    let code = normalize_dom_key_code(&event.key, &event.code)?;
    let kind = match (event.phase, event.repeat) {
        (KeyPhase::Keyup, _) => KeyEventKind::Release,
        (KeyPhase::Keydown, true) => KeyEventKind::Repeat,
        (KeyPhase::Keydown, false) => KeyEventKind::Press,
    };
    Some(KeyEvent::new(code).with_modifiers(mods).with_kind(kind))
}

/// Map DOM `key`/`code` strings to a [`KeyCode`].
///
/// Only keys the palette binds get a code. Tab, Left/Right, PageUp/PageDown,
/// Delete and function keys map to `None` so their browser defaults (focus
/// movement, caret movement, reload) are left alone.
#[must_use]
pub fn normalize_dom_key_code(dom_key: &str, dom_code: &str) -> Option<KeyCode> {
    // Prefer the logical `key` for printable characters (already includes shift).
    let mut chars = dom_key.chars();
    if let Some(first) = chars.next()
        && chars.next().is_none()
    {
        return Some(KeyCode::Char(first));
    }

    let code = match dom_key {
        "Enter" => KeyCode::Enter,
        "Escape" | "Esc" => KeyCode::Escape,
        "Backspace" => KeyCode::Backspace,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "ArrowUp" | "Up" => KeyCode::Up,
        "ArrowDown" | "Down" => KeyCode::Down,
        "Spacebar" => KeyCode::Char(' '),
        "Unidentified" => return key_code_from_dom_code(dom_code),
        _ => return None,
    };
    Some(code)
}

fn key_code_from_dom_code(dom_code: &str) -> Option<KeyCode> {
    Some(match dom_code {
        "Enter" | "NumpadEnter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Backspace" => KeyCode::Backspace,
        "ArrowUp" => KeyCode::Up,
        "ArrowDown" => KeyCode::Down,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        _ => return None,
    })
}
