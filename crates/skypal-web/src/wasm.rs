#![forbid(unsafe_code)]

use core::time::Duration;

use wasm_bindgen::prelude::*;

use crate::config::PaletteConfig;
use crate::host::PaletteHost;
use crate::routing;
use crate::storage;

fn to_js(err: crate::BridgeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Browser-facing palette.
///
/// The content script owns the DOM and drives this object: it forwards
/// runtime messages and key events, ticks the clock from `performance.now()`,
/// calls `step()` and posts the returned messages.
#[wasm_bindgen]
pub struct SkyPalette {
    host: PaletteHost,
}

#[wasm_bindgen]
impl SkyPalette {
    /// Create a palette. `options` is an optional JSON configuration string.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<SkyPalette, JsValue> {
        let config = match options {
            Some(json) => PaletteConfig::from_json_str(&json).map_err(to_js)?,
            None => PaletteConfig::default(),
        };
        Ok(Self {
            host: PaletteHost::new(config),
        })
    }

    /// Queue a runtime message (`{"type":...}` JSON). Returns whether it was
    /// understood.
    #[wasm_bindgen(js_name = pushMessage)]
    pub fn push_message(&mut self, json: &str) -> bool {
        self.host.push_message_json(json)
    }

    /// Queue a DOM keyboard event. Returns `false` when the palette ignores
    /// it, so the caller can leave the browser default alone.
    #[wasm_bindgen(js_name = pushKey)]
    pub fn push_key(&mut self, json: &str) -> Result<bool, JsValue> {
        self.host.push_dom_key_json(json).map_err(to_js)
    }

    /// The query input's value changed.
    #[wasm_bindgen(js_name = setQuery)]
    pub fn set_query(&mut self, value: String) {
        self.host
            .push_event(skypal_core::event::Event::QueryInput(value));
    }

    /// A click landed on result row `index`.
    #[wasm_bindgen(js_name = clickRow)]
    pub fn click_row(&mut self, index: usize) {
        self.host.push_event(skypal_core::event::Event::Pointer(
            skypal_core::event::PointerTarget::Row(index),
        ));
    }

    /// A click landed on the backdrop.
    #[wasm_bindgen(js_name = clickBackdrop)]
    pub fn click_backdrop(&mut self) {
        self.host.push_event(skypal_core::event::Event::Pointer(
            skypal_core::event::PointerTarget::Backdrop,
        ));
    }

    /// A click landed on the panel outside any row.
    #[wasm_bindgen(js_name = clickPanel)]
    pub fn click_panel(&mut self) {
        self.host.push_event(skypal_core::event::Event::Pointer(
            skypal_core::event::PointerTarget::Panel,
        ));
    }

    /// The clear-query button was clicked.
    #[wasm_bindgen(js_name = clickClear)]
    pub fn click_clear(&mut self) {
        self.host.push_event(skypal_core::event::Event::Pointer(
            skypal_core::event::PointerTarget::ClearButton,
        ));
    }

    /// Forward a `storage` event.
    #[wasm_bindgen(js_name = storageChanged)]
    pub fn storage_changed(&mut self, key: Option<String>, new_value: Option<String>) -> bool {
        self.host
            .storage_changed(key.as_deref(), new_value.as_deref())
    }

    /// Set the clock to `now_ms` (e.g. `performance.now()`).
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, now_ms: f64) {
        if let Ok(now) = Duration::try_from_secs_f64(now_ms / 1_000.0) {
            self.host.set_time(now);
        }
    }

    /// Process queued inputs. Returns the outbound messages as a JSON array.
    pub fn step(&mut self) -> Result<String, JsValue> {
        self.host.step();
        self.host.take_outputs().to_json_string().map_err(to_js)
    }

    /// Milliseconds until the next focus attempt, if one is scheduled.
    #[wasm_bindgen(js_name = nextDeadline)]
    pub fn next_deadline(&self) -> Option<f64> {
        let now = self.host.now();
        self.host
            .next_deadline()
            .map(|due| due.saturating_sub(now).as_secs_f64() * 1_000.0)
    }

    /// Report whether the last `focus-input` succeeded.
    #[wasm_bindgen(js_name = reportFocus)]
    pub fn report_focus(&mut self, focused: bool) {
        self.host.report_focus(focused);
    }

    /// Whether a page-initiated `focus()` call may proceed.
    #[wasm_bindgen(js_name = focusAllowed)]
    pub fn focus_allowed(&self) -> bool {
        self.host.focus_allowed()
    }

    /// Render model JSON, or `"null"` while closed.
    pub fn view(&self) -> Result<String, JsValue> {
        self.host.view_json().map_err(to_js)
    }

    /// Whether the palette is open.
    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.host.palette().is_visible()
    }
}

/// Background-script gate: the message to send to the tab for an extension
/// command, as JSON, or `undefined`.
#[wasm_bindgen(js_name = routeCommand)]
pub fn route_command(command: &str, tab_url: Option<String>, host_origin: &str) -> Option<String> {
    routing::route_command(command, tab_url.as_deref(), host_origin)
        .and_then(|message| message.to_json_string().ok())
}

/// Page-script startup: the `bsky-lang` message for the raw preferences value.
#[wasm_bindgen(js_name = initialLanguage)]
pub fn initial_language(raw: Option<String>) -> Option<String> {
    storage::initial_language_message(raw.as_deref())
        .to_json_string()
        .ok()
}
