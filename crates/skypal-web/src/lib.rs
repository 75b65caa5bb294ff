#![forbid(unsafe_code)]

//! `skypal-web` bridges the command palette to the browser extension.
//!
//! Design goals:
//! - **Host-driven I/O**: the content script pushes runtime messages, DOM key
//!   events and storage changes; nothing here touches the DOM.
//! - **Deterministic time**: the host advances a monotonic clock explicitly,
//!   so deferred input focus is reproducible in tests and replays.
//! - **JSON at the edges**: every message has a small, stable serde schema.
//!
//! [`host::PaletteHost`] is the entry point. On `wasm32` it is wrapped by the
//! `SkyPalette` `wasm-bindgen` class.

pub mod config;
pub mod focus;
pub mod host;
pub mod input;
pub mod message;
pub mod routing;
pub mod storage;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::SkyPalette;

pub use config::PaletteConfig;
pub use focus::{DeferredFocus, FocusDecision, FocusGuard};
pub use host::{HostOutputs, PaletteHost, StepResult};
pub use message::{InboundMessage, OutboundMessage};

use core::time::Duration;

/// Bridge error type.
#[derive(Debug)]
pub enum BridgeError {
    /// A JSON payload did not match its schema.
    Json(serde_json::Error),
    /// A value was well-formed but not acceptable.
    Invalid(&'static str),
}

impl core::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid json: {err}"),
            Self::Invalid(msg) => write!(f, "invalid value: {msg}"),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Time never moves backwards.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Native builds compile the browser export as a stub so
/// `cargo check --workspace` stays green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SkyPalette;

#[cfg(not(target_arch = "wasm32"))]
impl SkyPalette {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
