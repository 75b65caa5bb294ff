#![forbid(unsafe_code)]

//! skypal public facade crate.
//!
//! Re-exports the palette's building blocks from the internal crates and
//! offers a small prelude for embedding the palette in a host.

// --- Core re-exports -------------------------------------------------------

pub use skypal_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerTarget};
pub use skypal_core::lang::{HOST_STORAGE_KEY, Language, Localized, detect_language};
pub use skypal_core::normalize::normalize;

// --- Palette re-exports ----------------------------------------------------

pub use skypal_widgets::command_palette::{
    Command, CommandAction, CommandId, CommandPalette, HostSetting, PaletteAction, PaletteSignal,
    PaletteView, Registry, matches,
};

// --- Bridge re-exports -----------------------------------------------------

#[cfg(feature = "web")]
pub use skypal_web::{
    BridgeError, FocusDecision, FocusGuard, InboundMessage, OutboundMessage, PaletteConfig,
    PaletteHost, StepResult,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Command, CommandAction, CommandPalette, Event, KeyCode, KeyEvent, Language, Modifiers,
        PaletteAction, Registry,
    };

    #[cfg(feature = "web")]
    pub use crate::{InboundMessage, OutboundMessage, PaletteConfig, PaletteHost};

    pub use crate::{core, widgets};

    #[cfg(feature = "web")]
    pub use crate::web;
}

pub use skypal_core as core;
pub use skypal_widgets as widgets;

#[cfg(feature = "web")]
pub use skypal_web as web;
