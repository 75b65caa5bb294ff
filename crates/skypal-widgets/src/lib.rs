#![forbid(unsafe_code)]

//! Command palette state machine for the skypal browser extension.
//!
//! The palette is UI-agnostic: it consumes [`skypal_core::event::Event`]s,
//! returns [`command_palette::PaletteAction`]s, and exposes a render model
//! the host draws with whatever DOM or terminal surface it owns.

pub mod command_palette;

pub use command_palette::{CommandPalette, PaletteAction, PaletteSignal};
