#![forbid(unsafe_code)]

//! Core: input events, supported languages, and text normalization.

pub mod event;
pub mod lang;
pub mod logging;
pub mod normalize;

#[cfg(feature = "tracing")]
pub use logging::debug;
