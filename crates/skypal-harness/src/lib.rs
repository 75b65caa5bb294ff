#![forbid(unsafe_code)]

//! Deterministic replay of recorded palette sessions.
//!
//! A script is JSONL, one host input per line:
//!
//! ```text
//! {"op":"message","data":{"type":"open-palette"}}
//! {"op":"key","event":{"key":"c"}}
//! {"op":"query","value":"chat"}
//! {"op":"click","target":"row","index":3}
//! {"op":"storage","key":"BSKY_STORAGE","value":"{\"languagePrefs\":{\"appLanguage\":\"ja\"}}"}
//! {"op":"advance","ms":100}
//! {"op":"focus_result","focused":false}
//! {"op":"step"}
//! {"op":"expect","messages":[{"type":"focus-input"}]}
//! ```
//!
//! Inputs are queued until a `step` record, exactly like the browser glue
//! queues them between animation frames. `expect` compares the messages of
//! the most recent step and records a mismatch instead of aborting, so one
//! run reports every divergence.

pub mod replay;

pub use replay::{ReplayReport, ReplayScript, ScriptParseError, replay};
