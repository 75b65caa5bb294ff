#![forbid(unsafe_code)]

//! Palette session replay.
//!
//! Replays a JSONL script of host inputs through the palette bridge and
//! writes one JSON line per step with the messages the page would receive.
//!
//! # Running
//!
//! ```sh
//! SKYPAL_HARNESS_SCRIPT=session.jsonl cargo run -p skypal-harness
//! ```
//!
//! # Environment
//!
//! - `SKYPAL_HARNESS_SCRIPT`: script path (default: read stdin)
//! - `SKYPAL_HARNESS_CONFIG`: JSON configuration path (default: built-in)
//! - `SKYPAL_HARNESS_OUTPUT`: transcript path (default: stdout)
//! - `SKYPAL_LOG`: tracing filter for the JSON logs on stderr
//!
//! Exits with status 2 when an `expect` record fails.

use std::io::{self, Read, Write};

use skypal_core::logging::init_json_subscriber;
use skypal_harness::{ReplayScript, replay};
use skypal_web::PaletteConfig;

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn invalid_data(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err.to_string())
}

fn main() -> std::io::Result<()> {
    init_json_subscriber("SKYPAL_LOG");

    let config = match env_string("SKYPAL_HARNESS_CONFIG") {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            PaletteConfig::from_json_str(&json).map_err(invalid_data)?
        }
        None => PaletteConfig::default(),
    };

    let input = match env_string("SKYPAL_HARNESS_SCRIPT") {
        Some(path) => std::fs::read_to_string(&path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let script = ReplayScript::from_jsonl(&input).map_err(invalid_data)?;

    let report = replay(config, &script);
    let transcript = report.to_jsonl().map_err(invalid_data)?;

    if let Some(path) = env_string("SKYPAL_HARNESS_OUTPUT") {
        std::fs::write(&path, transcript.as_bytes())?;
    } else {
        io::stdout().write_all(transcript.as_bytes())?;
    }

    for mismatch in &report.mismatches {
        eprintln!(
            "expectation failed at line {}: expected {:?}, got {:?}",
            mismatch.line, mismatch.expected, mismatch.actual
        );
    }
    if !report.ok() {
        std::process::exit(2);
    }
    Ok(())
}
