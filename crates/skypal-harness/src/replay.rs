#![forbid(unsafe_code)]

//! Script parsing and replay through [`PaletteHost`].

use core::time::Duration;

use serde::{Deserialize, Serialize};
use skypal_core::event::{Event, PointerTarget};
use skypal_web::input::DomKeyEvent;
use skypal_web::{InboundMessage, OutboundMessage, PaletteConfig, PaletteHost};

/// What a scripted click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    /// The backdrop.
    Backdrop,
    /// The panel outside any row.
    Panel,
    /// A result row; see the record's `index`.
    Row,
    /// The clear-query affordance.
    Clear,
}

/// One scripted host input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptRecord {
    /// A runtime message.
    Message { data: InboundMessage },
    /// A DOM keyboard event.
    Key { event: DomKeyEvent },
    /// The query input's new value.
    Query { value: String },
    /// A pointer click.
    Click {
        target: ClickTarget,
        #[serde(default)]
        index: usize,
    },
    /// A `storage` event.
    Storage {
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        value: Option<String>,
    },
    /// Advance the host clock.
    Advance { ms: u64 },
    /// Outcome of the last `focus-input`.
    FocusResult { focused: bool },
    /// Process queued inputs.
    Step,
    /// Expected messages of the most recent step.
    Expect { messages: Vec<OutboundMessage> },
}

/// A parsed record with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub record: ScriptRecord,
}

/// A complete replay script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayScript {
    pub lines: Vec<ScriptLine>,
}

/// Error parsing a JSONL script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptParseError {
    pub line: usize,
    pub message: String,
}

impl core::fmt::Display for ScriptParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptParseError {}

impl ReplayScript {
    /// Parse a JSONL script. Blank lines and lines starting with `#` are
    /// skipped.
    pub fn from_jsonl(input: &str) -> Result<Self, ScriptParseError> {
        let mut lines = Vec::new();
        for (idx, raw) in input.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let record = serde_json::from_str(trimmed).map_err(|err| ScriptParseError {
                line: idx + 1,
                message: err.to_string(),
            })?;
            lines.push(ScriptLine {
                line: idx + 1,
                record,
            });
        }
        Ok(Self { lines })
    }

    /// Number of `step` records.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.record == ScriptRecord::Step)
            .count()
    }
}

/// Messages produced by one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: u64,
    pub at_ms: u64,
    pub messages: Vec<OutboundMessage>,
}

/// An `expect` record that did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationMismatch {
    pub line: usize,
    pub expected: Vec<OutboundMessage>,
    pub actual: Vec<OutboundMessage>,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Every step, in order.
    pub steps: Vec<StepRecord>,
    /// Failed expectations.
    pub mismatches: Vec<ExpectationMismatch>,
    /// Key events the bridge dropped (IME composition, unmapped keys).
    pub dropped_keys: usize,
}

impl ReplayReport {
    /// Whether every expectation held.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// One JSON line per step.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for step in &self.steps {
            out.push_str(&serde_json::to_string(step)?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Replay `script` through a fresh host built from `config`.
pub fn replay(config: PaletteConfig, script: &ReplayScript) -> ReplayReport {
    let mut host = PaletteHost::new(config);
    let mut report = ReplayReport::default();
    let mut last: Vec<OutboundMessage> = Vec::new();

    for ScriptLine { line, record } in &script.lines {
        match record {
            ScriptRecord::Message { data } => host.push_message(data.clone()),
            ScriptRecord::Key { event } => {
                if !host.push_dom_key(event) {
                    tracing::debug!(line, key = %event.key, "key dropped");
                    report.dropped_keys += 1;
                }
            }
            ScriptRecord::Query { value } => host.push_event(Event::QueryInput(value.clone())),
            ScriptRecord::Click { target, index } => {
                let target = match target {
                    ClickTarget::Backdrop => PointerTarget::Backdrop,
                    ClickTarget::Panel => PointerTarget::Panel,
                    ClickTarget::Row => PointerTarget::Row(*index),
                    ClickTarget::Clear => PointerTarget::ClearButton,
                };
                host.push_event(Event::Pointer(target));
            }
            ScriptRecord::Storage { key, value } => {
                host.storage_changed(key.as_deref(), value.as_deref());
            }
            ScriptRecord::Advance { ms } => host.advance_time(Duration::from_millis(*ms)),
            ScriptRecord::FocusResult { focused } => host.report_focus(*focused),
            ScriptRecord::Step => {
                host.step();
                last = host.take_outputs().messages;
                report.steps.push(StepRecord {
                    step: report.steps.len() as u64 + 1,
                    at_ms: u64::try_from(host.now().as_millis()).unwrap_or(u64::MAX),
                    messages: last.clone(),
                });
            }
            ScriptRecord::Expect { messages } => {
                if *messages != last {
                    tracing::warn!(line, "expectation mismatch");
                    report.mismatches.push(ExpectationMismatch {
                        line: *line,
                        expected: messages.clone(),
                        actual: last.clone(),
                    });
                }
            }
        }
    }

    tracing::info!(
        steps = report.steps.len(),
        mismatches = report.mismatches.len(),
        "replay finished"
    );
    report
}
