#![forbid(unsafe_code)]

//! Host-driven palette runner.
//!
//! [`PaletteHost`] owns the [`CommandPalette`] plus everything around it that
//! the browser glue needs, and advances only when the host tells it to:
//!
//! 1. Push runtime messages, DOM key events and canonical events.
//! 2. Advance time via [`PaletteHost::advance_time`].
//! 3. Call [`PaletteHost::step`] to process the queued inputs and fire due
//!    focus attempts.
//! 4. Deliver [`PaletteHost::take_outputs`] to the page.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use skypal_web::{InboundMessage, OutboundMessage, PaletteConfig, PaletteHost};
//!
//! let mut host = PaletteHost::new(PaletteConfig::default());
//! host.push_message(InboundMessage::OpenPalette);
//! host.step();
//! assert_eq!(
//!     host.take_outputs().messages,
//!     vec![OutboundMessage::PaletteOpenState { open: true }]
//! );
//!
//! host.advance_time(Duration::from_millis(100));
//! host.step();
//! assert_eq!(host.take_outputs().messages, vec![OutboundMessage::FocusInput]);
//! ```

use core::time::Duration;
use std::collections::VecDeque;

use serde::Serialize;
use skypal_core::event::Event;
use skypal_core::lang::Language;
use skypal_widgets::command_palette::{
    CommandPalette, PaletteAction, PaletteSignal, PaletteView, Registry,
};

use crate::config::PaletteConfig;
use crate::focus::{DeferredFocus, FocusDecision, FocusGuard};
use crate::input::DomKeyEvent;
use crate::message::{InboundMessage, OutboundMessage};
use crate::{BridgeError, DeterministicClock, storage};

/// Result of a single [`PaletteHost::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Queued inputs processed during this step.
    pub inputs_processed: usize,
    /// Messages added to the outputs during this step.
    pub messages_emitted: usize,
    /// Whether the palette is open after the step.
    pub visible: bool,
    /// When the next focus attempt is due, if one is scheduled.
    pub next_deadline: Option<Duration>,
}

/// Messages accumulated for the host since the last take.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostOutputs {
    /// Outbound messages in emission order.
    pub messages: Vec<OutboundMessage>,
}

impl HostOutputs {
    /// Whether nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Encode as a JSON array.
    pub fn to_json_string(&self) -> Result<String, BridgeError> {
        Ok(serde_json::to_string(&self.messages)?)
    }
}

#[derive(Debug, Clone)]
enum HostInput {
    Message(InboundMessage),
    Event(Event),
}

/// Host-driven, non-blocking palette runner.
#[derive(Debug)]
pub struct PaletteHost {
    config: PaletteConfig,
    palette: CommandPalette,
    clock: DeterministicClock,
    queue: VecDeque<HostInput>,
    focus: DeferredFocus,
    guard: FocusGuard,
    outputs: HostOutputs,
    /// Open epoch whose first focus request was already scheduled.
    focus_epoch: Option<u64>,
    step_count: u64,
}

impl PaletteHost {
    /// Host over the built-in registry.
    #[must_use]
    pub fn new(config: PaletteConfig) -> Self {
        Self::with_registry(config, Registry::builtin())
    }

    /// Host over a custom registry.
    #[must_use]
    pub fn with_registry(config: PaletteConfig, registry: Registry) -> Self {
        let palette = CommandPalette::with_registry(registry)
            .with_max_visible(config.max_visible)
            .with_text(config.text());
        let focus = DeferredFocus::new(config.focus_retry_delay(), config.focus_max_attempts);
        Self {
            config,
            palette,
            clock: DeterministicClock::new(),
            queue: VecDeque::new(),
            focus,
            guard: FocusGuard::new(),
            outputs: HostOutputs::default(),
            focus_epoch: None,
            step_count: 0,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &PaletteConfig {
        &self.config
    }

    // --- Inputs ---

    /// Queue a runtime message.
    pub fn push_message(&mut self, message: InboundMessage) {
        self.queue.push_back(HostInput::Message(message));
    }

    /// Queue a runtime message from JSON.
    ///
    /// Messages that do not decode are logged and dropped; returns whether
    /// the message was queued.
    pub fn push_message_json(&mut self, json: &str) -> bool {
        match InboundMessage::from_json_str(json) {
            Ok(message) => {
                self.push_message(message);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "dropping undecodable message");
                false
            }
        }
    }

    /// Queue a canonical event.
    pub fn push_event(&mut self, event: Event) {
        self.queue.push_back(HostInput::Event(event));
    }

    /// Queue a DOM keyboard event. Returns `false` when it was dropped (IME
    /// composition, keyup, or a key the palette does not bind); the caller
    /// should then leave the browser default alone.
    pub fn push_dom_key(&mut self, event: &DomKeyEvent) -> bool {
        match event.to_key_event() {
            Some(key) if CommandPalette::handles_key(&key) => {
                self.push_event(Event::Key(key));
                true
            }
            _ => false,
        }
    }

    /// Queue a DOM keyboard event from JSON.
    pub fn push_dom_key_json(&mut self, json: &str) -> Result<bool, BridgeError> {
        let event = DomKeyEvent::from_json_str(json)?;
        Ok(self.push_dom_key(&event))
    }

    /// Forward a `storage` event; queues a language change for the
    /// preferences key. Returns whether anything was queued.
    pub fn storage_changed(&mut self, key: Option<&str>, new_value: Option<&str>) -> bool {
        match storage::storage_changed(&self.config.storage_key, key, new_value) {
            Some(message) => {
                self.push_message(message);
                true
            }
            None => false,
        }
    }

    /// Number of queued inputs.
    #[must_use]
    pub fn pending_inputs(&self) -> usize {
        self.queue.len()
    }

    // --- Time ---

    /// Advance the host clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the host clock (monotonic; earlier values are ignored).
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Current host clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    // --- Step ---

    /// Process all queued inputs, then fire a due focus attempt.
    pub fn step(&mut self) -> StepResult {
        self.step_count += 1;
        let _span = tracing::debug_span!("palette_step", step = self.step_count).entered();
        let emitted_before = self.outputs.messages.len();

        let mut inputs_processed = 0;
        while let Some(input) = self.queue.pop_front() {
            inputs_processed += 1;
            match input {
                HostInput::Message(message) => self.handle_message(message),
                HostInput::Event(event) => self.handle_event(&event),
            }
            self.flush_signals();
        }

        let now = self.clock.now();
        let palette = &self.palette;
        if let Some(message) = self
            .focus
            .poll(now, |ticket| palette.focus_ticket_is_current(ticket))
        {
            self.emit(message);
        }

        StepResult {
            inputs_processed,
            messages_emitted: self.outputs.messages.len() - emitted_before,
            visible: self.palette.is_visible(),
            next_deadline: self.focus.next_due(),
        }
    }

    /// When the next focus attempt is due, if one is scheduled.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.focus.next_due()
    }

    /// Host feedback after a `focus-input` message.
    pub fn report_focus(&mut self, focused: bool) {
        self.focus.report(focused, self.clock.now());
    }

    fn handle_message(&mut self, message: InboundMessage) {
        match message {
            InboundMessage::OpenPalette => self.palette.open(),
            InboundMessage::BskyLang { lang } => {
                let language = storage::announced_language(&lang);
                tracing::debug!(requested = %lang, language = language.code(), "language changed");
                self.palette.set_language(language);
            }
        }
    }

    fn handle_event(&mut self, event: &Event) {
        match self.palette.handle_event(event) {
            Some(PaletteAction::Execute(action)) => {
                tracing::info!(action = ?action, "executing command");
                self.emit(action.into());
            }
            Some(PaletteAction::Dismiss) => tracing::debug!("palette dismissed"),
            None => {}
        }
    }

    fn flush_signals(&mut self) {
        let signals: Vec<PaletteSignal> = self.palette.drain_signals().collect();
        for signal in signals {
            match signal {
                PaletteSignal::VisibilityChanged(open) => {
                    if !open {
                        self.focus.cancel();
                    }
                    self.emit(OutboundMessage::PaletteOpenState { open });
                }
                PaletteSignal::RequestFocus(ticket) => {
                    let now = self.clock.now();
                    // The input only needs time to attach right after open;
                    // later requests in the same session (panel click, clear,
                    // repeated open) focus on this step.
                    if self.focus_epoch == Some(ticket.epoch()) {
                        self.focus.schedule_now(ticket, now);
                    } else {
                        self.focus_epoch = Some(ticket.epoch());
                        self.focus.schedule(ticket, now);
                    }
                }
            }
        }
    }

    fn emit(&mut self, message: OutboundMessage) {
        self.guard.observe(&message);
        self.outputs.messages.push(message);
    }

    // --- Outputs ---

    /// Take the accumulated outputs, leaving an empty buffer.
    pub fn take_outputs(&mut self) -> HostOutputs {
        std::mem::take(&mut self.outputs)
    }

    /// Accumulated outputs since the last take.
    #[must_use]
    pub fn outputs(&self) -> &HostOutputs {
        &self.outputs
    }

    // --- Queries ---

    /// Decision for a host-initiated focus call.
    #[must_use]
    pub fn focus_decision(&self) -> FocusDecision {
        self.guard.decide()
    }

    /// Shorthand for `focus_decision() == FocusDecision::Allow`.
    #[must_use]
    pub fn focus_allowed(&self) -> bool {
        self.guard.decide() == FocusDecision::Allow
    }

    /// The palette state machine.
    #[must_use]
    pub fn palette(&self) -> &CommandPalette {
        &self.palette
    }

    /// Active display language.
    #[must_use]
    pub fn language(&self) -> Language {
        self.palette.language()
    }

    /// Render model; `None` while closed.
    #[must_use]
    pub fn view(&self) -> Option<PaletteView<'_>> {
        self.palette.view()
    }

    /// Render model as JSON (`null` while closed).
    pub fn view_json(&self) -> Result<String, BridgeError> {
        let view = self.palette.view().map(|view| ViewJson::from(&view));
        Ok(serde_json::to_string(&view)?)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewJson<'a> {
    query: &'a str,
    placeholder: &'a str,
    lang: &'static str,
    rows: Vec<RowJson<'a>>,
    scroll_offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_message: Option<&'a str>,
}

#[derive(Serialize)]
struct RowJson<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    active: bool,
}

impl<'a> From<&PaletteView<'a>> for ViewJson<'a> {
    fn from(view: &PaletteView<'a>) -> Self {
        Self {
            query: view.query,
            placeholder: view.placeholder,
            lang: view.language.code(),
            rows: view
                .rows
                .iter()
                .map(|row| RowJson {
                    name: row.name,
                    description: row.description,
                    active: row.active,
                })
                .collect(),
            scroll_offset: view.scroll_offset,
            empty_message: view.empty_message,
        }
    }
}
