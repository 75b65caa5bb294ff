#![forbid(unsafe_code)]

//! Command palette controller for jumping between app sections.
//!
//! This module provides:
//! - A fixed, ordered [`Registry`] of localized commands
//! - Script-insensitive substring matching ([`matcher`])
//! - The [`CommandPalette`] state machine: query, active row, visibility
//! - A render model ([`PaletteView`]) the host draws however it likes
//!
//! # Usage
//!
//! ```
//! use skypal_core::event::{Event, KeyCode};
//! use skypal_widgets::command_palette::{CommandAction, CommandPalette, PaletteAction};
//!
//! let mut palette = CommandPalette::new();
//! palette.open();
//! palette.set_query("chat");
//!
//! let action = palette.handle_event(&Event::key(KeyCode::Enter));
//! assert_eq!(
//!     action,
//!     Some(PaletteAction::Execute(CommandAction::navigate("/messages")))
//! );
//! assert!(!palette.is_visible());
//! ```
//!
//! Visibility changes and input-focus requests are queued as
//! [`PaletteSignal`]s; the host drains them with
//! [`CommandPalette::drain_signals`] after each event.
//!
//! # Submodules
//!
//! - [`matcher`]: substring matcher and cached corpus
//! - [`registry`]: commands and the built-in registry

pub mod matcher;
pub mod registry;

pub use matcher::{FilterStats, MatchCorpus, matches};
pub use registry::{Command, CommandAction, CommandId, HostSetting, Registry};

use skypal_core::event::{Event, KeyCode, KeyEvent, PointerTarget};
use skypal_core::lang::Language;
use unicode_segmentation::UnicodeSegmentation;

// ---------------------------------------------------------------------------
// Palette Action / Signals
// ---------------------------------------------------------------------------

/// Action returned from event handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteAction {
    /// The user confirmed a command; the host must perform this effect.
    Execute(CommandAction),
    /// The user dismissed the palette (Esc or backdrop click).
    Dismiss,
}

/// Identifies one open session of the palette.
///
/// A ticket issued for a focus request stays current only until the palette
/// closes or is reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusTicket {
    epoch: u64,
}

impl FocusTicket {
    /// Open-session counter this ticket belongs to.
    #[must_use]
    pub const fn epoch(self) -> u64 {
        self.epoch
    }
}

/// Host-facing notification queued by the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteSignal {
    /// The palette opened (`true`) or closed (`false`).
    VisibilityChanged(bool),
    /// The query input should receive focus.
    RequestFocus(FocusTicket),
}

// ---------------------------------------------------------------------------
// Palette Text
// ---------------------------------------------------------------------------

/// Fixed strings shown by the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteText {
    /// Placeholder of the query input.
    pub placeholder: String,
    /// Shown instead of rows when nothing matches.
    pub empty_message: String,
}

impl Default for PaletteText {
    fn default() -> Self {
        Self {
            placeholder: "Search commands...".to_owned(),
            empty_message: "No commands found".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Render model
// ---------------------------------------------------------------------------

/// One rendered result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteRow<'a> {
    /// Registry id of the command.
    pub id: CommandId,
    /// Name in the active language.
    pub name: &'a str,
    /// Optional description.
    pub description: Option<&'a str>,
    /// Whether this is the active (highlighted) row.
    pub active: bool,
}

/// Everything needed to draw the open palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteView<'a> {
    /// Current query text.
    pub query: &'a str,
    /// Input placeholder.
    pub placeholder: &'a str,
    /// Result rows in display order.
    pub rows: Vec<PaletteRow<'a>>,
    /// First row that should be scrolled into view.
    pub scroll_offset: usize,
    /// Explicit "no results" text, present only when `rows` is empty.
    pub empty_message: Option<&'a str>,
    /// Language the names are rendered in.
    pub language: Language,
}

// ---------------------------------------------------------------------------
// Command Palette
// ---------------------------------------------------------------------------

/// Command palette state machine.
///
/// # Invariants
///
/// 1. `selected < filtered.len()` whenever `filtered` is non-empty, else 0.
/// 2. `filtered` is an order-preserving subsequence of the registry.
/// 3. Every query change resets `selected` to 0.
/// 4. While closed, the query is empty and events are ignored.
#[derive(Debug)]
pub struct CommandPalette {
    registry: Registry,
    corpus: MatchCorpus,
    language: Language,
    query: String,
    selected: usize,
    scroll_offset: usize,
    max_visible: usize,
    visible: bool,
    epoch: u64,
    filtered: Vec<CommandId>,
    signals: Vec<PaletteSignal>,
    text: PaletteText,
}

impl Default for CommandPalette {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandPalette {
    /// Palette over the built-in registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::builtin())
    }

    /// Palette over a custom registry.
    pub fn with_registry(registry: Registry) -> Self {
        let corpus = MatchCorpus::new(registry.all());
        Self {
            registry,
            corpus,
            language: Language::BASE,
            query: String::new(),
            selected: 0,
            scroll_offset: 0,
            max_visible: 6,
            visible: false,
            epoch: 0,
            filtered: Vec::new(),
            signals: Vec::new(),
            text: PaletteText::default(),
        }
    }

    /// Set max rows visible without scrolling (builder).
    pub fn with_max_visible(mut self, n: usize) -> Self {
        self.max_visible = n.max(1);
        self
    }

    /// Set the fixed strings (builder).
    pub fn with_text(mut self, text: PaletteText) -> Self {
        self.text = text;
        self
    }

    /// Set the initial display language (builder).
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// The registry this palette filters.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // --- Visibility ---

    /// Open the palette: empty query, first row active, focus requested.
    ///
    /// Opening an already open palette keeps its state and only re-requests
    /// focus.
    pub fn open(&mut self) {
        if self.visible {
            self.signals
                .push(PaletteSignal::RequestFocus(self.focus_ticket()));
            return;
        }
        self.visible = true;
        self.epoch = self.epoch.wrapping_add(1);
        self.query.clear();
        self.selected = 0;
        self.scroll_offset = 0;
        self.corpus.invalidate();
        self.update_filtered();

        #[cfg(feature = "tracing")]
        tracing::debug!(epoch = self.epoch, results = self.filtered.len(), "palette opened");

        self.signals.push(PaletteSignal::VisibilityChanged(true));
        self.signals
            .push(PaletteSignal::RequestFocus(self.focus_ticket()));
    }

    /// Close the palette. No-op when already closed.
    pub fn close(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.query.clear();
        self.selected = 0;
        self.scroll_offset = 0;
        self.filtered.clear();

        #[cfg(feature = "tracing")]
        tracing::debug!(epoch = self.epoch, "palette closed");

        self.signals.push(PaletteSignal::VisibilityChanged(false));
    }

    /// Toggle visibility.
    pub fn toggle(&mut self) {
        if self.visible {
            self.close();
        } else {
            self.open();
        }
    }

    /// Whether the palette is currently visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Ticket for the current open session.
    pub fn focus_ticket(&self) -> FocusTicket {
        FocusTicket { epoch: self.epoch }
    }

    /// Whether a focus request issued with `ticket` may still act.
    pub fn focus_ticket_is_current(&self, ticket: FocusTicket) -> bool {
        self.visible && ticket.epoch == self.epoch
    }

    /// Take the queued host notifications.
    pub fn drain_signals(&mut self) -> std::vec::Drain<'_, PaletteSignal> {
        self.signals.drain(..)
    }

    // --- Language ---

    /// Active display language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch the display language.
    ///
    /// Matching covers every language, so results and the active row are
    /// left untouched; only the rendered names change.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    // --- Query ---

    /// Current query string.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the query. Always resets the active row to the first result.
    pub fn set_query(&mut self, query: impl Into<String>) {
        if !self.visible {
            return;
        }
        self.query = query.into();
        self.query_changed();
    }

    /// Clear the query without closing, and ask for input focus again.
    pub fn clear_query(&mut self) {
        if !self.visible {
            return;
        }
        self.query.clear();
        self.query_changed();
        self.signals
            .push(PaletteSignal::RequestFocus(self.focus_ticket()));
    }

    // --- Results ---

    /// Number of filtered results.
    pub fn result_count(&self) -> usize {
        self.filtered.len()
    }

    /// Registry ids of the filtered results, in display order.
    pub fn results(&self) -> &[CommandId] {
        &self.filtered
    }

    /// Currently active index into the results.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// First row kept in view.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// The active command, if any.
    pub fn selected_command(&self) -> Option<&Command> {
        self.filtered
            .get(self.selected)
            .and_then(|&id| self.registry.get(id))
    }

    /// Render model for the open palette; `None` while closed.
    pub fn view(&self) -> Option<PaletteView<'_>> {
        if !self.visible {
            return None;
        }
        let rows = self
            .filtered
            .iter()
            .enumerate()
            .filter_map(|(pos, &id)| {
                let command = self.registry.get(id)?;
                Some(PaletteRow {
                    id,
                    name: command.name().get(self.language),
                    description: command.description(),
                    active: pos == self.selected,
                })
            })
            .collect::<Vec<_>>();
        let empty_message = rows.is_empty().then_some(self.text.empty_message.as_str());
        Some(PaletteView {
            query: &self.query,
            placeholder: &self.text.placeholder,
            rows,
            scroll_offset: self.scroll_offset,
            empty_message,
            language: self.language,
        })
    }

    // --- Event Handling ---

    /// Handle an input event. Returns a [`PaletteAction`] when the user
    /// confirmed a command or dismissed the palette.
    ///
    /// Returns `None` if the event was consumed without such an outcome, or
    /// if the palette is not visible.
    pub fn handle_event(&mut self, event: &Event) -> Option<PaletteAction> {
        if !self.visible {
            return None;
        }

        match event {
            Event::Key(key) if Self::handles_key(key) => self.handle_key(*key),
            Event::Key(_) => None,
            Event::QueryInput(value) => {
                self.set_query(value.as_str());
                None
            }
            Event::Pointer(target) => self.handle_pointer(*target),
        }
    }

    /// Whether an open palette acts on `key`.
    ///
    /// Releases and modified characters other than Ctrl+U are left to the
    /// page, so copy, paste and browser shortcuts keep working.
    #[must_use]
    pub const fn handles_key(key: &KeyEvent) -> bool {
        if !key.is_actionable() {
            return false;
        }
        match key.code {
            KeyCode::Char('u') if key.ctrl() => true,
            KeyCode::Char(_) => !key.ctrl() && !key.alt() && !key.super_key(),
            KeyCode::Enter
            | KeyCode::Escape
            | KeyCode::Backspace
            | KeyCode::Home
            | KeyCode::End
            | KeyCode::Up
            | KeyCode::Down => true,
        }
    }

    /// Handle a key press while the palette is open.
    fn handle_key(&mut self, key: KeyEvent) -> Option<PaletteAction> {
        match key.code {
            KeyCode::Escape => {
                self.close();
                return Some(PaletteAction::Dismiss);
            }

            KeyCode::Enter => return self.confirm(),

            KeyCode::Up => self.move_selection(-1),

            KeyCode::Down => self.move_selection(1),

            KeyCode::Home => {
                self.selected = 0;
                self.scroll_offset = 0;
            }

            KeyCode::End => {
                if !self.filtered.is_empty() {
                    self.selected = self.filtered.len() - 1;
                    self.adjust_scroll();
                }
            }

            KeyCode::Backspace => {
                if let Some((idx, _)) = self.query.grapheme_indices(true).next_back() {
                    self.query.truncate(idx);
                    self.query_changed();
                }
            }

            KeyCode::Char('u') if key.ctrl() => self.clear_query(),

            KeyCode::Char(c) if !key.ctrl() && !key.alt() && !key.super_key() => {
                self.query.push(c);
                self.query_changed();
            }

            _ => {}
        }

        None
    }

    fn handle_pointer(&mut self, target: PointerTarget) -> Option<PaletteAction> {
        match target {
            PointerTarget::Backdrop => {
                self.close();
                Some(PaletteAction::Dismiss)
            }
            PointerTarget::Panel => {
                self.signals
                    .push(PaletteSignal::RequestFocus(self.focus_ticket()));
                None
            }
            PointerTarget::Row(pos) => {
                if pos >= self.filtered.len() {
                    return None;
                }
                self.selected = pos;
                self.confirm()
            }
            PointerTarget::ClearButton => {
                self.clear_query();
                None
            }
        }
    }

    /// Run the active command and close.
    fn confirm(&mut self) -> Option<PaletteAction> {
        let action = self.selected_command()?.action().clone();

        #[cfg(feature = "tracing")]
        tracing::debug!(selected = self.selected, action = ?action, "command confirmed");

        self.close();
        Some(PaletteAction::Execute(action))
    }

    /// Move the active row by `delta`, wrapping in both directions.
    fn move_selection(&mut self, delta: isize) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected as isize + delta).rem_euclid(len as isize) as usize;
        self.adjust_scroll();
    }

    fn query_changed(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
        self.update_filtered();
    }

    /// Re-filter the registry against the current query.
    fn update_filtered(&mut self) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "palette_filter",
            query_len = self.query.len(),
            language = self.language.code()
        )
        .entered();

        self.filtered = self.corpus.filter(&self.query);
    }

    /// Adjust scroll_offset to keep the active row visible.
    fn adjust_scroll(&mut self) {
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + self.max_visible {
            self.scroll_offset = self.selected + 1 - self.max_visible;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod widget_tests {
    use super::*;
    use skypal_core::event::{KeyEventKind, Modifiers};
    use skypal_core::lang::Localized;

    fn type_str(palette: &mut CommandPalette, s: &str) {
        for ch in s.chars() {
            palette.handle_event(&Event::key(KeyCode::Char(ch)));
        }
    }

    fn abc_palette() -> CommandPalette {
        CommandPalette::with_registry(Registry::from_commands(vec![
            Command::new(Localized::new("Alpha", "あるふぁ"), CommandAction::navigate("/a")),
            Command::new(Localized::new("Beta", "べーた"), CommandAction::navigate("/b")),
            Command::new(Localized::new("Gamma", "がんま"), CommandAction::navigate("/c")),
        ]))
    }

    #[test]
    fn new_palette_is_hidden() {
        let palette = CommandPalette::new();
        assert!(!palette.is_visible());
        assert_eq!(palette.result_count(), 0);
        assert!(palette.view().is_none());
    }

    #[test]
    fn open_shows_all_commands() {
        let mut palette = CommandPalette::new();
        palette.open();
        assert!(palette.is_visible());
        assert_eq!(palette.result_count(), palette.registry().len());
        assert_eq!(palette.selected_index(), 0);
    }

    #[test]
    fn open_emits_visibility_then_focus() {
        let mut palette = CommandPalette::new();
        palette.open();
        let signals: Vec<_> = palette.drain_signals().collect();
        assert_eq!(
            signals,
            vec![
                PaletteSignal::VisibilityChanged(true),
                PaletteSignal::RequestFocus(palette.focus_ticket()),
            ]
        );
    }

    #[test]
    fn reopen_while_open_keeps_query() {
        let mut palette = CommandPalette::new();
        palette.open();
        type_str(&mut palette, "set");
        palette.drain_signals().for_each(drop);
        palette.open();
        assert_eq!(palette.query(), "set");
        let signals: Vec<_> = palette.drain_signals().collect();
        assert_eq!(signals, vec![PaletteSignal::RequestFocus(palette.focus_ticket())]);
    }

    #[test]
    fn reopening_resets_query_and_selection() {
        let mut palette = CommandPalette::new();
        palette.open();
        type_str(&mut palette, "s");
        palette.handle_event(&Event::key(KeyCode::Down));
        palette.close();
        palette.open();
        assert_eq!(palette.query(), "");
        assert_eq!(palette.selected_index(), 0);
        assert_eq!(palette.result_count(), palette.registry().len());
    }

    #[test]
    fn close_is_idempotent() {
        let mut palette = CommandPalette::new();
        palette.close();
        assert_eq!(palette.drain_signals().count(), 0);
        palette.open();
        palette.close();
        palette.close();
        let signals: Vec<_> = palette.drain_signals().collect();
        assert_eq!(
            signals.last(),
            Some(&PaletteSignal::VisibilityChanged(false))
        );
        assert_eq!(
            signals
                .iter()
                .filter(|s| matches!(s, PaletteSignal::VisibilityChanged(false)))
                .count(),
            1
        );
    }

    #[test]
    fn toggle_visibility() {
        let mut palette = CommandPalette::new();
        palette.toggle();
        assert!(palette.is_visible());
        palette.toggle();
        assert!(!palette.is_visible());
    }

    #[test]
    fn typing_filters_results() {
        let mut palette = CommandPalette::new();
        palette.open();
        type_str(&mut palette, "chat");
        assert_eq!(palette.query(), "chat");
        assert_eq!(palette.results(), &[3]);
    }

    #[test]
    fn backspace_removes_last_grapheme() {
        let mut palette = CommandPalette::new();
        palette.open();
        palette.set_query("ガ");
        palette.handle_event(&Event::key(KeyCode::Backspace));
        assert_eq!(palette.query(), "");

        palette.set_query("e\u{301}x");
        palette.handle_event(&Event::key(KeyCode::Backspace));
        assert_eq!(palette.query(), "e\u{301}");
        palette.handle_event(&Event::key(KeyCode::Backspace));
        assert_eq!(palette.query(), "");
        // Nothing left to remove.
        palette.handle_event(&Event::key(KeyCode::Backspace));
        assert_eq!(palette.query(), "");
    }

    #[test]
    fn esc_dismisses_palette() {
        let mut palette = CommandPalette::new();
        palette.open();
        let result = palette.handle_event(&Event::key(KeyCode::Escape));
        assert_eq!(result, Some(PaletteAction::Dismiss));
        assert!(!palette.is_visible());
    }

    #[test]
    fn enter_executes_selected() {
        let mut palette = CommandPalette::new();
        palette.open();
        let result = palette.handle_event(&Event::key(KeyCode::Enter));
        assert_eq!(
            result,
            Some(PaletteAction::Execute(CommandAction::navigate("/")))
        );
        assert!(!palette.is_visible());
    }

    #[test]
    fn enter_with_no_results_is_noop() {
        let mut palette = CommandPalette::new();
        palette.open();
        type_str(&mut palette, "zzz");
        assert_eq!(palette.result_count(), 0);
        assert_eq!(palette.handle_event(&Event::key(KeyCode::Enter)), None);
        assert!(palette.is_visible());
    }

    #[test]
    fn arrow_keys_wrap() {
        let mut palette = abc_palette();
        palette.open();
        assert_eq!(palette.selected_index(), 0);

        palette.handle_event(&Event::key(KeyCode::Up));
        assert_eq!(palette.selected_index(), 2);
        palette.handle_event(&Event::key(KeyCode::Down));
        assert_eq!(palette.selected_index(), 0);
        palette.handle_event(&Event::key(KeyCode::Down));
        palette.handle_event(&Event::key(KeyCode::Down));
        assert_eq!(palette.selected_index(), 2);
        palette.handle_event(&Event::key(KeyCode::Down));
        assert_eq!(palette.selected_index(), 0);
    }

    #[test]
    fn arrows_on_empty_results_are_noops() {
        let mut palette = abc_palette();
        palette.open();
        type_str(&mut palette, "zzz");
        palette.handle_event(&Event::key(KeyCode::Down));
        palette.handle_event(&Event::key(KeyCode::Up));
        palette.handle_event(&Event::key(KeyCode::End));
        assert_eq!(palette.selected_index(), 0);
    }

    #[test]
    fn repeat_navigates_release_does_not() {
        let mut palette = abc_palette();
        palette.open();
        let repeat = KeyEvent::new(KeyCode::Down).with_kind(KeyEventKind::Repeat);
        palette.handle_event(&Event::Key(repeat));
        assert_eq!(palette.selected_index(), 1);
        let release = KeyEvent::new(KeyCode::Down).with_kind(KeyEventKind::Release);
        palette.handle_event(&Event::Key(release));
        assert_eq!(palette.selected_index(), 1);
    }

    #[test]
    fn query_change_resets_selection_even_if_item_survives() {
        let mut palette = abc_palette();
        palette.open();
        palette.handle_event(&Event::key(KeyCode::Down));
        palette.handle_event(&Event::key(KeyCode::Down));
        assert_eq!(palette.selected_command().unwrap().name().base(), "Gamma");

        type_str(&mut palette, "a");
        // Alpha, Beta and Gamma all contain "a"; Gamma is still listed.
        assert_eq!(palette.result_count(), 3);
        assert_eq!(palette.selected_index(), 0);
    }

    #[test]
    fn home_end_navigation() {
        let mut palette = CommandPalette::new();
        palette.open();
        palette.handle_event(&Event::key(KeyCode::End));
        assert_eq!(palette.selected_index(), palette.result_count() - 1);
        palette.handle_event(&Event::key(KeyCode::Home));
        assert_eq!(palette.selected_index(), 0);
        assert_eq!(palette.scroll_offset(), 0);
    }

    #[test]
    fn ctrl_u_clears_query_and_requests_focus() {
        let mut palette = CommandPalette::new();
        palette.open();
        type_str(&mut palette, "set");
        palette.drain_signals().for_each(drop);

        let ctrl_u = KeyEvent::new(KeyCode::Char('u')).with_modifiers(Modifiers::CTRL);
        palette.handle_event(&Event::Key(ctrl_u));
        assert_eq!(palette.query(), "");
        assert!(palette.is_visible());
        assert_eq!(palette.result_count(), palette.registry().len());
        let signals: Vec<_> = palette.drain_signals().collect();
        assert_eq!(signals, vec![PaletteSignal::RequestFocus(palette.focus_ticket())]);
    }

    #[test]
    fn modified_chars_are_not_typed() {
        let mut palette = CommandPalette::new();
        palette.open();
        let alt_a = KeyEvent::new(KeyCode::Char('a')).with_modifiers(Modifiers::ALT);
        palette.handle_event(&Event::Key(alt_a));
        assert_eq!(palette.query(), "");
    }

    #[test]
    fn handles_key_covers_bound_keys_only() {
        for code in [
            KeyCode::Enter,
            KeyCode::Escape,
            KeyCode::Backspace,
            KeyCode::Home,
            KeyCode::End,
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Char('a'),
        ] {
            assert!(CommandPalette::handles_key(&KeyEvent::new(code)), "{code:?}");
        }
        let ctrl_u = KeyEvent::new(KeyCode::Char('u')).with_modifiers(Modifiers::CTRL);
        assert!(CommandPalette::handles_key(&ctrl_u));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        let cmd_v = KeyEvent::new(KeyCode::Char('v')).with_modifiers(Modifiers::SUPER);
        let release = KeyEvent::new(KeyCode::Enter).with_kind(KeyEventKind::Release);
        assert!(!CommandPalette::handles_key(&ctrl_c));
        assert!(!CommandPalette::handles_key(&cmd_v));
        assert!(!CommandPalette::handles_key(&release));
    }

    #[test]
    fn unhandled_keys_leave_state_alone() {
        let mut palette = CommandPalette::new();
        palette.open();
        type_str(&mut palette, "se");
        palette.drain_signals().for_each(drop);
        let before = (palette.query().to_owned(), palette.selected_index());

        let ctrl_c = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert_eq!(palette.handle_event(&Event::Key(ctrl_c)), None);
        assert_eq!((palette.query().to_owned(), palette.selected_index()), before);
        assert_eq!(palette.drain_signals().count(), 0);
    }

    #[test]
    fn events_ignored_when_hidden() {
        let mut palette = CommandPalette::new();
        assert!(palette.handle_event(&Event::key(KeyCode::Char('a'))).is_none());
        assert!(palette.handle_event(&Event::key(KeyCode::Enter)).is_none());
        palette.set_query("chat");
        assert_eq!(palette.query(), "");
        assert!(!palette.is_visible());
    }

    #[test]
    fn query_input_event_replaces_query() {
        let mut palette = CommandPalette::new();
        palette.open();
        palette.handle_event(&Event::QueryInput("notif".into()));
        assert_eq!(palette.query(), "notif");
        assert_eq!(palette.results(), &[2]);
    }

    #[test]
    fn row_click_confirms_that_row() {
        let mut palette = CommandPalette::new();
        palette.open();
        let result = palette.handle_event(&Event::Pointer(PointerTarget::Row(4)));
        assert_eq!(
            result,
            Some(PaletteAction::Execute(CommandAction::navigate("/feeds")))
        );
        assert!(!palette.is_visible());
    }

    #[test]
    fn out_of_range_row_click_is_ignored() {
        let mut palette = CommandPalette::new();
        palette.open();
        type_str(&mut palette, "chat");
        assert_eq!(palette.handle_event(&Event::Pointer(PointerTarget::Row(5))), None);
        assert!(palette.is_visible());
    }

    #[test]
    fn backdrop_click_dismisses() {
        let mut palette = CommandPalette::new();
        palette.open();
        let result = palette.handle_event(&Event::Pointer(PointerTarget::Backdrop));
        assert_eq!(result, Some(PaletteAction::Dismiss));
        assert!(!palette.is_visible());
    }

    #[test]
    fn panel_click_requests_focus_only() {
        let mut palette = CommandPalette::new();
        palette.open();
        palette.drain_signals().for_each(drop);
        assert_eq!(palette.handle_event(&Event::Pointer(PointerTarget::Panel)), None);
        assert!(palette.is_visible());
        assert_eq!(palette.drain_signals().count(), 1);
    }

    #[test]
    fn clear_button_keeps_palette_open() {
        let mut palette = CommandPalette::new();
        palette.open();
        type_str(&mut palette, "zzz");
        palette.handle_event(&Event::Pointer(PointerTarget::ClearButton));
        assert!(palette.is_visible());
        assert_eq!(palette.query(), "");
        assert_eq!(palette.result_count(), palette.registry().len());
    }

    #[test]
    fn focus_ticket_goes_stale_after_close_and_reopen() {
        let mut palette = CommandPalette::new();
        palette.open();
        let first = palette.focus_ticket();
        assert!(palette.focus_ticket_is_current(first));
        palette.close();
        assert!(!palette.focus_ticket_is_current(first));
        palette.open();
        assert!(!palette.focus_ticket_is_current(first));
        assert!(palette.focus_ticket_is_current(palette.focus_ticket()));
    }

    #[test]
    fn view_renders_active_language() {
        let mut palette = CommandPalette::new().with_language(Language::Ja);
        palette.open();
        let view = palette.view().unwrap();
        assert_eq!(view.rows[0].name, "ホーム");
        assert!(view.rows[0].active);
        assert!(!view.rows[1].active);
        assert_eq!(view.placeholder, "Search commands...");
        assert_eq!(view.empty_message, None);
    }

    #[test]
    fn view_shows_empty_message() {
        let mut palette = CommandPalette::new();
        palette.open();
        palette.set_query("no such command");
        let view = palette.view().unwrap();
        assert!(view.rows.is_empty());
        assert_eq!(view.empty_message, Some("No commands found"));
    }

    #[test]
    fn language_change_rerenders_without_reopening() {
        let mut palette = CommandPalette::new();
        palette.open();
        palette.handle_event(&Event::key(KeyCode::Down));
        palette.set_language(Language::Ja);
        assert!(palette.is_visible());
        assert_eq!(palette.selected_index(), 1);
        let view = palette.view().unwrap();
        assert_eq!(view.rows[1].name, "検索");
        assert_eq!(view.language, Language::Ja);
    }

    #[test]
    fn japanese_query_matches_under_base_language() {
        let mut palette = CommandPalette::new();
        palette.open();
        palette.set_query("検索");
        assert_eq!(palette.results(), &[1]);
        palette.set_language(Language::Ja);
        assert_eq!(palette.results(), &[1]);
        assert_eq!(palette.selected_index(), 0);
    }

    #[test]
    fn scroll_follows_selection() {
        let mut palette = CommandPalette::new().with_max_visible(3);
        palette.open();
        for _ in 0..4 {
            palette.handle_event(&Event::key(KeyCode::Down));
        }
        assert_eq!(palette.selected_index(), 4);
        assert_eq!(palette.scroll_offset(), 2);

        // Wrap from the last row back to the first.
        palette.handle_event(&Event::key(KeyCode::End));
        palette.handle_event(&Event::key(KeyCode::Down));
        assert_eq!(palette.selected_index(), 0);
        assert_eq!(palette.scroll_offset(), 0);

        // Wrap from the first row to the last.
        palette.handle_event(&Event::key(KeyCode::Up));
        assert_eq!(palette.selected_index(), palette.result_count() - 1);
        assert_eq!(palette.scroll_offset(), palette.result_count() - 3);
    }

    #[test]
    fn keyboard_only_flow_end_to_end() {
        let mut palette = CommandPalette::new();
        palette.open();
        type_str(&mut palette, "set");
        assert_eq!(palette.results(), &[7]);
        palette.handle_event(&Event::key(KeyCode::Down));
        palette.handle_event(&Event::key(KeyCode::Up));
        assert_eq!(palette.selected_index(), 0);
        let result = palette.handle_event(&Event::key(KeyCode::Enter));
        assert_eq!(
            result,
            Some(PaletteAction::Execute(CommandAction::navigate("/settings")))
        );
        assert!(!palette.is_visible());
    }
}
