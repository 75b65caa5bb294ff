#![forbid(unsafe_code)]

//! Input focus: the page-side guard and the deferred focus scheduler.
//!
//! While the palette is open the host app must not pull focus away from the
//! query input. [`FocusGuard`] is the predicate the page script consults
//! before letting one of the app's own `focus()` calls through.
//!
//! The query input does not exist yet when the palette opens, so focusing it
//! is deferred. [`DeferredFocus`] turns a [`FocusTicket`] into a `focus-input`
//! attempt once the delay has elapsed on the host clock, drops it if the
//! palette was closed or reopened in the meantime, and retries a bounded
//! number of times when the host reports that focusing failed.

use core::time::Duration;

use skypal_widgets::command_palette::FocusTicket;

use crate::message::OutboundMessage;

/// Whether a host-initiated focus call may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDecision {
    /// Let the focus call through.
    Allow,
    /// Swallow the focus call.
    Deny,
}

/// Page-side focus interception state.
///
/// Denies exactly while the palette is open.
#[derive(Debug, Clone, Default)]
pub struct FocusGuard {
    palette_open: bool,
}

impl FocusGuard {
    /// Guard for a closed palette.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            palette_open: false,
        }
    }

    /// Record the palette's visibility.
    pub fn set_open(&mut self, open: bool) {
        self.palette_open = open;
    }

    /// Update from an outbound message; only `palette-open-state` matters.
    pub fn observe(&mut self, message: &OutboundMessage) {
        if let OutboundMessage::PaletteOpenState { open } = message {
            self.palette_open = *open;
        }
    }

    /// Decide on a host-initiated focus call.
    #[must_use]
    pub const fn decide(&self) -> FocusDecision {
        if self.palette_open {
            FocusDecision::Deny
        } else {
            FocusDecision::Allow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingFocus {
    ticket: FocusTicket,
    due: Duration,
    attempts: u32,
    awaiting_report: bool,
}

/// Deferred, retrying focus requests driven by the host clock.
#[derive(Debug, Clone)]
pub struct DeferredFocus {
    delay: Duration,
    max_attempts: u32,
    pending: Option<PendingFocus>,
}

impl DeferredFocus {
    /// Scheduler that waits `delay` before each attempt and gives up after
    /// `max_attempts` failed attempts.
    #[must_use]
    pub fn new(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts: max_attempts.max(1),
            pending: None,
        }
    }

    /// Schedule a focus attempt for `ticket` one delay from `now`. Replaces
    /// any pending request.
    pub fn schedule(&mut self, ticket: FocusTicket, now: Duration) {
        self.schedule_at(ticket, now.saturating_add(self.delay));
    }

    /// Schedule a focus attempt due at `now`, for an input that is already
    /// attached. Failed attempts still back off by the retry delay.
    pub fn schedule_now(&mut self, ticket: FocusTicket, now: Duration) {
        self.schedule_at(ticket, now);
    }

    fn schedule_at(&mut self, ticket: FocusTicket, due: Duration) {
        self.pending = Some(PendingFocus {
            ticket,
            due,
            attempts: 0,
            awaiting_report: false,
        });
    }

    /// Drop any pending request.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a request is pending (scheduled or awaiting its report).
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the next attempt is due, if one is scheduled.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.pending
            .filter(|p| !p.awaiting_report)
            .map(|p| p.due)
    }

    /// Attempts made for the pending request.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.pending.map_or(0, |p| p.attempts)
    }

    /// Fire the pending attempt if it is due.
    ///
    /// Returns the message to emit. A request whose ticket `is_current`
    /// rejects is dropped without output.
    pub fn poll(
        &mut self,
        now: Duration,
        is_current: impl FnOnce(FocusTicket) -> bool,
    ) -> Option<OutboundMessage> {
        let pending = self.pending.as_mut()?;
        if pending.awaiting_report || now < pending.due {
            return None;
        }
        if !is_current(pending.ticket) {
            tracing::debug!(epoch = pending.ticket.epoch(), "dropping stale focus request");
            self.pending = None;
            return None;
        }
        pending.attempts += 1;
        pending.awaiting_report = true;
        tracing::trace!(
            epoch = pending.ticket.epoch(),
            attempt = pending.attempts,
            "focus attempt"
        );
        Some(OutboundMessage::FocusInput)
    }

    /// Host feedback for the last attempt.
    ///
    /// On failure the attempt is rescheduled one delay later, unless the
    /// attempt budget is spent.
    pub fn report(&mut self, focused: bool, now: Duration) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if !pending.awaiting_report {
            return;
        }
        if focused {
            self.pending = None;
        } else if pending.attempts >= self.max_attempts {
            tracing::debug!(attempts = pending.attempts, "giving up on input focus");
            self.pending = None;
        } else {
            pending.due = now.saturating_add(self.delay);
            pending.awaiting_report = false;
        }
    }
}
