//! Idle / processing / complete indicator driven by an `active` signal.
//!
//! Turning the signal on from `Idle` schedules a one-shot completion after
//! a fixed delay. Turning it off returns to `Idle` from any state and
//! cancels the pending completion. The schedule is a deadline checked by
//! [`ProcessingIndicator::tick`], so nothing fires outside of a tick and
//! nothing can fire after the indicator is dropped.

use std::time::Duration;

use web_time::Instant;

/// Indicator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingState {
    /// Nothing running.
    #[default]
    Idle,
    /// Active, completion pending.
    Processing,
    /// The scheduled completion has fired; stable until reset.
    Complete,
}

impl ProcessingState {
    /// Fixed status label for this state.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Processing => "Processing...",
            Self::Complete => "Complete",
        }
    }
}

/// One-shot completion owned by the indicator.
#[derive(Debug, Clone, Copy)]
struct ScheduledCompletion {
    due: Instant,
}

/// The indicator state machine.
#[derive(Debug)]
pub struct ProcessingIndicator {
    state: ProcessingState,
    delay: Duration,
    pending: Option<ScheduledCompletion>,
}

impl ProcessingIndicator {
    /// Create an idle indicator that completes `delay` after activation.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            state: ProcessingState::Idle,
            delay,
            pending: None,
        }
    }

    /// Feed the external `active` signal.
    ///
    /// Repeated `true` while processing or complete does not reschedule.
    pub fn set_active(&mut self, active: bool, now: Instant) {
        if !active {
            self.reset();
            return;
        }
        if self.state == ProcessingState::Idle && self.pending.is_none() {
            self.pending = Some(ScheduledCompletion {
                due: now + self.delay,
            });
            self.transition(ProcessingState::Processing);
        }
    }

    /// Fire the scheduled completion if it is due. Returns `true` when the
    /// state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(completion) if now >= completion.due => {
                self.pending = None;
                self.transition(ProcessingState::Complete);
                true
            }
            _ => false,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ProcessingState {
        self.state
    }

    /// Status label for the current state.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        self.state.label()
    }

    /// Whether a completion is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Back to `Idle`, cancelling any pending completion. Safe to call in
    /// any state, any number of times.
    pub fn reset(&mut self) {
        self.pending = None;
        self.transition(ProcessingState::Idle);
    }

    fn transition(&mut self, next: ProcessingState) {
        if self.state != next {
            log::debug!(
                "indicator: {} -> {}",
                self.state.label(),
                next.label()
            );
            self.state = next;
        }
    }
}
