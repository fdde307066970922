//! Hover peek.
//!
//! With smooth scrolling on, a hover shown right after a jump would appear at the pre-scroll
//! location. So the hover is re-shown only once the viewport has settled: the host ticks the
//! pending [`ScrollSettleTask`] every [`HOVER_TICK_INTERVAL`], and the task finishes when the
//! visible lines stay put for two consecutive ticks after the configured delay.

use crate::host::{EditorHost, EditorId, Selection};
use std::cell::Cell;
use std::ops::Range;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::trace;

/// How often the host should tick a pending hover.
pub const HOVER_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Extra time past the delay after which a pending hover gives up.
pub const SETTLE_GRACE: Duration = Duration::from_millis(500);

/// Shared cancellation flag, checked on every tick.
///
/// Clones share the flag, so whoever holds one can stop the task it was taken from.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    /// Create a live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every task holding this token.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    /// Returns `true` once cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still waiting for scrolling to settle.
    Pending,
    /// The viewport settled; show the hover now.
    Settled,
    /// The task was cancelled and must be dropped.
    Cancelled,
}

/// Waits for smooth scrolling to settle before showing a hover.
#[derive(Debug)]
pub struct ScrollSettleTask {
    token: CancelToken,
    editor: EditorId,
    selection: Selection,
    started: Instant,
    delay: Duration,
    last_visible: Range<u32>,
    stable: bool,
}

impl ScrollSettleTask {
    /// Start waiting on `editor`, whose selection is `selection`.
    pub fn new(
        editor: EditorId,
        selection: Selection,
        visible: Range<u32>,
        delay: Duration,
        now: Instant,
    ) -> Self {
        Self {
            token: CancelToken::new(),
            editor,
            selection,
            started: now,
            delay,
            last_visible: visible,
            stable: false,
        }
    }

    /// Token that cancels this task.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Advance the task.
    pub fn tick<H: EditorHost + ?Sized>(&mut self, host: &H, now: Instant) -> TickOutcome {
        if self.token.is_cancelled() {
            return TickOutcome::Cancelled;
        }

        let elapsed = now.saturating_duration_since(self.started);
        let active = host.active_editor();
        let visible = host.visible_lines(self.editor);

        let still_valid = elapsed <= self.delay + SETTLE_GRACE
            && active
                .as_ref()
                .is_some_and(|a| a.id == self.editor && a.selection == self.selection);
        let Some(visible) = visible.filter(|_| still_valid) else {
            self.token.cancel();
            return TickOutcome::Cancelled;
        };

        let line = self.selection.start.line;
        if line < visible.start || line >= visible.end {
            return TickOutcome::Pending;
        }

        if elapsed > self.delay {
            if visible == self.last_visible {
                if self.stable {
                    self.token.cancel();
                    return TickOutcome::Settled;
                }
                self.stable = true;
            } else {
                self.stable = false;
            }
            trace!(?visible, stable = self.stable, "hover settle tick");
            self.last_visible = visible;
        }

        TickOutcome::Pending
    }
}

/// Hover peek controller. Holds at most one pending task.
#[derive(Debug, Default)]
pub struct HoverPeek {
    task: Option<ScrollSettleTask>,
}

impl HoverPeek {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the hover at the selection of `editor`, waiting for smooth scrolling if needed.
    pub fn show<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        editor: EditorId,
        smooth_scrolling: bool,
        delay: Duration,
        now: Instant,
    ) {
        self.cancel();
        self.task = None;

        let Some(visible) = host.visible_lines(editor) else {
            return;
        };
        if !smooth_scrolling {
            reshow(host);
            return;
        }
        let Some(active) = host.active_editor().filter(|a| a.id == editor) else {
            return;
        };

        self.task = Some(ScrollSettleTask::new(
            editor,
            active.selection,
            visible,
            delay,
            now,
        ));
    }

    /// Tick the pending task, if any.
    pub fn tick<H: EditorHost + ?Sized>(&mut self, host: &mut H, now: Instant) {
        let Some(task) = self.task.as_mut() else {
            return;
        };
        match task.tick(host, now) {
            TickOutcome::Pending => {}
            TickOutcome::Settled => {
                self.task = None;
                reshow(host);
            }
            TickOutcome::Cancelled => self.task = None,
        }
    }

    /// Returns `true` while a live task is waiting.
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.token.is_cancelled())
    }

    /// Token of the pending task, if any.
    pub fn token(&self) -> Option<CancelToken> {
        self.task.as_ref().map(ScrollSettleTask::token)
    }

    /// Cancel the pending task. It is dropped on its next tick.
    pub fn cancel(&mut self) {
        if let Some(task) = &self.task {
            task.token.cancel();
        }
    }
}

fn reshow<H: EditorHost + ?Sized>(host: &mut H) {
    host.hide_hover();
    host.show_hover();
}
