//! Standard (inline problem panel) peek.
//!
//! The host's problem panel is opened per editor, so this keeps an open/closed flag per
//! [`EditorId`]. The table is created on first use. Entries for editors that are no longer
//! visible are evicted on active-editor changes (at most once per [`CLEANUP_INTERVAL`]), and
//! the whole controller is dropped once no editor has an open panel.

use crate::host::{EditorHost, EditorId, SelectionChangeKind};
use crate::settings::{AutoHideEvent, StandardAutoHide};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Minimum time between two eviction passes.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PeekState {
    open: bool,
}

/// What the owner should do with the controller after an active-editor change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Keep the controller.
    Keep,
    /// No panel is open anywhere; drop the controller.
    TearDown,
}

/// Per-editor state of the standard peek.
#[derive(Debug)]
pub struct StandardPeek {
    states: HashMap<EditorId, PeekState>,
    auto_hide: StandardAutoHide,
    last_activity: Instant,
}

impl StandardPeek {
    /// Create an empty controller.
    pub fn new(auto_hide: StandardAutoHide, now: Instant) -> Self {
        Self {
            states: HashMap::new(),
            auto_hide,
            last_activity: now,
        }
    }

    /// Open the problem panel in the active editor.
    pub fn show<H: EditorHost + ?Sized>(&mut self, host: &mut H, now: Instant) {
        if let Err(err) = host.show_marker_peek() {
            warn!(%err, "failed to show problem peek");
            return;
        }
        let Some(editor) = host.active_editor() else {
            return;
        };

        self.states.entry(editor.id).or_default().open = true;
        self.last_activity = now;
    }

    /// Close the problem panel of the active editor, if this controller opened it.
    pub fn hide<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        let Some(editor) = host.active_editor() else {
            return;
        };
        let Some(state) = self.states.get_mut(&editor.id) else {
            return;
        };
        if !state.open {
            return;
        }

        state.open = false;
        host.close_marker_peek();
    }

    /// Returns `true` if the panel is open in `editor`.
    pub fn is_open(&self, editor: EditorId) -> bool {
        self.states.get(&editor).is_some_and(|s| s.open)
    }

    /// Number of tracked editors.
    pub fn tracked(&self) -> usize {
        self.states.len()
    }

    /// React to a document edit.
    pub fn on_document_edited<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        if self.auto_hide.hides_on(AutoHideEvent::Edit) {
            self.hide(host);
        }
    }

    /// React to a selection change.
    pub fn on_selection_changed<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        kind: SelectionChangeKind,
    ) {
        let event = match kind {
            SelectionChangeKind::Keyboard => AutoHideEvent::MoveKeyboard,
            SelectionChangeKind::Mouse => AutoHideEvent::MoveMouse,
            SelectionChangeKind::Command => AutoHideEvent::MoveOther,
        };
        if self.auto_hide.hides_on(event) {
            self.hide(host);
        }
    }

    /// React to the active editor changing.
    pub fn on_active_editor_changed<H: EditorHost + ?Sized>(
        &mut self,
        host: &H,
        now: Instant,
    ) -> Lifecycle {
        if now.saturating_duration_since(self.last_activity) < CLEANUP_INTERVAL {
            return Lifecycle::Keep;
        }

        let visible = host.visible_editors();
        let before = self.states.len();
        self.states.retain(|editor, _| visible.contains(editor));
        debug!(evicted = before - self.states.len(), "standard peek cleanup");

        if self.states.values().any(|s| s.open) {
            self.last_activity = now;
            Lifecycle::Keep
        } else {
            Lifecycle::TearDown
        }
    }
}
