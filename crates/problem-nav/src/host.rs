//! The host editor, as seen by the navigation engine.
//!
//! `problem-nav` owns no UI. Everything it needs from the editor (diagnostics, the active editor
//! and its selection, open tabs) and everything it asks the editor to do (move the selection,
//! open a document, show a peek) goes through [`EditorHost`].
//!
//! Host primitives that are asynchronous in a real editor (opening a document, a modal prompt)
//! are synchronous here: the call returning *is* the continuation point. The engine re-reads
//! [`EditorHost::active_editor`] after every such call and never assumes the editor it started
//! with is still active.

use crate::diagnostics::{Diagnostic, Position};
use crate::uri::FileId;
use std::ops::Range;
use std::time::Instant;
use thiserror::Error;

/// Opaque identifier of an editor (a view onto a document) in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EditorId(u64);

impl EditorId {
    /// Create an id from a host-assigned number.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Primary selection of an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Start of the selection (the earlier position).
    pub start: Position,
    /// End of the selection.
    pub end: Position,
}

impl Selection {
    /// Create a selection.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width selection at `position`.
    pub fn caret(position: Position) -> Self {
        Self::new(position, position)
    }
}

/// Snapshot of the host's active editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEditor {
    /// Editor identity.
    pub id: EditorId,
    /// Document shown in the editor.
    pub file: FileId,
    /// Primary selection.
    pub selection: Selection,
}

/// How the host should scroll a jump target into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStyle {
    /// Scroll as little as possible.
    Default,
    /// Center the target.
    InCenter,
    /// Center the target only if it is outside the viewport.
    InCenterIfOutsideViewport,
    /// Put the target at the top.
    AtTop,
}

/// Options for [`EditorHost::open_document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    /// Open in preview mode (the tab is replaced by the next preview).
    pub preview: bool,
}

/// Why a selection changed, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChangeKind {
    /// Keyboard movement.
    Keyboard,
    /// Mouse click or drag.
    Mouse,
    /// A command, or unknown.
    Command,
}

/// Where a host setting should be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsScope {
    /// User (global) settings.
    User,
    /// Workspace settings.
    Workspace,
}

/// Failures of host primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host refused or failed to open a document.
    #[error("failed to open {file}: {message}")]
    OpenFailed {
        /// The document that could not be opened.
        file: FileId,
        /// Host-provided reason.
        message: String,
    },
    /// An editor id no longer refers to a live editor.
    #[error("editor {0:?} is gone")]
    EditorGone(EditorId),
    /// Writing a host setting failed.
    #[error("failed to update setting {key}: {message}")]
    SettingUpdateFailed {
        /// Setting key.
        key: String,
        /// Host-provided reason.
        message: String,
    },
}

/// The host editor environment.
pub trait EditorHost {
    /// Diagnostics currently known for `file`.
    fn diagnostics(&self, file: &FileId) -> Vec<Diagnostic>;

    /// Diagnostics for every file the host knows about.
    fn all_diagnostics(&self) -> Vec<(FileId, Vec<Diagnostic>)>;

    /// The active text editor, if any.
    fn active_editor(&self) -> Option<ActiveEditor>;

    /// All visible editors.
    fn visible_editors(&self) -> Vec<EditorId>;

    /// Visible line range (half-open) of `editor`, or `None` if nothing is visible.
    fn visible_lines(&self, editor: EditorId) -> Option<Range<u32>>;

    /// Documents open as tabs, in any tab group.
    fn open_tabs(&self) -> Vec<FileId>;

    /// Replace the primary selection of `editor` with a caret at `position`.
    fn set_selection(&mut self, editor: EditorId, position: Position) -> Result<(), HostError>;

    /// Scroll the selection of `editor` into view.
    fn reveal_selection(&mut self, editor: EditorId, style: RevealStyle) -> Result<(), HostError>;

    /// Open (or focus) `file`; on success it becomes the active editor.
    fn open_document(&mut self, file: &FileId, options: OpenOptions) -> Result<EditorId, HostError>;

    /// Modal yes/no prompt. Returns `true` only on an explicit "yes".
    fn confirm(&mut self, message: &str) -> bool;

    /// Informational message with choices; returns the index of the chosen one.
    fn show_information(&mut self, message: &str, choices: &[&str]) -> Option<usize>;

    /// Non-modal warning message.
    fn show_warning(&mut self, message: &str);

    /// Open the inline problem peek at the selection of the active editor.
    fn show_marker_peek(&mut self) -> Result<(), HostError>;

    /// Close the inline problem peek.
    fn close_marker_peek(&mut self);

    /// Show the hover at the selection of the active editor.
    fn show_hover(&mut self);

    /// Hide the hover.
    fn hide_hover(&mut self);

    /// Set the host's `problems.sortOrder` to `position`.
    fn set_problems_sort_order_position(&mut self, scope: SettingsScope) -> Result<(), HostError>;

    /// Current time, used by the peek timers.
    fn now(&self) -> Instant {
        Instant::now()
    }
}
