#![allow(dead_code)]

use problem_nav::{
    ActiveEditor, Diagnostic, DiagnosticSeverity, EditorHost, EditorId, FileId, HostError,
    OpenOptions, Position, RevealStyle, Selection, SettingsScope,
};
use std::ops::Range;
use std::time::{Duration, Instant};

/// Everything the engine asked the host to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetSelection(EditorId, Position),
    Reveal(EditorId, RevealStyle),
    Open(String, bool),
    Confirm(String),
    Information(String),
    Warning(String),
    ShowMarkerPeek,
    CloseMarkerPeek,
    ShowHover,
    HideHover,
    SetSortOrder(SettingsScope),
}

#[derive(Debug, Clone)]
pub struct FakeEditor {
    pub id: EditorId,
    pub file: FileId,
    pub selection: Selection,
    pub visible: Option<Range<u32>>,
}

/// In-memory editor host.
#[derive(Debug)]
pub struct FakeHost {
    pub files: Vec<(FileId, Vec<Diagnostic>)>,
    pub editors: Vec<FakeEditor>,
    pub active: Option<EditorId>,
    pub hidden: Vec<EditorId>,
    pub tabs: Vec<FileId>,
    pub confirm_answer: bool,
    pub information_answer: Option<usize>,
    pub failing_paths: Vec<String>,
    pub open_steals_focus: bool,
    /// Editor that grabs focus while a document opens, instead of the opened one.
    pub focus_on_open: Option<EditorId>,
    pub now: Instant,
    pub calls: Vec<Call>,
    next_id: u64,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            editors: Vec::new(),
            active: None,
            hidden: Vec::new(),
            tabs: Vec::new(),
            confirm_answer: false,
            information_answer: None,
            failing_paths: Vec::new(),
            open_steals_focus: true,
            focus_on_open: None,
            now: Instant::now(),
            calls: Vec::new(),
            next_id: 1,
        }
    }
}

pub fn diag(line: u32, severity: DiagnosticSeverity) -> Diagnostic {
    Diagnostic::new(Position::new(line, 0), severity, format!("{severity:?} at {line}"))
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register diagnostics for `path`.
    pub fn with_file(mut self, path: &str, diagnostics: Vec<Diagnostic>) -> Self {
        self.files.push((FileId::new(path), diagnostics));
        self
    }

    /// Open `path` in a new editor with the caret on `line`, and make it active.
    pub fn open(&mut self, path: &str, line: u32) -> EditorId {
        let id = self.create_editor(FileId::new(path));
        self.active = Some(id);
        self.move_caret(Position::new(line, 0));
        id
    }

    fn create_editor(&mut self, file: FileId) -> EditorId {
        let id = EditorId::new(self.next_id);
        self.next_id += 1;
        if !self.tabs.iter().any(|tab| tab.path() == file.path()) {
            self.tabs.push(file.clone());
        }
        self.editors.push(FakeEditor {
            id,
            file,
            selection: Selection::default(),
            visible: Some(0..40),
        });
        id
    }

    pub fn editor(&self, id: EditorId) -> Option<&FakeEditor> {
        self.editors.iter().find(|e| e.id == id)
    }

    fn editor_mut(&mut self, id: EditorId) -> Option<&mut FakeEditor> {
        self.editors.iter_mut().find(|e| e.id == id)
    }

    /// Move the caret of the active editor without logging a call.
    pub fn move_caret(&mut self, position: Position) {
        if let Some(id) = self.active
            && let Some(editor) = self.editor_mut(id)
        {
            editor.selection = Selection::caret(position);
        }
    }

    pub fn set_visible(&mut self, id: EditorId, visible: Option<Range<u32>>) {
        if let Some(editor) = self.editor_mut(id) {
            editor.visible = visible;
        }
    }

    pub fn advance(&mut self, millis: u64) {
        self.now += Duration::from_millis(millis);
    }

    pub fn active_editor_id(&self) -> EditorId {
        self.active.expect("an active editor")
    }

    pub fn active_path(&self) -> Option<String> {
        self.active_editor().map(|a| a.file.path().to_string())
    }

    pub fn active_line(&self) -> Option<u32> {
        self.active_editor().map(|a| a.selection.start.line)
    }

    pub fn opened(&self) -> Vec<(String, bool)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Open(path, preview) => Some((path.clone(), *preview)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls.iter().filter(|call| *call == wanted).count()
    }
}

impl EditorHost for FakeHost {
    fn diagnostics(&self, file: &FileId) -> Vec<Diagnostic> {
        self.files
            .iter()
            .find(|(f, _)| f.path() == file.path())
            .map(|(_, diagnostics)| diagnostics.clone())
            .unwrap_or_default()
    }

    fn all_diagnostics(&self) -> Vec<(FileId, Vec<Diagnostic>)> {
        self.files.clone()
    }

    fn active_editor(&self) -> Option<ActiveEditor> {
        let editor = self.editor(self.active?)?;
        Some(ActiveEditor {
            id: editor.id,
            file: editor.file.clone(),
            selection: editor.selection,
        })
    }

    fn visible_editors(&self) -> Vec<EditorId> {
        self.editors
            .iter()
            .map(|e| e.id)
            .filter(|id| !self.hidden.contains(id))
            .collect()
    }

    fn visible_lines(&self, editor: EditorId) -> Option<Range<u32>> {
        self.editor(editor)?.visible.clone()
    }

    fn open_tabs(&self) -> Vec<FileId> {
        self.tabs.clone()
    }

    fn set_selection(&mut self, editor: EditorId, position: Position) -> Result<(), HostError> {
        self.calls.push(Call::SetSelection(editor, position));
        let editor = self
            .editor_mut(editor)
            .ok_or(HostError::EditorGone(editor))?;
        editor.selection = Selection::caret(position);
        Ok(())
    }

    fn reveal_selection(&mut self, editor: EditorId, style: RevealStyle) -> Result<(), HostError> {
        self.calls.push(Call::Reveal(editor, style));
        Ok(())
    }

    fn open_document(&mut self, file: &FileId, options: OpenOptions) -> Result<EditorId, HostError> {
        self.calls
            .push(Call::Open(file.path().to_string(), options.preview));
        if self.failing_paths.iter().any(|p| p == file.path()) {
            return Err(HostError::OpenFailed {
                file: file.clone(),
                message: "rejected".to_string(),
            });
        }

        let id = match self.editors.iter().find(|e| e.file.path() == file.path()) {
            Some(editor) => editor.id,
            None => self.create_editor(file.clone()),
        };
        if let Some(other) = self.focus_on_open {
            self.active = Some(other);
        } else if self.open_steals_focus {
            self.active = Some(id);
        }
        Ok(id)
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.calls.push(Call::Confirm(message.to_string()));
        self.confirm_answer
    }

    fn show_information(&mut self, message: &str, _choices: &[&str]) -> Option<usize> {
        self.calls.push(Call::Information(message.to_string()));
        self.information_answer
    }

    fn show_warning(&mut self, message: &str) {
        self.calls.push(Call::Warning(message.to_string()));
    }

    fn show_marker_peek(&mut self) -> Result<(), HostError> {
        self.calls.push(Call::ShowMarkerPeek);
        Ok(())
    }

    fn close_marker_peek(&mut self) {
        self.calls.push(Call::CloseMarkerPeek);
    }

    fn show_hover(&mut self) {
        self.calls.push(Call::ShowHover);
    }

    fn hide_hover(&mut self) {
        self.calls.push(Call::HideHover);
    }

    fn set_problems_sort_order_position(&mut self, scope: SettingsScope) -> Result<(), HostError> {
        self.calls.push(Call::SetSortOrder(scope));
        Ok(())
    }

    fn now(&self) -> Instant {
        self.now
    }
}
