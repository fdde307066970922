//! Navigation commands of one (set, direction) pair.
//!
//! A [`Navigator`] holds no state between invocations. Every command fetches fresh diagnostics
//! from the host, runs the searches against the set's [`NavigationConfig`] and drives the host
//! to the chosen problem.

use crate::config::NavigationConfig;
use crate::diagnostics::Diagnostic;
use crate::host::{EditorHost, HostError, OpenOptions};
use crate::peek::Peek;
use crate::search::{
    Direction, DocumentHit, WorkspaceHit, files_with_problems, next_in_document,
    next_in_workspace,
};
use crate::settings::GeneralSettings;
use crate::uri::FileId;
use tracing::{debug, info, warn};

/// Which part of the workspace the chosen problem lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Undefined,
    ActiveEditor,
    RestWorkspace,
}

/// Navigation commands for one set in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    set: usize,
    direction: Direction,
}

impl Navigator {
    /// Create a navigator for `set` (1-based).
    pub fn new(set: usize, direction: Direction) -> Self {
        Self { set, direction }
    }

    /// The navigation set.
    pub fn set(&self) -> usize {
        self.set
    }

    /// Direction of travel.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Jump to the next problem in the active document.
    pub fn navigate<H: EditorHost + ?Sized>(
        &self,
        config: &NavigationConfig,
        peek: &mut Peek,
        host: &mut H,
    ) -> Result<(), HostError> {
        if !config.settings.enabled {
            return Ok(());
        }
        let Some(hit) = self.next_in_active_editor(config, host) else {
            debug!(set = self.set, direction = ?self.direction, "no problem in active document");
            return Ok(());
        };

        self.jump_in_active_editor(config, peek, host, &hit.diagnostic)
    }

    /// Jump to the next problem anywhere in the workspace.
    ///
    /// The active document is searched first. Its hit is kept tentatively unless it required
    /// wrapping. The rest of the workspace is searched only if the tentative basket can still
    /// be beaten and wins on strict improvement. Finally the active hit, wrapped or not, wins
    /// if it is strictly better than whatever was chosen.
    pub fn navigate_in_workspace<H: EditorHost + ?Sized>(
        &self,
        config: &NavigationConfig,
        peek: &mut Peek,
        host: &mut H,
    ) -> Result<(), HostError> {
        if !config.settings.enabled {
            return Ok(());
        }

        let mut segment = Segment::Undefined;
        let mut basket: Option<u8> = None;

        let in_active = self.next_in_active_editor(config, host);
        if let Some(hit) = &in_active {
            if config.settings.prioritize_active {
                segment = Segment::ActiveEditor;
                basket = Some(0);
            } else if !hit.wrap {
                segment = Segment::ActiveEditor;
                basket = Some(hit.basket);
            }
        }

        let in_workspace = if basket.is_none_or(|b| b > 0) {
            self.next_in_rest_workspace(config, host)
        } else {
            None
        };
        if let Some(hit) = &in_workspace
            && basket.is_none_or(|b| hit.basket < b)
        {
            segment = Segment::RestWorkspace;
            basket = Some(hit.basket);
        }

        if let Some(hit) = &in_active
            && basket.is_none_or(|b| hit.basket < b)
        {
            segment = Segment::ActiveEditor;
            basket = Some(hit.basket);
        }

        debug!(set = self.set, direction = ?self.direction, ?segment, ?basket, "workspace navigation");
        match (segment, in_active, in_workspace) {
            (Segment::ActiveEditor, Some(hit), _) => {
                self.jump_in_active_editor(config, peek, host, &hit.diagnostic)
            }
            (Segment::RestWorkspace, _, Some(hit)) => {
                self.jump_in_rest_workspace(config, peek, host, &hit)
            }
            _ => Ok(()),
        }
    }

    /// Open every file with a navigable problem that is not already open as a tab.
    ///
    /// Asks for confirmation above the configured threshold. Focus goes back to the editor that
    /// was active before, or to the first opened file if none was.
    pub fn open_all<H: EditorHost + ?Sized>(
        &self,
        config: &NavigationConfig,
        general: &GeneralSettings,
        host: &mut H,
    ) -> Result<(), HostError> {
        let initial = host.active_editor();
        let tabs = host.open_tabs();

        let files = files_with_problems(
            host.all_diagnostics(),
            initial.as_ref().map(|a| &a.file),
            config,
            self.direction,
        );
        let to_open: Vec<FileId> = files
            .into_iter()
            .filter(|file| !tabs.iter().any(|tab| tab.path() == file.path()))
            .collect();
        if to_open.is_empty() {
            debug!(set = self.set, "nothing to open");
            return Ok(());
        }

        if to_open.len() as u64 > general.open_all_warning_threshold {
            let message = format!(
                "Found {} sources containing problems. Proceed?",
                to_open.len()
            );
            if !host.confirm(&message) {
                debug!(count = to_open.len(), "open all declined");
                return Ok(());
            }
        }

        let options = OpenOptions { preview: false };
        let mut failure = None;
        let mut opened = 0;
        for file in &to_open {
            match host.open_document(file, options) {
                Ok(_) => opened += 1,
                Err(err) => {
                    warn!(%err, "open all stopped");
                    failure = Some(err);
                    break;
                }
            }
        }
        info!(set = self.set, opened, "opened files with problems");

        let focus = match initial {
            Some(editor) => Some(editor.file),
            None if opened > 0 => Some(to_open[0].clone()),
            None => None,
        };
        if let Some(file) = focus {
            host.open_document(&file, options)?;
        }

        failure.map_or(Ok(()), Err)
    }

    fn next_in_active_editor<H: EditorHost + ?Sized>(
        &self,
        config: &NavigationConfig,
        host: &H,
    ) -> Option<DocumentHit> {
        let editor = host.active_editor()?;
        let diagnostics = host.diagnostics(&editor.file);
        next_in_document(
            &editor.file,
            diagnostics,
            editor.selection.start,
            config,
            self.direction,
        )
    }

    fn next_in_rest_workspace<H: EditorHost + ?Sized>(
        &self,
        config: &NavigationConfig,
        host: &H,
    ) -> Option<WorkspaceHit> {
        let active = host.active_editor();
        next_in_workspace(
            host.all_diagnostics(),
            active.as_ref().map(|a| &a.file),
            config,
            self.direction,
        )
    }

    fn jump_in_active_editor<H: EditorHost + ?Sized>(
        &self,
        config: &NavigationConfig,
        peek: &mut Peek,
        host: &mut H,
        diagnostic: &Diagnostic,
    ) -> Result<(), HostError> {
        peek.cancel();

        let Some(editor) = host.active_editor() else {
            return Ok(());
        };
        host.set_selection(editor.id, diagnostic.start())?;

        peek.peek(
            host,
            editor.id,
            config.peek.as_ref(),
            diagnostic.severity,
            config.reveal,
        );
        Ok(())
    }

    fn jump_in_rest_workspace<H: EditorHost + ?Sized>(
        &self,
        config: &NavigationConfig,
        peek: &mut Peek,
        host: &mut H,
        hit: &WorkspaceHit,
    ) -> Result<(), HostError> {
        peek.cancel();
        peek.hide(host);

        let before = host.active_editor().map(|a| a.id);
        let options = OpenOptions {
            preview: config.settings.open_in_preview,
        };
        let opened = host.open_document(&hit.file, options)?;

        // The open may have been superseded, or focus may have gone elsewhere meanwhile.
        match host.active_editor() {
            Some(active)
                if Some(active.id) != before
                    && active.id == opened
                    && active.file.path() == hit.file.path() => {}
            active => {
                debug!(
                    file = hit.file.path(),
                    active = active.as_ref().map(|a| a.file.path()),
                    "opened document is not the active editor"
                );
                return Ok(());
            }
        }

        self.jump_in_active_editor(config, peek, host, &hit.diagnostic)
    }
}
