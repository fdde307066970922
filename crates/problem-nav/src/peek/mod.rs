//! Problem peek after a jump.
//!
//! Two styles exist. The standard peek opens the host's inline problem panel. The hover peek
//! re-shows the hover at the new selection. The host's inline panel shows problems in the order
//! of its problems list, so for warnings and infos the standard peek is only correct when
//! `problems.sortOrder` is `position`; otherwise the hover is used and the user is offered, once
//! per settings snapshot, to fix the setting.

mod hover;
mod standard;

pub use hover::{
    CancelToken, HOVER_TICK_INTERVAL, HoverPeek, SETTLE_GRACE, ScrollSettleTask, TickOutcome,
};
pub use standard::{CLEANUP_INTERVAL, Lifecycle, StandardPeek};

use crate::diagnostics::DiagnosticSeverity;
use crate::host::{EditorHost, EditorId, RevealStyle, SelectionChangeKind, SettingsScope};
use crate::settings::{PeekConfig, Settings, StandardAutoHide};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Prompt offering to set `problems.sortOrder`.
pub const SORT_ORDER_PROMPT: &str = "For the standard style problem peeking to work correctly, \
     it is necessary to set \"problems.sortOrder\" setting as \"position\". Set it for you?";

/// Choices of [`SORT_ORDER_PROMPT`], in order.
pub const SORT_ORDER_CHOICES: [&str; 2] = ["In User Settings", "In Workspace Settings"];

/// Warning shown when workspace settings are chosen without an open workspace.
pub const NO_WORKSPACE_WARNING: &str = "No open Workspace at the moment";

/// Peek style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeekStyle {
    /// The host's inline problem panel.
    Standard,
    /// The hover at the selection.
    Hover,
}

#[derive(Debug, Clone)]
struct PeekOptions {
    smooth_scrolling: bool,
    hover_delay: Duration,
    auto_hide: StandardAutoHide,
    sort_order_is_position: bool,
    sort_order_notification: bool,
    workspace_open: bool,
}

impl PeekOptions {
    fn from_settings(settings: &Settings) -> Self {
        Self {
            smooth_scrolling: settings.environment.smooth_scrolling,
            hover_delay: Duration::from_millis(settings.general.peek_hover_smooth_scrolling_delay),
            auto_hide: settings.general.standard_auto_hide(),
            sort_order_is_position: settings.environment.sort_order_is_position(),
            sort_order_notification: settings.general.problems_sort_order_notification,
            workspace_open: settings.environment.is_workspace(),
        }
    }
}

/// Peek controller shared by every navigator.
#[derive(Debug)]
pub struct Peek {
    options: PeekOptions,
    standard: Option<StandardPeek>,
    hover: HoverPeek,
    sort_order_notified: bool,
}

impl Peek {
    /// Create a controller for `settings`.
    pub fn new(settings: &Settings) -> Self {
        Self {
            options: PeekOptions::from_settings(settings),
            standard: None,
            hover: HoverPeek::new(),
            sort_order_notified: false,
        }
    }

    /// Adopt a new settings snapshot. Call [`Peek::shutdown`] first.
    pub fn configure(&mut self, settings: &Settings) {
        self.options = PeekOptions::from_settings(settings);
        self.sort_order_notified = false;
    }

    /// Reveal the selection of `editor` and, if configured for `severity`, peek at it.
    ///
    /// Reveal only happens while `editor` is still the active editor.
    pub fn peek<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        editor: EditorId,
        config: Option<&PeekConfig>,
        severity: DiagnosticSeverity,
        reveal: RevealStyle,
    ) {
        self.hide(host);
        reveal_if_active(host, editor, reveal);

        let Some(config) = config.filter(|c| c.shows(severity)) else {
            return;
        };

        match self.resolve_style(host, config.style, severity) {
            PeekStyle::Standard => {
                let now = host.now();
                self.standard
                    .get_or_insert_with(|| StandardPeek::new(self.options.auto_hide.clone(), now))
                    .show(host, now);
                reveal_if_active(host, editor, reveal);
            }
            PeekStyle::Hover => {
                let now = host.now();
                self.hover.show(
                    host,
                    editor,
                    self.options.smooth_scrolling,
                    self.options.hover_delay,
                    now,
                );
            }
        }
    }

    fn resolve_style<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        preferred: PeekStyle,
        severity: DiagnosticSeverity,
    ) -> PeekStyle {
        match (preferred, severity) {
            (PeekStyle::Hover, _) | (_, DiagnosticSeverity::Hint) => PeekStyle::Hover,
            (PeekStyle::Standard, DiagnosticSeverity::Error) => PeekStyle::Standard,
            (PeekStyle::Standard, _) if self.options.sort_order_is_position => PeekStyle::Standard,
            (PeekStyle::Standard, _) => {
                self.notify_sort_order(host);
                PeekStyle::Hover
            }
        }
    }

    fn notify_sort_order<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        if !self.options.sort_order_notification || self.sort_order_notified {
            return;
        }
        self.sort_order_notified = true;

        let scope = match host.show_information(SORT_ORDER_PROMPT, &SORT_ORDER_CHOICES) {
            Some(0) => SettingsScope::User,
            Some(1) if self.options.workspace_open => SettingsScope::Workspace,
            Some(1) => {
                host.show_warning(NO_WORKSPACE_WARNING);
                return;
            }
            _ => return,
        };

        match host.set_problems_sort_order_position(scope) {
            Ok(()) => {
                info!(?scope, "problems sort order set to position");
                self.options.sort_order_is_position = true;
            }
            Err(err) => warn!(%err, "failed to update problems sort order"),
        }
    }

    /// Cancel a pending hover.
    pub fn cancel(&mut self) {
        self.hover.cancel();
    }

    /// Close the standard peek of the active editor.
    pub fn hide<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(standard) = self.standard.as_mut() {
            standard.hide(host);
        }
    }

    /// Drive the pending hover; call every [`HOVER_TICK_INTERVAL`] while
    /// [`Peek::is_hover_pending`].
    pub fn tick<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        let now = host.now();
        self.hover.tick(host, now);
    }

    /// Returns `true` while a hover waits for scrolling to settle.
    pub fn is_hover_pending(&self) -> bool {
        self.hover.is_pending()
    }

    /// Cancellation token of the pending hover, if any.
    pub fn hover_token(&self) -> Option<CancelToken> {
        self.hover.token()
    }

    /// Returns `true` if the standard peek is open in `editor`.
    pub fn is_standard_open(&self, editor: EditorId) -> bool {
        self.standard.as_ref().is_some_and(|s| s.is_open(editor))
    }

    /// Number of editors tracked by the standard peek, or `None` if it does not exist.
    pub fn standard_tracked(&self) -> Option<usize> {
        self.standard.as_ref().map(StandardPeek::tracked)
    }

    /// The active document was edited.
    pub fn on_document_edited<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(standard) = self.standard.as_mut() {
            standard.on_document_edited(host);
        }
    }

    /// The selection of the active editor changed.
    pub fn on_selection_changed<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        kind: SelectionChangeKind,
    ) {
        if let Some(standard) = self.standard.as_mut() {
            standard.on_selection_changed(host, kind);
        }
    }

    /// The active editor changed.
    pub fn on_active_editor_changed<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        let Some(standard) = self.standard.as_mut() else {
            return;
        };
        let now = host.now();
        if standard.on_active_editor_changed(host, now) == Lifecycle::TearDown {
            info!("standard peek torn down");
            self.standard = None;
        }
    }

    /// Hide everything and drop all peek state.
    pub fn shutdown<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        self.hide(host);
        self.standard = None;
        self.hover.cancel();
        debug!("peek shut down");
    }
}

fn reveal_if_active<H: EditorHost + ?Sized>(host: &mut H, editor: EditorId, style: RevealStyle) {
    if host.active_editor().is_none_or(|a| a.id != editor) {
        return;
    }
    if let Err(err) = host.reveal_selection(editor, style) {
        warn!(%err, "failed to reveal selection");
    }
}
