//! Settings snapshot and validation.
//!
//! Settings arrive from the host as a JSON object (the `goToProblem` section) together with a
//! few host-level facts ([`Environment`]). Validation is lenient and per-field: every value
//! that has the wrong type or does not match its grammar is replaced by its default, so one
//! malformed navigation set never affects another.
//!
//! Navigation sets `"1"`, `"2"`, ... inherit field by field from `"base"`, which inherits from
//! the built-in defaults. A set with no overrides *is* its parent (same [`Rc`]), so the
//! configuration cache can key on pointer identity.

use crate::diagnostics::DiagnosticSeverity;
use crate::host::RevealStyle;
use crate::peek::PeekStyle;
use crate::uri::WorkspaceFolder;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;
use std::sync::LazyLock;
use tracing::warn;

/// Name of the settings section and prefix of every command id.
pub const SETTINGS_SECTION: &str = "goToProblem";

/// Number of independently configurable navigation sets.
pub const NUMBER_OF_SETS: usize = 3;

const SEVERITY: &str = "(error|warning|info|hint)";
const AUTO_HIDE_EVENT: &str = "(edit|moveKeyboard|moveMouse|moveOther)";

static SEVERITY_PRIORITIZED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{SEVERITY}(\s*[|>]\s*{SEVERITY}){{0,3}}$")).expect("valid regex")
});
static SEVERITY_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{SEVERITY}(,\s*{SEVERITY}){{0,3}}$")).expect("valid regex")
});
static REVEAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(center|top|little|adaptive)$").expect("valid regex"));
static PEEK_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(standard|hover)$").expect("valid regex"));
static AUTO_HIDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(off|on|{AUTO_HIDE_EVENT}(,\s*{AUTO_HIDE_EVENT}){{0,3}})$"
    ))
    .expect("valid regex")
});

/// Facts about the host that settings validation and filtering depend on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Environment {
    /// Root folders of the open workspace (empty when no workspace is open).
    pub workspace_folders: Vec<WorkspaceFolder>,
    /// The host's `editor.smoothScrolling` setting.
    pub smooth_scrolling: bool,
    /// The host's `problems.sortOrder` setting.
    pub problems_sort_order: Option<String>,
}

impl Environment {
    /// Returns `true` if a workspace (at least one folder) is open.
    pub fn is_workspace(&self) -> bool {
        !self.workspace_folders.is_empty()
    }

    /// Returns `true` if the problems panel is sorted by position.
    pub fn sort_order_is_position(&self) -> bool {
        self.problems_sort_order.as_deref() == Some("position")
    }
}

/// Settings shared by all navigation sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralSettings {
    /// Minimum time (ms) to wait for smooth scrolling before re-showing a hover peek.
    pub peek_hover_smooth_scrolling_delay: u64,
    /// Auto-hide policy of the standard peek (`off`, `on`, or a list of events).
    pub peek_standard_auto_hide: String,
    /// Offer to fix `problems.sortOrder` when the standard peek needs it.
    pub problems_sort_order_notification: bool,
    /// "Open all" asks for confirmation above this many files.
    pub open_all_warning_threshold: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            peek_hover_smooth_scrolling_delay: 175,
            peek_standard_auto_hide: "off".to_string(),
            problems_sort_order_notification: true,
            open_all_warning_threshold: 10,
        }
    }
}

impl GeneralSettings {
    /// Parsed auto-hide policy.
    pub fn standard_auto_hide(&self) -> StandardAutoHide {
        match self.peek_standard_auto_hide.as_str() {
            "off" => StandardAutoHide::Off,
            "on" => StandardAutoHide::On,
            list => StandardAutoHide::Events(
                list.split(',')
                    .filter_map(|name| AutoHideEvent::from_setting(name.trim()))
                    .collect(),
            ),
        }
    }
}

/// Peek settings of a navigation set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeekSettings {
    /// Show a peek after navigating.
    pub enabled: bool,
    /// Comma-separated severities that get a peek.
    pub severity: String,
    /// `standard` or `hover`.
    pub style: String,
}

/// File filter settings of a navigation set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSettings {
    /// Globs a file must match (empty = all files).
    pub include: Rc<[String]>,
    /// Globs that exclude a file.
    pub exclude: Rc<[String]>,
    /// Match globs case-sensitively.
    pub case_sensitive: bool,
    /// Match against the workspace-relative path instead of the full path.
    pub workspace_relative: bool,
}

impl FilterSettings {
    /// Returns `true` if the filter would include every file.
    pub fn is_unrestricted(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// Validated settings of one navigation set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationSettings {
    /// Commands of this set do nothing when disabled.
    pub enabled: bool,
    /// Severity priority expression (see [`crate::SeverityBaskets`]).
    pub severity: String,
    /// `center`, `top`, `little` or `adaptive`.
    pub reveal: String,
    /// A problem in the active editor always beats the rest of the workspace.
    pub prioritize_active: bool,
    /// Open other files in preview mode.
    pub open_in_preview: bool,
    /// Peek settings.
    pub peek: PeekSettings,
    /// File filter settings.
    pub filter: FilterSettings,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: "error|warning|info".to_string(),
            reveal: "center".to_string(),
            prioritize_active: false,
            open_in_preview: true,
            peek: PeekSettings {
                enabled: true,
                severity: "error, warning, info, hint".to_string(),
                style: "standard".to_string(),
            },
            filter: FilterSettings {
                include: Rc::from(Vec::new()),
                exclude: Rc::from(Vec::new()),
                case_sensitive: true,
                workspace_relative: true,
            },
        }
    }
}

impl NavigationSettings {
    /// Reveal style for jumps.
    pub fn reveal_style(&self) -> RevealStyle {
        match self.reveal.as_str() {
            "top" => RevealStyle::AtTop,
            "little" => RevealStyle::Default,
            "adaptive" => RevealStyle::InCenterIfOutsideViewport,
            _ => RevealStyle::InCenter,
        }
    }

    /// Resolved peek configuration, or `None` when peeking is disabled.
    pub fn peek_config(&self) -> Option<PeekConfig> {
        if !self.peek.enabled {
            return None;
        }

        let mut severity = [false; 4];
        for name in self.peek.severity.split(',') {
            let parsed =
                DiagnosticSeverity::from_setting(name.trim()).unwrap_or(DiagnosticSeverity::Error);
            severity[parsed.index()] = true;
        }

        let style = match self.peek.style.as_str() {
            "hover" => PeekStyle::Hover,
            _ => PeekStyle::Standard,
        };

        Some(PeekConfig { severity, style })
    }
}

/// Resolved peek configuration of a navigation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeekConfig {
    /// Whether each severity (by [`DiagnosticSeverity::index`]) gets a peek.
    pub severity: [bool; 4],
    /// Preferred peek style.
    pub style: PeekStyle,
}

impl PeekConfig {
    /// Returns `true` if diagnostics of `severity` get a peek.
    pub fn shows(&self, severity: DiagnosticSeverity) -> bool {
        self.severity[severity.index()]
    }
}

/// Events that can auto-hide the standard peek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoHideEvent {
    /// The document was edited.
    Edit,
    /// The selection moved by keyboard.
    MoveKeyboard,
    /// The selection moved by mouse.
    MoveMouse,
    /// The selection moved by a command or an unknown cause.
    MoveOther,
}

impl AutoHideEvent {
    fn from_setting(name: &str) -> Option<Self> {
        match name {
            "edit" => Some(Self::Edit),
            "moveKeyboard" => Some(Self::MoveKeyboard),
            "moveMouse" => Some(Self::MoveMouse),
            "moveOther" => Some(Self::MoveOther),
            _ => None,
        }
    }
}

/// Auto-hide policy of the standard peek.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandardAutoHide {
    /// Never auto-hide.
    Off,
    /// Hide on any edit or selection change.
    On,
    /// Hide on the listed events only.
    Events(Vec<AutoHideEvent>),
}

impl StandardAutoHide {
    /// Returns `true` if `event` hides the peek.
    pub fn hides_on(&self, event: AutoHideEvent) -> bool {
        match self {
            Self::Off => false,
            Self::On => true,
            Self::Events(events) => events.contains(&event),
        }
    }
}

/// A complete, validated settings snapshot.
#[derive(Debug, Clone)]
pub struct Settings {
    /// General settings.
    pub general: GeneralSettings,
    /// One entry per navigation set (index 0 is set 1).
    pub navigation: Vec<Rc<NavigationSettings>>,
    /// Host facts.
    pub environment: Environment,
}

impl Default for Settings {
    fn default() -> Self {
        let base = Rc::new(NavigationSettings::default());
        Self {
            general: GeneralSettings::default(),
            navigation: (0..NUMBER_OF_SETS).map(|_| Rc::clone(&base)).collect(),
            environment: Environment::default(),
        }
    }
}

impl Settings {
    /// Validate a settings section. Never fails: invalid parts fall back to defaults.
    pub fn from_value(section: &Value, environment: Environment) -> Self {
        let object = match section {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => {
                warn!(kind = value_kind(other), "settings section is not an object; using defaults");
                None
            }
        };
        let get = |key: &str| object.and_then(|map| map.get(key));

        let general = general_settings(object.map(|_| section));

        let defaults = Rc::new(NavigationSettings::default());
        let base = navigation_set("base", get("base"), &defaults);
        let navigation = (1..=NUMBER_OF_SETS)
            .map(|set| {
                let key = set.to_string();
                navigation_set(&key, get(&key), &base)
            })
            .collect();

        Self {
            general,
            navigation,
            environment,
        }
    }

    /// Settings of navigation set `set` (1-based).
    pub fn navigation_set(&self, set: usize) -> Option<&Rc<NavigationSettings>> {
        set.checked_sub(1).and_then(|i| self.navigation.get(i))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawGeneral {
    peek_hover_smooth_scrolling_delay: Option<Value>,
    peek_standard_auto_hide: Option<Value>,
    problems_sort_order_notification: Option<Value>,
    open_all_warning_threshold: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawNavigation {
    enabled: Option<Value>,
    severity: Option<Value>,
    reveal: Option<Value>,
    prioritize_active: Option<Value>,
    open_in_preview: Option<Value>,
    peek: Option<Value>,
    filter: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawPeek {
    enabled: Option<Value>,
    severity: Option<Value>,
    style: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawFilter {
    include: Option<Value>,
    exclude: Option<Value>,
    case_sensitive: Option<Value>,
    workspace_relative: Option<Value>,
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Deserialize a nested settings object; anything that is not an object counts as absent.
fn raw<T: DeserializeOwned>(key: &str, value: Option<&Value>) -> Option<T> {
    let value = value?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(key, %err, "ignoring malformed settings object");
            None
        }
    }
}

fn v_bool(key: &str, value: Option<&Value>, default: bool) -> bool {
    match value {
        None | Some(Value::Null) => default,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            warn!(key, kind = value_kind(other), "expected a boolean; using default");
            default
        }
    }
}

fn v_pattern(key: &str, value: Option<&Value>, default: &str, pattern: &Regex) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) if pattern.is_match(s) => s.clone(),
        Some(other) => {
            warn!(key, value = %other, "invalid setting value; using default");
            default.to_string()
        }
    }
}

fn v_positive_integer(key: &str, value: Option<&Value>, default: u64) -> u64 {
    match value {
        None | Some(Value::Null) => default,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.is_finite() && f >= 0.0 => f.round() as u64,
            _ => {
                warn!(key, value = %n, "expected a non-negative number; using default");
                default
            }
        },
        Some(other) => {
            warn!(key, kind = value_kind(other), "expected a number; using default");
            default
        }
    }
}

fn v_strings(key: &str, value: Option<&Value>, default: &Rc<[String]>) -> Rc<[String]> {
    match value {
        None | Some(Value::Null) => Rc::clone(default),
        Some(Value::Array(items)) => {
            let strings: Vec<String> = items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect();
            if strings.len() != items.len() {
                warn!(key, "dropping non-string entries");
            }
            Rc::from(strings)
        }
        Some(other) => {
            warn!(key, kind = value_kind(other), "expected an array of strings; using default");
            Rc::clone(default)
        }
    }
}

fn general_settings(section: Option<&Value>) -> GeneralSettings {
    let defaults = GeneralSettings::default();
    let Some(raw) = raw::<RawGeneral>("general", section) else {
        return defaults;
    };

    GeneralSettings {
        peek_hover_smooth_scrolling_delay: v_positive_integer(
            "peekHoverSmoothScrollingDelay",
            raw.peek_hover_smooth_scrolling_delay.as_ref(),
            defaults.peek_hover_smooth_scrolling_delay,
        ),
        peek_standard_auto_hide: v_pattern(
            "peekStandardAutoHide",
            raw.peek_standard_auto_hide.as_ref(),
            &defaults.peek_standard_auto_hide,
            &AUTO_HIDE,
        ),
        problems_sort_order_notification: v_bool(
            "problemsSortOrderNotification",
            raw.problems_sort_order_notification.as_ref(),
            defaults.problems_sort_order_notification,
        ),
        open_all_warning_threshold: v_positive_integer(
            "openAllWarningThreshold",
            raw.open_all_warning_threshold.as_ref(),
            defaults.open_all_warning_threshold,
        ),
    }
}

fn navigation_set(
    set: &str,
    value: Option<&Value>,
    parent: &Rc<NavigationSettings>,
) -> Rc<NavigationSettings> {
    let Some(raw) = raw::<RawNavigation>(set, value) else {
        return Rc::clone(parent);
    };

    Rc::new(NavigationSettings {
        enabled: v_bool("enabled", raw.enabled.as_ref(), parent.enabled),
        severity: v_pattern(
            "severity",
            raw.severity.as_ref(),
            &parent.severity,
            &SEVERITY_PRIORITIZED,
        ),
        reveal: v_pattern("reveal", raw.reveal.as_ref(), &parent.reveal, &REVEAL),
        prioritize_active: v_bool(
            "prioritizeActive",
            raw.prioritize_active.as_ref(),
            parent.prioritize_active,
        ),
        open_in_preview: v_bool(
            "openInPreview",
            raw.open_in_preview.as_ref(),
            parent.open_in_preview,
        ),
        peek: peek_settings(raw.peek.as_ref(), &parent.peek),
        filter: filter_settings(raw.filter.as_ref(), &parent.filter),
    })
}

fn peek_settings(value: Option<&Value>, parent: &PeekSettings) -> PeekSettings {
    let Some(raw) = raw::<RawPeek>("peek", value) else {
        return parent.clone();
    };

    PeekSettings {
        enabled: v_bool("peek.enabled", raw.enabled.as_ref(), parent.enabled),
        severity: v_pattern(
            "peek.severity",
            raw.severity.as_ref(),
            &parent.severity,
            &SEVERITY_LIST,
        ),
        style: v_pattern("peek.style", raw.style.as_ref(), &parent.style, &PEEK_STYLE),
    }
}

fn filter_settings(value: Option<&Value>, parent: &FilterSettings) -> FilterSettings {
    let Some(raw) = raw::<RawFilter>("filter", value) else {
        return parent.clone();
    };

    FilterSettings {
        include: v_strings("filter.include", raw.include.as_ref(), &parent.include),
        exclude: v_strings("filter.exclude", raw.exclude.as_ref(), &parent.exclude),
        case_sensitive: v_bool(
            "filter.caseSensitive",
            raw.case_sensitive.as_ref(),
            parent.case_sensitive,
        ),
        workspace_relative: v_bool(
            "filter.workspaceRelative",
            raw.workspace_relative.as_ref(),
            parent.workspace_relative,
        ),
    }
}
