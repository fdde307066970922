//! Diagnostics data model.
//!
//! Diagnostics are produced by language tooling and handed to the navigation engine by the host.
//! The engine never mutates them; it only orders them and decides which one the cursor should
//! move to next.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A logical position in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based line index.
    pub line: u32,
    /// Zero-based character offset within the line.
    pub character: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.character.cmp(&other.character))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A half-open range (`start..end`) in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagnosticRange {
    /// Range start (inclusive).
    pub start: Position,
    /// Range end (exclusive).
    pub end: Position,
}

impl DiagnosticRange {
    /// Create a new diagnostic range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Diagnostic severity levels, most severe first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Error diagnostics.
    Error,
    /// Warning diagnostics.
    Warning,
    /// Informational diagnostics.
    #[serde(rename = "info")]
    Information,
    /// Hint diagnostics.
    Hint,
}

impl DiagnosticSeverity {
    /// All severities, in rank order.
    pub const ALL: [DiagnosticSeverity; 4] = [
        DiagnosticSeverity::Error,
        DiagnosticSeverity::Warning,
        DiagnosticSeverity::Information,
        DiagnosticSeverity::Hint,
    ];

    /// Dense index of this severity (`0..4`), used for per-severity tables.
    pub fn index(self) -> usize {
        match self {
            Self::Error => 0,
            Self::Warning => 1,
            Self::Information => 2,
            Self::Hint => 3,
        }
    }

    /// Parse a severity as written in settings (`error`, `warning`, `info`, `hint`).
    pub fn from_setting(name: &str) -> Option<Self> {
        match name {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Information),
            "hint" => Some(Self::Hint),
            _ => None,
        }
    }
}

/// A single diagnostic reported for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Source range of the diagnostic.
    pub range: DiagnosticRange,
    /// Diagnostic severity.
    pub severity: DiagnosticSeverity,
    /// Diagnostic message.
    pub message: String,
    /// Optional diagnostic source (e.g. `"rust-analyzer"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Optional diagnostic code (stringified).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic with an empty range at `start`.
    pub fn new(start: Position, severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            range: DiagnosticRange::new(start, start),
            severity,
            message: message.into(),
            source: None,
            code: None,
        }
    }

    /// Start of the diagnostic's range.
    pub fn start(&self) -> Position {
        self.range.start
    }
}

/// The fixed order used by every search: range start, then severity.
///
/// Both the active-document search and the workspace scan sort with this, so that a backward
/// walk is the exact mirror of a forward walk.
pub(crate) fn compare_diagnostics(a: &Diagnostic, b: &Diagnostic) -> Ordering {
    a.range
        .start
        .cmp(&b.range.start)
        .then_with(|| a.severity.cmp(&b.severity))
}
