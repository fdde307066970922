#![warn(missing_docs)]
//! Problem Nav - Headless "Go to Problem" Navigation Engine
//!
//! # Overview
//!
//! `problem-nav` decides where the cursor goes when a user asks for the next (or previous)
//! problem. It ranks diagnostics by configurable severity tiers, restricts them with glob
//! filters, searches the active document cyclically from the cursor and the rest of the
//! workspace cyclically from the active file, and then drives the host editor to the result.
//! It owns no UI: the host implements [`EditorHost`] and forwards events.
//!
//! # Core Features
//!
//! - **Severity Baskets**: `error > warning|info` style expressions, lower tier wins
//! - **File Filters**: include/exclude globs with a per-file memo
//! - **Cyclic Search**: document and workspace searches that stop early on the best tier
//! - **Navigation Sets**: several independently configured command sets inheriting from `base`
//! - **Peek**: inline problem panel or hover after a jump, with auto-hide and scroll settling
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Commands & Settings Lifecycle              │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Navigator (per set × direction) + Peek     │  ← Orchestration
//! ├─────────────────────────────────────────────┤
//! │  Document / Workspace Search                │  ← Ranking
//! ├─────────────────────────────────────────────┤
//! │  Configuration Cache (Baskets + Filters)    │  ← Resolved Settings
//! ├─────────────────────────────────────────────┤
//! │  EditorHost                                 │  ← Host Boundary
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use problem_nav::{CommandId, CommandKind, DiagnosticSeverity, Environment, ProblemNavigation, SeverityBaskets};
//! use serde_json::json;
//!
//! let baskets = SeverityBaskets::parse("error > warning|info");
//! assert_eq!(baskets.basket(DiagnosticSeverity::Error), Some(0));
//! assert_eq!(baskets.basket(DiagnosticSeverity::Information), Some(1));
//! assert_eq!(baskets.basket(DiagnosticSeverity::Hint), None);
//!
//! let navigation = ProblemNavigation::from_value(
//!     &json!({ "base": { "severity": "error > warning" } }),
//!     Environment::default(),
//! );
//! assert_eq!(navigation.commands().len(), 15);
//! assert_eq!(
//!     CommandId::parse("goToProblem.1.nextInWorkspace"),
//!     Some(CommandId::new(1, CommandKind::NextInWorkspace))
//! );
//! ```
//!
//! A host then calls [`ProblemNavigation::execute`] with itself as the [`EditorHost`], forwards
//! configuration changes and editor events, and ticks the engine while
//! [`ProblemNavigation::needs_tick`] is true.
//!
//! # Module Description
//!
//! - [`diagnostics`] - Diagnostic data model
//! - [`uri`] - File identity and workspace-relative paths
//! - [`host`] - The host editor boundary
//! - [`severity`] - Severity basket resolver
//! - [`filter`] - Glob file filter
//! - [`settings`] - Settings snapshot and validation
//! - [`config`] - Resolved navigation configurations and their cache
//! - [`search`] - Document and workspace search
//! - [`navigator`] - Navigation commands of one set and direction
//! - [`peek`] - Problem peek after a jump
//! - [`commands`] - Command table and settings lifecycle

pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod filter;
pub mod host;
pub mod navigator;
pub mod peek;
pub mod search;
pub mod settings;
pub mod severity;
pub mod uri;

pub use commands::{CommandId, CommandKind, ProblemNavigation};
pub use config::{ConfigCache, NavigationConfig};
pub use diagnostics::{Diagnostic, DiagnosticRange, DiagnosticSeverity, Position};
pub use filter::{Filter, FilterError, FilterPool};
pub use host::{
    ActiveEditor, EditorHost, EditorId, HostError, OpenOptions, RevealStyle, Selection,
    SelectionChangeKind, SettingsScope,
};
pub use navigator::Navigator;
pub use peek::{Peek, PeekStyle};
pub use search::{Direction, DocumentHit, ScanControl, WorkspaceHit};
pub use settings::{
    Environment, GeneralSettings, NUMBER_OF_SETS, NavigationSettings, PeekConfig, Settings,
};
pub use severity::SeverityBaskets;
pub use uri::{FileId, WorkspaceFolder};
