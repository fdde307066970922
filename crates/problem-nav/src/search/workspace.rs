//! Search across the rest of the workspace.
//!
//! Files are ordered by path and treated as a ring. The walk starts at the first file past the
//! active one (in the travel direction) and goes around once. It never revisits the active
//! file, which the document search has already covered. Inside each file, diagnostics are
//! visited in document order (reversed when going backward).
//!
//! Workspaces can hold a very large number of diagnostics, so the walk is driven by a visitor
//! that can stop it at any point rather than by a materialized ranking.

use super::Direction;
use crate::config::NavigationConfig;
use crate::diagnostics::{Diagnostic, compare_diagnostics};
use crate::uri::FileId;
use tracing::{debug, trace};

/// What the workspace walk should do after a visited problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanControl {
    /// Keep scanning.
    Continue,
    /// Stop the whole walk.
    Break,
    /// Skip the rest of the current file.
    SkipFile,
}

/// The problem chosen in the rest of the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceHit {
    /// Basket of the chosen diagnostic.
    pub basket: u8,
    /// File containing the diagnostic.
    pub file: FileId,
    /// The chosen diagnostic.
    pub diagnostic: Diagnostic,
}

/// Walk every navigable problem outside the active file.
///
/// `visitor` receives each diagnostic that has a basket, in walk order. Files excluded by the
/// configuration's filter are skipped without sorting their diagnostics.
pub fn scan<F>(
    mut entries: Vec<(FileId, Vec<Diagnostic>)>,
    active: Option<&FileId>,
    config: &NavigationConfig,
    direction: Direction,
    mut visitor: F,
) where
    F: FnMut(&FileId, &Diagnostic, u8) -> ScanControl,
{
    let len = entries.len();
    if len == 0 {
        return;
    }

    entries.sort_by(|a, b| a.0.path().cmp(b.0.path()));

    let start = start_index(&entries, active, direction);
    let before_start = direction.step_back(start, len);
    let skips_active = active.is_some_and(|a| entries[before_start].0.path() == a.path());
    let count = if skips_active { len - 1 } else { len };

    let mut index = start;
    'files: for _ in 0..count {
        let (file, diagnostics) = &mut entries[index];
        index = direction.step(index, len);

        if diagnostics.is_empty() || !config.is_included(file) {
            continue;
        }

        diagnostics.sort_by(compare_diagnostics);
        let ordered: Box<dyn Iterator<Item = &Diagnostic>> = match direction {
            Direction::Forward => Box::new(diagnostics.iter()),
            Direction::Backward => Box::new(diagnostics.iter().rev()),
        };

        for diagnostic in ordered {
            let Some(basket) = config.basket(diagnostic.severity) else {
                continue;
            };
            match visitor(file, diagnostic, basket) {
                ScanControl::Continue => {}
                ScanControl::SkipFile => continue 'files,
                ScanControl::Break => break 'files,
            }
        }
        trace!(file = file.path(), "file scanned");
    }
}

/// Ring index where the walk starts.
///
/// Forward starts at the first file ordered after the active one. Backward starts at the
/// file just before the active one, stepping over the active file itself when it has
/// diagnostics. Without an active file the walk starts at either end of the ring.
fn start_index(
    entries: &[(FileId, Vec<Diagnostic>)],
    active: Option<&FileId>,
    direction: Direction,
) -> usize {
    let len = entries.len();
    let Some(active) = active else {
        return match direction {
            Direction::Forward => 0,
            Direction::Backward => len - 1,
        };
    };

    let current = active.path();
    let after = entries.partition_point(|(file, _)| file.path() <= current);
    match direction {
        Direction::Forward => {
            if after == len {
                0
            } else {
                after
            }
        }
        Direction::Backward => {
            let prev = Direction::Backward.step(after % len, len);
            if entries[prev].0.path() != current {
                prev
            } else {
                Direction::Backward.step(prev, len)
            }
        }
    }
}

/// The lowest-basket problem outside the active file; the first one found wins ties.
pub fn next_in_workspace(
    entries: Vec<(FileId, Vec<Diagnostic>)>,
    active: Option<&FileId>,
    config: &NavigationConfig,
    direction: Direction,
) -> Option<WorkspaceHit> {
    let mut best: Option<WorkspaceHit> = None;

    scan(entries, active, config, direction, |file, diagnostic, basket| {
        if best.as_ref().is_none_or(|b| basket < b.basket) {
            best = Some(WorkspaceHit {
                basket,
                file: file.clone(),
                diagnostic: diagnostic.clone(),
            });
            if basket == 0 {
                return ScanControl::Break;
            }
        }
        ScanControl::Continue
    });

    if let Some(hit) = &best {
        debug!(
            file = hit.file.path(),
            ?direction,
            basket = hit.basket,
            line = hit.diagnostic.start().line,
            "next problem in workspace"
        );
    }
    best
}

/// Every file outside the active one that has at least one navigable problem, in walk order.
pub fn files_with_problems(
    entries: Vec<(FileId, Vec<Diagnostic>)>,
    active: Option<&FileId>,
    config: &NavigationConfig,
    direction: Direction,
) -> Vec<FileId> {
    let mut files = Vec::new();
    scan(entries, active, config, direction, |file, _, _| {
        files.push(file.clone());
        ScanControl::SkipFile
    });
    files
}
