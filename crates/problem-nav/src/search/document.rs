//! Search within the active document.

use super::Direction;
use crate::config::NavigationConfig;
use crate::diagnostics::{Diagnostic, Position, compare_diagnostics};
use crate::uri::FileId;
use tracing::{debug, trace};

/// The problem chosen in the active document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHit {
    /// Basket of the chosen diagnostic.
    pub basket: u8,
    /// The chosen diagnostic.
    pub diagnostic: Diagnostic,
    /// `true` if reaching it meant crossing the end (or start) of the document.
    pub wrap: bool,
}

/// Find the next problem in `file`, starting from `cursor`.
///
/// Diagnostics are ordered by start position, then severity. The walk starts at the first
/// diagnostic strictly after (`Forward`) or before (`Backward`) the cursor, visits every
/// diagnostic at most once, and keeps the lowest basket seen; basket 0 ends the walk.
pub fn next_in_document(
    file: &FileId,
    mut diagnostics: Vec<Diagnostic>,
    cursor: Position,
    config: &NavigationConfig,
    direction: Direction,
) -> Option<DocumentHit> {
    if !config.is_included(file) {
        trace!(file = file.path(), "active document is filtered out");
        return None;
    }
    if diagnostics.is_empty() {
        return None;
    }

    diagnostics.sort_by(compare_diagnostics);
    let len = diagnostics.len();
    let start = start_index(&diagnostics, cursor, direction);

    let mut best: Option<(u8, usize)> = None;
    let mut index = start;
    loop {
        if let Some(basket) = config.basket(diagnostics[index].severity)
            && best.is_none_or(|(b, _)| basket < b)
        {
            best = Some((basket, index));
            if basket == 0 {
                break;
            }
        }

        index = direction.step(index, len);
        if index == start {
            break;
        }
    }

    let (basket, index) = best?;
    let diagnostic = diagnostics.swap_remove(index);
    let wrap = match direction {
        Direction::Forward => diagnostic.start() <= cursor,
        Direction::Backward => diagnostic.start() >= cursor,
    };

    debug!(
        file = file.path(),
        ?direction,
        basket,
        line = diagnostic.start().line,
        wrap,
        "next problem in document"
    );
    Some(DocumentHit {
        basket,
        diagnostic,
        wrap,
    })
}

/// First index strictly ahead of `cursor`, wrapping to the first (or last) diagnostic.
fn start_index(sorted: &[Diagnostic], cursor: Position, direction: Direction) -> usize {
    match direction {
        Direction::Forward => {
            let after = sorted.partition_point(|d| d.start() <= cursor);
            if after == sorted.len() { 0 } else { after }
        }
        Direction::Backward => {
            let before = sorted.partition_point(|d| d.start() < cursor);
            if before == 0 {
                sorted.len() - 1
            } else {
                before - 1
            }
        }
    }
}
