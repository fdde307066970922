//! Problem search.
//!
//! Two searches cooperate to find the next problem:
//!
//! - [`document`] walks the active document's diagnostics cyclically from the cursor.
//! - [`workspace`] walks every other file with diagnostics, cyclically from the active file.
//!
//! Both pick the lowest basket they can reach and stop early on basket 0, since nothing can
//! beat it.

pub mod document;
pub mod workspace;

pub use document::{DocumentHit, next_in_document};
pub use workspace::{ScanControl, WorkspaceHit, files_with_problems, next_in_workspace, scan};

/// Direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards later positions / later files.
    Forward,
    /// Towards earlier positions / earlier files.
    Backward,
}

impl Direction {
    /// Index of the element after `index` in this direction, in a ring of `len` elements.
    pub(crate) fn step(self, index: usize, len: usize) -> usize {
        match self {
            Self::Forward => (index + 1) % len,
            Self::Backward => (index + len - 1) % len,
        }
    }

    /// Index of the element before `index` in this direction, in a ring of `len` elements.
    pub(crate) fn step_back(self, index: usize, len: usize) -> usize {
        match self {
            Self::Forward => Self::Backward.step(index, len),
            Self::Backward => Self::Forward.step(index, len),
        }
    }

    /// Command verb used in command ids.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Forward => "next",
            Self::Backward => "prev",
        }
    }
}
