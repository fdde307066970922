//! Glob-based file filtering.
//!
//! A [`Filter`] decides whether problems in a file take part in navigation. It is built once
//! per settings snapshot and memoizes its answer per file, because the same files are tested
//! again on every command. Navigation sets with identical filter settings share one filter
//! (and its cache) through the [`FilterPool`].

use crate::settings::FilterSettings;
use crate::uri::{FileId, WorkspaceFolder, workspace_relative_path};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, warn};

/// Filter construction errors.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A glob pattern failed to compile.
    #[error("invalid glob '{pattern}': {source}")]
    InvalidGlob {
        /// The offending pattern.
        pattern: String,
        /// The underlying error.
        #[source]
        source: globset::Error,
    },
    /// The compiled glob set could not be built.
    #[error("failed to build glob set: {0}")]
    GlobSet(#[source] globset::Error),
}

/// Compiled include/exclude globs with a per-file inclusion cache.
#[derive(Debug)]
pub struct Filter {
    settings: FilterSettings,
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
    folders: Vec<WorkspaceFolder>,
    cache: RefCell<HashMap<String, bool>>,
}

impl Filter {
    /// Compile a filter. Fails on the first invalid glob.
    pub fn new(settings: &FilterSettings, folders: &[WorkspaceFolder]) -> Result<Self, FilterError> {
        Self::build(settings, folders, false)
    }

    /// Compile a filter, skipping (and logging) invalid globs.
    pub fn new_lenient(
        settings: &FilterSettings,
        folders: &[WorkspaceFolder],
    ) -> Result<Self, FilterError> {
        Self::build(settings, folders, true)
    }

    fn build(
        settings: &FilterSettings,
        folders: &[WorkspaceFolder],
        lenient: bool,
    ) -> Result<Self, FilterError> {
        let include = compile(&settings.include, settings.case_sensitive, lenient)?;
        let exclude = compile(&settings.exclude, settings.case_sensitive, lenient)?;
        Ok(Self {
            settings: settings.clone(),
            include,
            exclude,
            folders: folders.to_vec(),
            cache: RefCell::new(HashMap::new()),
        })
    }

    /// Returns `true` if problems in `file` take part in navigation.
    pub fn is_included(&self, file: &FileId) -> bool {
        let key = file.path();
        if let Some(&cached) = self.cache.borrow().get(key) {
            return cached;
        }

        let relative = if self.settings.workspace_relative {
            workspace_relative_path(key, &self.folders)
        } else {
            None
        };
        let path = relative.as_deref().unwrap_or(key);

        let mut included = self.include.as_ref().is_none_or(|set| set.is_match(path));
        if included && self.exclude.as_ref().is_some_and(|set| set.is_match(path)) {
            included = false;
        }

        debug!(file = key, tested = path, included, "filter evaluated");
        self.cache.borrow_mut().insert(key.to_string(), included);
        included
    }

    /// Number of memoized files.
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    fn settings_match(&self, other: &FilterSettings) -> bool {
        let own = &self.settings;
        if own.case_sensitive != other.case_sensitive
            || own.workspace_relative != other.workspace_relative
        {
            return false;
        }
        if Rc::ptr_eq(&own.include, &other.include) && Rc::ptr_eq(&own.exclude, &other.exclude) {
            return true;
        }
        own.include == other.include && own.exclude == other.exclude
    }
}

fn compile(
    patterns: &[String],
    case_sensitive: bool,
    lenient: bool,
) -> Result<Option<GlobSet>, FilterError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    let mut added = 0usize;
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .backslash_escape(true)
            .case_insensitive(!case_sensitive)
            .build();
        match glob {
            Ok(glob) => {
                builder.add(glob);
                added += 1;
            }
            Err(source) if lenient => {
                warn!(pattern = pattern.as_str(), %source, "skipping invalid glob");
            }
            Err(source) => {
                return Err(FilterError::InvalidGlob {
                    pattern: pattern.clone(),
                    source,
                });
            }
        }
    }

    if added == 0 {
        return Ok(None);
    }
    builder.build().map(Some).map_err(FilterError::GlobSet)
}

/// Filters shared between navigation sets with structurally equal filter settings.
#[derive(Debug, Default)]
pub struct FilterPool {
    filters: Vec<Rc<Filter>>,
}

impl FilterPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// The filter for `settings`, or `None` when the settings include every file.
    pub fn get(
        &mut self,
        settings: &FilterSettings,
        folders: &[WorkspaceFolder],
    ) -> Option<Rc<Filter>> {
        if settings.is_unrestricted() {
            return None;
        }

        if let Some(filter) = self.filters.iter().find(|f| f.settings_match(settings)) {
            return Some(Rc::clone(filter));
        }

        match Filter::new_lenient(settings, folders) {
            Ok(filter) => {
                let filter = Rc::new(filter);
                self.filters.push(Rc::clone(&filter));
                Some(filter)
            }
            Err(err) => {
                warn!(%err, "filter disabled");
                None
            }
        }
    }

    /// Number of pooled filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if the pool holds no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Drop every pooled filter (and with them, their caches).
    pub fn clear(&mut self) {
        self.filters.clear();
    }
}
