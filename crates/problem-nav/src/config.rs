//! Resolved navigation configurations.
//!
//! A [`NavigationConfig`] is the immutable, search-ready view of one navigation set: severity
//! baskets, reveal style, peek configuration and file filter. Building one parses the severity
//! expression and compiles globs, so configurations are cached by settings identity in a
//! [`ConfigCache`] and rebuilt only after a settings change clears the cache.

use crate::diagnostics::DiagnosticSeverity;
use crate::filter::{Filter, FilterPool};
use crate::host::RevealStyle;
use crate::settings::{NavigationSettings, PeekConfig};
use crate::severity::SeverityBaskets;
use crate::uri::{FileId, WorkspaceFolder};
use std::rc::Rc;
use tracing::debug;

/// Search-ready configuration of a navigation set.
#[derive(Debug)]
pub struct NavigationConfig {
    /// The settings this configuration was built from.
    pub settings: Rc<NavigationSettings>,
    /// Reveal style for jumps.
    pub reveal: RevealStyle,
    /// Peek configuration (`None` when disabled).
    pub peek: Option<PeekConfig>,
    /// File filter (`None` when every file is included).
    pub filter: Option<Rc<Filter>>,
    baskets: SeverityBaskets,
}

impl NavigationConfig {
    /// Build a configuration without pooling its filter.
    pub fn new(settings: Rc<NavigationSettings>, folders: &[WorkspaceFolder]) -> Self {
        Self::with_pool(settings, folders, &mut FilterPool::new())
    }

    fn with_pool(
        settings: Rc<NavigationSettings>,
        folders: &[WorkspaceFolder],
        filters: &mut FilterPool,
    ) -> Self {
        Self {
            reveal: settings.reveal_style(),
            peek: settings.peek_config(),
            filter: filters.get(&settings.filter, folders),
            baskets: SeverityBaskets::parse(&settings.severity),
            settings,
        }
    }

    /// Basket of `severity`, or `None` if it is never navigated to.
    pub fn basket(&self, severity: DiagnosticSeverity) -> Option<u8> {
        self.baskets.basket(severity)
    }

    /// Returns `true` if problems in `file` take part in navigation.
    pub fn is_included(&self, file: &FileId) -> bool {
        self.filter.as_ref().is_none_or(|f| f.is_included(file))
    }
}

/// Configurations keyed by settings identity, plus the filter pool they draw from.
///
/// Both are cleared together, wholesale, on every settings change. Stale configurations are
/// never updated in place.
#[derive(Debug, Default)]
pub struct ConfigCache {
    configs: Vec<Rc<NavigationConfig>>,
    filters: FilterPool,
}

impl ConfigCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration for `settings`, building it on first use.
    pub fn get(
        &mut self,
        settings: &Rc<NavigationSettings>,
        folders: &[WorkspaceFolder],
    ) -> Rc<NavigationConfig> {
        if let Some(config) = self
            .configs
            .iter()
            .find(|c| Rc::ptr_eq(&c.settings, settings))
        {
            return Rc::clone(config);
        }

        let config = Rc::new(NavigationConfig::with_pool(
            Rc::clone(settings),
            folders,
            &mut self.filters,
        ));
        debug!(
            cached = self.configs.len(),
            filtered = config.filter.is_some(),
            "built navigation configuration"
        );
        self.configs.push(Rc::clone(&config));
        config
    }

    /// Number of cached configurations.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns `true` if no configuration is cached.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Number of pooled filters.
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Drop every cached configuration and filter.
    pub fn clear(&mut self) {
        self.configs.clear();
        self.filters.clear();
    }
}
