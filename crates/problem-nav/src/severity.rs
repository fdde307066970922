//! Severity baskets.
//!
//! A navigation set prioritizes severities with an expression such as `error > warning|info`.
//! Groups separated by `>` are priority tiers ("baskets"), numbered from 0 in the order they
//! appear; severities joined by `|` share a tier. Lower baskets win. Severities that the
//! expression never mentions have no basket and are never navigated to.

use crate::diagnostics::DiagnosticSeverity;

/// Maximum number of tiers an expression may declare.
pub const MAX_BASKETS: usize = 4;

/// Separator between priority tiers.
pub const TIER_SEPARATOR: char = '>';

/// Separator between severities sharing a tier.
pub const GROUP_SEPARATOR: char = '|';

/// Basket assignment for every severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeverityBaskets {
    baskets: [Option<u8>; 4],
}

impl SeverityBaskets {
    /// Resolve a priority expression.
    ///
    /// The first occurrence of a severity wins: in `error > error|warning`, `error` stays in
    /// basket 0. Unknown tokens resolve to `error`; validated settings never contain them.
    pub fn parse(expression: &str) -> Self {
        let mut baskets = [None; 4];
        for (tier, group) in expression
            .split(TIER_SEPARATOR)
            .take(MAX_BASKETS)
            .enumerate()
        {
            for name in group.trim().split(GROUP_SEPARATOR) {
                let severity = DiagnosticSeverity::from_setting(name.trim())
                    .unwrap_or(DiagnosticSeverity::Error);
                let slot = &mut baskets[severity.index()];
                if slot.is_none() {
                    *slot = Some(tier as u8);
                }
            }
        }
        Self { baskets }
    }

    /// Basket of `severity`, or `None` if it is excluded from navigation.
    pub fn basket(&self, severity: DiagnosticSeverity) -> Option<u8> {
        self.baskets[severity.index()]
    }
}
