//! Pattern registry and lineage.

use std::collections::BTreeMap;

use weft_pattern::Pattern;

use crate::state::BuildError;

/// All real patterns for one build pass, keyed by partial identifier,
/// plus the uses/used-by lineage recorded while expanding them.
///
/// The registry is rebuilt wholesale on every pass. Lineage lists keep
/// insertion order and dedupe repeats, so a pattern invoked three times
/// shows up once.
#[derive(Debug, Default)]
pub struct PatternRegistry {
    patterns: BTreeMap<String, Pattern>,
    uses: BTreeMap<String, Vec<String>>,
    used_by: BTreeMap<String, Vec<String>>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern. Two source files claiming one identifier is fatal.
    pub fn insert(&mut self, pattern: Pattern) -> Result<(), BuildError> {
        if let Some(existing) = self.patterns.get(&pattern.partial) {
            return Err(BuildError::DuplicatePartial {
                partial: pattern.partial.clone(),
                first: existing.source.display().to_string(),
                second: pattern.source.display().to_string(),
            });
        }
        self.patterns.insert(pattern.partial.clone(), pattern);
        Ok(())
    }

    pub fn lookup(&self, partial: &str) -> Option<&Pattern> {
        self.patterns.get(partial)
    }

    /// All patterns in identifier order.
    pub fn list(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.values()
    }

    /// Identifiers in order, cloned so callers can iterate while
    /// mutating the registry.
    pub fn partials(&self) -> Vec<String> {
        self.patterns.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Store the expanded output of a finished pattern.
    pub fn store_rendered(&mut self, partial: &str, rendered: String) {
        if let Some(pattern) = self.patterns.get_mut(partial) {
            pattern.rendered = Some(rendered);
        }
    }

    /// Record an invoker → target edge in both directions.
    pub fn record_use(&mut self, from: &str, to: &str) {
        let uses = self.uses.entry(from.to_string()).or_default();
        if !uses.iter().any(|p| p == to) {
            uses.push(to.to_string());
        }
        let used_by = self.used_by.entry(to.to_string()).or_default();
        if !used_by.iter().any(|p| p == from) {
            used_by.push(from.to_string());
        }
    }

    /// Partials this pattern invokes, in first-reference order.
    pub fn uses(&self, partial: &str) -> &[String] {
        self.uses.get(partial).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Partials that invoke this pattern, in first-reference order.
    pub fn used_by(&self, partial: &str) -> &[String] {
        self.used_by.get(partial).map(Vec::as_slice).unwrap_or(&[])
    }
}
