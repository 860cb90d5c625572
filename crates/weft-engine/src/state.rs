//! Build state, recoverable issues, and the fatal error taxonomy.

use std::time::Duration;

use weft_pattern::DataMap;

use crate::collab::ExportError;
use crate::pseudo::PseudoPattern;
use crate::registry::PatternRegistry;

/// What went wrong without stopping the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// A data file could not be read or parsed, or held a bad shape.
    Data,

    /// An invocation named a partial no pattern claims.
    MissingPartial,

    /// An expansion chain revisited a pattern already on it.
    Cycle,

    /// The template renderer rejected a literal segment.
    Render,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::Data => "data",
            IssueKind::MissingPartial => "missing partial",
            IssueKind::Cycle => "cycle",
            IssueKind::Render => "render",
        }
    }
}

/// A recoverable problem recorded during a build pass.
#[derive(Debug, Clone)]
pub struct BuildIssue {
    pub kind: IssueKind,

    /// Partial of the pattern being built when this was recorded, when
    /// the issue belongs to one.
    pub pattern: Option<String>,

    pub message: String,
}

impl BuildIssue {
    pub fn data(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Data,
            pattern: None,
            message: message.into(),
        }
    }

    pub fn for_pattern(
        kind: IssueKind,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            pattern: Some(pattern.into()),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for BuildIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.pattern {
            Some(pattern) => write!(f, "[{}] {}: {}", self.kind.label(), pattern, self.message),
            None => write!(f, "[{}] {}", self.kind.label(), self.message),
        }
    }
}

/// A failure that aborts the whole build. Nothing is published when one
/// of these comes back.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Duplicate partial `{partial}`: {first} and {second} both claim it")]
    DuplicatePartial {
        partial: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Discover(#[from] weft_pattern::DiscoverError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Everything one build pass produced, handed whole to collaborators.
#[derive(Debug, Default)]
pub struct BuildState {
    /// The merged global data cascade, without `listitems`.
    pub global_data: DataMap,

    /// All real patterns plus the lineage recorded while expanding them.
    pub registry: PatternRegistry,

    /// Variants synthesized from list-item data. Kept apart from the
    /// registry so pattern counts and lookups never double-count.
    pub pseudo_patterns: Vec<PseudoPattern>,
}

/// Summary returned to the caller after a build pass.
#[derive(Debug)]
pub struct BuildReport {
    pub patterns: usize,
    pub pseudo_patterns: usize,
    pub failed: usize,
    pub duration: Duration,
    pub issues: Vec<BuildIssue>,
}

impl BuildReport {
    /// True when the pass recorded no issues at all.
    pub fn clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_display_their_kind_and_owner() {
        let general = BuildIssue::data("a.json went missing");
        assert_eq!(general.to_string(), "[data] a.json went missing");

        let owned = BuildIssue::for_pattern(IssueKind::Cycle, "pages-home", "home -> home");
        assert_eq!(owned.to_string(), "[cycle] pages-home: home -> home");
    }

    #[test]
    fn reports_are_clean_only_without_issues() {
        let mut report = BuildReport {
            patterns: 3,
            pseudo_patterns: 0,
            failed: 0,
            duration: Duration::from_millis(5),
            issues: Vec::new(),
        };
        assert!(report.clean());

        report.issues.push(BuildIssue::data("oops"));
        assert!(!report.clean());
    }
}
