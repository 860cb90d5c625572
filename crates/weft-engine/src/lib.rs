//! Build semantics for weft.
//!
//! This crate owns the composition core: the data cascade, the pattern
//! registry with its uses/used-by lineage, the recursive partial
//! expander with cycle guard, pseudo-pattern synthesis from list-item
//! data, and data-link resolution. Everything here is pure semantics
//! over in-memory inputs; orchestration and disk output live in
//! `weft-static`, behind the collaborator traits defined in [`collab`].

pub mod cascade;
pub mod collab;
pub mod expand;
pub mod links;
pub mod pseudo;
pub mod registry;
pub mod state;

pub use cascade::{build_data_cascade, pattern_cascade, Cascade, LIST_ITEMS_KEY};
pub use collab::{ExportError, FrontendBuilder, PatternExporter, RenderError, TemplateRenderer};
pub use expand::{ExpandError, PartialExpander, STYLE_MODIFIER_KEY};
pub use links::LinkResolver;
pub use pseudo::{pseudo_patterns_for, PseudoPattern};
pub use registry::PatternRegistry;
pub use state::{BuildError, BuildIssue, BuildReport, BuildState, IssueKind};
