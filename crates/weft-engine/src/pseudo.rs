//! Pseudo-patterns synthesized from list-item data.

use weft_pattern::{page_path_for, title_case, DataMap, Pattern};

/// A variant of a real pattern generated from one list-item entry.
///
/// Pseudo-patterns live outside the registry, so identifier lookups and
/// pattern counts only ever see real patterns. They still get rendered
/// pages and show up in the styleguide next to their parent.
#[derive(Debug, Clone)]
pub struct PseudoPattern {
    pub partial: String,
    pub path_name: String,

    /// Partial of the real pattern this variant came from.
    pub parent: String,

    pub display: String,
    pub hidden: bool,

    /// The entry's mapping alone; the parent's data does not cascade in.
    pub data: DataMap,

    pub rendered: Option<String>,
}

impl PseudoPattern {
    /// Site-relative location of this variant's rendered page.
    pub fn page_path(&self) -> String {
        page_path_for(&self.path_name)
    }
}

/// Synthesize the pseudo-patterns for one parent, in entry-name order.
///
/// Each entry's mapping becomes the variant's entire data. Link
/// resolution and rendering happen later, driven by the orchestrator
/// through the same machinery that handles real patterns.
pub fn pseudo_patterns_for(parent: &Pattern) -> Vec<PseudoPattern> {
    parent
        .list_items
        .iter()
        .map(|(name, entry)| PseudoPattern {
            partial: format!("{}-{}", parent.partial, name),
            path_name: format!("{}-{}", parent.path_name, name),
            parent: parent.partial.clone(),
            display: format!("{} {}", parent.display, title_case(name)),
            hidden: parent.hidden,
            data: entry.clone(),
            rendered: None,
        })
        .collect()
}
