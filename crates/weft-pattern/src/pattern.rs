//! The pattern itself: a template source plus everything resolved
//! around it during a build.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::data::DataMap;
use crate::ident::PatternName;

/// A single pattern discovered under the patterns root.
///
/// `data`, `list_items`, and `rendered` start empty and are filled in
/// as a build resolves the cascade and expands templates.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Unique partial identifier, e.g. `elements-logo`.
    pub partial: String,

    /// Flattened relative path naming output files.
    pub path_name: String,

    /// Top-level group the pattern belongs to.
    pub group: String,

    /// Human-facing title for navigation.
    pub display: String,

    /// Hidden patterns build but stay out of navigation.
    pub hidden: bool,

    /// Absolute path of the template source file.
    pub source: PathBuf,

    /// Raw template text as read from disk.
    pub raw: String,

    /// Resolved sibling data, before call-site overlays.
    pub data: DataMap,

    /// List-item pool keyed by variant name. Each entry can become a
    /// pseudo-pattern of this pattern.
    pub list_items: BTreeMap<String, DataMap>,

    /// Raw markdown from a sibling `.md` file, if present.
    pub docs: Option<String>,

    /// Final expanded output, once the build has rendered this pattern.
    pub rendered: Option<String>,
}

impl Pattern {
    pub fn new(name: PatternName, source: PathBuf, raw: String) -> Self {
        Self {
            partial: name.partial,
            path_name: name.path_name,
            group: name.group,
            display: name.display,
            hidden: name.hidden,
            source,
            raw,
            data: DataMap::new(),
            list_items: BTreeMap::new(),
            docs: None,
            rendered: None,
        }
    }

    /// Site-relative location of this pattern's rendered page.
    pub fn page_path(&self) -> String {
        page_path_for(&self.path_name)
    }
}

/// Site-relative location of the rendered page for a flattened path
/// name. Data links and the styleguide both rely on this layout.
pub fn page_path_for(path_name: &str) -> String {
    format!("patterns/{path_name}/{path_name}.rendered.html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn page_paths_follow_the_output_layout() {
        assert_eq!(
            page_path_for("00-test-00-foo"),
            "patterns/00-test-00-foo/00-test-00-foo.rendered.html"
        );
    }

    #[test]
    fn new_patterns_carry_their_naming() {
        let name = PatternName::from_relative(Path::new("00-test/00-foo.html")).unwrap();
        let pattern = Pattern::new(name, PathBuf::from("/tmp/00-foo.html"), "<b>hi</b>".into());

        assert_eq!(pattern.partial, "test-foo");
        assert_eq!(pattern.path_name, "00-test-00-foo");
        assert_eq!(
            pattern.page_path(),
            "patterns/00-test-00-foo/00-test-00-foo.rendered.html"
        );
        assert!(pattern.data.is_empty());
        assert!(pattern.rendered.is_none());
    }
}
