//! Pattern identity derived from source paths.
//!
//! A pattern's identifier (its "partial") comes from where the file lives:
//! the top-level group directory plus the file stem, with `NN-` ordering
//! prefixes stripped. The flattened path keeps its ordinals and names the
//! rendered output, so `00-elements/04-images/00-logo.html` exposes the
//! partial `elements-logo` while its pages live under
//! `00-elements-04-images-00-logo`.

use std::path::Path;

/// Naming derived from a pattern source path relative to the patterns root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternName {
    /// Unique partial identifier, e.g. `elements-logo`.
    pub partial: String,

    /// Flattened relative path with ordinals preserved, e.g.
    /// `00-elements-04-images-00-logo`. Names output files.
    pub path_name: String,

    /// Top-level group with its ordinal stripped, e.g. `elements`.
    pub group: String,

    /// Human-facing title for the styleguide, e.g. `Logo`.
    pub display: String,

    /// Underscore-prefixed patterns stay buildable but are left out of
    /// styleguide navigation.
    pub hidden: bool,
}

impl PatternName {
    /// Derive naming from a path relative to the patterns root.
    ///
    /// Returns `None` for paths that cannot name a pattern (non-UTF-8
    /// components, or an empty stem once prefixes are stripped).
    pub fn from_relative(rel: &Path) -> Option<PatternName> {
        let stem = rel.file_stem()?.to_str()?;

        let mut components: Vec<&str> = Vec::new();
        if let Some(parent) = rel.parent() {
            for comp in parent.components() {
                let comp = comp.as_os_str().to_str()?;
                if !comp.is_empty() && comp != "." {
                    components.push(comp);
                }
            }
        }

        let hidden = stem.starts_with('_') || components.iter().any(|c| c.starts_with('_'));
        let base = strip_ordinal(stem.trim_start_matches('_'));
        if base.is_empty() {
            return None;
        }

        let group_raw = components.first().copied().unwrap_or("");
        let group = strip_ordinal(group_raw.trim_start_matches('_')).to_string();

        let partial = if group.is_empty() {
            base.to_string()
        } else {
            format!("{}-{}", group, base)
        };

        let mut path_parts = components;
        path_parts.push(stem);

        Some(PatternName {
            partial,
            path_name: path_parts.join("-"),
            group,
            display: title_case(base),
            hidden,
        })
    }
}

/// Strip a leading ordering prefix (`00-foo` → `foo`).
///
/// A prefix is one or more digits followed by a dash. Names that are
/// nothing but a prefix come back unchanged.
pub fn strip_ordinal(name: &str) -> &str {
    let digits = name.len() - name.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return name;
    }
    match name[digits..].strip_prefix('-') {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    }
}

/// Title-case a dashed slug (`comment-header` → `Comment Header`).
pub fn title_case(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_partial_from_group_and_stem() {
        let name = PatternName::from_relative(Path::new("00-test/00-foo.html")).unwrap();

        assert_eq!(name.partial, "test-foo");
        assert_eq!(name.path_name, "00-test-00-foo");
        assert_eq!(name.group, "test");
        assert_eq!(name.display, "Foo");
        assert!(!name.hidden);
    }

    #[test]
    fn nested_directories_keep_ordinals_in_path_name() {
        let name =
            PatternName::from_relative(Path::new("00-elements/04-images/00-logo.mustache"))
                .unwrap();

        assert_eq!(name.partial, "elements-logo");
        assert_eq!(name.path_name, "00-elements-04-images-00-logo");
        assert_eq!(name.group, "elements");
    }

    #[test]
    fn top_level_pattern_has_no_group() {
        let name = PatternName::from_relative(Path::new("homepage.html")).unwrap();

        assert_eq!(name.partial, "homepage");
        assert_eq!(name.path_name, "homepage");
        assert_eq!(name.group, "");
        assert_eq!(name.display, "Homepage");
    }

    #[test]
    fn underscore_prefix_hides_but_still_names() {
        let name = PatternName::from_relative(Path::new("00-test/_00-header.html")).unwrap();

        assert!(name.hidden);
        assert_eq!(name.partial, "test-header");
        assert_eq!(name.path_name, "00-test-_00-header");
    }

    #[test]
    fn hidden_directory_hides_contents() {
        let name = PatternName::from_relative(Path::new("_scaffold/00-base.html")).unwrap();

        assert!(name.hidden);
        assert_eq!(name.partial, "scaffold-base");
    }

    #[test]
    fn strips_ordinals() {
        assert_eq!(strip_ordinal("00-foo"), "foo");
        assert_eq!(strip_ordinal("123-bar-baz"), "bar-baz");
        assert_eq!(strip_ordinal("foo"), "foo");
        assert_eq!(strip_ordinal("00-"), "00-");
        assert_eq!(strip_ordinal("00"), "00");
    }

    #[test]
    fn title_cases_slugs() {
        assert_eq!(title_case("comment-header"), "Comment Header");
        assert_eq!(title_case("foo"), "Foo");
        assert_eq!(title_case("two_words"), "Two Words");
    }

    #[test]
    fn rejects_empty_stems() {
        assert!(PatternName::from_relative(Path::new("00-test/_.html")).is_none());
    }

    #[test]
    fn ordinal_only_stem_keeps_its_name() {
        let name = PatternName::from_relative(Path::new("00-test/00-.html")).unwrap();
        assert_eq!(name.partial, "test-00-");
    }
}
