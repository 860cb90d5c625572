//! Filesystem discovery of pattern sources.
//!
//! Walks the patterns root once, turning every template file into a
//! [`Pattern`] plus the location of its sibling data file, if any.
//! Unreadable or unnameable files are skipped; discovery never fails on
//! a single bad entry, only on a missing root.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::data::DATA_EXTENSIONS;
use crate::ident::PatternName;
use crate::pattern::Pattern;

/// A pattern fresh off the disk, before any data has been resolved.
#[derive(Debug, Clone)]
pub struct DiscoveredPattern {
    pub pattern: Pattern,

    /// Sibling data file sharing the template's stem, if one exists.
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    #[error("Patterns directory not found: {0}")]
    DirectoryNotFound(String),
}

/// Scan `root` for template files with one of the given extensions.
///
/// Results come back sorted by flattened path name so downstream
/// consumers see a stable order regardless of directory iteration.
pub fn discover_patterns(
    root: &Path,
    extensions: &[String],
) -> Result<Vec<DiscoveredPattern>, DiscoverError> {
    if !root.is_dir() {
        return Err(DiscoverError::DirectoryNotFound(
            root.display().to_string(),
        ));
    }

    let mut found = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if name.starts_with('.') {
            continue;
        }

        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext,
            None => continue,
        };
        if !extensions.iter().any(|e| e == ext) {
            continue;
        }

        let rel = match path.strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let pattern_name = match PatternName::from_relative(rel) {
            Some(name) => name,
            None => continue,
        };

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => continue,
        };

        let mut pattern = Pattern::new(pattern_name, path.to_path_buf(), raw);

        let docs_path = path.with_extension("md");
        if docs_path.is_file() {
            pattern.docs = fs::read_to_string(&docs_path).ok();
        }

        let data_file = DATA_EXTENSIONS
            .iter()
            .map(|ext| path.with_extension(ext))
            .find(|candidate| candidate.is_file());

        found.push(DiscoveredPattern { pattern, data_file });
    }

    found.sort_by(|a, b| a.pattern.path_name.cmp(&b.pattern.path_name));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn extensions() -> Vec<String> {
        vec!["html".to_string(), "mustache".to_string()]
    }

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let result = discover_patterns(&dir.path().join("nope"), &extensions());

        assert!(matches!(result, Err(DiscoverError::DirectoryNotFound(_))));
    }

    #[test]
    fn discovers_templates_in_path_name_order() {
        let dir = tempdir().unwrap();
        write(dir.path(), "01-molecules/00-card.html", "<div/>");
        write(dir.path(), "00-atoms/01-link.html", "<a/>");
        write(dir.path(), "00-atoms/00-button.mustache", "<button/>");

        let found = discover_patterns(dir.path(), &extensions()).unwrap();
        let names: Vec<&str> = found
            .iter()
            .map(|d| d.pattern.path_name.as_str())
            .collect();

        assert_eq!(
            names,
            [
                "00-atoms-00-button",
                "00-atoms-01-link",
                "01-molecules-00-card"
            ]
        );
        assert_eq!(found[0].pattern.partial, "atoms-button");
        assert_eq!(found[0].pattern.raw, "<button/>");
    }

    #[test]
    fn ignores_other_extensions_and_dotfiles() {
        let dir = tempdir().unwrap();
        write(dir.path(), "00-atoms/00-button.html", "<button/>");
        write(dir.path(), "00-atoms/notes.txt", "not a template");
        write(dir.path(), "00-atoms/.draft.html", "hidden");

        let found = discover_patterns(dir.path(), &extensions()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pattern.partial, "atoms-button");
    }

    #[test]
    fn attaches_sibling_data_and_docs() {
        let dir = tempdir().unwrap();
        write(dir.path(), "00-atoms/00-button.html", "<button/>");
        write(dir.path(), "00-atoms/00-button.yaml", "label: Go\n");
        write(dir.path(), "00-atoms/00-button.md", "A humble button.\n");

        let found = discover_patterns(dir.path(), &extensions()).unwrap();
        let button = &found[0];

        assert_eq!(
            button.data_file.as_deref(),
            Some(dir.path().join("00-atoms/00-button.yaml").as_path())
        );
        assert_eq!(button.pattern.docs.as_deref(), Some("A humble button.\n"));
    }

    #[test]
    fn underscore_patterns_are_discovered_as_hidden() {
        let dir = tempdir().unwrap();
        write(dir.path(), "00-atoms/_00-scaffold.html", "<div/>");

        let found = discover_patterns(dir.path(), &extensions()).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].pattern.hidden);
        assert_eq!(found[0].pattern.partial, "atoms-scaffold");
    }
}
