//! Data cascade resolution.
//!
//! Global data lives under one directory. Every JSON/YAML file in it
//! merges into a single mapping in lexicographic path order, so the
//! later-sorting file wins on conflict. Each pattern then layers its
//! sibling data file over the global result. The reserved `listitems`
//! key never survives a merge; it is pulled out into its own pool at
//! every layer.

use std::collections::BTreeMap;
use std::path::Path;

use rayon::prelude::*;
use serde_json::Value;
use walkdir::WalkDir;

use weft_pattern::{deep_merge, is_data_file, load_data_file, DataMap};

use crate::state::BuildIssue;

/// Reserved top-level key naming the list-item pool.
pub const LIST_ITEMS_KEY: &str = "listitems";

/// Merged global data plus the shared list-item pool.
#[derive(Debug, Clone, Default)]
pub struct Cascade {
    pub data: DataMap,
    pub list_items: BTreeMap<String, DataMap>,
}

/// Merge every data file under `dir` into one cascade.
///
/// A missing directory is not an error; it yields an empty cascade.
/// Malformed files are skipped and recorded, the rest still merge.
pub fn build_data_cascade(dir: &Path) -> (Cascade, Vec<BuildIssue>) {
    let mut cascade = Cascade::default();
    let mut issues = Vec::new();

    let mut files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_data_file(p))
        .collect();
    files.sort();

    // Parse in parallel; merge stays sequential in sorted order so
    // later files deterministically win.
    let parsed: Vec<_> = files.par_iter().map(|path| load_data_file(path)).collect();

    for (path, result) in files.iter().zip(parsed) {
        match result {
            Ok(layer) => merge_layer(
                &mut cascade.data,
                &mut cascade.list_items,
                layer,
                path,
                &mut issues,
            ),
            Err(err) => issues.push(BuildIssue::data(err.to_string())),
        }
    }

    tracing::debug!(
        "Merged {} data files into {} keys and {} list items",
        files.len(),
        cascade.data.len(),
        cascade.list_items.len()
    );
    (cascade, issues)
}

/// Resolve one pattern's data: its sibling file layered over the global
/// cascade, list items overridden per entry name.
pub fn pattern_cascade(
    global: &Cascade,
    sibling: Option<&Path>,
) -> (DataMap, BTreeMap<String, DataMap>, Vec<BuildIssue>) {
    let mut data = global.data.clone();
    let mut list_items = global.list_items.clone();
    let mut issues = Vec::new();

    if let Some(path) = sibling {
        match load_data_file(path) {
            Ok(layer) => merge_layer(&mut data, &mut list_items, layer, path, &mut issues),
            Err(err) => issues.push(BuildIssue::data(err.to_string())),
        }
    }

    (data, list_items, issues)
}

fn merge_layer(
    data: &mut DataMap,
    pool: &mut BTreeMap<String, DataMap>,
    mut incoming: DataMap,
    origin: &Path,
    issues: &mut Vec<BuildIssue>,
) {
    if let Some(value) = incoming.remove(LIST_ITEMS_KEY) {
        collect_list_items(value, pool, origin, issues);
    }
    deep_merge(data, incoming);
}

fn collect_list_items(
    value: Value,
    pool: &mut BTreeMap<String, DataMap>,
    origin: &Path,
    issues: &mut Vec<BuildIssue>,
) {
    match value {
        Value::Object(entries) => {
            for (name, entry) in entries {
                match entry {
                    Value::Object(map) => {
                        pool.insert(name, map);
                    }
                    _ => issues.push(BuildIssue::data(format!(
                        "List item `{name}` in {} must be a mapping",
                        origin.display()
                    ))),
                }
            }
        }
        _ => issues.push(BuildIssue::data(format!(
            "`{LIST_ITEMS_KEY}` in {} must be a mapping of named entries",
            origin.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    use crate::state::IssueKind;

    fn map(value: Value) -> DataMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn later_sorting_file_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{ "x": 1 }"#).unwrap();
        fs::write(dir.path().join("b.yaml"), "x: 2\n").unwrap();

        let (cascade, issues) = build_data_cascade(dir.path());
        assert!(issues.is_empty());
        assert_eq!(cascade.data, map(json!({ "x": 2 })));
    }

    #[test]
    fn nested_objects_merge_across_files() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"{ "nav": { "home": "/", "about": "/about" } }"#,
        )
        .unwrap();
        fs::write(dir.path().join("b.json"), r#"{ "nav": { "about": "/team" } }"#).unwrap();

        let (cascade, _) = build_data_cascade(dir.path());
        assert_eq!(
            cascade.data,
            map(json!({ "nav": { "home": "/", "about": "/team" } }))
        );
    }

    #[test]
    fn list_items_never_reach_the_data_mapping() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("global.json"),
            r#"{ "title": "Lib", "listitems": { "one": { "n": 1 }, "two": { "n": 2 } } }"#,
        )
        .unwrap();

        let (cascade, issues) = build_data_cascade(dir.path());
        assert!(issues.is_empty());
        assert!(!cascade.data.contains_key(LIST_ITEMS_KEY));
        assert_eq!(cascade.data, map(json!({ "title": "Lib" })));
        assert_eq!(cascade.list_items.len(), 2);
        assert_eq!(cascade.list_items["one"], map(json!({ "n": 1 })));
    }

    #[test]
    fn malformed_files_are_skipped_and_recorded() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{ nope").unwrap();
        fs::write(dir.path().join("good.json"), r#"{ "ok": true }"#).unwrap();

        let (cascade, issues) = build_data_cascade(dir.path());
        assert_eq!(cascade.data, map(json!({ "ok": true })));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Data);
    }

    #[test]
    fn missing_directory_yields_an_empty_cascade() {
        let dir = tempdir().unwrap();
        let (cascade, issues) = build_data_cascade(&dir.path().join("nope"));

        assert!(cascade.data.is_empty());
        assert!(cascade.list_items.is_empty());
        assert!(issues.is_empty());
    }

    #[test]
    fn sibling_data_overrides_global_per_key() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(
            data_dir.join("global.json"),
            r#"{ "title": "Global", "tagline": "shared", "listitems": { "one": { "n": 1 } } }"#,
        )
        .unwrap();
        let sibling = dir.path().join("00-foo.json");
        fs::write(
            &sibling,
            r#"{ "title": "Mine", "listitems": { "one": { "n": 10 }, "extra": { "n": 3 } } }"#,
        )
        .unwrap();

        let (global, issues) = build_data_cascade(&data_dir);
        assert!(issues.is_empty());

        let (data, list_items, issues) = pattern_cascade(&global, Some(&sibling));
        assert!(issues.is_empty());
        assert_eq!(data, map(json!({ "title": "Mine", "tagline": "shared" })));
        assert_eq!(list_items["one"], map(json!({ "n": 10 })));
        assert_eq!(list_items["extra"], map(json!({ "n": 3 })));
    }

    #[test]
    fn non_mapping_list_items_are_recorded() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("global.json"), r#"{ "listitems": [1, 2] }"#).unwrap();

        let (cascade, issues) = build_data_cascade(dir.path());
        assert!(cascade.list_items.is_empty());
        assert!(!cascade.data.contains_key(LIST_ITEMS_KEY));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Data);
    }

    #[test]
    fn absent_sibling_clones_the_global_layer() {
        let global = Cascade {
            data: map(json!({ "title": "Global" })),
            list_items: BTreeMap::new(),
        };

        let (data, list_items, issues) = pattern_cascade(&global, None);
        assert!(issues.is_empty());
        assert_eq!(data, global.data);
        assert!(list_items.is_empty());
    }
}
