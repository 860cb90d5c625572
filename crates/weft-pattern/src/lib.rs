//! Pattern source parsing for weft.
//!
//! This crate turns what is on disk into in-memory inputs for the build
//! pipeline: pattern identity derived from source paths, partial invocation
//! markers scanned out of template text, and JSON/YAML data files loaded
//! into one shared mapping shape.

pub mod data;
pub mod discover;
pub mod ident;
pub mod pattern;
pub mod template;

pub use data::{deep_merge, is_data_file, load_data_file, DataError, DataMap, DATA_EXTENSIONS};
pub use discover::{discover_patterns, DiscoverError, DiscoveredPattern};
pub use ident::{strip_ordinal, title_case, PatternName};
pub use pattern::{page_path_for, Pattern};
pub use template::{parse_params, scan, Invocation, ParamError, Segment};
