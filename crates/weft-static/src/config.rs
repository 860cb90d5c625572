//! Project configuration.
//!
//! Configuration lives in a single `weft.toml` at the project root.
//! Every field has a default, so an absent file is a valid (if plain)
//! project; a file that exists but does not parse is an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// The configuration document written by `weft init`. Parsing it must
/// produce exactly [`default_config`].
pub const DEFAULT_CONFIG: &str = r#"# weft configuration

# Where pattern templates live.
patterns_dir = "patterns"

# Where shared data files live.
data_dir = "data"

# Where the built styleguide is written.
output_dir = "public"

# Styleguide title.
title = "Pattern Library"

# File extensions treated as pattern templates.
template_extensions = ["html", "mustache"]

# Partials whose rendered output is exported after each build.
pattern_export_partials = []

# Where exported partials are written.
export_dir = "pattern_exports"

# Minify styleguide CSS.
minify = true
"#;

static DEFAULT: LazyLock<Config> = LazyLock::new(Config::default);

/// The built-in defaults, constructed once.
pub fn default_config() -> &'static Config {
    &DEFAULT
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Project configuration, loaded from `weft.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the pattern source tree.
    #[serde(default = "default_patterns_dir")]
    pub patterns_dir: PathBuf,

    /// Directory of global data files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Where the built styleguide is written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Optional directory of user assets copied into the output.
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,

    /// Styleguide title.
    #[serde(default = "default_title")]
    pub title: String,

    /// File extensions treated as pattern templates.
    #[serde(default = "default_template_extensions")]
    pub template_extensions: Vec<String>,

    /// Partials whose rendered output is exported after each build.
    #[serde(default)]
    pub pattern_export_partials: Vec<String>,

    /// Where exported partials are written.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// Minify styleguide CSS.
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            patterns_dir: default_patterns_dir(),
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            assets_dir: None,
            title: default_title(),
            template_extensions: default_template_extensions(),
            pattern_export_partials: Vec::new(),
            export_dir: default_export_dir(),
            minify: default_minify(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults. A file that cannot be read
    /// or parsed is an error.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }
}

fn default_patterns_dir() -> PathBuf {
    PathBuf::from("patterns")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_title() -> String {
    "Pattern Library".to_string()
}

fn default_template_extensions() -> Vec<String> {
    vec!["html".to_string(), "mustache".to_string()]
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("pattern_exports")
}

fn default_minify() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("weft.toml")).unwrap();
        assert_eq!(&config, default_config());
    }

    #[test]
    fn embedded_document_matches_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(&parsed, default_config());
    }

    #[test]
    fn partial_file_fills_the_rest_from_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weft.toml");
        std::fs::write(&path, "title = \"Acme Design System\"\nminify = false\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.title, "Acme Design System");
        assert!(!config.minify);
        assert_eq!(config.patterns_dir, PathBuf::from("patterns"));
        assert_eq!(config.output_dir, PathBuf::from("public"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weft.toml");
        std::fs::write(&path, "title = [not toml").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn assets_dir_is_optional() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weft.toml");
        std::fs::write(&path, "assets_dir = \"static\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.assets_dir, Some(PathBuf::from("static")));
        assert_eq!(default_config().assets_dir, None);
    }
}
