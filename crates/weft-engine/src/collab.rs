//! Seams between the build core and its collaborators.
//!
//! The engine never touches template syntax beyond invocation markers,
//! never writes files, and never assembles the viewer. Those jobs sit
//! behind these traits; `weft-static` ships the default implementations
//! and embedders or tests can swap in their own.

use std::path::Path;

use weft_pattern::DataMap;

use crate::state::BuildState;

/// Renders literal template text against resolved data.
///
/// Implementations own all non-partial placeholder syntax. Failures are
/// recoverable per pattern, never repaired here.
pub trait TemplateRenderer: Send + Sync {
    /// Renderer identifier for logs.
    fn name(&self) -> &'static str;

    fn render(&self, template: &str, data: &DataMap) -> Result<String, RenderError>;
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct RenderError(pub String);

/// Writes selected rendered patterns somewhere outside the styleguide.
pub trait PatternExporter: Send + Sync {
    fn export_patterns(&self, state: &BuildState) -> Result<(), ExportError>;
}

/// Assembles the browsable frontend from a finished build state.
///
/// `quick` is a hint to skip redundant static-asset work, never a
/// license to skip pattern pages.
pub trait FrontendBuilder: Send + Sync {
    fn build_frontend(&self, state: &BuildState, quick: bool) -> Result<(), ExportError>;
}

/// Failure inside an exporter or frontend builder. Fatal for the build
/// invocation that triggered it.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

impl ExportError {
    pub fn write(path: &Path, source: std::io::Error) -> Self {
        ExportError::Write {
            path: path.display().to_string(),
            source,
        }
    }
}
