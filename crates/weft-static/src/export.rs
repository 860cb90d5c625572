//! Standalone pattern export.
//!
//! Projects that consume patterns outside the styleguide (CMS themes,
//! legacy templates) can list partials in `pattern_export_partials`.
//! After each build their rendered output is written as flat HTML
//! files under the export directory.

use std::fs;
use std::path::PathBuf;

use weft_engine::{BuildState, ExportError, PatternExporter};

use crate::config::Config;

pub struct DiskExporter {
    export_dir: PathBuf,
    partials: Vec<String>,
}

impl DiskExporter {
    pub fn new(config: &Config) -> Self {
        Self {
            export_dir: config.export_dir.clone(),
            partials: config.pattern_export_partials.clone(),
        }
    }
}

impl PatternExporter for DiskExporter {
    fn export_patterns(&self, state: &BuildState) -> Result<(), ExportError> {
        if self.partials.is_empty() {
            return Ok(());
        }

        fs::create_dir_all(&self.export_dir)
            .map_err(|err| ExportError::write(&self.export_dir, err))?;

        let mut exported = 0;
        for partial in &self.partials {
            let rendered = state
                .registry
                .lookup(partial)
                .and_then(|p| p.rendered.as_deref())
                .or_else(|| {
                    state
                        .pseudo_patterns
                        .iter()
                        .find(|p| &p.partial == partial)
                        .and_then(|p| p.rendered.as_deref())
                });

            match rendered {
                Some(html) => {
                    let path = self.export_dir.join(format!("{partial}.html"));
                    fs::write(&path, html).map_err(|err| ExportError::write(&path, err))?;
                    exported += 1;
                }
                None => tracing::warn!("Nothing to export for `{partial}`"),
            }
        }

        tracing::info!(
            "Exported {} of {} partials to {}",
            exported,
            self.partials.len(),
            self.export_dir.display()
        );
        Ok(())
    }
}
