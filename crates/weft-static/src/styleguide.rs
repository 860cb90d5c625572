//! The browsable styleguide.
//!
//! For every rendered pattern the styleguide writes two files under
//! `patterns/<path_name>/`: the bare rendered output, and a chrome page
//! wrapping it with navigation, docs, lineage, and source panels. A
//! viewer index and a `patterns.json` metadata file sit at the root.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pulldown_cmark::{html, Options, Parser};

use weft_engine::{BuildState, ExportError, FrontendBuilder, PseudoPattern};
use weft_pattern::{title_case, Pattern};

use crate::assets::AssetPipeline;
use crate::config::Config;
use crate::templates::{
    LineageRef, NavGroup, NavPattern, NavVariant, PatternContext, TemplateEngine, ViewerContext,
};

pub struct StyleguideBuilder {
    output_dir: PathBuf,
    assets_dir: Option<PathBuf>,
    title: String,
    minify: bool,
    templates: TemplateEngine,
}

impl StyleguideBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            assets_dir: config.assets_dir.clone(),
            title: config.title.clone(),
            minify: config.minify,
            templates: TemplateEngine::new(),
        }
    }

    fn write(path: &Path, contents: &str) -> Result<(), ExportError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| ExportError::write(parent, err))?;
        }
        fs::write(path, contents).map_err(|err| ExportError::write(path, err))
    }

    /// Navigation tree with hrefs relative to `root`. Hidden patterns
    /// and patterns that failed to render are left out.
    fn navigation(state: &BuildState, root: &str) -> Vec<NavGroup> {
        let mut groups: BTreeMap<String, Vec<NavPattern>> = BTreeMap::new();
        for pattern in state.registry.list() {
            if pattern.hidden || pattern.rendered.is_none() {
                continue;
            }
            let variants = state
                .pseudo_patterns
                .iter()
                .filter(|v| v.parent == pattern.partial && !v.hidden && v.rendered.is_some())
                .map(|v| NavVariant {
                    title: v.display.clone(),
                    href: format!("{root}patterns/{}/index.html", v.path_name),
                })
                .collect();
            groups
                .entry(pattern.group.clone())
                .or_default()
                .push(NavPattern {
                    title: pattern.display.clone(),
                    href: format!("{root}patterns/{}/index.html", pattern.path_name),
                    variants,
                });
        }
        groups
            .into_iter()
            .map(|(group, patterns)| NavGroup {
                title: title_case(&group),
                patterns,
            })
            .collect()
    }

    fn chrome_href(state: &BuildState, partial: &str, root: &str) -> Option<String> {
        if let Some(pattern) = state.registry.lookup(partial) {
            return Some(format!("{root}patterns/{}/index.html", pattern.path_name));
        }
        state
            .pseudo_patterns
            .iter()
            .find(|v| v.partial == partial)
            .map(|v| format!("{root}patterns/{}/index.html", v.path_name))
    }

    fn lineage(state: &BuildState, partials: &[String], root: &str) -> Vec<LineageRef> {
        partials
            .iter()
            .filter_map(|partial| {
                Self::chrome_href(state, partial, root).map(|href| LineageRef {
                    partial: partial.clone(),
                    href,
                })
            })
            .collect()
    }

    fn markdown(source: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(source, options);
        let mut out = String::new();
        html::push_html(&mut out, parser);
        out
    }

    fn write_pattern_page(
        &self,
        state: &BuildState,
        pattern: &Pattern,
        rendered: &str,
        groups: &[NavGroup],
    ) -> Result<(), ExportError> {
        let page_dir = self.output_dir.join("patterns").join(&pattern.path_name);
        Self::write(
            &page_dir.join(format!("{}.rendered.html", pattern.path_name)),
            rendered,
        )?;

        let data_json = serde_json::to_string_pretty(&pattern.data).map_err(|err| {
            ExportError::Other(format!(
                "Failed to serialize data for `{}`: {err}",
                pattern.partial
            ))
        })?;

        let context = PatternContext {
            title: pattern.display.clone(),
            site_title: self.title.clone(),
            root: "../../".to_string(),
            rendered_href: format!("{}.rendered.html", pattern.path_name),
            docs: pattern
                .docs
                .as_deref()
                .map(Self::markdown)
                .unwrap_or_default(),
            uses: Self::lineage(state, state.registry.uses(&pattern.partial), "../../"),
            used_by: Self::lineage(state, state.registry.used_by(&pattern.partial), "../../"),
            source: pattern.raw.clone(),
            data_json,
            groups: groups.to_vec(),
        };
        let page = self.templates.render_pattern(&context).map_err(|err| {
            ExportError::Other(format!(
                "Failed to render page for `{}`: {err}",
                pattern.partial
            ))
        })?;
        Self::write(&page_dir.join("index.html"), &page)
    }

    /// Variant pages reuse the parent's docs, source, and lineage; only
    /// the data panel and rendered output are the variant's own.
    fn write_variant_page(
        &self,
        state: &BuildState,
        variant: &PseudoPattern,
        rendered: &str,
        groups: &[NavGroup],
    ) -> Result<(), ExportError> {
        let page_dir = self.output_dir.join("patterns").join(&variant.path_name);
        Self::write(
            &page_dir.join(format!("{}.rendered.html", variant.path_name)),
            rendered,
        )?;

        let parent = state.registry.lookup(&variant.parent);
        let data_json = serde_json::to_string_pretty(&variant.data).map_err(|err| {
            ExportError::Other(format!(
                "Failed to serialize data for `{}`: {err}",
                variant.partial
            ))
        })?;

        let context = PatternContext {
            title: variant.display.clone(),
            site_title: self.title.clone(),
            root: "../../".to_string(),
            rendered_href: format!("{}.rendered.html", variant.path_name),
            docs: parent
                .and_then(|p| p.docs.as_deref())
                .map(Self::markdown)
                .unwrap_or_default(),
            uses: parent
                .map(|p| Self::lineage(state, state.registry.uses(&p.partial), "../../"))
                .unwrap_or_default(),
            used_by: Vec::new(),
            source: parent.map(|p| p.raw.clone()).unwrap_or_default(),
            data_json,
            groups: groups.to_vec(),
        };
        let page = self.templates.render_pattern(&context).map_err(|err| {
            ExportError::Other(format!(
                "Failed to render page for `{}`: {err}",
                variant.partial
            ))
        })?;
        Self::write(&page_dir.join("index.html"), &page)
    }

    fn write_metadata(&self, state: &BuildState) -> Result<(), ExportError> {
        let patterns: Vec<serde_json::Value> = state
            .registry
            .list()
            .map(|p| {
                serde_json::json!({
                    "partial": p.partial,
                    "path": p.page_path(),
                    "group": p.group,
                    "title": p.display,
                    "hidden": p.hidden,
                    "rendered": p.rendered.is_some(),
                    "uses": state.registry.uses(&p.partial),
                    "usedBy": state.registry.used_by(&p.partial),
                })
            })
            .collect();

        let variants: Vec<serde_json::Value> = state
            .pseudo_patterns
            .iter()
            .map(|v| {
                serde_json::json!({
                    "partial": v.partial,
                    "parent": v.parent,
                    "path": v.page_path(),
                    "title": v.display,
                    "hidden": v.hidden,
                    "rendered": v.rendered.is_some(),
                })
            })
            .collect();

        let doc = serde_json::json!({
            "title": self.title,
            "patterns": patterns,
            "variants": variants,
        });
        let json = serde_json::to_string_pretty(&doc).map_err(|err| {
            ExportError::Other(format!("Failed to serialize pattern metadata: {err}"))
        })?;
        Self::write(&self.output_dir.join("patterns.json"), &json)
    }

    fn write_assets(&self, quick: bool) -> Result<(), ExportError> {
        let assets_dir = self.output_dir.join("assets");

        let css = AssetPipeline::styleguide_css();
        let css = if self.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        };
        Self::write(&assets_dir.join("styleguide.css"), &css)?;
        Self::write(&assets_dir.join("styleguide.js"), &AssetPipeline::styleguide_js())?;

        // Quick builds skip re-copying user assets.
        if quick {
            return Ok(());
        }
        if let Some(user_dir) = &self.assets_dir {
            if user_dir.is_dir() {
                let copied = AssetPipeline::copy_dir(user_dir, &assets_dir)?;
                tracing::info!("Copied {} user assets from {}", copied, user_dir.display());
            } else {
                tracing::warn!("Assets directory not found: {}", user_dir.display());
            }
        }
        Ok(())
    }
}

impl FrontendBuilder for StyleguideBuilder {
    fn build_frontend(&self, state: &BuildState, quick: bool) -> Result<(), ExportError> {
        let page_groups = Self::navigation(state, "../../");
        for pattern in state.registry.list() {
            if let Some(rendered) = &pattern.rendered {
                self.write_pattern_page(state, pattern, rendered, &page_groups)?;
            }
        }
        for variant in &state.pseudo_patterns {
            if let Some(rendered) = &variant.rendered {
                self.write_variant_page(state, variant, rendered, &page_groups)?;
            }
        }

        let viewer = self
            .templates
            .render_viewer(&ViewerContext {
                site_title: self.title.clone(),
                root: String::new(),
                groups: Self::navigation(state, ""),
                pattern_count: state.registry.len(),
                variant_count: state.pseudo_patterns.len(),
            })
            .map_err(|err| {
                ExportError::Other(format!("Failed to render styleguide index: {err}"))
            })?;
        Self::write(&self.output_dir.join("index.html"), &viewer)?;

        self.write_metadata(state)?;
        self.write_assets(quick)?;

        tracing::debug!("Styleguide written to {}", self.output_dir.display());
        Ok(())
    }
}
