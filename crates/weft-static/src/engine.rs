//! Build orchestration.
//!
//! One build pass runs end to end: resolve the data cascade, discover
//! patterns, synthesize variants, fix data links, expand every
//! template, then hand the finished state to the exporter and the
//! frontend builder exactly once each. Recoverable problems accumulate
//! as issues on the report; identifier collisions and collaborator
//! failures abort the pass with nothing published.

use std::collections::BTreeMap;
use std::time::Instant;

use weft_engine::{
    build_data_cascade, pattern_cascade, pseudo_patterns_for, BuildError, BuildIssue, BuildReport,
    BuildState, ExpandError, FrontendBuilder, IssueKind, LinkResolver, PartialExpander,
    PatternExporter, PatternRegistry, PseudoPattern, TemplateRenderer,
};
use weft_pattern::{discover_patterns, Pattern};

use crate::config::Config;
use crate::export::DiskExporter;
use crate::render::JinjaRenderer;
use crate::styleguide::StyleguideBuilder;

pub struct Engine {
    config: Config,
    renderer: Box<dyn TemplateRenderer>,
    exporter: Box<dyn PatternExporter>,
    frontend: Box<dyn FrontendBuilder>,
}

impl Engine {
    /// Engine with the default collaborators for `config`.
    pub fn new(config: Config) -> Self {
        let exporter = DiskExporter::new(&config);
        let frontend = StyleguideBuilder::new(&config);
        Self {
            config,
            renderer: Box::new(JinjaRenderer::new()),
            exporter: Box::new(exporter),
            frontend: Box::new(frontend),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_exporter(mut self, exporter: Box<dyn PatternExporter>) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn with_frontend(mut self, frontend: Box<dyn FrontendBuilder>) -> Self {
        self.frontend = frontend;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one full build pass. `quick` is a hint to skip redundant
    /// static-asset work on rebuilds.
    pub async fn build(&self, quick: bool) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let mut issues = Vec::new();

        let (cascade, mut data_issues) = build_data_cascade(&self.config.data_dir);
        issues.append(&mut data_issues);

        let discovered =
            discover_patterns(&self.config.patterns_dir, &self.config.template_extensions)?;
        tracing::debug!("Discovered {} pattern sources", discovered.len());

        // Resolve each pattern's cascade before anything renders.
        let mut prepared: Vec<Pattern> = Vec::with_capacity(discovered.len());
        for found in discovered {
            let mut pattern = found.pattern;
            let (data, list_items, mut pattern_issues) =
                pattern_cascade(&cascade, found.data_file.as_deref());
            issues.append(&mut pattern_issues);
            pattern.data = data;
            pattern.list_items = list_items;
            prepared.push(pattern);
        }

        let mut variants: Vec<PseudoPattern> =
            prepared.iter().flat_map(pseudo_patterns_for).collect();

        // Every pattern and variant is a link target; data links resolve
        // before expansion so overridden values carry real page paths.
        let targets: BTreeMap<String, String> = prepared
            .iter()
            .map(|pattern| (pattern.partial.clone(), pattern.page_path()))
            .chain(
                variants
                    .iter()
                    .map(|variant| (variant.partial.clone(), variant.page_path())),
            )
            .collect();
        let links = LinkResolver::new(targets);
        for pattern in &mut prepared {
            links.resolve_map(&mut pattern.data);
        }
        for variant in &mut variants {
            links.resolve_map(&mut variant.data);
        }

        // Identifier collisions abort before anything is written.
        let mut registry = PatternRegistry::new();
        for pattern in prepared {
            registry.insert(pattern)?;
        }

        let mut failed = 0;
        for partial in registry.partials() {
            let mut edges = Vec::new();
            let mut expand_issues = Vec::new();
            let result = {
                let pattern = match registry.lookup(&partial) {
                    Some(pattern) => pattern,
                    None => continue,
                };
                let expander = PartialExpander::new(&registry, self.renderer.as_ref(), &links);
                expander.expand(pattern, &pattern.data, &mut edges, &mut expand_issues)
            };
            issues.append(&mut expand_issues);
            for (user, used) in edges {
                registry.record_use(&user, &used);
            }
            match result {
                Ok(output) => registry.store_rendered(&partial, output),
                Err(err) => {
                    failed += 1;
                    issues.push(issue_for(&partial, &err));
                }
            }
        }

        // Variants render through their parent's template, with the
        // parent's identity on the expansion chain.
        for variant in &mut variants {
            let mut edges = Vec::new();
            let mut expand_issues = Vec::new();
            let result = match registry.lookup(&variant.parent) {
                Some(parent) => {
                    let expander = PartialExpander::new(&registry, self.renderer.as_ref(), &links);
                    Some(expander.expand(parent, &variant.data, &mut edges, &mut expand_issues))
                }
                None => None,
            };
            issues.append(&mut expand_issues);
            for (user, used) in edges {
                registry.record_use(&user, &used);
            }
            match result {
                Some(Ok(output)) => variant.rendered = Some(output),
                Some(Err(err)) => {
                    failed += 1;
                    issues.push(issue_for(&variant.partial, &err));
                }
                None => {}
            }
        }

        for issue in &issues {
            tracing::warn!("{issue}");
        }

        let state = BuildState {
            global_data: cascade.data,
            registry,
            pseudo_patterns: variants,
        };

        self.exporter.export_patterns(&state)?;
        self.frontend.build_frontend(&state, quick)?;

        let report = BuildReport {
            patterns: state.registry.len(),
            pseudo_patterns: state.pseudo_patterns.len(),
            failed,
            duration: start.elapsed(),
            issues,
        };
        tracing::info!(
            "Built {} patterns and {} variants in {:.1?}",
            report.patterns,
            report.pseudo_patterns,
            report.duration
        );
        Ok(report)
    }
}

fn issue_for(partial: &str, err: &ExpandError) -> BuildIssue {
    let kind = match err {
        ExpandError::Cycle { .. } => IssueKind::Cycle,
        ExpandError::Render { .. } => IssueKind::Render,
    };
    BuildIssue::for_pattern(kind, partial, err.to_string())
}
