//! Recursive partial expansion.
//!
//! Templates expand depth first, pre-order: each literal run goes
//! through the renderer with the pattern's effective data, and each
//! invocation marker is replaced by the fully expanded output of its
//! target before the outer template proceeds. Call-site parameters
//! accumulate down the chain with the innermost call site winning. An
//! explicit chain of in-progress identifiers guards against cycles.

use serde_json::Value;

use weft_pattern::{deep_merge, scan, DataMap, Invocation, Pattern, Segment};

use crate::collab::TemplateRenderer;
use crate::links::LinkResolver;
use crate::registry::PatternRegistry;
use crate::state::{BuildIssue, IssueKind};

/// Call-site key a style modifier is folded into, visible to templates
/// as an ordinary value.
pub const STYLE_MODIFIER_KEY: &str = "styleModifier";

/// Failure that aborts one pattern's render. The build carries on for
/// unrelated patterns.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    #[error("Cycle detected: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    #[error("Renderer failed: {message}")]
    Render { message: String },
}

/// Expands one pattern at a time against a fixed registry snapshot.
///
/// Lineage edges and recoverable issues go into the collections handed
/// to [`PartialExpander::expand`]; the caller applies them to the
/// registry once the borrow ends.
pub struct PartialExpander<'a> {
    registry: &'a PatternRegistry,
    renderer: &'a dyn TemplateRenderer,
    links: &'a LinkResolver,
}

impl<'a> PartialExpander<'a> {
    pub fn new(
        registry: &'a PatternRegistry,
        renderer: &'a dyn TemplateRenderer,
        links: &'a LinkResolver,
    ) -> Self {
        Self {
            registry,
            renderer,
            links,
        }
    }

    /// Fully expand `pattern` against its resolved data.
    pub fn expand(
        &self,
        pattern: &Pattern,
        data: &DataMap,
        edges: &mut Vec<(String, String)>,
        issues: &mut Vec<BuildIssue>,
    ) -> Result<String, ExpandError> {
        let mut chain = vec![pattern.partial.clone()];
        self.expand_inner(pattern, data, &DataMap::new(), &mut chain, edges, issues)
    }

    fn expand_inner(
        &self,
        pattern: &Pattern,
        data: &DataMap,
        overlay: &DataMap,
        chain: &mut Vec<String>,
        edges: &mut Vec<(String, String)>,
        issues: &mut Vec<BuildIssue>,
    ) -> Result<String, ExpandError> {
        let mut effective = data.clone();
        deep_merge(&mut effective, overlay.clone());

        let mut out = String::new();
        for segment in scan(&pattern.raw) {
            match segment {
                Segment::Literal(text) => {
                    let rendered = self.renderer.render(text, &effective).map_err(|err| {
                        ExpandError::Render {
                            message: err.to_string(),
                        }
                    })?;
                    out.push_str(&rendered);
                }
                Segment::Partial(invocation) => {
                    self.expand_invocation(
                        &invocation,
                        pattern,
                        overlay,
                        chain,
                        edges,
                        issues,
                        &mut out,
                    )?;
                }
            }
        }

        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn expand_invocation(
        &self,
        invocation: &Invocation,
        parent: &Pattern,
        overlay: &DataMap,
        chain: &mut Vec<String>,
        edges: &mut Vec<(String, String)>,
        issues: &mut Vec<BuildIssue>,
        out: &mut String,
    ) -> Result<(), ExpandError> {
        let target = match self.registry.lookup(&invocation.partial) {
            Some(target) => target,
            None => {
                let owner = chain
                    .first()
                    .cloned()
                    .unwrap_or_else(|| parent.partial.clone());
                issues.push(BuildIssue::for_pattern(
                    IssueKind::MissingPartial,
                    owner,
                    format!(
                        "Partial `{}` not found (invoked by `{}`)",
                        invocation.partial, parent.partial
                    ),
                ));
                out.push_str(&format!(
                    "<!-- partial {} not found -->",
                    invocation.partial
                ));
                return Ok(());
            }
        };

        // Lineage reflects references, not render success; record the
        // edge before anything can still go wrong.
        edges.push((parent.partial.clone(), target.partial.clone()));

        if chain.iter().any(|p| p == &target.partial) {
            let mut cycle = chain.clone();
            cycle.push(target.partial.clone());
            return Err(ExpandError::Cycle { chain: cycle });
        }

        // This call site's parameters, with the style modifier folded in
        // and data links resolved before they ever reach the target.
        let mut params = invocation.params.clone();
        if let Some(modifier) = &invocation.style_modifier {
            params.insert(
                STYLE_MODIFIER_KEY.to_string(),
                Value::String(modifier.clone()),
            );
        }
        self.links.resolve_map(&mut params);

        let mut next_overlay = overlay.clone();
        deep_merge(&mut next_overlay, params);

        chain.push(target.partial.clone());
        let expanded =
            self.expand_inner(target, &target.data, &next_overlay, chain, edges, issues)?;
        chain.pop();

        out.push_str(&expanded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use weft_pattern::page_path_for;

    use crate::collab::RenderError;

    /// Hands literal text back untouched.
    struct Passthrough;

    impl TemplateRenderer for Passthrough {
        fn name(&self) -> &'static str {
            "passthrough"
        }

        fn render(&self, template: &str, _data: &DataMap) -> Result<String, RenderError> {
            Ok(template.to_string())
        }
    }

    /// Substitutes `{{ key }}` from the effective data, enough to watch
    /// precedence without a real template engine.
    struct Interp;

    impl TemplateRenderer for Interp {
        fn name(&self) -> &'static str {
            "interp"
        }

        fn render(&self, template: &str, data: &DataMap) -> Result<String, RenderError> {
            let mut out = template.to_string();
            for (key, value) in data {
                let needle = format!("{{{{ {key} }}}}");
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                out = out.replace(&needle, &text);
            }
            Ok(out)
        }
    }

    struct Failing;

    impl TemplateRenderer for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn render(&self, _template: &str, _data: &DataMap) -> Result<String, RenderError> {
            Err(RenderError("boom".to_string()))
        }
    }

    fn pattern(partial: &str, raw: &str, data: serde_json::Value) -> Pattern {
        Pattern {
            partial: partial.to_string(),
            path_name: format!("00-{partial}"),
            group: "test".to_string(),
            display: partial.to_string(),
            hidden: false,
            source: PathBuf::from(format!("{partial}.html")),
            raw: raw.to_string(),
            data: data.as_object().cloned().unwrap(),
            list_items: BTreeMap::new(),
            docs: None,
            rendered: None,
        }
    }

    fn registry_of(patterns: Vec<Pattern>) -> PatternRegistry {
        let mut registry = PatternRegistry::new();
        for p in patterns {
            registry.insert(p).unwrap();
        }
        registry
    }

    fn expand_one(
        registry: &PatternRegistry,
        renderer: &dyn TemplateRenderer,
        partial: &str,
    ) -> (
        Result<String, ExpandError>,
        Vec<(String, String)>,
        Vec<BuildIssue>,
    ) {
        let links = LinkResolver::default();
        let expander = PartialExpander::new(registry, renderer, &links);
        let target = registry.lookup(partial).unwrap();
        let mut edges = Vec::new();
        let mut issues = Vec::new();
        let result = expander.expand(target, &target.data, &mut edges, &mut issues);
        (result, edges, issues)
    }

    #[test]
    fn invocation_free_templates_round_trip() {
        let registry = registry_of(vec![pattern("test-plain", "<p>as is</p>", json!({}))]);
        let (result, edges, issues) = expand_one(&registry, &Passthrough, "test-plain");

        assert_eq!(result.unwrap(), "<p>as is</p>");
        assert!(edges.is_empty());
        assert!(issues.is_empty());
    }

    #[test]
    fn call_site_params_beat_the_child_data() {
        let registry = registry_of(vec![
            pattern("test-parent", r#"{{> test-child(name: "foo") }}"#, json!({})),
            pattern("test-child", "{{ name }}", json!({ "name": "bar" })),
        ]);
        let (result, edges, issues) = expand_one(&registry, &Interp, "test-parent");

        assert_eq!(result.unwrap(), "foo");
        assert_eq!(
            edges,
            vec![("test-parent".to_string(), "test-child".to_string())]
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn outer_params_stay_visible_unless_shadowed() {
        let registry = registry_of(vec![
            pattern(
                "test-grand",
                r#"{{> test-mid(a: "A", b: "B") }}"#,
                json!({}),
            ),
            pattern("test-mid", r#"{{> test-leaf(b: "C") }}"#, json!({})),
            pattern("test-leaf", "{{ a }}{{ b }}", json!({})),
        ]);
        let (result, _, issues) = expand_one(&registry, &Interp, "test-grand");

        assert_eq!(result.unwrap(), "AC");
        assert!(issues.is_empty());
    }

    #[test]
    fn missing_partials_leave_a_comment_and_an_issue() {
        let registry = registry_of(vec![pattern(
            "test-page",
            "x {{> test-nope }} y",
            json!({}),
        )]);
        let (result, edges, issues) = expand_one(&registry, &Passthrough, "test-page");

        assert_eq!(result.unwrap(), "x <!-- partial test-nope not found --> y");
        assert!(edges.is_empty());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MissingPartial);
        assert_eq!(issues[0].pattern.as_deref(), Some("test-page"));
    }

    #[test]
    fn mutual_cycles_abort_with_the_full_chain() {
        let registry = registry_of(vec![
            pattern("test-a", "{{> test-b }}", json!({})),
            pattern("test-b", "{{> test-a }}", json!({})),
        ]);
        let (result, edges, _) = expand_one(&registry, &Passthrough, "test-a");

        match result.unwrap_err() {
            ExpandError::Cycle { chain } => {
                assert_eq!(chain, ["test-a", "test-b", "test-a"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
        // Both references were still recorded.
        assert_eq!(
            edges,
            vec![
                ("test-a".to_string(), "test-b".to_string()),
                ("test-b".to_string(), "test-a".to_string()),
            ]
        );
    }

    #[test]
    fn self_invocation_is_a_cycle() {
        let registry = registry_of(vec![pattern("test-a", "{{> test-a }}", json!({}))]);
        let (result, _, _) = expand_one(&registry, &Passthrough, "test-a");

        match result.unwrap_err() {
            ExpandError::Cycle { chain } => assert_eq!(chain, ["test-a", "test-a"]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn style_modifiers_become_a_call_site_param() {
        let registry = registry_of(vec![
            pattern("test-page", "{{> test-button:primary|large }}", json!({})),
            pattern("test-button", "<b class=\"{{ styleModifier }}\"/>", json!({})),
        ]);
        let (result, _, issues) = expand_one(&registry, &Interp, "test-page");

        assert_eq!(result.unwrap(), "<b class=\"primary|large\"/>");
        assert!(issues.is_empty());
    }

    #[test]
    fn data_links_resolve_inside_call_site_params() {
        let registry = registry_of(vec![
            pattern(
                "test-teaser",
                r#"{{> test-cta(url: link.test-target, label: "Go") }}"#,
                json!({}),
            ),
            pattern("test-cta", "<a href=\"{{ url }}\">{{ label }}</a>", json!({})),
            pattern("test-target", "<main/>", json!({})),
        ]);

        let links = LinkResolver::new(BTreeMap::from([(
            "test-target".to_string(),
            page_path_for("00-test-target"),
        )]));
        let expander = PartialExpander::new(&registry, &Interp, &links);

        let teaser = registry.lookup("test-teaser").unwrap();
        let mut edges = Vec::new();
        let mut issues = Vec::new();
        let result = expander
            .expand(teaser, &teaser.data, &mut edges, &mut issues)
            .unwrap();

        assert_eq!(
            result,
            "<a href=\"patterns/00-test-target/00-test-target.rendered.html\">Go</a>"
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn renderer_failures_abort_the_pattern() {
        let registry = registry_of(vec![pattern("test-a", "anything", json!({}))]);
        let (result, _, _) = expand_one(&registry, &Failing, "test-a");

        assert!(matches!(result, Err(ExpandError::Render { .. })));
    }

    #[test]
    fn siblings_expand_left_to_right() {
        let registry = registry_of(vec![
            pattern("test-page", "{{> test-one }}|{{> test-two }}", json!({})),
            pattern("test-one", "1", json!({})),
            pattern("test-two", "2", json!({})),
        ]);
        let (result, edges, _) = expand_one(&registry, &Passthrough, "test-page");

        assert_eq!(result.unwrap(), "1|2");
        assert_eq!(
            edges,
            vec![
                ("test-page".to_string(), "test-one".to_string()),
                ("test-page".to_string(), "test-two".to_string()),
            ]
        );
    }
}
