//! Styleguide chrome templates.
//!
//! The browsable pages wrapping each rendered pattern are built from a
//! small set of embedded minijinja templates. Pattern output itself is
//! spliced in untouched; the chrome only adds navigation, docs,
//! lineage, and source panels around it.

use minijinja::Environment;
use serde::Serialize;

const VIEWER_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ site_title }}</title>
  <link rel="stylesheet" href="assets/styleguide.css">
</head>
<body>
  <div class="shell">
    <nav class="patterns-nav">
{% include "nav.html" %}
    </nav>
    <main class="welcome">
      <h1>{{ site_title }}</h1>
      <p class="counts">{{ pattern_count }} patterns, {{ variant_count }} variants</p>
      <p>Pick a pattern from the list to see its rendered output, data, and lineage.</p>
    </main>
  </div>
  <script src="assets/styleguide.js"></script>
  <script src="/__weft.js" defer></script>
</body>
</html>
"##;

const PATTERN_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} &middot; {{ site_title }}</title>
  <link rel="stylesheet" href="{{ root }}assets/styleguide.css">
</head>
<body>
  <div class="shell">
    <nav class="patterns-nav">
{% include "nav.html" %}
    </nav>
    <main class="pattern">
      <header class="pattern-header">
        <h1>{{ title }}</h1>
        <a class="naked-link" href="{{ rendered_href }}">open rendered output</a>
      </header>
{% if docs %}
      <section class="pattern-docs">
{{ docs | safe }}
      </section>
{% endif %}
      <section class="pattern-preview">
        <iframe src="{{ rendered_href }}" title="{{ title }} preview" loading="lazy"></iframe>
      </section>
{% if uses or used_by %}
      <section class="pattern-lineage">
{% if uses %}
        <div class="lineage-column">
          <h2>Uses</h2>
          <ul>
{% for item in uses %}
            <li><a href="{{ item.href }}">{{ item.partial }}</a></li>
{% endfor %}
          </ul>
        </div>
{% endif %}
{% if used_by %}
        <div class="lineage-column">
          <h2>Used by</h2>
          <ul>
{% for item in used_by %}
            <li><a href="{{ item.href }}">{{ item.partial }}</a></li>
{% endfor %}
          </ul>
        </div>
{% endif %}
      </section>
{% endif %}
      <section class="pattern-source">
        <details>
          <summary>Template</summary>
          <pre><code>{{ source }}</code></pre>
        </details>
        <details>
          <summary>Data</summary>
          <pre><code>{{ data_json }}</code></pre>
        </details>
      </section>
    </main>
  </div>
  <script src="{{ root }}assets/styleguide.js"></script>
  <script src="/__weft.js" defer></script>
</body>
</html>
"##;

const NAV_TEMPLATE: &str = r##"<div class="nav-header">
  <a href="{{ root }}index.html" class="nav-logo">{{ site_title }}</a>
</div>
{% for group in groups %}
<section class="nav-group">
  <h2>{{ group.title }}</h2>
  <ul>
{% for pattern in group.patterns %}
    <li>
      <a href="{{ pattern.href }}">{{ pattern.title }}</a>
{% if pattern.variants %}
      <ul class="nav-variants">
{% for variant in pattern.variants %}
        <li><a href="{{ variant.href }}">{{ variant.title }}</a></li>
{% endfor %}
      </ul>
{% endif %}
    </li>
{% endfor %}
  </ul>
</section>
{% endfor %}
"##;

/// A variant entry nested under its parent in the navigation.
#[derive(Debug, Clone, Serialize)]
pub struct NavVariant {
    pub title: String,
    pub href: String,
}

/// A pattern entry in the navigation.
#[derive(Debug, Clone, Serialize)]
pub struct NavPattern {
    pub title: String,
    pub href: String,
    pub variants: Vec<NavVariant>,
}

/// One navigation section, usually a top-level pattern group.
#[derive(Debug, Clone, Serialize)]
pub struct NavGroup {
    pub title: String,
    pub patterns: Vec<NavPattern>,
}

/// A link to another pattern's styleguide page, used for lineage.
#[derive(Debug, Clone, Serialize)]
pub struct LineageRef {
    pub partial: String,
    pub href: String,
}

/// Context for the styleguide index page.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerContext {
    pub site_title: String,
    pub root: String,
    pub groups: Vec<NavGroup>,
    pub pattern_count: usize,
    pub variant_count: usize,
}

/// Context for a single pattern's styleguide page.
#[derive(Debug, Clone, Serialize)]
pub struct PatternContext {
    pub title: String,
    pub site_title: String,
    pub root: String,
    pub rendered_href: String,
    pub docs: String,
    pub uses: Vec<LineageRef>,
    pub used_by: Vec<LineageRef>,
    pub source: String,
    pub data_json: String,
    pub groups: Vec<NavGroup>,
}

pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_template_owned("viewer.html".to_string(), VIEWER_TEMPLATE.to_string())
            .expect("Failed to add viewer template");
        env.add_template_owned("pattern.html".to_string(), PATTERN_TEMPLATE.to_string())
            .expect("Failed to add pattern template");
        env.add_template_owned("nav.html".to_string(), NAV_TEMPLATE.to_string())
            .expect("Failed to add nav template");
        Self { env }
    }

    pub fn render_viewer(&self, context: &ViewerContext) -> Result<String, minijinja::Error> {
        self.env.get_template("viewer.html")?.render(context)
    }

    pub fn render_pattern(&self, context: &PatternContext) -> Result<String, minijinja::Error> {
        self.env.get_template("pattern.html")?.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
