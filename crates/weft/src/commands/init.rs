//! Scaffold a new pattern library.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use weft_static::DEFAULT_CONFIG;

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing weft...");

    scaffold("weft.toml", DEFAULT_CONFIG, yes)?;
    scaffold("data/global.json", DEFAULT_GLOBAL_DATA, yes)?;
    scaffold("patterns/00-atoms/00-button.html", DEFAULT_BUTTON, yes)?;
    scaffold("patterns/00-atoms/00-button.json", DEFAULT_BUTTON_DATA, yes)?;
    scaffold("patterns/00-atoms/00-button.md", DEFAULT_BUTTON_DOCS, yes)?;
    scaffold("patterns/01-molecules/00-card.html", DEFAULT_CARD, yes)?;
    scaffold("patterns/01-molecules/00-card.json", DEFAULT_CARD_DATA, yes)?;
    scaffold("patterns/02-pages/00-home.html", DEFAULT_HOME, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'weft serve' to preview the library.");

    Ok(())
}

fn scaffold(path: &str, contents: &str, overwrite: bool) -> Result<()> {
    let path = Path::new(path);
    if path.exists() && !overwrite {
        tracing::warn!(
            "{} already exists, skipping (use --yes to overwrite)",
            path.display()
        );
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());

    Ok(())
}

const DEFAULT_GLOBAL_DATA: &str = r#"{
  "title": "Pattern Library",
  "tagline": "Build pages from small, reusable patterns."
}
"#;

const DEFAULT_BUTTON: &str = r#"<button class="button {{ styleModifier }}">{{ label }}</button>
"#;

const DEFAULT_BUTTON_DATA: &str = r#"{
  "label": "Press me"
}
"#;

const DEFAULT_BUTTON_DOCS: &str = r#"# Button

The basic action trigger. Pass `label` from data or from the call site:

    {{> atoms-button(label: "Get started") }}

A style modifier after the identifier lands in `styleModifier`:

    {{> atoms-button:button--ghost }}
"#;

const DEFAULT_CARD: &str = r#"<article class="card">
  <h2>{{ heading }}</h2>
  <p>{{ body }}</p>
  {{> atoms-button(label: "Read more") }}
</article>
"#;

const DEFAULT_CARD_DATA: &str = r#"{
  "heading": "A quiet headline",
  "body": "Cards hold a heading, a short body, and one action.",
  "listitems": {
    "empty": {
      "heading": "Nothing here yet",
      "body": "Check back soon."
    }
  }
}
"#;

const DEFAULT_HOME: &str = r#"<main>
  <h1>{{ title }}</h1>
  <p>{{ tagline }}</p>
  {{> molecules-card }}
  {{> atoms-button(label: "Get started") }}
</main>
"#;
