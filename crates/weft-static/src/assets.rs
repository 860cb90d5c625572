//! Styleguide assets.
//!
//! The stylesheet and client script for the styleguide chrome are
//! embedded in the binary, so a built site never depends on files
//! shipped next to the executable. User assets are copied through
//! verbatim.

use std::fs;
use std::path::Path;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use walkdir::WalkDir;

use weft_engine::ExportError;

const STYLEGUIDE_CSS: &str = r#"
:root {
  --ink: #23282d;
  --ink-soft: #5b6570;
  --paper: #fbfbf9;
  --panel: #ffffff;
  --line: #dcdfe3;
  --accent: #8a4f24;
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: "Iowan Old Style", "Palatino Linotype", Georgia, serif;
  color: var(--ink);
  background: var(--paper);
  line-height: 1.55;
}

.shell {
  display: grid;
  grid-template-columns: 16rem minmax(0, 1fr);
  min-height: 100vh;
}

.patterns-nav {
  border-right: 1px solid var(--line);
  padding: 1.25rem 1rem;
  background: var(--panel);
}

.nav-header {
  margin-bottom: 1.5rem;
}

.nav-logo {
  font-size: 1.1rem;
  font-weight: 700;
  color: var(--ink);
  text-decoration: none;
}

.nav-group h2 {
  font-size: 0.78rem;
  letter-spacing: 0.08em;
  text-transform: uppercase;
  color: var(--ink-soft);
  margin: 1.25rem 0 0.4rem;
}

.nav-group ul {
  list-style: none;
  margin: 0;
  padding: 0;
}

.nav-group li a {
  display: block;
  padding: 0.18rem 0.4rem;
  border-radius: 4px;
  color: var(--ink);
  text-decoration: none;
}

.nav-group li a:hover {
  background: var(--paper);
}

.nav-group li a.active {
  color: var(--accent);
  font-weight: 700;
}

.nav-variants {
  margin-left: 0.9rem;
  font-size: 0.92rem;
}

.welcome,
.pattern {
  padding: 2rem 2.5rem;
  max-width: 64rem;
}

.counts {
  color: var(--ink-soft);
}

.pattern-header {
  display: flex;
  align-items: baseline;
  justify-content: space-between;
  gap: 1rem;
  border-bottom: 1px solid var(--line);
  padding-bottom: 0.75rem;
}

.pattern-header h1 {
  margin: 0;
}

.naked-link {
  font-size: 0.9rem;
  color: var(--accent);
}

.pattern-docs {
  margin-top: 1.25rem;
}

.pattern-preview {
  margin-top: 1.5rem;
  border: 1px solid var(--line);
  border-radius: 6px;
  background: var(--panel);
}

.pattern-preview iframe {
  display: block;
  width: 100%;
  height: 20rem;
  border: 0;
}

.pattern-lineage {
  display: flex;
  gap: 3rem;
  margin-top: 1.5rem;
}

.lineage-column h2 {
  font-size: 0.9rem;
  margin: 0 0 0.3rem;
}

.lineage-column ul {
  list-style: none;
  margin: 0;
  padding: 0;
}

.pattern-source {
  margin-top: 1.5rem;
}

.pattern-source details {
  border: 1px solid var(--line);
  border-radius: 6px;
  margin-bottom: 0.6rem;
  background: var(--panel);
}

.pattern-source summary {
  cursor: pointer;
  padding: 0.5rem 0.75rem;
  font-weight: 700;
}

.pattern-source pre {
  margin: 0;
  padding: 0.75rem;
  overflow-x: auto;
  border-top: 1px solid var(--line);
  font-size: 0.85rem;
}
"#;

const STYLEGUIDE_JS: &str = r#"
(function () {
  "use strict";

  var here = window.location.pathname.replace(/\/index\.html$/, "/");
  var links = document.querySelectorAll(".patterns-nav a");
  for (var i = 0; i < links.length; i++) {
    var target = new URL(links[i].getAttribute("href"), window.location.href);
    if (target.pathname.replace(/\/index\.html$/, "/") === here) {
      links[i].classList.add("active");
    }
  }

  var frame = document.querySelector(".pattern-preview iframe");
  if (frame) {
    frame.addEventListener("load", function () {
      try {
        var body = frame.contentDocument.body;
        if (body) {
          frame.style.height = Math.max(160, body.scrollHeight + 32) + "px";
        }
      } catch (err) {
        /* cross-origin frames keep the default height */
      }
    });
  }
})();
"#;

pub struct AssetPipeline;

impl AssetPipeline {
    pub fn styleguide_css() -> String {
        STYLEGUIDE_CSS.trim_start().to_string()
    }

    pub fn styleguide_js() -> String {
        STYLEGUIDE_JS.trim_start().to_string()
    }

    /// Minify a stylesheet. Callers fall back to the unminified input
    /// on error, so a stylesheet lightningcss cannot parse still ships.
    pub fn minify_css(css: &str) -> Result<String, String> {
        let stylesheet =
            StyleSheet::parse(css, ParserOptions::default()).map_err(|err| err.to_string())?;
        let out = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|err| err.to_string())?;
        Ok(out.code)
    }

    /// Copy a directory tree into `dest`, preserving relative layout.
    /// Returns the number of files copied.
    pub fn copy_dir(source: &Path, dest: &Path) -> Result<usize, ExportError> {
        let mut copied = 0;
        for entry in WalkDir::new(source)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let rel = match path.strip_prefix(source) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            let target = dest.join(rel);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|err| ExportError::write(parent, err))?;
            }
            fs::copy(path, &target).map_err(|err| ExportError::write(&target, err))?;
            copied += 1;
        }
        Ok(copied)
    }
}
