//! Default template renderer.
//!
//! Literal template text is rendered with minijinja in lenient mode,
//! so a placeholder with no matching data renders as empty output
//! instead of failing the whole pattern.

use minijinja::{Environment, UndefinedBehavior};

use weft_engine::{RenderError, TemplateRenderer};
use weft_pattern::DataMap;

pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        Self { env }
    }
}

impl Default for JinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for JinjaRenderer {
    fn name(&self) -> &'static str {
        "minijinja"
    }

    fn render(&self, template: &str, data: &DataMap) -> Result<String, RenderError> {
        self.env
            .render_str(template, data)
            .map_err(|err| RenderError(err.to_string()))
    }
}
