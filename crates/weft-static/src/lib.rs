//! Build orchestration and the default collaborators: a minijinja
//! renderer, a disk exporter for standalone partials, and the
//! browsable styleguide frontend.

pub mod assets;
pub mod config;
pub mod engine;
pub mod export;
pub mod render;
pub mod styleguide;
pub mod templates;

pub use assets::AssetPipeline;
pub use config::{default_config, Config, ConfigError, DEFAULT_CONFIG};
pub use engine::Engine;
pub use export::DiskExporter;
pub use render::JinjaRenderer;
pub use styleguide::StyleguideBuilder;
