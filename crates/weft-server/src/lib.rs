//! Preview server with live reload for weft pattern libraries.
//!
//! Serves the built styleguide, watches pattern and data sources, and
//! pushes rebuild outcomes to connected browsers over a WebSocket.

pub mod reload;
pub mod server;
pub mod watcher;

pub use reload::{reload_client_script, ReloadHub, ReloadMessage};
pub use server::{PreviewConfig, PreviewServer, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
