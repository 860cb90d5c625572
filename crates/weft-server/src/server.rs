//! Preview server implementation.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use weft_static::Engine;

use crate::reload::{reload_client_script, ReloadHub, ReloadMessage};
use crate::watcher::{FileWatcher, WatchEvent};

/// Preview server settings. What gets served and watched comes from the
/// engine's own configuration.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Port to listen on.
    pub port: u16,

    /// Open the browser once the server is up.
    pub open: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            open: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind to {0}: {1}")]
    Bind(SocketAddr, String),

    #[error("File watch error: {0}")]
    Watch(String),
}

/// State shared between the router and the rebuild task.
struct ServerState {
    engine: Arc<Engine>,
    hub: ReloadHub,
}

/// Serves the built styleguide and rebuilds it on source changes.
pub struct PreviewServer {
    engine: Engine,
    config: PreviewConfig,
}

impl PreviewServer {
    pub fn new(engine: Engine, config: PreviewConfig) -> Self {
        Self { engine, config }
    }

    /// Build once, then serve with live rebuilds until shutdown.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, self.config.port));
        let engine = Arc::new(self.engine);

        // First pass so there is something to serve. A fatal error here
        // leaves the server up; fixing the source triggers a rebuild
        // through the watcher.
        if let Err(err) = engine.build(false).await {
            tracing::error!("Initial build failed: {err}");
        }

        let project = engine.config().clone();
        let mut watch_paths = vec![project.patterns_dir.clone(), project.data_dir.clone()];
        if let Some(assets) = &project.assets_dir {
            watch_paths.push(assets.clone());
        }
        let (watcher, mut events) =
            FileWatcher::new(&watch_paths, project.template_extensions.clone())
                .map_err(|err| ServerError::Watch(err.to_string()))?;

        let state = Arc::new(ServerState {
            engine: Arc::clone(&engine),
            hub: ReloadHub::new(),
        });

        let rebuild_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                rebuild(&rebuild_state, event).await;
            }
            // Keep the watcher alive as long as events can arrive.
            drop(watcher);
        });

        let app = Router::new()
            .route("/__weft", get(ws_handler))
            .route("/__weft.js", get(script_handler))
            .fallback_service(ServeDir::new(&project.output_dir))
            .with_state(state);

        tracing::info!("Previewing {} at http://{addr}", project.title);
        if self.config.open {
            let _ = open::that(format!("http://{addr}"));
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Bind(addr, err.to_string()))?;
        axum::serve(listener, app)
            .await
            .map_err(|err| ServerError::Bind(addr, err.to_string()))?;

        Ok(())
    }
}

async fn rebuild(state: &ServerState, event: WatchEvent) {
    // Template and data edits take the fast path; anything else may be
    // an asset, which only a full pass copies into the output.
    let (label, quick) = match &event {
        WatchEvent::Template(_) => ("Template", true),
        WatchEvent::Data(_) => ("Data", true),
        WatchEvent::Other(_) => ("File", false),
    };
    tracing::info!("{} changed: {}", label, event.path().display());

    match state.engine.build(quick).await {
        Ok(report) => {
            if report.failed > 0 {
                tracing::warn!("Rebuilt with {} failed patterns", report.failed);
            }
            state.hub.send(ReloadMessage::Reload);
        }
        Err(err) => {
            tracing::error!("Rebuild failed: {err}");
            state.hub.send(ReloadMessage::BuildFailed {
                message: err.to_string(),
            });
        }
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hub.subscribe();

    if let Ok(hello) = serde_json::to_string(&ReloadMessage::Connected) {
        if socket.send(Message::Text(hello.into())).await.is_err() {
            return;
        }
    }

    while let Ok(msg) = rx.recv().await {
        let json = match serde_json::to_string(&msg) {
            Ok(json) => json,
            Err(_) => continue,
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

async fn script_handler() -> impl IntoResponse {
    (
        [("content-type", "application/javascript")],
        reload_client_script(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_static::Config;

    #[test]
    fn default_preview_settings() {
        let config = PreviewConfig::default();
        assert_eq!(config.port, 4000);
        assert!(config.open);
    }

    #[test]
    fn servers_keep_their_settings() {
        let engine = Engine::new(Config::default());
        let server = PreviewServer::new(
            engine,
            PreviewConfig {
                port: 5001,
                open: false,
            },
        );
        assert_eq!(server.config.port, 5001);
        assert!(!server.config.open);
    }
}
