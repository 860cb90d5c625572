//! WebSocket live reload.
//!
//! Rebuild outcomes fan out through a broadcast hub to every connected
//! browser. The client script reloads the page after a successful
//! rebuild and shows an overlay with the error after a fatal one.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages pushed to connected preview clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// A rebuild succeeded; reload the page.
    Reload,

    /// A rebuild failed fatally; the page stays and shows the message.
    BuildFailed { message: String },

    /// Connection established.
    Connected,
}

/// Hub for broadcasting reload messages to all connected clients.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Send to every subscriber. Dropped silently when nobody listens.
    pub fn send(&self, msg: ReloadMessage) {
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

/// The client script served at `/__weft.js`.
///
/// The styleguide chrome references it unconditionally. On a static
/// deployment the connection fails once and stays quiet; the script
/// never reloads a page it was not connected to.
pub fn reload_client_script() -> &'static str {
    RELOAD_CLIENT_JS
}

const RELOAD_CLIENT_JS: &str = r#"(function () {
  'use strict';

  var attempts = 0;
  var everConnected = false;

  function showOverlay(message) {
    var overlay = document.getElementById('__weft-overlay');
    if (!overlay) {
      overlay = document.createElement('div');
      overlay.id = '__weft-overlay';
      overlay.style.cssText =
        'position:fixed;inset:0;z-index:2147483647;overflow:auto;' +
        'background:rgba(18,18,18,0.94);color:#ffb4a2;' +
        'font:14px/1.5 ui-monospace,monospace;padding:2rem;white-space:pre-wrap;';
      document.body.appendChild(overlay);
    }
    overlay.textContent = '[weft] build failed\n\n' + message;
  }

  function connect() {
    var ws = new WebSocket('ws://' + window.location.host + '/__weft');

    ws.onopen = function () {
      everConnected = true;
      attempts = 0;
      console.log('[weft] live reload connected');
    };

    ws.onmessage = function (event) {
      var msg = JSON.parse(event.data);
      switch (msg.type) {
        case 'reload':
          location.reload();
          break;
        case 'build_failed':
          showOverlay(msg.message);
          break;
        case 'connected':
          break;
      }
    };

    ws.onclose = function () {
      if (!everConnected || attempts >= 10) {
        return;
      }
      attempts += 1;
      setTimeout(connect, 500 * attempts);
    };

    ws.onerror = function () {
      ws.close();
    };
  }

  connect();
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_broadcasts_to_subscribers() {
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        hub.send(ReloadMessage::Reload);

        assert!(matches!(rx.try_recv(), Ok(ReloadMessage::Reload)));
    }

    #[test]
    fn sends_without_subscribers_are_dropped() {
        let hub = ReloadHub::new();
        hub.send(ReloadMessage::Reload);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn failure_messages_carry_their_text() {
        let msg = ReloadMessage::BuildFailed {
            message: "Duplicate partial `test-foo`".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();

        assert!(json.contains("build_failed"));
        assert!(json.contains("Duplicate partial"));
    }

    #[test]
    fn client_script_targets_the_reload_endpoint() {
        let script = reload_client_script();
        assert!(script.contains("/__weft"));
        assert!(script.contains("location.reload"));
        assert!(script.contains("build_failed"));
    }
}
