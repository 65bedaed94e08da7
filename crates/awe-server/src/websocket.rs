//! WebSocket-based live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages sent to clients for live reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HmrMessage {
    /// Full page reload after a successful rebuild
    Reload,

    /// Rebuild failed; the page keeps its last good content
    BuildFailed {
        /// Build error as shown in the terminal
        message: String,
    },

    /// Connection established
    Connected,
}

/// Hub for broadcasting HMR messages to all connected clients.
#[derive(Debug, Clone)]
pub struct HmrHub {
    sender: broadcast::Sender<HmrMessage>,
}

impl HmrHub {
    /// Create a new HMR hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: HmrMessage) {
        // Ignore send errors (no receivers)
        let _ = self.sender.send(msg);
    }

    /// Subscribe to HMR messages.
    pub fn subscribe(&self) -> broadcast::Receiver<HmrMessage> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for HmrHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the client-side live reload script.
///
/// The socket connects back to whatever host served the page, at `path`.
/// When the server goes away the page polls until it answers again and
/// then reloads, so restarting `awe dev` refreshes open tabs.
pub fn hmr_client_script(path: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const url = (location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '{path}';
  const overlayId = 'awe-build-error';

  function showBuildError(message) {{
    let overlay = document.getElementById(overlayId);
    if (!overlay) {{
      overlay = document.createElement('pre');
      overlay.id = overlayId;
      overlay.style.cssText = 'position:fixed;left:1rem;right:1rem;bottom:1rem;z-index:9999;' +
        'margin:0;padding:1rem;max-height:50vh;overflow:auto;white-space:pre-wrap;' +
        'background:#1c1917;color:#fca5a5;border-radius:0.5rem;font-size:0.8125rem;';
      document.body.appendChild(overlay);
    }}
    overlay.textContent = 'Build failed\n\n' + message;
  }}

  function waitForServer(delay) {{
    setTimeout(function() {{
      fetch(location.href, {{ method: 'HEAD', cache: 'no-store' }})
        .then(function() {{ location.reload(); }})
        .catch(function() {{ waitForServer(Math.min(delay * 2, 5000)); }});
    }}, delay);
  }}

  const socket = new WebSocket(url);

  socket.addEventListener('message', function(event) {{
    const msg = JSON.parse(event.data);
    if (msg.type === 'reload') {{
      location.reload();
    }} else if (msg.type === 'build_failed') {{
      console.error('[awe] ' + msg.message);
      showBuildError(msg.message);
    }}
  }});

  socket.addEventListener('close', function() {{
    console.info('[awe] dev server disconnected, waiting for it to come back');
    waitForServer(250);
  }});
}})();
"#,
        path = path
    )
}
