//! Development server implementation.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::sync::{Mutex, RwLock};
use tower_http::services::{ServeDir, ServeFile};

use awe_og::OgRenderer;
use awe_site::{BuildConfig, BuildResult, SiteBuilder};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{hmr_client_script, HmrHub, HmrMessage};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Site build settings; live reload is always injected
    pub build: BuildConfig,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            port: 4321,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    AddressError(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Build failed: {0}")]
    BuildError(#[from] awe_site::BuildError),
}

/// Shared server state.
pub struct ServerState {
    builder: SiteBuilder,
    renderer: OgRenderer,
    hmr: HmrHub,
    // Serializes rebuilds triggered by bursts of file events
    build_lock: Mutex<()>,
    // Slug to title of every published essay in the last good build
    previews: RwLock<HashMap<String, String>>,
}

impl ServerState {
    pub fn new(config: BuildConfig) -> Result<Self, ServerError> {
        let builder = SiteBuilder::new(BuildConfig { hmr: true, ..config });
        let renderer = builder.og_renderer()?;

        Ok(Self {
            builder,
            renderer,
            hmr: HmrHub::new(),
            build_lock: Mutex::new(()),
            previews: RwLock::new(HashMap::new()),
        })
    }

    fn content_dir(&self) -> PathBuf {
        self.builder.config().content_dir.clone()
    }

    fn output_dir(&self) -> PathBuf {
        self.builder.config().output_dir.clone()
    }

    /// Rebuild the site and tell connected browsers what happened.
    ///
    /// A failed build leaves the previous output and preview list in place.
    pub async fn rebuild(&self) {
        let _guard = self.build_lock.lock().await;

        match self.builder.build().await {
            Ok(result) => {
                tracing::info!(
                    "Rebuilt {} essays in {}ms",
                    result.pages,
                    result.duration_ms
                );
                self.update_previews(&result).await;
                self.hmr.send(HmrMessage::Reload);
            }
            Err(e) => {
                tracing::error!("Build failed: {}", e);
                self.hmr.send(HmrMessage::BuildFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    async fn update_previews(&self, result: &BuildResult) {
        let published = result
            .essays
            .iter()
            .filter(|essay| !essay.draft)
            .map(|essay| (essay.slug.clone(), essay.title.clone()))
            .collect();
        *self.previews.write().await = published;
    }

    async fn preview_title(&self, slug: &str) -> Option<String> {
        self.previews.read().await.get(slug).cloned()
    }
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::AddressError(format!("{}:{}", self.config.host, self.config.port))
            })?;

        // Preview images are rendered on request, not on every rebuild
        let state = Arc::new(ServerState::new(BuildConfig {
            og_images: false,
            ..self.config.build.clone()
        })?);

        // A broken essay should not stop the server from starting
        state.rebuild().await;

        let (watcher, mut rx) = FileWatcher::new(&[state.content_dir()])
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state);

        tracing::info!("Starting dev server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Routes for the dev server; everything not matched is served from the output dir.
pub fn router(state: Arc<ServerState>) -> Router {
    let output_dir = state.output_dir();
    let static_files =
        ServeDir::new(&output_dir).not_found_service(ServeFile::new(output_dir.join("404.html")));

    Router::new()
        .route("/og.png", get(site_og_handler))
        .route("/{slug}/index.png", get(essay_og_handler))
        .route("/__hmr", get(ws_handler))
        .route("/__hmr.js", get(hmr_script_handler))
        .fallback_service(static_files)
        .with_state(state)
}

/// Handle file watch events.
async fn handle_watch_event(state: &Arc<ServerState>, event: WatchEvent) {
    match &event {
        WatchEvent::EssayModified(path) => {
            tracing::info!("Essay modified: {}", path.display());
        }
        WatchEvent::Created(path) | WatchEvent::Deleted(path) | WatchEvent::Modified(path) => {
            tracing::debug!("Content changed: {}", path.display());
        }
    }

    state.rebuild().await;
}

/// Render an essay's preview image.
///
/// Only essays published by the last successful build have one, so the
/// image matches the page being served.
async fn essay_og_handler(
    Path(slug): Path<String>,
    State(state): State<Arc<ServerState>>,
) -> Response {
    let Some(title) = state.preview_title(&slug).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let result = tokio::task::spawn_blocking(move || state.renderer.render_essay(&title)).await;

    match result {
        Ok(Ok(png)) => png_response(png),
        Ok(Err(e)) => {
            tracing::warn!("Failed to render preview image: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::warn!("Preview render task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Render the site-wide preview image.
async fn site_og_handler(State(state): State<Arc<ServerState>>) -> Response {
    let result = tokio::task::spawn_blocking(move || state.renderer.render_site()).await;

    match result {
        Ok(Ok(png)) => png_response(png),
        Ok(Err(e)) => {
            tracing::warn!("Failed to render preview image: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::warn!("Preview render task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn png_response(png: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        png,
    )
        .into_response()
}

/// Handler for the HMR WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hmr.subscribe();

    if send_message(&mut socket, &HmrMessage::Connected)
        .await
        .is_err()
    {
        return;
    }

    // Forward HMR messages to the client
    while let Ok(hmr_msg) = rx.recv().await {
        if send_message(&mut socket, &hmr_msg).await.is_err() {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

/// Handler for the HMR client script.
async fn hmr_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        hmr_client_script("/__hmr"),
    )
}
