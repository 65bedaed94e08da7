//! Development server with live reload for awe in everything.
//!
//! Builds the site into its output directory and serves it, renders
//! preview images on request, and rebuilds on file changes, telling
//! connected browsers to reload over a WebSocket.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{router, DevServer, DevServerConfig, ServerError, ServerState};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{HmrHub, HmrMessage};
