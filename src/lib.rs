//! isoserve - a static file server that enables cross-origin isolation.
//!
//! Serves a local directory over HTTP/1.1 and stamps every response with
//! `Cross-Origin-Opener-Policy: same-origin` and
//! `Cross-Origin-Embedder-Policy: require-corp`, the header pair browsers
//! require before a page may use shared-memory workers or
//! `SharedArrayBuffer`.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
