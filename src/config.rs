// Configuration module
// Typed settings loaded from an optional config file, environment
// overrides, and hard defaults, plus the shared runtime state.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub site: SiteConfig,
}

/// Listener and runtime settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Seconds; 0 disables HTTP keep-alive
    pub keep_alive_timeout: u64,
    /// Whole-connection timeout in seconds; 0 disables
    pub request_timeout: u64,
    /// Seconds to wait for in-flight connections on shutdown
    pub shutdown_grace: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// "common" or "json"
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
}

/// Static site settings
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Base directory served; resolution never escapes it
    pub root: PathBuf,
    /// File the root path rewrites to
    pub default_document: String,
    /// Tried in order for directory requests
    pub index_files: Vec<String>,
    /// Generate HTML listings for directories without an index file
    pub directory_listing: bool,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("isoserve").required(false))
            .add_source(config::Environment::with_prefix("ISOSERVE"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.keep_alive_timeout", 75)?
            .set_default("server.request_timeout", 30)?
            .set_default("server.shutdown_grace", 5)?
            .set_default("logging.access_log", true)?
            .set_default("logging.format", "common")?
            .set_default("http.server_name", "isoserve/0.1")?
            .set_default("site.root", ".")?
            .set_default("site.default_document", "telegram-page.html")?
            .set_default("site.index_files", vec!["index.html", "index.htm"])?
            .set_default("site.directory_listing", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Shared per-process state, read-only after startup
pub struct AppState {
    pub config: Config,
    /// Canonicalized `site.root`; reference point for the traversal guard
    pub root: PathBuf,
}

impl AppState {
    /// Resolve the configured base directory once, up front. A missing or
    /// unreadable root is a startup error, not a per-request 404.
    pub fn new(config: Config) -> std::io::Result<Self> {
        let root = config.site.root.canonicalize().map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!(
                    "cannot resolve site root '{}': {e}",
                    config.site.root.display()
                ),
            )
        })?;
        Ok(Self { config, root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::load().expect("defaults should load");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.site.default_document, "telegram-page.html");
        assert_eq!(cfg.site.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.site.directory_listing);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.format, "common");
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load().unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 8123;
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8123".parse().unwrap()
        );
    }

    #[test]
    fn test_invalid_socket_addr() {
        let mut cfg = Config::load().unwrap();
        cfg.server.host = "not-an-ip".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }

    #[test]
    fn test_state_rejects_missing_root() {
        let mut cfg = Config::load().unwrap();
        cfg.site.root = PathBuf::from("/nonexistent/isoserve-root");
        assert!(AppState::new(cfg).is_err());
    }
}
