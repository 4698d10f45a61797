//! Logger module
//!
//! Console logging for the server: lifecycle banners, error/warning lines
//! on stderr, and per-request access logging in common log format or JSON.

use crate::config::AppState;
use chrono::Local;
use std::net::SocketAddr;

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    println!("======================================");
    println!("isoserve started");
    println!("Listening on: http://{addr}");
    println!("Serving directory: {}", state.root.display());
    println!("Cross-origin isolation headers enabled");
    if let Some(workers) = state.config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!("Press Ctrl+C to stop");
    println!("======================================\n");
}

pub fn log_shutdown() {
    println!("\nServer stopped");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

/// One access-log line per handled request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub body_bytes: usize,
}

impl AccessLogEntry {
    pub fn new(
        remote_addr: String,
        method: String,
        path: String,
        status: u16,
        body_bytes: usize,
    ) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            status,
            body_bytes,
        }
    }

    /// Format the entry according to the configured format
    pub fn format(&self, format: &str) -> String {
        match format {
            "json" => self.format_json(),
            _ => self.format_common(),
        }
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/1.1\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
            self.body_bytes,
        )
    }

    /// JSON lines, one object per request
    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "status": self.status,
            "body_bytes": self.body_bytes,
        })
        .to_string()
    }
}

pub fn log_access(entry: &AccessLogEntry, format: &str) {
    println!("{}", entry.format(format));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> AccessLogEntry {
        AccessLogEntry::new(
            "127.0.0.1:54321".to_string(),
            "GET".to_string(),
            "/page.html".to_string(),
            200,
            1234,
        )
    }

    #[test]
    fn test_common_format() {
        let line = entry().format("common");
        assert!(line.starts_with("127.0.0.1:54321 - - ["));
        assert!(line.contains("\"GET /page.html HTTP/1.1\""));
        assert!(line.ends_with("200 1234"));
    }

    #[test]
    fn test_json_format() {
        let line = entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["path"], "/page.html");
        assert_eq!(value["status"], 200);
        assert_eq!(value["body_bytes"], 1234);
    }

    #[test]
    fn test_unknown_format_falls_back_to_common() {
        let line = entry().format("whatever");
        assert!(line.contains("\"GET /page.html HTTP/1.1\""));
    }
}
