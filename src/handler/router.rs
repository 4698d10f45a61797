//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, the
//! root-path rewrite, dispatch to static file serving, and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::CONTENT_LENGTH;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating what static file serving needs
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    let response = match check_http_method(&method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: &path,
                is_head,
                if_modified_since: req
                    .headers()
                    .get("if-modified-since")
                    .and_then(|v| v.to_str().ok())
                    .map(ToString::to_string),
            };
            static_files::serve(&ctx, &state).await
        }
    };

    if state.config.logging.access_log {
        let entry = AccessLogEntry::new(
            peer_addr.to_string(),
            method.to_string(),
            path,
            response.status().as_u16(),
            body_bytes(&response),
        );
        logger::log_access(&entry, &state.config.logging.format);
    }

    Ok(response)
}

/// Check HTTP method and return an early response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Body size for the access log, read back from the Content-Length the
/// builders set (304 and 204 responses have none and log as 0)
fn body_bytes(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_head_pass_through() {
        assert!(check_http_method(&Method::GET).is_none());
        assert!(check_http_method(&Method::HEAD).is_none());
    }

    #[test]
    fn test_options_answered() {
        let resp = check_http_method(&Method::OPTIONS).unwrap();
        assert_eq!(resp.status(), 204);
    }

    #[test]
    fn test_other_methods_rejected() {
        for method in [Method::POST, Method::PUT, Method::DELETE] {
            let resp = check_http_method(&method).unwrap();
            assert_eq!(resp.status(), 405);
        }
    }

    #[test]
    fn test_body_bytes_from_content_length() {
        let resp = http::build_file_response(b"12345", "text/plain; charset=utf-8", None, false);
        assert_eq!(body_bytes(&resp), 5);
    }

    #[test]
    fn test_body_bytes_defaults_to_zero() {
        let resp = http::build_options_response();
        assert_eq!(body_bytes(&resp), 0);
    }
}
