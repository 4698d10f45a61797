//! Response finalization hook
//!
//! Every response leaving the server passes through [`finalize`], which
//! stamps the cross-origin isolation header pair and the `Server` header.
//! Browsers only grant a page `crossOriginIsolated` features (shared-memory
//! workers, `SharedArrayBuffer`) when both headers carry exactly these
//! values, on the document and on every subresource it loads, so the hook
//! runs for all paths and all status codes.

use hyper::header::{HeaderValue, SERVER};
use hyper::Response;

pub const OPENER_POLICY: &str = "Cross-Origin-Opener-Policy";
pub const OPENER_POLICY_VALUE: &str = "same-origin";

pub const EMBEDDER_POLICY: &str = "Cross-Origin-Embedder-Policy";
pub const EMBEDDER_POLICY_VALUE: &str = "require-corp";

/// Stamp the isolation headers and the `Server` header onto a response.
///
/// Insertion replaces any same-named header already present, so the
/// configured values are authoritative no matter what the handler built.
pub fn finalize<B>(mut response: Response<B>, server_name: &str) -> Response<B> {
    let headers = response.headers_mut();
    headers.insert(OPENER_POLICY, HeaderValue::from_static(OPENER_POLICY_VALUE));
    headers.insert(
        EMBEDDER_POLICY,
        HeaderValue::from_static(EMBEDDER_POLICY_VALUE),
    );
    if let Ok(value) = HeaderValue::from_str(server_name) {
        headers.insert(SERVER, value);
    }
    response
}
