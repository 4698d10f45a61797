//! HTTP protocol layer module
//!
//! Protocol-level helpers decoupled from the static-file business logic:
//! response builders, MIME lookup, HTTP-date handling, and the response
//! finalization hook that stamps the cross-origin isolation headers.

pub mod cache;
pub mod isolation;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_file_response,
    build_listing_response, build_moved_response, build_options_response,
};
