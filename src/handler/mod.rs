//! Request handler module
//!
//! Routing dispatch (method gate, root-path rewrite, access logging) and
//! static file serving.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
