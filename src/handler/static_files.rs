//! Static file serving module
//!
//! Resolves request paths against the base directory with a two-stage
//! traversal guard, handles index files and directory listings, and answers
//! conditional GETs.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Characters escaped when building listing hrefs
const HREF_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'&')
    .add(b'\'');

/// Serve a GET/HEAD request from the base directory
pub async fn serve(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let site = &state.config.site;

    // Root path rewrite: "/" is served as the default document
    let request_path = if ctx.path == "/" {
        format!("/{}", site.default_document)
    } else {
        ctx.path.to_string()
    };

    let Ok(decoded) = percent_decode_str(&request_path).decode_utf8() else {
        return http::build_404_response();
    };

    let Some(candidate) = resolve_path(&state.root, &decoded) else {
        logger::log_warning(&format!("Path traversal attempt blocked: {}", ctx.path));
        return http::build_404_response();
    };

    // Missing files are a routine 404, not worth a log line
    let Ok(metadata) = fs::metadata(&candidate).await else {
        return http::build_404_response();
    };

    if metadata.is_dir() {
        serve_directory(ctx, state, &request_path, &candidate).await
    } else {
        serve_file(ctx, state, &candidate).await
    }
}

/// First stage of the traversal guard: rebuild the path from its segments,
/// dropping empty and `.` segments and rejecting anything that could step
/// outside the base directory.
fn resolve_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            seg if seg.contains('\\') || seg.contains('\0') => return None,
            seg => resolved.push(seg),
        }
    }
    Some(resolved)
}

/// Serve a directory request: trailing-slash redirect, index files, listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
    request_path: &str,
    dir: &Path,
) -> Response<Full<Bytes>> {
    let site = &state.config.site;

    // Directory URLs carry a trailing slash so relative links resolve
    if !request_path.ends_with('/') {
        return http::build_moved_response(&format!("{request_path}/"));
    }

    // Second stage of the traversal guard, same as for files: the
    // canonical directory (symlinks resolved) must stay under the root
    let Ok(canonical) = fs::canonicalize(dir).await else {
        return http::build_404_response();
    };
    if !canonical.starts_with(&state.root) {
        logger::log_warning(&format!(
            "Directory escapes base directory: {}",
            canonical.display()
        ));
        return http::build_404_response();
    }

    for index in &site.index_files {
        let index_path = canonical.join(index);
        if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
            return serve_file(ctx, state, &index_path).await;
        }
    }

    if !site.directory_listing {
        return http::build_404_response();
    }

    match render_listing(request_path, &canonical).await {
        Some(html) => http::build_listing_response(html, ctx.is_head),
        None => http::build_404_response(),
    }
}

/// Serve a single file, honoring `If-Modified-Since`
async fn serve_file(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
    file_path: &Path,
) -> Response<Full<Bytes>> {
    let Ok(canonical) = fs::canonicalize(file_path).await else {
        return http::build_404_response();
    };
    if !canonical.starts_with(&state.root) {
        logger::log_warning(&format!(
            "Path escapes base directory: {}",
            canonical.display()
        ));
        return http::build_404_response();
    }

    let modified = fs::metadata(&canonical)
        .await
        .ok()
        .and_then(|m| m.modified().ok());

    if let Some(mtime) = modified {
        if cache::not_modified(ctx.if_modified_since.as_deref(), mtime) {
            return http::build_304_response(&cache::http_date(mtime));
        }
    }

    let content = match fs::read(&canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                canonical.display()
            ));
            return http::build_404_response();
        }
    };

    let content_type = mime::content_type_for(canonical.extension().and_then(|e| e.to_str()));
    http::build_file_response(
        &content,
        content_type,
        modified.map(cache::http_date),
        ctx.is_head,
    )
}

/// Render an HTML directory listing: sorted entries, escaped names,
/// percent-encoded hrefs, directories suffixed with `/`
async fn render_listing(url_path: &str, dir: &Path) -> Option<String> {
    let mut entries = Vec::new();
    let mut reader = fs::read_dir(dir).await.ok()?;
    while let Ok(Some(entry)) = reader.next_entry().await {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort();

    let mut items = String::new();
    for name in &entries {
        let href = utf8_percent_encode(name, HREF_ESCAPE).to_string();
        items.push_str(&format!(
            "<li><a href=\"{href}\">{}</a></li>\n",
            escape_html(name)
        ));
    }

    let title = format!("Directory listing for {}", escape_html(url_path));
    Some(format!(
        "<!DOCTYPE HTML>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n\
         <ul>\n{items}</ul>\n<hr>\n</body>\n</html>\n"
    ))
}

/// Minimal HTML escaping for listing entries
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_simple_path() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_path(root, "/a/b.html"),
            Some(PathBuf::from("/srv/site/a/b.html"))
        );
    }

    #[test]
    fn test_resolve_skips_empty_and_dot_segments() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_path(root, "//a/./b.html"),
            Some(PathBuf::from("/srv/site/a/b.html"))
        );
    }

    #[test]
    fn test_resolve_rejects_parent_segments() {
        let root = Path::new("/srv/site");
        assert_eq!(resolve_path(root, "/../etc/passwd"), None);
        assert_eq!(resolve_path(root, "/a/../../etc/passwd"), None);
    }

    #[test]
    fn test_resolve_rejects_backslash_and_nul() {
        let root = Path::new("/srv/site");
        assert_eq!(resolve_path(root, "/a\\b.html"), None);
        assert_eq!(resolve_path(root, "/a\0b.html"), None);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a b=\"c\">&'d'"),
            "&lt;a b=&quot;c&quot;&gt;&amp;&#x27;d&#x27;"
        );
        assert_eq!(escape_html("plain.txt"), "plain.txt");
    }
}
