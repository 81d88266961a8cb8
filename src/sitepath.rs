//! Site path arithmetic shared by the catalog, resolver, and build driver.
//!
//! All paths handled here are site-root-relative and use `/` separators
//! regardless of platform, because they end up in emitted hrefs.

use std::path::Path;

/// Extension pages are published under.
pub const PUBLISHED_EXT: &str = "html";

/// Extension pages are authored in.
pub const SOURCE_EXT: &str = "md";

/// Swap the authored extension for the published one.
/// Paths without the authored extension pass through unchanged.
pub fn published_path(site_path: &str) -> String {
    return site_path
        .strip_suffix(SOURCE_EXT)
        .and_then(|stem| return stem.strip_suffix('.'))
        .map_or_else(
            || return site_path.to_string(),
            |stem| return format!("{stem}.{PUBLISHED_EXT}"),
        );
}

/// Compute a relative URL from one page to another site path.
///
/// The walk starts in `from_page`'s directory. The result is prefixed
/// with `./` when it does not already start with a parent marker, so
/// emitted hrefs are always explicitly relative.
pub fn relative_url(from_page: &str, to_path: &str) -> String {
    let from_dir: Vec<&str> = match from_page.rsplit_once('/') {
        Some((dir, _file)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let to_parts: Vec<&str> = to_path.split('/').collect();

    let common = from_dir
        .iter()
        .zip(to_parts.iter())
        .take_while(|(from_part, to_part)| return from_part == to_part)
        .count();

    let ups = from_dir.len().saturating_sub(common);
    let mut parts: Vec<&str> = vec![".."; ups];
    parts.extend(to_parts.get(common..).unwrap_or_default());

    let relative = parts.join("/");
    if relative.starts_with('.') {
        return relative;
    }
    return format!("./{relative}");
}

/// Render a filesystem path as a site path with `/` separators.
pub fn to_site_path(path: &Path) -> String {
    return path.to_string_lossy().replace('\\', "/");
}
