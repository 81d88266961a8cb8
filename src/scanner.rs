use std::path::Path;

use walkdir::WalkDir;

use crate::config::Config;
use crate::sitepath;

/// Scan all markdown pages under `root`, returning site-root-relative paths.
/// Applies the config's include/exclude filters and skips the output
/// directory and hidden path components. Reference pages count as pages
/// too; they render through the same pipeline as narrative pages.
/// Results are sorted for a deterministic build order.
pub fn scan_pages(root: &Path, config: &Config) -> Vec<String> {
    let out_prefix = format!("{}/", config.out_dir());
    let mut pages = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == sitepath::SOURCE_EXT))
    {
        let page_path = entry.path();
        let relative = page_path.strip_prefix(root).unwrap_or(page_path);
        let site_path = sitepath::to_site_path(relative);

        if site_path.starts_with(&out_prefix) || has_hidden_component(&site_path) {
            continue;
        }
        if !config.should_scan(&site_path) {
            continue;
        }

        pages.push(site_path);
    }

    pages.sort();
    pages
}

/// Check whether any path component is hidden (dot-prefixed).
fn has_hidden_component(site_path: &str) -> bool {
    site_path.split('/').any(|component| component.starts_with('.'))
}
