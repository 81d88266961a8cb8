//! Core CLI commands for apilink: build and symbols.

use std::path::{Path, PathBuf};

use crate::catalog::SymbolCatalog;
use crate::config;
use crate::error;
use crate::renderer;
use crate::resolver::RenderContext;
use crate::scanner;
use crate::sitepath;

/// Render every page of the docs tree, linking API symbol mentions.
///
/// The symbol catalog is built once, before any page renders, and shared
/// read-only by every resolution, so every page sees the same catalog no
/// matter where it sits in the build order.
///
/// # Errors
///
/// Returns errors from config loading, catalog building, page reading,
/// or output writing.
pub fn build() -> Result<(), error::Error> {
    let root = PathBuf::from(".");

    let config = config::Config::load(&root)?;
    let catalog = SymbolCatalog::build(&root, config.api_dir())?;
    let pages = scanner::scan_pages(&root, &config);
    let out_root = root.join(config.out_dir());

    for page in &pages {
        render_page_to_disk(&root, &out_root, page, &catalog)?;
    }

    let page_count = pages.len();
    let symbol_count = catalog.len();
    eprintln!("Rendered {page_count} pages ({symbol_count} symbols indexed)");

    return Ok(());
}

/// Read one markdown page, render it, and write the published HTML.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the page vanished since scanning,
/// or `Error::Io` if the output cannot be written.
fn render_page_to_disk(
    root: &Path,
    out_root: &Path,
    page: &str,
    catalog: &SymbolCatalog,
) -> Result<(), error::Error> {
    let source_path = root.join(page);
    let markdown = std::fs::read_to_string(&source_path)
        .map_err(|_err| return error::Error::FileNotFound { path: source_path.clone() })?;

    let ctx = RenderContext {
        page_path: page.to_string(),
    };
    let rendered = renderer::render_page(&markdown, &ctx, catalog);

    let out_path = out_root.join(sitepath::published_path(page));
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&out_path, renderer::page_shell(&rendered))?;

    return Ok(());
}

/// Print every indexed symbol and its reference-page path.
///
/// # Errors
///
/// Returns errors from config loading, catalog building, or JSON
/// serialization.
pub fn symbols(json: bool) -> Result<(), error::Error> {
    let root = PathBuf::from(".");

    let config = config::Config::load(&root)?;
    let catalog = SymbolCatalog::build(&root, config.api_dir())?;
    let entries = catalog.entries_sorted();

    if json {
        let output = serde_json::to_string_pretty(&entries)?;
        println!("{output}");
        return Ok(());
    }

    if entries.is_empty() {
        println!("No symbols indexed.");
        return Ok(());
    }

    for entry in &entries {
        println!("{} -> {}", entry.name, entry.target_path);
    }

    return Ok(());
}
