//! File watcher: builds the site on startup, then rebuilds on changes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::catalog::SymbolCatalog;
use crate::commands;
use crate::config;
use crate::error;
use crate::scanner;

/// Debounce delay between filesystem events and rebuild.
const DEBOUNCE_MS: u64 = 100;

/// Collect the docs root, every page's parent directory, and every
/// reference package directory.
fn collect_watch_dirs(
    root: &Path,
    pages: &[String],
    catalog: &SymbolCatalog,
) -> HashSet<PathBuf> {
    let mut dirs = HashSet::new();
    dirs.insert(root.to_path_buf());

    for page in pages {
        if let Some(parent) = Path::new(page).parent() {
            dirs.insert(root.join(parent));
        }
    }
    for entry in catalog.entries_sorted() {
        if let Some(parent) = Path::new(&entry.target_path).parent() {
            dirs.insert(root.join(parent));
        }
    }

    return dirs;
}

/// Create a filesystem watcher that sends events on the given channel.
///
/// # Errors
///
/// Returns `Error::WatchFailed` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
) -> Result<notify::RecommendedWatcher, error::Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return error::Error::WatchFailed {
            reason: e.to_string(),
        };
    });
}

/// Entry point for the watch command.
///
/// Runs an initial build, then watches the docs tree and rebuilds on
/// changes. The catalog has no incremental mode, so every rebuild
/// rescans the full reference tree; a failed rebuild is reported and
/// the watch keeps running.
///
/// # Errors
///
/// Returns errors from config loading, catalog building, or watcher
/// setup.
pub fn run() -> Result<(), error::Error> {
    let root = PathBuf::from(".");

    eprintln!("watch: initial build");
    run_build();

    let config = config::Config::load(&root)?;
    let catalog = SymbolCatalog::build(&root, config.api_dir())?;
    let pages = scanner::scan_pages(&root, &config);
    let watch_dirs = collect_watch_dirs(&root, &pages, &catalog);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;

    for dir in &watch_dirs {
        if dir.exists() {
            let _ = watcher.watch(dir, RecursiveMode::NonRecursive);
        }
    }

    let dir_count = watch_dirs.len();
    eprintln!("watch: monitoring {dir_count} directories, press Ctrl+C to stop");

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        eprintln!("watch: change detected, rebuilding...");
        run_build();
    }

    return Ok(());
}

/// Run one build and report failures without stopping the watch loop.
fn run_build() {
    if let Err(e) = commands::build() {
        eprintln!("error: {e}");
    }
    return;
}
