//! Symbol catalog: scans the reference-page tree into a name -> pages map.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::Error;
use crate::sitepath;

/// File stem of a package's landing page, which documents no symbol.
const LANDING_PAGE_STEM: &str = "index";

/// Mapping from symbol name to the reference pages documenting it.
///
/// Built once per build by scanning the reference-page directory, then
/// shared read-only by every page render. Each bucket is ordered by
/// package name ascending, which is the deterministic fallback order when
/// a symbol is documented in several packages. There is no incremental
/// update; a rebuild rescans the full tree.
pub struct SymbolCatalog {
    /// Symbol name -> entries, each bucket sorted by package.
    by_name: HashMap<String, Vec<SymbolEntry>>,
}

/// One documented symbol's reference page.
///
/// `(name, package)` is unique but `name` alone is not: the same class
/// name can be documented in several packages, which is what the
/// resolver's disambiguation exists for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolEntry {
    /// The symbol's exact identifier, case-sensitive.
    pub name: String,
    /// The package (reference subdirectory) the symbol belongs to.
    pub package: String,
    /// Site-root-relative path of the published reference page.
    pub target_path: String,
}

impl SymbolCatalog {
    /// Scan `<root>/<api_root>` into a catalog.
    ///
    /// Each immediate subdirectory is a package, processed in ascending
    /// lexical order. Within a package, every source page except the
    /// landing page contributes one entry whose target path already
    /// carries the published extension. An absent reference directory
    /// yields an empty catalog rather than an error, so a docs tree
    /// without generated reference pages still builds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if a directory listing fails mid-scan.
    pub fn build(root: &Path, api_root: &str) -> Result<Self, Error> {
        let api_dir = root.join(api_root);
        if !api_dir.is_dir() {
            return Ok(Self::from_entries(Vec::new()));
        }

        let mut packages: Vec<String> = Vec::new();
        for dir_entry in std::fs::read_dir(&api_dir)? {
            let dir_entry = dir_entry?;
            if dir_entry.path().is_dir() {
                packages.push(dir_entry.file_name().to_string_lossy().into_owned());
            }
        }
        packages.sort();

        let mut entries = Vec::new();
        for package in &packages {
            collect_package_entries(&api_dir.join(package), package, api_root, &mut entries)?;
        }

        return Ok(Self::from_entries(entries));
    }

    /// All entries sorted by `(name, package)` ascending.
    pub fn entries_sorted(&self) -> Vec<&SymbolEntry> {
        let mut entries: Vec<&SymbolEntry> = self.by_name.values().flatten().collect();
        entries.sort_by(|a, b| return (&a.name, &a.package).cmp(&(&b.name, &b.package)));
        return entries;
    }

    /// Group entries by name, sorting each bucket by package so the
    /// ordering invariant holds for catalogs assembled in memory too.
    pub fn from_entries(entries: Vec<SymbolEntry>) -> Self {
        let mut by_name: HashMap<String, Vec<SymbolEntry>> = HashMap::new();
        for entry in entries {
            by_name.entry(entry.name.clone()).or_default().push(entry);
        }
        for bucket in by_name.values_mut() {
            bucket.sort_by(|a, b| return a.package.cmp(&b.package));
        }
        return Self { by_name };
    }

    /// Whether the catalog holds no symbols at all.
    pub fn is_empty(&self) -> bool {
        return self.by_name.is_empty();
    }

    /// Number of distinct symbol names.
    pub fn len(&self) -> usize {
        return self.by_name.len();
    }

    /// Entries documenting `name`, in package order, if any.
    pub fn lookup(&self, name: &str) -> Option<&[SymbolEntry]> {
        return self.by_name.get(name).map(Vec::as_slice);
    }
}

/// Append one package directory's reference pages to `entries`.
/// The landing page, nested directories, and non-source files are skipped.
///
/// # Errors
///
/// Returns `Error::Io` if the package directory cannot be listed.
fn collect_package_entries(
    package_dir: &Path,
    package: &str,
    api_root: &str,
    entries: &mut Vec<SymbolEntry>,
) -> Result<(), Error> {
    for dir_entry in std::fs::read_dir(package_dir)? {
        let dir_entry = dir_entry?;
        let path = dir_entry.path();

        if !path.is_file() {
            continue;
        }
        if !path.extension().is_some_and(|ext| return ext == sitepath::SOURCE_EXT) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| return stem.to_str()) else {
            continue;
        };
        if stem == LANDING_PAGE_STEM {
            continue;
        }

        entries.push(SymbolEntry {
            name: stem.to_string(),
            package: package.to_string(),
            target_path: format!("{api_root}/{package}/{stem}.{}", sitepath::PUBLISHED_EXT),
        });
    }

    return Ok(());
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    fn entry(name: &str, package: &str) -> SymbolEntry {
        SymbolEntry {
            name: name.to_string(),
            package: package.to_string(),
            target_path: format!("api/{package}/{name}.html"),
        }
    }

    #[test]
    fn missing_reference_dir_yields_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();

        let catalog = SymbolCatalog::build(dir.path(), "api").unwrap();

        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn indexes_packages_with_published_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("api/core")).unwrap();
        std::fs::write(dir.path().join("api/core/ModuleScope.md"), "# ModuleScope\n").unwrap();
        std::fs::write(dir.path().join("api/core/notes.txt"), "not a page\n").unwrap();

        let catalog = SymbolCatalog::build(dir.path(), "api").unwrap();

        assert_eq!(catalog.len(), 1);
        let entries = catalog.lookup("ModuleScope").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].package, "core");
        assert_eq!(entries[0].target_path, "api/core/ModuleScope.html");
    }

    #[test]
    fn landing_pages_are_not_symbols() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("api/auth")).unwrap();
        std::fs::write(dir.path().join("api/auth/index.md"), "# auth\n").unwrap();
        std::fs::write(dir.path().join("api/auth/Token.md"), "# Token\n").unwrap();

        let catalog = SymbolCatalog::build(dir.path(), "api").unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.lookup("index").is_none());
        assert!(catalog.lookup("Token").is_some());
    }

    #[test]
    fn stray_files_and_nested_directories_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("api/core/internals")).unwrap();
        std::fs::write(dir.path().join("api/README.md"), "# API\n").unwrap();
        std::fs::write(dir.path().join("api/core/Binding.md"), "# Binding\n").unwrap();
        std::fs::write(dir.path().join("api/core/internals/Hidden.md"), "# Hidden\n").unwrap();

        let catalog = SymbolCatalog::build(dir.path(), "api").unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.lookup("README").is_none());
        assert!(catalog.lookup("Hidden").is_none());
        assert!(catalog.lookup("Binding").is_some());
    }

    #[test]
    fn collisions_keep_one_entry_per_package() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("api/zeta")).unwrap();
        std::fs::create_dir_all(dir.path().join("api/alpha")).unwrap();
        std::fs::write(dir.path().join("api/zeta/Thing.md"), "# Thing\n").unwrap();
        std::fs::write(dir.path().join("api/alpha/Thing.md"), "# Thing\n").unwrap();

        let catalog = SymbolCatalog::build(dir.path(), "api").unwrap();

        let entries = catalog.lookup("Thing").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].package, "alpha");
        assert_eq!(entries[1].package, "zeta");
    }

    #[test]
    fn buckets_sorted_regardless_of_insertion_order() {
        let catalog = SymbolCatalog::from_entries(vec![
            entry("ModuleScope", "zeta"),
            entry("ModuleScope", "alpha"),
            entry("ModuleScope", "mid"),
        ]);

        let packages: Vec<&str> = catalog
            .lookup("ModuleScope")
            .unwrap()
            .iter()
            .map(|e| e.package.as_str())
            .collect();
        assert_eq!(packages, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn entries_sorted_orders_by_name_then_package() {
        let catalog = SymbolCatalog::from_entries(vec![
            entry("Token", "auth"),
            entry("ModuleScope", "core"),
            entry("ModuleScope", "auth"),
        ]);

        let listed: Vec<(&str, &str)> = catalog
            .entries_sorted()
            .iter()
            .map(|e| (e.name.as_str(), e.package.as_str()))
            .collect();
        assert_eq!(
            listed,
            [("ModuleScope", "auth"), ("ModuleScope", "core"), ("Token", "auth")]
        );
    }
}
