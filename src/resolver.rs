//! Reference resolution: decides whether one inline-code occurrence
//! becomes a link to a generated reference page.
//!
//! Resolution is deliberately conservative. Docs prose is full of inline
//! code that is not a symbol reference, so every failed condition
//! degrades to passthrough; an unresolved mention must never fail a
//! build or emit a broken link.

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Tag};
use regex::Regex;

use crate::catalog::{SymbolCatalog, SymbolEntry};
use crate::sitepath;

/// Built-in type names that are never auto-linked.
///
/// These appear constantly in example snippets and are essentially never
/// meant as references to the documented API surface.
static IGNORED_TYPE_NAMES: &[&str] = &[
    // Dart core
    "String",
    "int",
    "double",
    "bool",
    "num",
    "dynamic",
    "void",
    "Object",
    "List",
    "Map",
    "Set",
    "Future",
    "Stream",
    "Iterable",
    "Type",
    "Function",
    "Null",
    "Never",
    "Record",
    "Duration",
    "DateTime",
    "Uri",
    "RegExp",
    "Error",
    "Exception",
    "Completer",
    "Timer",
    "StreamController",
    "Stopwatch",
    // Conventional generic type parameters
    "T",
    "E",
    "K",
    "V",
    "R",
    "S",
    // Flutter framework
    "Widget",
    "BuildContext",
    "State",
    "StatelessWidget",
    "StatefulWidget",
    "Key",
    "GlobalKey",
    "InheritedWidget",
    "InheritedNotifier",
    "Navigator",
    "Route",
    "ModalRoute",
    "RouteObserver",
    "PageRoute",
    "MaterialApp",
    "Scaffold",
    "Text",
    "Center",
    "Column",
    "Row",
    "Container",
    "SizedBox",
    "Padding",
    "ElevatedButton",
    "TextButton",
    "CircularProgressIndicator",
    "MaterialPageRoute",
];

/// Keyword tokens at or below this length never count as path hints.
const PACKAGE_KEYWORD_MIN_LEN: usize = 3;

/// Separators splitting a package name into keyword tokens.
const PACKAGE_KEYWORD_SEPARATORS: [char; 2] = ['-', '_'];

/// Ordered disambiguation chain, evaluated until one tier chooses.
/// The final tier always chooses, so ambiguity never surfaces to callers.
const STRATEGIES: [Strategy; 3] = [
    choose_by_package_name,
    choose_by_package_keyword,
    choose_first_in_catalog_order,
];

/// Matches a leading type identifier: uppercase head, alphanumeric tail.
/// Pulls `Foo` out of `Foo.bar()` and `Foo<T>`; lowercase-led text is
/// taken to be a variable or member mention, never a symbol.
static TYPE_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"^[A-Z][A-Za-z0-9]*").expect("valid regex"));

/// Ambient data available while resolving one page's occurrences.
pub struct RenderContext {
    /// The current page's site-root-relative source path.
    pub page_path: String,
}

/// Outcome of resolving one inline-code occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Wrap the occurrence in a link to a reference page.
    Link {
        /// The trimmed occurrence text, generics and member calls kept.
        display_text: String,
        /// Relative URL from the current page to the reference page.
        href: String,
    },
    /// Leave the occurrence to the default renderer.
    Passthrough,
}

/// One disambiguation tier: picks a candidate index for the current
/// page, or abstains so the next tier runs.
type Strategy = fn(&[SymbolEntry], &str) -> Option<usize>;

/// Tier 2: first candidate whose package name yields a keyword found in
/// the page path. Keywords come from splitting the package name on
/// separator characters; short tokens are too ambiguous to count.
fn choose_by_package_keyword(entries: &[SymbolEntry], page_path: &str) -> Option<usize> {
    for (idx, entry) in entries.iter().enumerate() {
        let matched = entry.package.split(PACKAGE_KEYWORD_SEPARATORS).any(|keyword| {
            return keyword.len() > PACKAGE_KEYWORD_MIN_LEN && page_path.contains(keyword);
        });
        if matched {
            return Some(idx);
        }
    }
    return None;
}

/// Tier 1: the candidate whose package name appears in the page path.
/// Abstains unless exactly one candidate matches; several matches mean
/// the path is no evidence either way.
fn choose_by_package_name(entries: &[SymbolEntry], page_path: &str) -> Option<usize> {
    let mut choice = None;
    for (idx, entry) in entries.iter().enumerate() {
        if !page_path.contains(entry.package.as_str()) {
            continue;
        }
        if choice.is_some() {
            return None;
        }
        choice = Some(idx);
    }
    return choice;
}

/// Tier 3: catalog order, which is alphabetical by package.
/// Context-blind but deterministic.
fn choose_first_in_catalog_order(entries: &[SymbolEntry], _page_path: &str) -> Option<usize> {
    return (!entries.is_empty()).then_some(0);
}

/// Whether `page_path` is the chosen entry's own reference page.
/// Compared against the target path with its extension dropped, so the
/// source page matches its published counterpart.
fn is_own_reference_page(page_path: &str, entry: &SymbolEntry) -> bool {
    let own_prefix = entry
        .target_path
        .rsplit_once('.')
        .map_or(entry.target_path.as_str(), |(stem, _ext)| return stem);
    return page_path.starts_with(own_prefix);
}

/// Extract the leading type identifier from trimmed occurrence text.
fn leading_type_identifier(content: &str) -> Option<&str> {
    return TYPE_IDENTIFIER.find(content).map(|found| return found.as_str());
}

/// Scan backward from `idx` for an unclosed link opening.
///
/// Whitespace-only text events are skipped; the first closing event,
/// any other non-whitespace event, or the stream start ends the scan.
fn nested_inside_link(events: &[Event<'_>], idx: usize) -> bool {
    for event in events.get(..idx).unwrap_or_default().iter().rev() {
        match event {
            Event::Start(Tag::Link { .. }) => return true,
            Event::End(_) => return false,
            Event::Text(text) if text.trim().is_empty() => {},
            _ => return false,
        }
    }
    return false;
}

/// Choose one entry among candidates sharing a symbol name.
/// A single candidate skips the strategy chain entirely.
fn pick_entry<'a>(entries: &'a [SymbolEntry], page_path: &str) -> Option<&'a SymbolEntry> {
    if entries.len() == 1 {
        return entries.first();
    }
    for strategy in STRATEGIES {
        if let Some(choice) = strategy(entries, page_path) {
            return entries.get(choice);
        }
    }
    return None;
}

/// Decide whether the inline-code occurrence at `idx` links to a
/// reference page.
///
/// Resolution is pure: identical inputs always yield the identical
/// outcome, so re-rendering a page can never change its links. The
/// occurrence is left alone when it opens an enclosing link, when its
/// text does not lead with a type identifier, when the identifier is a
/// built-in name or unknown to the catalog, and when it names the
/// page's own symbol.
///
/// # Panics
///
/// Panics if the hardcoded identifier regex is invalid (compile-time
/// invariant).
pub fn resolve(
    events: &[Event<'_>],
    idx: usize,
    ctx: &RenderContext,
    catalog: &SymbolCatalog,
) -> Resolution {
    let Some(Event::Code(text)) = events.get(idx) else {
        return Resolution::Passthrough;
    };
    if nested_inside_link(events, idx) {
        return Resolution::Passthrough;
    }

    let content = text.trim();
    let Some(name) = leading_type_identifier(content) else {
        return Resolution::Passthrough;
    };
    if IGNORED_TYPE_NAMES.contains(&name) {
        return Resolution::Passthrough;
    }

    let Some(entries) = catalog.lookup(name) else {
        return Resolution::Passthrough;
    };
    let Some(entry) = pick_entry(entries, &ctx.page_path) else {
        return Resolution::Passthrough;
    };
    if is_own_reference_page(&ctx.page_path, entry) {
        return Resolution::Passthrough;
    }

    let href = sitepath::relative_url(&ctx.page_path, &entry.target_path);
    return Resolution::Link {
        display_text: content.to_string(),
        href,
    };
}
