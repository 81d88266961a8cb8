//! Playground fence transform: rewrites `dartpad`-tagged code fences
//! into interactive embed markup, with the snippet carried as base64.

use base64::Engine as _;
use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Tag, TagEnd, html};
use regex::Regex;

/// Info-string tag marking a fence as a playground embed.
const FENCE_TAG: &str = "dartpad";

/// Matches the optional `height=<pixels>` fence attribute.
static HEIGHT_ATTR: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"\bheight=(\d+)").expect("valid regex"));

/// Language the snippet is re-rendered as for syntax highlighting.
const HIGHLIGHT_LANG: &str = "dart";

/// Matches the optional `mode=<dart|flutter>` fence attribute.
static MODE_ATTR: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"\bmode=(dart|flutter)").expect("valid regex"));

/// Matches the optional `run=<true|false>` fence attribute.
static RUN_ATTR: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"\brun=(true|false)").expect("valid regex"));

/// A completed fence rewrite.
pub struct FenceRewrite {
    /// Raw block markup replacing the entire fence span.
    pub markup: String,
    /// Index of the first event after the fence's closing event.
    pub resume_index: usize,
}

/// Build the embed's attribute list: the encoded payload first, then any
/// recognized options lifted from the fence meta string.
fn embed_attributes(meta: &str, encoded: &str) -> Vec<String> {
    let mut attributes = vec![format!("code=\"{encoded}\"")];

    if let Some(height) = HEIGHT_ATTR.captures(meta).and_then(|caps| return caps.get(1)) {
        attributes.push(format!(":height=\"{}\"", height.as_str()));
    }
    if let Some(run) = RUN_ATTR.captures(meta).and_then(|caps| return caps.get(1)) {
        attributes.push(format!(":run=\"{}\"", run.as_str()));
    }
    if let Some(mode) = MODE_ATTR.captures(meta).and_then(|caps| return caps.get(1)) {
        attributes.push(format!("mode=\"{}\"", mode.as_str()));
    }

    return attributes;
}

/// Delegate syntax highlighting to the default fence renderer by
/// re-rendering the snippet under the highlight language.
fn highlight_snippet(content: &str) -> String {
    let fence = [
        Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(HIGHLIGHT_LANG.into()))),
        Event::Text(content.into()),
        Event::End(TagEnd::CodeBlock),
    ];
    let mut highlighted = String::new();
    html::push_html(&mut highlighted, fence.into_iter());
    return highlighted;
}

/// Rewrite the playground fence opening at `idx` into embed markup.
///
/// Returns `None` when the event at `idx` is not a fence opening tagged
/// with the playground marker, leaving the fence to the default
/// renderer. The embed keeps a highlighted copy of the snippet as its
/// children so the page degrades readably without the embed script.
///
/// # Panics
///
/// Panics if a hardcoded attribute regex is invalid (compile-time
/// invariant).
pub fn rewrite(events: &[Event<'_>], idx: usize) -> Option<FenceRewrite> {
    let Some(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))) = events.get(idx) else {
        return None;
    };
    let info = info.trim();
    if !info.starts_with(FENCE_TAG) {
        return None;
    }

    let mut content = String::new();
    let mut cursor = idx.saturating_add(1);
    while let Some(event) = events.get(cursor) {
        match event {
            Event::End(TagEnd::CodeBlock) => break,
            Event::Text(text) => content.push_str(text),
            _ => {},
        }
        cursor = cursor.saturating_add(1);
    }

    let encoded = base64::engine::general_purpose::STANDARD.encode(content.as_bytes());
    let meta = info.strip_prefix(FENCE_TAG).unwrap_or("").trim();
    let attributes = embed_attributes(meta, &encoded);
    let highlighted = highlight_snippet(&content);
    let markup = format!("<DartPad {}>{highlighted}</DartPad>\n", attributes.join(" "));

    return Some(FenceRewrite {
        markup,
        resume_index: cursor.saturating_add(1),
    });
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use pulldown_cmark::Parser;

    use super::*;

    fn fence_events(markdown: &str) -> Vec<Event<'_>> {
        Parser::new(markdown).collect()
    }

    #[test]
    fn untagged_fence_is_left_alone() {
        let events = fence_events("```dart\nvoid main() {}\n```\n");

        assert!(rewrite(&events, 0).is_none());
    }

    #[test]
    fn payload_is_base64_of_fence_content() {
        let events = fence_events("```dartpad\nvoid main() {}\n```\n");

        let rewritten = rewrite(&events, 0).unwrap();

        let expected = base64::engine::general_purpose::STANDARD.encode("void main() {}\n");
        assert!(rewritten.markup.starts_with("<DartPad "));
        assert!(rewritten.markup.contains(&format!("code=\"{expected}\"")));
        assert!(rewritten.markup.ends_with("</DartPad>\n"));
    }

    #[test]
    fn optional_attributes_are_forwarded() {
        let events = fence_events("```dartpad height=500 run=false mode=flutter\nmain();\n```\n");

        let rewritten = rewrite(&events, 0).unwrap();

        assert!(rewritten.markup.contains(":height=\"500\""));
        assert!(rewritten.markup.contains(":run=\"false\""));
        assert!(rewritten.markup.contains("mode=\"flutter\""));
    }

    #[test]
    fn unrecognized_meta_is_dropped() {
        let events = fence_events("```dartpad theme=dark height=300\nmain();\n```\n");

        let rewritten = rewrite(&events, 0).unwrap();

        assert!(rewritten.markup.contains(":height=\"300\""));
        assert!(!rewritten.markup.contains("theme"));
    }

    #[test]
    fn highlighting_is_delegated_to_default_fence() {
        let events = fence_events("```dartpad\nvoid main() {}\n```\n");

        let rewritten = rewrite(&events, 0).unwrap();

        assert!(rewritten.markup.contains("language-dart"));
        assert!(rewritten.markup.contains("void main() {}"));
    }

    #[test]
    fn resume_index_skips_past_fence_close() {
        let events = fence_events("```dartpad\nmain();\n```\n\nafter\n");

        let rewritten = rewrite(&events, 0).unwrap();

        // The fence spans open, text, close; rendering resumes after it.
        assert_eq!(rewritten.resume_index, 3);
        assert!(matches!(events.get(rewritten.resume_index), Some(Event::Start(Tag::Paragraph))));
    }
}
