//! Markdown-to-HTML rendering with reference resolution spliced in.
//!
//! Pages are parsed into a full event array first, because resolution
//! needs lookback: whether an inline-code occurrence may link depends on
//! the events before it. The transformed array then renders through the
//! default HTML writer, with resolved links and playground embeds
//! spliced in as raw markup.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

use crate::catalog::SymbolCatalog;
use crate::dartpad;
use crate::resolver::{self, RenderContext, Resolution};

/// Title used when a page has no leading heading.
const DEFAULT_TITLE: &str = "Documentation";

/// A fully rendered page body plus extracted metadata.
pub struct RenderedPage {
    /// Rendered HTML body.
    pub html: String,
    /// Text of the first level-one heading, if any.
    pub title: Option<String>,
}

/// Minimal HTML escaping for text spliced into raw markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    return escaped;
}

/// Text of the first level-one heading, inline code included.
fn extract_title(events: &[Event<'_>]) -> Option<String> {
    let mut in_heading = false;
    let mut title = String::new();
    for event in events {
        match event {
            Event::Start(Tag::Heading { level: HeadingLevel::H1, .. }) => in_heading = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if in_heading => {
                let trimmed = title.trim();
                return (!trimmed.is_empty()).then(|| return trimmed.to_string());
            },
            Event::Text(text) | Event::Code(text) if in_heading => title.push_str(text),
            _ => {},
        }
    }
    return None;
}

/// Markup for one resolved reference link.
fn link_markup(display_text: &str, href: &str) -> String {
    let escaped = escape_html(display_text);
    return format!("<a href=\"{href}\" class=\"api-link\"><code>{escaped}</code></a>");
}

/// Wrap a rendered body in the published page skeleton.
pub fn page_shell(page: &RenderedPage) -> String {
    let title = escape_html(page.title.as_deref().unwrap_or(DEFAULT_TITLE));
    return format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        page.html,
    );
}

/// Extensions enabled for every page.
fn parser_options() -> Options {
    return Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS;
}

/// Render one markdown page against the symbol catalog.
pub fn render_page(markdown: &str, ctx: &RenderContext, catalog: &SymbolCatalog) -> RenderedPage {
    let raw_events: Vec<Event<'_>> = Parser::new_ext(markdown, parser_options()).collect();
    let events = strip_metadata_events(raw_events);
    let title = extract_title(&events);

    let transformed = transform_events(&events, ctx, catalog);
    let mut body = String::new();
    html::push_html(&mut body, transformed.into_iter());

    return RenderedPage { html: body, title };
}

/// Drop frontmatter metadata events, inner text included.
fn strip_metadata_events(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut stripped = Vec::with_capacity(events.len());
    let mut in_metadata = false;
    for event in events {
        match event {
            Event::Start(Tag::MetadataBlock(_)) => in_metadata = true,
            Event::End(TagEnd::MetadataBlock(_)) => in_metadata = false,
            _ if in_metadata => {},
            other => stripped.push(other),
        }
    }
    return stripped;
}

/// Walk the event array, splicing in resolved links and rewritten
/// playground fences; everything else passes through untouched.
fn transform_events<'a>(
    events: &[Event<'a>],
    ctx: &RenderContext,
    catalog: &SymbolCatalog,
) -> Vec<Event<'a>> {
    let mut transformed = Vec::with_capacity(events.len());
    let mut idx = 0_usize;

    while let Some(event) = events.get(idx) {
        if let Some(rewritten) = dartpad::rewrite(events, idx) {
            transformed.push(Event::Html(rewritten.markup.into()));
            idx = rewritten.resume_index;
            continue;
        }

        if matches!(event, Event::Code(_))
            && let Resolution::Link { display_text, href } =
                resolver::resolve(events, idx, ctx, catalog)
        {
            transformed.push(Event::InlineHtml(link_markup(&display_text, &href).into()));
            idx = idx.saturating_add(1);
            continue;
        }

        transformed.push(event.clone());
        idx = idx.saturating_add(1);
    }

    return transformed;
}
