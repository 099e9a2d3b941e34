//! Markdown rendering with allow-list HTML sanitization.
//!
//! Post bodies are stored as raw Markdown and rendered to HTML at write
//! time. The pipeline is:
//!
//! 1. Parse Markdown with pulldown-cmark (tables, footnotes, strikethrough,
//!    task lists).
//! 2. Auto-link bare `http(s)` URLs found in plain text. Working on the
//!    event stream keeps this exact: text inside code spans, code blocks,
//!    or existing links is never touched.
//! 3. Sanitize the generated HTML against an explicit allow-list of tags,
//!    attributes, and URL schemes. Anything script-capable (`<script>`,
//!    inline event handlers, `javascript:` URLs) cannot survive this pass.
//!
//! The returned string is safe to embed in a page unescaped.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, html};
use regex::Regex;

/// Tags allowed through sanitization. Disallowed tags are stripped but
/// their text content is kept.
const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "b", "blockquote", "code", "em", "i", "li", "ol", "strong", "ul", "p",
    "pre", "br", "hr", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Attributes allowed on `<a>`. `rel` is injected by the sanitizer itself.
const ALLOWED_LINK_ATTRS: &[&str] = &["href", "title", "target"];

/// URL schemes allowed in `href`.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// `rel` value forced onto every surviving link.
const LINK_REL: &str = "nofollow noopener";

/// Regex for matching bare URLs in text content.
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s<>\)\]]+").expect("URL regex should compile"));

/// Punctuation commonly trailing a URL at the end of a sentence.
const TRAILING_PUNCT: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Render Markdown text to sanitized HTML.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let events = autolink_events(parser);

    let mut raw_html = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut raw_html, events.into_iter());

    sanitize(&raw_html)
}

/// Rewrite the event stream so bare URLs in plain text become links.
///
/// Tracks code-block and link nesting; text inside either is passed
/// through untouched.
fn autolink_events<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut code_depth = 0usize;
    let mut link_depth = 0usize;

    for event in parser {
        match &event {
            Event::Start(Tag::CodeBlock(_)) => code_depth += 1,
            Event::End(TagEnd::CodeBlock) => code_depth = code_depth.saturating_sub(1),
            Event::Start(Tag::Link { .. }) => link_depth += 1,
            Event::End(TagEnd::Link) => link_depth = link_depth.saturating_sub(1),
            Event::Text(text) if code_depth == 0 && link_depth == 0 => {
                linkify_text(text, &mut events);
                continue;
            }
            _ => {}
        }
        events.push(event);
    }

    events
}

/// Split a text run on bare URLs, emitting link events for each match.
fn linkify_text<'a>(text: &CowStr<'a>, events: &mut Vec<Event<'a>>) {
    let mut last = 0usize;

    for found in URL_REGEX.find_iter(text) {
        let url = found.as_str().trim_end_matches(TRAILING_PUNCT);
        let end = found.start() + url.len();

        if found.start() > last {
            events.push(Event::Text(CowStr::from(
                text[last..found.start()].to_string(),
            )));
        }

        let dest = CowStr::from(url.to_string());
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: dest.clone(),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        events.push(Event::Text(dest));
        events.push(Event::End(TagEnd::Link));

        last = end;
    }

    if last == 0 {
        // No URLs; keep the original borrowed text.
        events.push(Event::Text(text.clone()));
    } else if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Apply the allow-list to generated HTML.
fn sanitize(raw: &str) -> String {
    let mut link_attrs: HashMap<&str, HashSet<&str>> = HashMap::new();
    link_attrs.insert("a", ALLOWED_LINK_ATTRS.iter().copied().collect());

    let mut builder = ammonia::Builder::default();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .generic_attributes(HashSet::new())
        .tag_attributes(link_attrs)
        .url_schemes(ALLOWED_SCHEMES.iter().copied().collect())
        .link_rel(Some(LINK_REL));

    builder.clean(raw).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_markdown_empty() {
        assert!(render_markdown("").is_empty());
    }

    #[test]
    fn render_markdown_plain_text() {
        let out = render_markdown("Hello, world!");
        assert!(out.contains("<p>Hello, world!</p>"));
    }

    #[test]
    fn render_markdown_headers() {
        let out = render_markdown("# H1\n## H2\n### H3");
        assert!(out.contains("<h1>H1</h1>"));
        assert!(out.contains("<h2>H2</h2>"));
        assert!(out.contains("<h3>H3</h3>"));
    }

    #[test]
    fn render_markdown_bold_and_italic() {
        let out = render_markdown("**bold** and *italic*");
        assert!(out.contains("<strong>bold</strong>"));
        assert!(out.contains("<em>italic</em>"));
    }

    #[test]
    fn render_markdown_lists_and_quotes() {
        let out = render_markdown("- one\n- two\n\n> wise words");
        assert!(out.contains("<ul>"));
        assert!(out.contains("<li>one</li>"));
        assert!(out.contains("<blockquote>"));
    }

    #[test]
    fn render_markdown_code_block_survives() {
        let out = render_markdown("```\nfn main() {}\n```");
        assert!(out.contains("<pre>"));
        assert!(out.contains("<code>"));
        assert!(out.contains("fn main() {}"));
    }

    #[test]
    fn render_markdown_explicit_link_gets_rel() {
        let out = render_markdown("[click](https://example.com)");
        assert!(out.contains("href=\"https://example.com\""));
        assert!(out.contains("rel=\"nofollow noopener\""));
    }

    #[test]
    fn render_markdown_autolinks_bare_url() {
        let out = render_markdown("Check https://example.com for details");
        assert!(
            out.contains("<a href=\"https://example.com\" rel=\"nofollow noopener\">"),
            "got: {out}"
        );
        assert!(out.contains(">https://example.com</a>"));
    }

    #[test]
    fn render_markdown_autolink_trims_trailing_punctuation() {
        let out = render_markdown("See https://example.com/page.");
        assert!(out.contains("href=\"https://example.com/page\""));
        assert!(!out.contains("page.\""));
    }

    #[test]
    fn render_markdown_no_autolink_inside_code() {
        let out = render_markdown("`https://example.com` and\n```\nhttps://example.com\n```");
        assert!(!out.contains("<a "), "got: {out}");
    }

    #[test]
    fn render_markdown_no_nested_link_from_autolink() {
        let out = render_markdown("[https://example.com](https://example.com)");
        // Exactly one anchor: the explicit one.
        assert_eq!(out.matches("<a ").count(), 1, "got: {out}");
    }

    #[test]
    fn render_markdown_strips_script_tag() {
        let out = render_markdown("<script>alert(1)</script>");
        assert!(!out.contains("<script"), "got: {out}");
        assert!(!out.contains("alert(1)"), "got: {out}");
    }

    #[test]
    fn render_markdown_strips_inline_event_handlers() {
        let out = render_markdown("<p onclick=\"alert(1)\">hi</p>");
        assert!(!out.contains("onclick"), "got: {out}");
        assert!(out.contains("hi"));
    }

    #[test]
    fn render_markdown_strips_javascript_url() {
        let out = render_markdown("[x](javascript:alert(1))");
        assert!(!out.contains("javascript:"), "got: {out}");
    }

    #[test]
    fn render_markdown_mailto_allowed() {
        let out = render_markdown("[mail me](mailto:alice@example.com)");
        assert!(out.contains("href=\"mailto:alice@example.com\""));
    }

    #[test]
    fn render_markdown_disallowed_tag_keeps_text() {
        // <span> is not on the allow-list; its content must survive.
        let out = render_markdown("before <span class=\"x\">inside</span> after");
        assert!(!out.contains("<span"));
        assert!(out.contains("inside"));
    }

    #[test]
    fn render_markdown_images_stripped() {
        let out = render_markdown("![alt](https://example.com/a.png)");
        assert!(!out.contains("<img"), "got: {out}");
    }

    #[test]
    fn render_markdown_table_tags_stripped_text_kept() {
        let out = render_markdown("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(!out.contains("<table>"));
        assert!(out.contains('A'));
        assert!(out.contains('1'));
    }

    #[test]
    fn render_markdown_unicode() {
        let out = render_markdown("# Заголовок\n\nCafé ☕");
        assert!(out.contains("Заголовок"));
        assert!(out.contains("Café ☕"));
    }

    #[test]
    fn render_markdown_multiple_bare_urls() {
        let out = render_markdown("a https://one.example b https://two.example c");
        assert!(out.contains("href=\"https://one.example\""));
        assert!(out.contains("href=\"https://two.example\""));
        assert_eq!(out.matches("<a ").count(), 2);
    }
}
