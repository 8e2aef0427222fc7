//! Markdown rendering with heading permalinks, autolinking and syntax highlighting.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::LazyLock;

use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd,
    TextMergeStream, html,
};
use regex::Regex;
use serde::Serialize;

use super::highlight::{SyntaxHighlighter, html_escape};
use crate::config::{AnchorConfig, MarkdownConfig};

#[derive(thiserror::Error, Debug)]
pub enum MarkdownError {
    #[error("invalid markdown extension: {0}")]
    InvalidExtension(String),
}

/// Bare URLs that get turned into links when `linkify` is on. A URL must
/// start the text or follow a non-word character; group 1 is the URL.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[^\w.])((?:https?://|www\.)[^\s<>"'`]+)"#)
        .expect("URL pattern is valid")
});

/// Result of rendering markdown, containing both HTML and table of contents.
#[derive(Debug)]
pub struct MarkdownOutput {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// A heading that received a permalink anchor.
#[derive(Debug, Clone, Serialize)]
pub struct TocEntry {
    pub text: String,
    pub id: String,
    pub level: u8,
}

/// The site's markdown engine.
///
/// Raw HTML passes through unless `html` is off, bare URLs become links when
/// `linkify` is on, and headings at the configured levels get an id plus a
/// permalink anchor wrapping their content.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
    html: bool,
    linkify: bool,
    anchor: AnchorConfig,
    highlighter: SyntaxHighlighter,
}

struct HeadingState<'a> {
    level: HeadingLevel,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
    text: String,
    inner: Vec<Event<'a>>,
}

impl MarkdownRenderer {
    pub fn new(
        config: &MarkdownConfig,
        highlighter: SyntaxHighlighter,
    ) -> Result<Self, MarkdownError> {
        let mut options = Options::empty();
        for extension in &config.extensions {
            match extension.as_str() {
                "definition_lists" => options.insert(Options::ENABLE_DEFINITION_LIST),
                "footnotes" => options.insert(Options::ENABLE_FOOTNOTES),
                "gfm" => options.insert(Options::ENABLE_GFM),
                "heading_attributes" => options.insert(Options::ENABLE_HEADING_ATTRIBUTES),
                "strikethrough" => options.insert(Options::ENABLE_STRIKETHROUGH),
                "tables" => options.insert(Options::ENABLE_TABLES),
                "tasklists" => options.insert(Options::ENABLE_TASKLISTS),
                other => return Err(MarkdownError::InvalidExtension(other.to_string())),
            }
        }

        Ok(Self {
            options,
            html: config.html,
            linkify: config.linkify,
            anchor: config.anchor.clone(),
            highlighter,
        })
    }

    pub fn highlighter(&self) -> &SyntaxHighlighter {
        &self.highlighter
    }

    /// Render markdown to HTML.
    pub fn render(&self, markdown: &str) -> MarkdownOutput {
        let mut events: Vec<Event> = TextMergeStream::new(Parser::new_ext(markdown, self.options))
            .map(|event| match event {
                Event::Html(raw) | Event::InlineHtml(raw) if !self.html => Event::Text(raw),
                other => other,
            })
            .collect();

        if self.linkify {
            events = linkify(events);
        }

        let mut output: Vec<Event> = Vec::with_capacity(events.len());
        let mut used_ids: HashSet<String> = HashSet::new();
        let mut toc: Vec<TocEntry> = Vec::new();

        let mut heading: Option<HeadingState> = None;
        let mut code_block: Option<(String, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) if self.anchors(level) => {
                    heading = Some(HeadingState {
                        level,
                        id: id.map(|id| id.to_string()),
                        classes: classes.iter().map(|c| c.to_string()).collect(),
                        attrs: attrs
                            .iter()
                            .map(|(k, v)| (k.to_string(), v.as_ref().map(|v| v.to_string())))
                            .collect(),
                        text: String::new(),
                        inner: Vec::new(),
                    });
                }
                Event::End(TagEnd::Heading(_)) if heading.is_some() => {
                    if let Some(state) = heading.take() {
                        let id = match &state.id {
                            Some(explicit) => explicit.clone(),
                            None => unique_id(&slugify(&state.text), &used_ids),
                        };
                        used_ids.insert(id.clone());
                        toc.push(TocEntry {
                            text: state.text.clone(),
                            id: id.clone(),
                            level: state.level as u8,
                        });
                        output.push(Event::Html(self.heading_html(&state, &id).into()));
                    }
                }
                Event::Start(Tag::Heading { id: Some(ref id), .. }) => {
                    used_ids.insert(id.to_string());
                    output.push(event);
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(lang) => lang.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    code_block = Some((language, String::new()));
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, code)) = code_block.take() {
                        let highlighted = self.highlighter.highlight(&code, &language);
                        output.push(Event::Html(highlighted.into()));
                    }
                }
                other => match heading.as_mut() {
                    Some(state) => {
                        if let Event::Text(text) | Event::Code(text) = &other {
                            state.text.push_str(text);
                        }
                        state.inner.push(other);
                    }
                    None => output.push(other),
                },
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, output.into_iter());

        MarkdownOutput {
            html: html_output,
            toc,
        }
    }

    fn anchors(&self, level: HeadingLevel) -> bool {
        self.anchor.levels.contains(&(level as u8))
    }

    /// Emit a heading whose content is wrapped in a permalink to itself.
    fn heading_html(&self, state: &HeadingState, id: &str) -> String {
        let mut inner = String::new();
        html::push_html(&mut inner, state.inner.iter().cloned());

        let level = state.level as u8;
        let mut out = format!("<h{} id=\"{}\" tabindex=\"-1\"", level, html_escape(id));
        if !state.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", html_escape(&state.classes.join(" ")));
        }
        for (key, value) in &state.attrs {
            match value {
                Some(value) => {
                    let _ = write!(out, " {}=\"{}\"", key, html_escape(value));
                }
                None => {
                    let _ = write!(out, " {}", key);
                }
            }
        }

        let body = if self.anchor.safari_reader_fix {
            format!("<span>{}</span>", inner)
        } else {
            inner
        };
        let _ = write!(
            out,
            "><a class=\"{}\" href=\"#{}\">{}</a></h{}>\n",
            html_escape(&self.anchor.class),
            html_escape(id),
            body,
            level
        );
        out
    }
}

/// Split text events around bare URLs, wrapping each URL in a link.
///
/// Text already inside a link (markdown or raw `<a>`) or a code block is
/// left alone.
fn linkify(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut link_depth = 0usize;
    let mut in_code_block = false;

    for event in events {
        match event {
            Event::Start(Tag::Link { .. }) => {
                link_depth += 1;
                out.push(event);
            }
            Event::End(TagEnd::Link) => {
                link_depth = link_depth.saturating_sub(1);
                out.push(event);
            }
            Event::InlineHtml(ref raw) if is_anchor_open(raw) => {
                link_depth += 1;
                out.push(event);
            }
            Event::InlineHtml(ref raw) if is_anchor_close(raw) => {
                link_depth = link_depth.saturating_sub(1);
                out.push(event);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                out.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                out.push(event);
            }
            Event::Text(text) if link_depth == 0 && !in_code_block => {
                push_linkified(&text, &mut out);
            }
            other => out.push(other),
        }
    }
    out
}

fn push_linkified(text: &str, out: &mut Vec<Event<'_>>) {
    let mut last = 0;
    for captures in URL_PATTERN.captures_iter(text) {
        let Some(found) = captures.get(1) else {
            continue;
        };
        // Trailing punctuation belongs to the sentence, not the URL
        let url = found
            .as_str()
            .trim_end_matches(['.', ',', ';', ':', '!', '?', ')', ']']);
        if url.ends_with("://") || url == "www." {
            continue;
        }
        let start = found.start();
        let end = start + url.len();

        if start > last {
            out.push(Event::Text(CowStr::from(text[last..start].to_string())));
        }
        let href = if url.starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Inline,
            dest_url: CowStr::from(href),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        out.push(Event::Text(CowStr::from(url.to_string())));
        out.push(Event::End(TagEnd::Link));
        last = end;
    }
    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

fn is_anchor_open(raw: &str) -> bool {
    let lower = raw.trim_start().to_ascii_lowercase();
    lower.strip_prefix("<a").is_some_and(|rest| {
        rest.starts_with(|c: char| c.is_whitespace() || c == '>')
    })
}

fn is_anchor_close(raw: &str) -> bool {
    raw.trim_start().to_ascii_lowercase().starts_with("</a>")
}

/// Convert heading text to an id: trimmed, lower-cased, whitespace runs
/// collapsed to `-`, then percent-encoded the way `encodeURIComponent` does.
pub fn slugify(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let dashed = lowered.split_whitespace().collect::<Vec<_>>().join("-");

    let mut encoded = String::with_capacity(dashed.len());
    for byte in dashed.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            other => {
                let _ = write!(encoded, "%{:02X}", other);
            }
        }
    }
    encoded
}

fn unique_id(base: &str, used: &HashSet<String>) -> String {
    if !used.contains(base) {
        return base.to_string();
    }
    let mut suffix = 1;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !used.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
