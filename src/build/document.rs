use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use super::paths::{permalink_to_url, source_path_to_url};

// =============================================================================
// Documents
// =============================================================================

/// A markdown document discovered under the input directory.
///
/// Documents are read-only once loaded: the pipeline works on its own copy
/// of the content (see `ProcessingDocument`), and collections only ever see
/// `&[Document]`.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to the input directory (e.g., "posts/hello.md")
    pub source_path: PathBuf,
    /// The URL this document is served at (e.g., "/posts/hello/")
    pub url_path: String,
    /// Front matter metadata
    pub front_matter: FrontMatter,
    /// Markdown body without front matter; the excerpt separator is kept so
    /// it can be split off after templating
    pub raw_content: String,
    /// Markdown source before the excerpt separator, if the body has one
    pub excerpt: Option<String>,
}

impl Document {
    /// Build a document from raw file contents.
    pub fn from_source(source_path: PathBuf, raw: &str, excerpt_separator: &str) -> Self {
        let parsed = parse_front_matter(raw);
        let (excerpt, _) = split_excerpt(&parsed.content, excerpt_separator);

        let url_path = match &parsed.front_matter.permalink {
            Some(permalink) => permalink_to_url(permalink),
            None => source_path_to_url(&source_path),
        };

        Self {
            source_path,
            url_path,
            front_matter: parsed.front_matter,
            raw_content: parsed.content,
            excerpt,
        }
    }

    /// Read and parse a document from `input_dir/source_path`.
    pub fn load(
        input_dir: &Path,
        source_path: PathBuf,
        excerpt_separator: &str,
    ) -> std::io::Result<Self> {
        let raw = std::fs::read_to_string(input_dir.join(&source_path))?;
        Ok(Self::from_source(source_path, &raw, excerpt_separator))
    }

    /// Get the document title, falling back to filename if not in front matter.
    pub fn title(&self) -> String {
        self.front_matter.title.clone().unwrap_or_else(|| {
            self.source_path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(title_case)
                .unwrap_or_else(|| "Untitled".to_string())
        })
    }

    /// The document's tags, or `None` when front matter has no `tags` key.
    pub fn tags(&self) -> Option<&[String]> {
        self.front_matter.tags.as_deref()
    }

    pub fn is_draft(&self) -> bool {
        self.front_matter.draft
    }
}

// =============================================================================
// Front matter
// =============================================================================

/// Front matter metadata parsed from the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Page title (can override filename-derived title)
    pub title: Option<String>,
    /// Page description for SEO/previews
    pub description: Option<String>,
    /// Publication date, kept as written (ISO dates sort correctly as strings)
    #[serde(default, deserialize_with = "deserialize_date")]
    pub date: Option<String>,
    /// Tags, written either as a single string or a list
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Option<Vec<String>>,
    /// Layout template under the includes directory (e.g., "post.html")
    pub layout: Option<String>,
    /// Output location override (e.g., "404.html" or "/about/")
    pub permalink: Option<String>,
    /// Drafts are skipped during the build
    #[serde(default)]
    pub draft: bool,
    /// Additional arbitrary metadata (available in templates as `page.<key>`)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsValue {
    One(String),
    Many(Vec<String>),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<TagsValue>::deserialize(deserializer)?.map(|value| match value {
            TagsValue::One(tag) => vec![tag],
            TagsValue::Many(tags) => tags,
        }),
    )
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "date must be a string, got {other:?}"
        ))),
    }
}

/// Result of parsing front matter from markdown content.
#[derive(Debug)]
pub struct ParsedContent {
    /// The parsed front matter (empty if none found)
    pub front_matter: FrontMatter,
    /// The markdown content without the front matter block
    pub content: String,
}

/// Parse front matter from markdown content.
///
/// Front matter is a YAML block delimited by `---` at the start of the file:
///
/// ```markdown
/// ---
/// title: My Post
/// tags: [posts, rust]
/// ---
///
/// # Content starts here
/// ```
pub fn parse_front_matter(content: &str) -> ParsedContent {
    let content = content.trim_start();

    if !content.starts_with("---") {
        return ParsedContent {
            front_matter: FrontMatter::default(),
            content: content.to_string(),
        };
    }

    let after_opening = &content[3..];
    let Some(closing_pos) = after_opening.find("\n---") else {
        // No closing delimiter, treat entire content as markdown
        return ParsedContent {
            front_matter: FrontMatter::default(),
            content: content.to_string(),
        };
    };

    let yaml_content = after_opening[..closing_pos].trim_start_matches('\n');

    // "---" + yaml + "\n---"
    let markdown_start = 3 + closing_pos + 4;
    let markdown_content = if markdown_start < content.len() {
        content[markdown_start..].trim_start_matches('\n').to_string()
    } else {
        String::new()
    };

    let front_matter = if yaml_content.trim().is_empty() {
        FrontMatter::default()
    } else {
        match serde_yaml::from_str(yaml_content) {
            Ok(fm) => fm,
            Err(e) => {
                tracing::warn!("failed to parse front matter: {}", e);
                FrontMatter::default()
            }
        }
    };

    ParsedContent {
        front_matter,
        content: markdown_content,
    }
}

/// Split a body at the excerpt separator.
///
/// Returns the excerpt (if any) and the body with the separator removed.
pub fn split_excerpt(content: &str, separator: &str) -> (Option<String>, String) {
    if separator.is_empty() {
        return (None, content.to_string());
    }
    match content.split_once(separator) {
        Some((before, after)) => (
            Some(before.trim().to_string()),
            format!("{}{}", before, after),
        ),
        None => (None, content.to_string()),
    }
}

/// Turn a file stem into a display title: "getting-started" -> "Getting Started".
fn title_case(stem: &str) -> String {
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEP: &str = "<!-- excerpt -->";

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("getting-started"), "Getting Started");
        assert_eq!(title_case("about"), "About");
        assert_eq!(title_case("release_notes"), "Release Notes");
        assert_eq!(title_case("README"), "README");
    }

    #[test]
    fn test_document_title_fallback() {
        let doc = Document::from_source(PathBuf::from("posts/getting-started.md"), "Body", SEP);
        assert_eq!(doc.title(), "Getting Started");
    }

    #[test]
    fn test_document_title_from_front_matter() {
        let doc = Document::from_source(
            PathBuf::from("intro.md"),
            "---\ntitle: Welcome\n---\nBody",
            SEP,
        );
        assert_eq!(doc.title(), "Welcome");
    }

    #[test]
    fn test_parse_front_matter_basic() {
        let content = r#"---
title: My Page
description: A test page
---

# Hello World
"#;
        let parsed = parse_front_matter(content);
        assert_eq!(parsed.front_matter.title, Some("My Page".to_string()));
        assert_eq!(parsed.front_matter.description, Some("A test page".to_string()));
        assert_eq!(parsed.content.trim(), "# Hello World");
    }

    #[test]
    fn test_tags_as_list_and_as_string() {
        let list = parse_front_matter("---\ntags:\n  - posts\n  - rust\n---\nx");
        assert_eq!(
            list.front_matter.tags,
            Some(vec!["posts".to_string(), "rust".to_string()])
        );

        let single = parse_front_matter("---\ntags: posts\n---\nx");
        assert_eq!(single.front_matter.tags, Some(vec!["posts".to_string()]));

        let none = parse_front_matter("---\ntitle: No tags\n---\nx");
        assert_eq!(none.front_matter.tags, None);
    }

    #[test]
    fn test_date_and_custom_fields() {
        let parsed = parse_front_matter("---\ndate: 2024-03-01\nauthor: Sam\n---\nx");
        assert_eq!(parsed.front_matter.date, Some("2024-03-01".to_string()));
        assert!(parsed.front_matter.extra.contains_key("author"));
    }

    #[test]
    fn test_parse_front_matter_no_front_matter() {
        let parsed = parse_front_matter("# Just Markdown\n\nNo front matter here.");
        assert_eq!(parsed.front_matter.title, None);
        assert!(parsed.content.starts_with("# Just Markdown"));
    }

    #[test]
    fn test_parse_front_matter_empty_front_matter() {
        let parsed = parse_front_matter("---\n---\n\n# Content");
        assert_eq!(parsed.front_matter.title, None);
        assert!(parsed.content.starts_with("# Content"));
    }

    #[test]
    fn test_invalid_front_matter_falls_back_to_default() {
        let parsed = parse_front_matter("---\ntitle: [unclosed\n---\nBody");
        assert_eq!(parsed.front_matter.title, None);
        assert_eq!(parsed.content, "Body");
    }

    #[test]
    fn test_excerpt_is_split_and_separator_removed() {
        let doc = Document::from_source(
            PathBuf::from("posts/a.md"),
            "Intro paragraph.\n\n<!-- excerpt -->\n\nRest of post.",
            SEP,
        );
        assert_eq!(doc.excerpt.as_deref(), Some("Intro paragraph."));
        assert!(doc.raw_content.contains(SEP));

        let (excerpt, body) = split_excerpt(&doc.raw_content, SEP);
        assert_eq!(excerpt.as_deref(), Some("Intro paragraph."));
        assert!(!body.contains(SEP));
        assert!(body.contains("Intro paragraph."));
        assert!(body.contains("Rest of post."));
    }

    #[test]
    fn test_no_excerpt_without_separator() {
        let doc = Document::from_source(PathBuf::from("a.md"), "Just text", SEP);
        assert!(doc.excerpt.is_none());
        assert_eq!(doc.raw_content, "Just text");
    }

    #[test]
    fn test_permalink_overrides_url() {
        let doc = Document::from_source(
            PathBuf::from("404.md"),
            "---\npermalink: 404.html\n---\nNot found",
            SEP,
        );
        assert_eq!(doc.url_path, "/404.html");

        let doc = Document::from_source(PathBuf::from("posts/hello.md"), "Hi", SEP);
        assert_eq!(doc.url_path, "/posts/hello/");
    }
}
