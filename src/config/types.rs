//! Configuration type definitions.
//!
//! This module contains all the data structures used in `folio.yaml`.
//! These types are pure data - no I/O or complex logic. Every field has a
//! default, so an empty (or missing) config file describes a working site.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Root config
// =============================================================================

/// Project configuration, loaded from `folio.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    /// Input-relative paths copied verbatim to the output directory
    #[serde(default = "default_passthrough")]
    pub passthrough: Vec<PathBuf>,
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub reading_time: ReadingTimeConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub tags: TagConfig,
    #[serde(default)]
    pub excerpt: ExcerptConfig,
    /// Development server settings
    #[serde(default)]
    pub dev: DevConfig,
}

fn default_passthrough() -> Vec<PathBuf> {
    vec![PathBuf::from("assets"), PathBuf::from("manifest.json")]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            passthrough: default_passthrough(),
            markdown: MarkdownConfig::default(),
            highlight: HighlightConfig::default(),
            reading_time: ReadingTimeConfig::default(),
            images: ImageConfig::default(),
            tags: TagConfig::default(),
            excerpt: ExcerptConfig::default(),
            dev: DevConfig::default(),
        }
    }
}

// =============================================================================
// Site configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub url: Option<String>,
    /// Directory holding the site's content
    #[serde(default = "default_input")]
    pub input: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Layout directory, relative to `input`
    #[serde(default = "default_includes")]
    pub includes: PathBuf,
}

fn default_name() -> String {
    "My Folio Site".to_string()
}

fn default_input() -> PathBuf {
    PathBuf::from("src")
}

fn default_output() -> PathBuf {
    PathBuf::from("_site")
}

fn default_includes() -> PathBuf {
    PathBuf::from("_includes")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            url: None,
            input: default_input(),
            output: default_output(),
            includes: default_includes(),
        }
    }
}

// =============================================================================
// Markdown configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Pass raw HTML in markdown through to the output
    #[serde(default = "default_true")]
    pub html: bool,
    /// Turn bare URLs in text into links
    #[serde(default = "default_true")]
    pub linkify: bool,
    /// Extensions to enable for markdown processing
    #[serde(default = "default_markdown_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub anchor: AnchorConfig,
}

fn default_true() -> bool {
    true
}

fn default_markdown_extensions() -> Vec<String> {
    vec![
        "footnotes".to_string(),
        "heading_attributes".to_string(),
        "strikethrough".to_string(),
        "tables".to_string(),
        "tasklists".to_string(),
    ]
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            html: true,
            linkify: true,
            extensions: default_markdown_extensions(),
            anchor: AnchorConfig::default(),
        }
    }
}

/// Permalink anchors injected into headings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Heading levels that receive an id and a permalink
    #[serde(default = "default_anchor_levels")]
    pub levels: Vec<u8>,
    /// CSS class on the injected anchor element
    #[serde(default = "default_anchor_class")]
    pub class: String,
    /// Wrap heading text in a `<span>` inside the link so reader modes keep it
    #[serde(default = "default_true")]
    pub safari_reader_fix: bool,
}

fn default_anchor_levels() -> Vec<u8> {
    vec![1, 2]
}

fn default_anchor_class() -> String {
    "header-anchor".to_string()
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            levels: default_anchor_levels(),
            class: default_anchor_class(),
            safari_reader_fix: true,
        }
    }
}

// =============================================================================
// Filters, shortcodes and collections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    #[serde(default = "default_highlight_theme")]
    pub theme: String,
    /// Output-relative path for the generated theme stylesheet (`null` disables it)
    #[serde(default = "default_highlight_css_path")]
    pub css_path: Option<PathBuf>,
}

fn default_highlight_theme() -> String {
    "github-dark".to_string()
}

fn default_highlight_css_path() -> Option<PathBuf> {
    Some(PathBuf::from("assets/css/highlight.css"))
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: default_highlight_theme(),
            css_path: default_highlight_css_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingTimeConfig {
    #[serde(default = "default_chars_per_minute")]
    pub chars_per_minute: usize,
}

fn default_chars_per_minute() -> usize {
    450
}

impl Default for ReadingTimeConfig {
    fn default() -> Self {
        Self {
            chars_per_minute: default_chars_per_minute(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// CSS class on images produced by `asset_img`
    #[serde(default = "default_image_class")]
    pub class: String,
    /// URL prefix the image filename is appended to
    #[serde(default = "default_image_base_url")]
    pub base_url: String,
}

fn default_image_class() -> String {
    "my-4".to_string()
}

fn default_image_base_url() -> String {
    "/assets/img/posts/".to_string()
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            class: default_image_class(),
            base_url: default_image_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagConfig {
    /// Tags that group content but are left out of the tag list
    #[serde(default = "default_reserved_tags")]
    pub reserved: Vec<String>,
}

fn default_reserved_tags() -> Vec<String> {
    vec!["posts".to_string(), "all".to_string()]
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            reserved: default_reserved_tags(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcerptConfig {
    #[serde(default = "default_excerpt_separator")]
    pub separator: String,
}

fn default_excerpt_separator() -> String {
    "<!-- excerpt -->".to_string()
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            separator: default_excerpt_separator(),
        }
    }
}

// =============================================================================
// Development configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Output-relative page served for requests that match no file
    #[serde(default = "default_not_found_page")]
    pub not_found_page: PathBuf,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_not_found_page() -> PathBuf {
    PathBuf::from("404.html")
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            not_found_page: default_not_found_page(),
        }
    }
}
