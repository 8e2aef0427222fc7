//! Document types for pipeline processing.

use crate::build::document::Document;
use crate::build::markdown::TocEntry;
use crate::build::render::PageInfo;

/// A document being processed through the pipeline.
///
/// Wraps the original `Document` with mutable state that evolves
/// through pipeline stages:
///
/// 1. Initially: `content` = markdown body, `toc` = empty
/// 2. After content: shortcodes and template variables expanded
/// 3. After markdown: excerpt split off, `content` = HTML fragment, `toc`
///    and `excerpt_html` populated
/// 4. After layout: `output_html` = final page HTML
#[derive(Debug)]
pub struct ProcessingDocument {
    pub doc: Document,

    pub content: String,

    pub toc: Vec<TocEntry>,

    /// Templated markdown before the excerpt separator, once the markdown
    /// stage has split it off
    pub excerpt: Option<String>,

    /// The excerpt rendered to HTML, once the markdown stage has run
    pub excerpt_html: Option<String>,

    pub output_html: Option<String>,
}

impl ProcessingDocument {
    pub fn new(doc: Document) -> Self {
        let content = doc.raw_content.clone();
        Self {
            doc,
            content,
            toc: Vec::new(),
            excerpt: None,
            excerpt_html: None,
            output_html: None,
        }
    }

    pub fn url_path(&self) -> &str {
        &self.doc.url_path
    }

    /// Page variables exposed to templates as `page.*`.
    pub fn page_info(&self) -> PageInfo {
        let front_matter = &self.doc.front_matter;
        PageInfo {
            title: self.doc.title(),
            url: self.doc.url_path.clone(),
            date: front_matter.date.clone(),
            tags: front_matter.tags.clone().unwrap_or_default(),
            description: front_matter.description.clone(),
            excerpt: self.excerpt_html.clone(),
            post_excerpt: self.excerpt.clone().or_else(|| self.doc.excerpt.clone()),
            input_path: self.doc.source_path.to_string_lossy().replace('\\', "/"),
            extra: front_matter.extra.clone(),
        }
    }
}
