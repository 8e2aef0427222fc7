//! Collections derived from the full document set.
//!
//! Every collection is recomputed from scratch on each build. Nothing is
//! cached between calls, so the result only ever depends on the documents
//! passed in.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::document::Document;

/// All distinct tags except the reserved ones, sorted ascending.
///
/// Documents without a `tags` key are skipped.
pub fn tag_list(docs: &[Document], reserved: &[String]) -> Vec<String> {
    let tags: BTreeSet<&str> = docs
        .iter()
        .filter_map(Document::tags)
        .flatten()
        .map(String::as_str)
        .filter(|tag| !reserved.iter().any(|r| r.as_str() == *tag))
        .collect();

    tags.into_iter().map(str::to_string).collect()
}

/// A document as seen from a template iterating a collection.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionItem {
    pub title: String,
    pub url: String,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub input_path: String,
    /// Excerpt markdown, as written
    pub excerpt: Option<String>,
    /// Rendered HTML body; `None` until the markdown stage has run
    pub content: Option<String>,
}

impl From<&Document> for CollectionItem {
    fn from(doc: &Document) -> Self {
        Self {
            title: doc.title(),
            url: doc.url_path.clone(),
            date: doc.front_matter.date.clone(),
            tags: doc.tags().map(<[String]>::to_vec).unwrap_or_default(),
            description: doc.front_matter.description.clone(),
            input_path: doc.source_path.to_string_lossy().replace('\\', "/"),
            excerpt: doc.excerpt.clone(),
            content: None,
        }
    }
}

/// Every document, oldest first; undated documents sort before dated ones.
pub fn all(docs: &[Document]) -> Vec<CollectionItem> {
    let mut items: Vec<CollectionItem> = docs.iter().map(CollectionItem::from).collect();
    items.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.input_path.cmp(&b.input_path))
    });
    items
}

/// Documents grouped by tag, each group ordered like [`all`].
///
/// Reserved tags get a group too: `posts` is how templates list blog posts.
pub fn by_tag(docs: &[Document]) -> BTreeMap<String, Vec<CollectionItem>> {
    let mut groups: BTreeMap<String, Vec<CollectionItem>> = BTreeMap::new();
    for item in all(docs) {
        for tag in &item.tags {
            groups.entry(tag.clone()).or_default().push(item.clone());
        }
    }
    groups
}
