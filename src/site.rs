//! The site's registrations.
//!
//! A [`Registry`] collects everything the build and the dev server call back
//! into: the markdown engine, template filters and shortcodes, collections,
//! passthrough copies and the not-found page. [`configure`] fills it in for
//! this site and returns the directory [`Settings`].
//!
//! ```ignore
//! let mut registry = Registry::new();
//! let settings = configure(&mut registry, &config)?;
//! registry.add_filter("shout", |v: &Value, _: &HashMap<String, Value>| {
//!     Ok(Value::from(v.as_str().unwrap_or_default().to_uppercase()))
//! });
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::build::collections;
use crate::build::document::Document;
use crate::build::filters::{asset_img_shortcode, read_time_filter};
use crate::build::highlight::SyntaxHighlighter;
use crate::build::markdown::{MarkdownError, MarkdownRenderer};
use crate::config::Config;

/// A template filter: `{{ value | name(arg=...) }}`.
pub type FilterFn = dyn Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync;

/// A template shortcode, called as a function: `{{ name(arg=...) }}`.
pub type ShortcodeFn = dyn Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync;

/// A collection, recomputed from every document on each build.
pub type CollectionFn = dyn Fn(&[Document]) -> Value + Send + Sync;

/// Directory settings returned by [`configure`], relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Layout directory (already joined onto `input`)
    pub includes: PathBuf,
}

/// Everything the site registers with the build and the dev server.
#[derive(Default)]
pub struct Registry {
    markdown: Option<MarkdownRenderer>,
    filters: Vec<(String, Arc<FilterFn>)>,
    shortcodes: Vec<(String, Arc<ShortcodeFn>)>,
    collections: Vec<(String, Arc<CollectionFn>)>,
    passthrough: Vec<PathBuf>,
    not_found_page: Option<PathBuf>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `renderer` for every markdown document.
    pub fn set_markdown_renderer(&mut self, renderer: MarkdownRenderer) -> &mut Self {
        self.markdown = Some(renderer);
        self
    }

    /// Register a template filter. A later registration under the same name wins.
    pub fn add_filter<F>(&mut self, name: &str, filter: F) -> &mut Self
    where
        F: Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static,
    {
        self.filters.push((name.to_string(), Arc::new(filter)));
        self
    }

    /// Register a shortcode. A later registration under the same name wins.
    pub fn add_shortcode<F>(&mut self, name: &str, shortcode: F) -> &mut Self
    where
        F: Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static,
    {
        self.shortcodes.push((name.to_string(), Arc::new(shortcode)));
        self
    }

    /// Register a collection, available to layouts as `collections.<name>`.
    pub fn add_collection<F>(&mut self, name: &str, collection: F) -> &mut Self
    where
        F: Fn(&[Document]) -> Value + Send + Sync + 'static,
    {
        self.collections.push((name.to_string(), Arc::new(collection)));
        self
    }

    /// Copy a file or directory (project-relative) verbatim into the output.
    pub fn add_passthrough_copy(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.passthrough.push(path.into());
        self
    }

    /// Serve this built file (project-relative) for dev-server requests that match nothing.
    pub fn set_not_found_page(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.not_found_page = Some(path.into());
        self
    }

    pub fn markdown(&self) -> Option<&MarkdownRenderer> {
        self.markdown.as_ref()
    }

    pub fn filters(&self) -> impl Iterator<Item = (&str, &Arc<FilterFn>)> {
        self.filters.iter().map(|(name, f)| (name.as_str(), f))
    }

    pub fn shortcodes(&self) -> impl Iterator<Item = (&str, &Arc<ShortcodeFn>)> {
        self.shortcodes.iter().map(|(name, f)| (name.as_str(), f))
    }

    pub fn passthrough(&self) -> &[PathBuf] {
        &self.passthrough
    }

    pub fn not_found_page(&self) -> Option<&Path> {
        self.not_found_page.as_deref()
    }

    /// Compute every collection for `docs`.
    ///
    /// `all` and one collection per tag are always present; registered
    /// collections are added on top and win on a name clash.
    pub fn collections(&self, docs: &[Document]) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("all".to_string(), to_value(collections::all(docs)));
        for (tag, items) in collections::by_tag(docs) {
            out.insert(tag, to_value(items));
        }
        for (name, collection) in &self.collections {
            out.insert(name.clone(), collection(docs));
        }
        out
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("markdown", &self.markdown.is_some())
            .field("filters", &names(&self.filters))
            .field("shortcodes", &names(&self.shortcodes))
            .field("collections", &names(&self.collections))
            .field("passthrough", &self.passthrough)
            .field("not_found_page", &self.not_found_page)
            .finish()
    }
}

fn names<T>(entries: &[(String, T)]) -> Vec<&str> {
    entries.iter().map(|(name, _)| name.as_str()).collect()
}

fn to_value<T: serde::Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Register this site's markdown engine, filters, shortcodes, collections,
/// passthrough copies and not-found page.
pub fn configure(registry: &mut Registry, config: &Config) -> Result<Settings, MarkdownError> {
    let settings = Settings {
        input: config.site.input.clone(),
        output: config.site.output.clone(),
        includes: config.site.input.join(&config.site.includes),
    };

    let highlighter = SyntaxHighlighter::from_config(&config.highlight);
    registry.set_markdown_renderer(MarkdownRenderer::new(&config.markdown, highlighter)?);

    registry.add_filter("readTime", read_time_filter(&config.reading_time));

    let reserved = config.tags.reserved.clone();
    registry.add_collection("tagList", move |docs| {
        Value::from(collections::tag_list(docs, &reserved))
    });

    registry.add_shortcode("asset_img", asset_img_shortcode(&config.images));

    for path in &config.passthrough {
        registry.add_passthrough_copy(settings.input.join(path));
    }

    registry.set_not_found_page(settings.output.join(&config.dev.not_found_page));

    Ok(settings)
}
