use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};

use crate::site::Registry;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("layout not found: {0}")]
    LayoutNotFound(String),
}

/// The template renderer, wrapping Tera.
///
/// Layouts are loaded from the includes directory; the registry's filters
/// and shortcodes are available both in layouts and in markdown content.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Load layouts from `includes_dir` and register the site's filters and shortcodes.
    ///
    /// A missing includes directory is fine: documents then render without layouts.
    pub fn new(includes_dir: &Path, registry: &Registry) -> Result<Self, RenderError> {
        let mut tera = if includes_dir.is_dir() {
            let glob = includes_dir.join("**/*.html");
            Tera::new(&glob.to_string_lossy())?
        } else {
            Tera::default()
        };

        for (name, filter) in registry.filters() {
            let filter = filter.clone();
            tera.register_filter(
                name,
                move |value: &tera::Value, args: &std::collections::HashMap<String, tera::Value>| {
                    filter(value, args)
                },
            );
        }
        for (name, shortcode) in registry.shortcodes() {
            let shortcode = shortcode.clone();
            tera.register_function(
                name,
                move |args: &std::collections::HashMap<String, tera::Value>| shortcode(args),
            );
        }

        Ok(Self { tera })
    }

    pub fn has_layout(&self, layout: &str) -> bool {
        self.tera.get_template_names().any(|name| name == layout)
    }

    /// Wrap rendered content in its layout.
    pub fn render_page(&self, layout: &str, context: &PageContext) -> Result<String, RenderError> {
        if !self.has_layout(layout) {
            return Err(RenderError::LayoutNotFound(layout.to_string()));
        }

        let mut tera_context = Context::new();
        tera_context.insert("site", &context.site);
        tera_context.insert("page", &context.page);
        tera_context.insert("content", &context.content);
        tera_context.insert("toc", &context.toc);
        tera_context.insert("collections", &context.collections);

        Ok(self.tera.render(layout, &tera_context)?)
    }

    /// Render markdown source through Tera before markdown processing, so
    /// content can use shortcodes, filters and page variables.
    ///
    /// The content is added as a temporary template (its name has no `.html`
    /// suffix, so shortcode output is not autoescaped) and removed afterwards.
    pub fn render_content(
        &mut self,
        content: &str,
        context: &ContentRenderContext,
    ) -> Result<String, RenderError> {
        let mut tera_context = Context::new();
        tera_context.insert("site", &context.site);
        tera_context.insert("page", &context.page);
        tera_context.insert("collections", &context.collections);

        const TEMP_TEMPLATE_NAME: &str = "__content_render__";
        self.tera.add_raw_template(TEMP_TEMPLATE_NAME, content)?;
        let result = self.tera.render(TEMP_TEMPLATE_NAME, &tera_context);
        self.tera.templates.remove(TEMP_TEMPLATE_NAME);

        Ok(result?)
    }
}

/// Context available during content (markdown) rendering.
#[derive(Debug, Serialize)]
pub struct ContentRenderContext {
    pub site: SiteContext,
    pub page: PageInfo,
    pub collections: serde_json::Map<String, serde_json::Value>,
}

/// Context passed to layouts.
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub site: SiteContext,
    pub page: PageInfo,
    /// Rendered HTML of the document body
    pub content: String,
    /// Headings that received permalink anchors
    pub toc: Vec<crate::build::markdown::TocEntry>,
    pub collections: serde_json::Map<String, serde_json::Value>,
}

/// Site-level information.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub name: String,
    pub url: Option<String>,
}

/// Information about the current page.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub title: String,
    pub url: String,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    /// Rendered excerpt, if the document has one
    pub excerpt: Option<String>,
    /// Excerpt markdown as written (after templating, once available)
    pub post_excerpt: Option<String>,
    pub input_path: String,
    /// Custom front matter fields (flattened to top level, e.g., `page.author`)
    #[serde(flatten)]
    pub extra: std::collections::HashMap<String, serde_yaml::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::Config;
    use crate::site::configure;

    fn site() -> SiteContext {
        SiteContext {
            name: "Test".to_string(),
            url: None,
        }
    }

    fn page() -> PageInfo {
        PageInfo {
            title: "Hello".to_string(),
            url: "/hello/".to_string(),
            date: None,
            tags: vec![],
            description: None,
            excerpt: None,
            post_excerpt: None,
            input_path: "hello.md".to_string(),
            extra: Default::default(),
        }
    }

    fn renderer(includes: &Path) -> Renderer {
        let mut registry = Registry::new();
        configure(&mut registry, &Config::default()).unwrap();
        Renderer::new(includes, &registry).unwrap()
    }

    #[test]
    fn test_shortcode_in_content_is_not_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = renderer(&dir.path().join("missing"));
        let context = ContentRenderContext {
            site: site(),
            page: page(),
            collections: Default::default(),
        };

        let out = renderer
            .render_content(
                "# {{ page.title }}\n\n{{ asset_img(filename=\"cat.png\", alt=\"a cat\") }}",
                &context,
            )
            .unwrap();
        assert_eq!(
            out,
            "# Hello\n\n<img class=\"my-4\" src=\"/assets/img/posts/cat.png\" alt=\"a cat\" />"
        );
    }

    #[test]
    fn test_layout_uses_read_time_and_collections() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("post.html"),
            "<h1>{{ page.title }}</h1><p>{{ content | readTime }} min</p>\
             {% for tag in collections.tagList %}<i>{{ tag }}</i>{% endfor %}\
             {{ content | safe }}",
        )
        .unwrap();
        let renderer = renderer(dir.path());

        let mut collections = serde_json::Map::new();
        collections.insert("tagList".to_string(), serde_json::json!(["a", "b"]));
        let context = PageContext {
            site: site(),
            page: page(),
            content: format!("<p>{}</p>", "x".repeat(900)),
            toc: vec![],
            collections,
        };

        let html = renderer.render_page("post.html", &context).unwrap();
        assert!(html.starts_with("<h1>Hello</h1><p>2 min</p><i>a</i><i>b</i><p>xxx"));
    }

    #[test]
    fn test_missing_layout() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer(&dir.path().join("_includes"));
        let context = PageContext {
            site: site(),
            page: page(),
            content: String::new(),
            toc: vec![],
            collections: Default::default(),
        };
        assert!(matches!(
            renderer.render_page("nope.html", &context),
            Err(RenderError::LayoutNotFound(_))
        ));
    }
}
