use std::path::PathBuf;

use crate::config::Config;
use crate::site::{Registry, configure};

use super::markdown::MarkdownError;
use super::paths::resolve_against;
use super::pipeline::{Pipeline, PipelineContext, PipelineError, ProcessingDocument};
use super::render::{RenderError, Renderer, SiteContext};
use super::source::{Source, SourceError};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("markdown setup error: {0}")]
    Markdown(#[from] MarkdownError),

    #[error("no markdown renderer registered")]
    MissingMarkdownRenderer,

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug)]
pub struct BuildResult {
    pub output_dir: PathBuf,
    pub documents: usize,
    pub passthrough_files: usize,
    /// Page the dev server answers unmatched requests with, if one is registered
    pub not_found_page: Option<PathBuf>,
}

pub struct Builder {
    config: Config,
    /// Base path for resolving relative paths (typically the config file's directory)
    base_path: PathBuf,
    pipeline: Pipeline,
}

impl Builder {
    pub fn new(config: Config, base_path: PathBuf) -> Self {
        Self {
            config,
            base_path,
            pipeline: Pipeline::default_pipeline(),
        }
    }

    /// Replace the default pipeline, e.g. to insert an extra stage.
    #[allow(dead_code)]
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn build(&self) -> Result<BuildResult, BuildError> {
        // 1. Register markdown, filters, shortcodes, collections and passthrough
        // 2. Discover documents
        // 3. Compute collections
        // 4. Load layouts
        // 5. Run the pipeline
        let mut registry = Registry::new();
        let settings = configure(&mut registry, &self.config)?;

        let input_dir = resolve_against(&self.base_path, &settings.input);
        let output_dir = resolve_against(&self.base_path, &settings.output);
        let includes_dir = resolve_against(&self.base_path, &settings.includes);

        let mut source = Source::new(input_dir.clone(), self.config.excerpt.separator.clone())
            .exclude(includes_dir.clone());
        for path in registry.passthrough() {
            source = source.exclude(resolve_against(&self.base_path, path));
        }

        let documents = source.discover()?;
        tracing::info!(
            "found {} document(s) in {}",
            documents.len(),
            input_dir.display()
        );

        let collections = registry.collections(&documents);
        let mut renderer = Renderer::new(&includes_dir, &registry)?;
        let markdown = registry
            .markdown()
            .ok_or(BuildError::MissingMarkdownRenderer)?;

        std::fs::create_dir_all(&output_dir)?;

        let site = SiteContext {
            name: self.config.site.name.clone(),
            url: self.config.site.url.clone(),
        };

        let document_count = documents.len();
        let mut docs: Vec<ProcessingDocument> =
            documents.into_iter().map(ProcessingDocument::new).collect();

        let mut ctx = PipelineContext {
            base_path: &self.base_path,
            input: &settings.input,
            output_dir: &output_dir,
            site: &site,
            collections,
            excerpt_separator: &self.config.excerpt.separator,
            highlight_css: self.config.highlight.css_path.as_deref(),
            registry: &registry,
            markdown,
            renderer: &mut renderer,
            passthrough_files: Vec::new(),
        };
        self.pipeline.run(&mut docs, &mut ctx)?;
        let passthrough_files = ctx.passthrough_files.len();
        let not_found_page = registry
            .not_found_page()
            .map(|path| resolve_against(&self.base_path, path));

        tracing::info!(
            "wrote {} page(s) and {} passthrough file(s) to {}",
            document_count,
            passthrough_files,
            output_dir.display()
        );

        Ok(BuildResult {
            output_dir,
            documents: document_count,
            passthrough_files,
            not_found_page,
        })
    }
}
