//! Build pipeline for document processing.
//!
//! The pipeline transforms documents through a series of stages:
//! 1. Content templating (shortcodes and filters in markdown)
//! 2. Markdown rendering (to HTML with permalinks)
//! 3. Collection content (rendered bodies become visible to listings)
//! 4. Layout rendering (wrap content in its layout, if it names one)
//! 5. File writing (output to disk)
//!
//! Finalize stages run once after all documents are written: passthrough
//! copies and the highlight stylesheet.

mod context;
mod document;
mod error;
mod stages;

pub use context::PipelineContext;
pub use document::ProcessingDocument;
pub use error::PipelineError;

use stages::{
    CollectionsStage, ContentStage, HighlightCssStage, LayoutStage, MarkdownStage,
    PassthroughStage, WriteStage,
};

/// A stage in the document processing pipeline.
///
/// Stages transform documents sequentially. Each stage receives all documents
/// and can modify them in place before passing to the next stage.
pub trait Stage: Send + Sync {
    /// Unique name for this stage (used for insertion points and errors).
    fn name(&self) -> &'static str;

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError>;
}

/// A stage that runs once after all documents are processed.
pub trait FinalizeStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn finalize(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError>;
}

/// The document processing pipeline.
///
/// The default pipeline is: content → markdown → collections → layout → write, then
/// passthrough → highlight-css.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    finalize_stages: Vec<Box<dyn FinalizeStage>>,
}

impl Pipeline {
    /// Create an empty pipeline with no stages.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            finalize_stages: Vec::new(),
        }
    }

    /// Create the default pipeline with standard stages.
    pub fn default_pipeline() -> Self {
        let mut pipeline = Self::new();
        pipeline
            .add_stage(ContentStage)
            .add_stage(MarkdownStage)
            .add_stage(CollectionsStage)
            .add_stage(LayoutStage)
            .add_stage(WriteStage)
            .add_finalize_stage(PassthroughStage)
            .add_finalize_stage(HighlightCssStage);
        pipeline
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Insert a stage after the named stage.
    ///
    /// Returns an error if no stage with the given name exists.
    #[allow(dead_code)]
    pub fn insert_after<S: Stage + 'static>(
        &mut self,
        name: &str,
        stage: S,
    ) -> Result<&mut Self, PipelineError> {
        let pos = self
            .stages
            .iter()
            .position(|s| s.name() == name)
            .ok_or_else(|| PipelineError::stage(name, "no such stage in pipeline"))?;
        self.stages.insert(pos + 1, Box::new(stage));
        Ok(self)
    }

    /// Add a finalize stage (runs after all documents are processed).
    pub fn add_finalize_stage<S: FinalizeStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.finalize_stages.push(Box::new(stage));
        self
    }

    /// Run the pipeline on a set of documents.
    pub fn run(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        for stage in &self.stages {
            tracing::debug!(stage = stage.name(), documents = docs.len(), "running stage");
            stage.process(docs, ctx)?;
        }

        for stage in &self.finalize_stages {
            tracing::debug!(stage = stage.name(), "running finalize stage");
            stage.finalize(ctx)?;
        }

        Ok(())
    }

    /// Get the names of all stages in order.
    #[allow(dead_code)]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages
            .iter()
            .map(|s| s.name())
            .chain(self.finalize_stages.iter().map(|s| s.name()))
            .collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}
