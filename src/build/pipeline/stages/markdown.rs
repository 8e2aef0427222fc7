//! Markdown rendering stage.

use crate::build::document::split_excerpt;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Renders each document body (and its excerpt) with the registered markdown engine.
///
/// The excerpt is split off here rather than at load time, so shortcodes
/// in it have already been expanded. After this stage, `doc.content`
/// contains HTML and `doc.toc` lists the headings that received permalink
/// anchors.
pub struct MarkdownStage;

impl Stage for MarkdownStage {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs {
            let (excerpt, body) = split_excerpt(&doc.content, ctx.excerpt_separator);

            let output = ctx.markdown.render(&body);
            doc.content = output.html;
            doc.toc = output.toc;

            doc.excerpt_html = excerpt
                .as_deref()
                .map(|excerpt| ctx.markdown.render(excerpt).html);
            doc.excerpt = excerpt;
        }

        Ok(())
    }
}
