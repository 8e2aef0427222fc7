//! Layout rendering stage.

use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};
use crate::build::render::PageContext;

/// Wraps rendered content in the layout named by the document's front matter.
///
/// Documents without a `layout` are written as their rendered content alone.
pub struct LayoutStage;

impl Stage for LayoutStage {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs {
            let Some(layout) = doc.doc.front_matter.layout.clone() else {
                doc.output_html = Some(doc.content.clone());
                continue;
            };

            let page_context = PageContext {
                site: ctx.site.clone(),
                page: doc.page_info(),
                content: doc.content.clone(),
                toc: doc.toc.clone(),
                collections: ctx.collections.clone(),
            };

            let html = ctx.renderer.render_page(&layout, &page_context).map_err(|e| {
                PipelineError::stage(
                    "layout",
                    format!("failed to render {}: {}", doc.doc.source_path.display(), e),
                )
            })?;
            doc.output_html = Some(html);
        }

        Ok(())
    }
}
