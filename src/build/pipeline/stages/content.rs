//! Content templating stage.
//!
//! Runs Tera over the markdown body before it is rendered, so posts can use
//! shortcodes like `{{ asset_img(filename="cat.png", alt="A cat") }}`.

use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};
use crate::build::render::ContentRenderContext;

pub struct ContentStage;

impl Stage for ContentStage {
    fn name(&self) -> &'static str {
        "content"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs {
            let content_context = ContentRenderContext {
                site: ctx.site.clone(),
                page: doc.page_info(),
                collections: ctx.collections.clone(),
            };

            doc.content = ctx
                .renderer
                .render_content(&doc.content, &content_context)
                .map_err(|e| {
                    PipelineError::stage(
                        "content",
                        format!("failed to expand {}: {}", doc.doc.source_path.display(), e),
                    )
                })?;
        }

        Ok(())
    }
}
