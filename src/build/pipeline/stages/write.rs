//! File writing stage.

use crate::build::paths::url_to_output_path;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Writes each document's final HTML to its output path, creating parent
/// directories as needed.
pub struct WriteStage;

impl Stage for WriteStage {
    fn name(&self) -> &'static str {
        "write"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs {
            let html = doc.output_html.as_ref().ok_or_else(|| {
                PipelineError::stage(
                    "write",
                    format!(
                        "document '{}' has no output HTML (was layout stage run?)",
                        doc.url_path()
                    ),
                )
            })?;

            let output_path = url_to_output_path(doc.url_path(), ctx.output_dir);
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output_path, html)?;
            tracing::debug!("wrote {}", output_path.display());
        }

        Ok(())
    }
}
