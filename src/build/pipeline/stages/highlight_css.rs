//! Syntax theme stylesheet.

use crate::build::pipeline::{FinalizeStage, PipelineContext, PipelineError};

/// Writes the highlighter's theme CSS so highlighted code blocks are styled.
pub struct HighlightCssStage;

impl FinalizeStage for HighlightCssStage {
    fn name(&self) -> &'static str {
        "highlight-css"
    }

    fn finalize(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let Some(css_path) = ctx.highlight_css else {
            return Ok(());
        };

        let highlighter = ctx.markdown.highlighter();
        let Some(css) = highlighter.generate_css() else {
            tracing::warn!(
                "unknown highlight theme '{}', skipping stylesheet",
                highlighter.theme_name()
            );
            return Ok(());
        };

        let output_path = ctx.output_dir.join(css_path);
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&output_path, css)?;
        Ok(())
    }
}
