//! Passthrough copy stage.
//!
//! Files and directories registered for passthrough bypass the pipeline and
//! are copied byte-for-byte. Their output location is their path with the
//! input directory stripped: `src/assets/a.png` lands at `_site/assets/a.png`.

use std::path::{Path, PathBuf};

use crate::build::pipeline::{FinalizeStage, PipelineContext, PipelineError};

pub struct PassthroughStage;

impl FinalizeStage for PassthroughStage {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn finalize(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        for path in ctx.registry.passthrough() {
            let source = ctx.base_path.join(path);
            if !source.exists() {
                tracing::warn!("passthrough path does not exist: {}", source.display());
                continue;
            }

            let relative = path.strip_prefix(ctx.input).unwrap_or(path);
            let destination = ctx.output_dir.join(relative);
            copy_recursive(&source, &destination, &mut ctx.passthrough_files)?;
        }

        Ok(())
    }
}

/// Copy a file, or a directory tree, recording every file written.
fn copy_recursive(
    source: &Path,
    destination: &Path,
    written: &mut Vec<PathBuf>,
) -> Result<(), PipelineError> {
    if source.is_dir() {
        std::fs::create_dir_all(destination)?;
        for entry in std::fs::read_dir(source)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &destination.join(entry.file_name()), written)?;
        }
    } else {
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(source, destination)?;
        written.push(destination.to_path_buf());
    }
    Ok(())
}
