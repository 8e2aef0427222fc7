use std::path::Path;

use crate::{
    BuildArgs,
    build::{BuildResult, Builder, base_path_from_config},
    config::Config,
};

pub async fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    let config_path = Config::path_from_arg(args.config_file.as_deref())?;
    let config = Config::load(&config_path)?;
    let base_path = base_path_from_config(&config_path);

    let result = build_site(config, &base_path).await?;

    tracing::info!(
        "built site to {} ({} documents, {} passthrough files)",
        result.output_dir.display(),
        result.documents,
        result.passthrough_files
    );

    Ok(())
}

/// Run a full build off the async runtime's worker threads.
pub async fn build_site(config: Config, base_path: &Path) -> Result<BuildResult, anyhow::Error> {
    let builder = Builder::new(config, base_path.to_path_buf());
    let result = tokio::task::spawn_blocking(move || builder.build()).await??;
    Ok(result)
}
