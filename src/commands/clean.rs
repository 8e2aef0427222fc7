use crate::{
    CleanArgs,
    build::{base_path_from_config, resolve_against},
    config::Config,
};

pub async fn run(args: &CleanArgs) -> Result<(), anyhow::Error> {
    let config_path = Config::path_from_arg(args.config_file.as_deref())?;
    let config = Config::load(&config_path)?;
    let base_path = base_path_from_config(&config_path);

    // Delete the generated site folder
    let site_path = resolve_against(&base_path, &config.site.output);
    if !site_path.exists() {
        tracing::info!("nothing to clean at {}", site_path.display());
        return Ok(());
    }

    if args.dry_run {
        println!("Would delete {}", site_path.display());
    } else {
        tokio::fs::remove_dir_all(&site_path).await?;
        tracing::info!("deleted {}", site_path.display());
    }

    Ok(())
}
