use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

mod build;
mod commands;
mod config;
mod site;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// The command to execute
    #[command(subcommand)]
    command: FolioCommand,
}

#[derive(Parser)]
struct InitArgs {
    /// The path to initialize the project in
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(long, default_value = "false")]
    create: bool,
}

#[derive(Parser)]
struct BuildArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "folio.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct ServeArgs {
    /// The address to bind to (defaults to `dev.bind`)
    #[arg(short, long)]
    bind: Option<String>,

    /// The port to bind to (defaults to `dev.port`)
    #[arg(short, long)]
    port: Option<u16>,

    /// Open the site in the default browser
    #[arg(short, long, default_value = "false")]
    open: bool,

    /// The path to the configuration file
    #[arg(short, long, default_value = "folio.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct CleanArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "folio.yaml")]
    config_file: Option<PathBuf>,

    /// Print what would be deleted without deleting it
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

#[derive(Subcommand)]
enum FolioCommand {
    /// Initialize a new folio site
    Init(InitArgs),

    /// Build the site into the output directory
    Build(BuildArgs),

    /// Build, then serve the site on a local port
    Serve(ServeArgs),

    /// Delete the output directory
    Clean(CleanArgs),
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match verbose {
        0 => "folio=info",
        1 => "folio=debug",
        _ => "folio=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt().with_env_filter(env_filter).with_target(false).init();
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        FolioCommand::Init(args) => {
            commands::init::run(&args).await?;
        }
        FolioCommand::Build(args) => {
            commands::build::run(&args).await?;
        }
        FolioCommand::Serve(args) => {
            commands::serve::run(&args).await?;
        }
        FolioCommand::Clean(args) => {
            commands::clean::run(&args).await?;
        }
    }

    Ok(())
}
