use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use configs::{AppConfig, LogFormat};
use dotenvy::dotenv;
use service::registry::InstanceRegistry;
use service::storage::YamlDb;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[clap(name = "instances", version, about = "Record and query active repo/branch instances")]
struct Cli {
    /// Instance file to use instead of the configured one
    #[clap(long)]
    path: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Append a branch to a repo
    Add { repo: String, branch: String },
    /// Remove every occurrence of a branch from a repo
    Remove { repo: String, branch: String },
    /// Print the raw instance file
    List,
    /// Print whether a repo, or a branch under it, is recorded
    Exists { repo: String, branch: Option<String> },
    /// Print the branches of a repo, one per line
    Branches { repo: String },
    /// Print instances as JSON lines, optionally for one repo
    Instances { repo: Option<String> },
}

fn init_logging(format: LogFormat) {
    match format {
        LogFormat::Compact => common::utils::logging::init_logging_default(),
        LogFormat::Json => common::utils::logging::init_logging_json(),
    }
}

fn exists_args<'a>(repo: &'a str, branch: Option<&'a str>) -> Vec<&'a str> {
    let mut args = vec![repo];
    args.extend(branch);
    args
}

async fn run(registry: Arc<dyn InstanceRegistry>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Add { repo, branch } => {
            registry.add(&repo, &branch).await?;
            info!(event = "add", %repo, %branch, "instance recorded");
        }
        Command::Remove { repo, branch } => {
            registry.remove(&repo, &branch).await?;
            info!(event = "remove", %repo, %branch, "instance removed");
        }
        Command::List => print!("{}", registry.list()?),
        Command::Exists { repo, branch } => {
            println!("{}", registry.exists(&exists_args(&repo, branch.as_deref()))?);
        }
        Command::Branches { repo } => {
            for branch in registry.branches(&repo)? {
                println!("{branch}");
            }
        }
        Command::Instances { repo } => {
            for instance in registry.instances(repo.as_deref())? {
                println!("{}", serde_json::to_string(&instance)?);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // .env may carry CONFIG_PATH, STORAGE_PATH and RUST_LOG
    dotenv().ok();
    let cli = Cli::parse();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    init_logging(cfg.logging.format);

    let path = cli.path.unwrap_or(cfg.storage.path);
    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    rt.block_on(async move {
        if let Err(e) = common::env::ensure_parent_dir(&path).await {
            error!(event = "storage_dir_failed", path = %path.display(), error = %e, "cannot prepare storage directory");
            return ExitCode::FAILURE;
        }
        let registry: Arc<dyn InstanceRegistry> = Arc::new(YamlDb::new(&path));
        match run(registry, cli.command).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(event = "command_failed", path = %path.display(), error = %e, "instance command failed");
                ExitCode::FAILURE
            }
        }
    })
}
