use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use docpilot::{Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "docpilot")]
#[command(author, version, about = "Ask questions about your own documents", long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.docpilot")]
    data_dir: String,

    /// Keep the index and all saved state in memory for this run only
    #[arg(long, global = true)]
    memory_storage: bool,

    /// Files extracted in parallel while indexing (defaults to available cores)
    #[arg(short, long, global = true)]
    jobs: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let data_dir = expand_tilde(&cli.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let jobs = cli.jobs.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    });
    debug!("Data dir {} with {} jobs", data_dir, jobs);

    let config = ContainerConfig::from_env(data_dir, cli.memory_storage, jobs.max(1));
    let container = Container::new(config).await?;
    let router = Router::new(&container);

    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
