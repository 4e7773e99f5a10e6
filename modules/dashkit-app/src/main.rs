use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

use dashkit_app::config::{load_config, AppConfig, FileConfig};
use dashkit_app::session::{Session, Step};
use dashkit_app::{build_router, host_document, mock_source};
use dashkit_dom::Dom;

#[derive(Parser)]
#[command(name = "dashkit", about = "Dashboard demo driven by hash locations on stdin")]
struct Cli {
    /// Path to config TOML file (defaults to DASHKIT_CONFIG, then the bundled config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mock data latency per call, in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Locations to visit before reading commands from stdin
    visit: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    LocalSet::new().block_on(&runtime, run(cli))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dashkit=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let env = AppConfig::from_env()?;

    let file_config = match cli.config.or(env.config_path) {
        Some(path) => {
            tracing::info!(config = %path.display(), "Loading config");
            load_config(&path)?
        }
        None => {
            tracing::info!("Using bundled config");
            FileConfig::bundled()?
        }
    };

    let latency_ms = cli.latency_ms.or(env.mock_latency_ms);
    let data = Rc::new(mock_source(&file_config.mock, latency_ms)?);
    let settle = Duration::from_millis(latency_ms.unwrap_or(file_config.mock.latency_ms) * 3);

    let router = build_router(Dom::new(host_document()), &file_config, data)?;
    tracing::info!(
        app = %file_config.app.app_name,
        routes = router.registry().len(),
        "Router ready"
    );

    let session = Session::new(router, settle);
    let start = session.router().start()?;
    start.settled().await;

    for href in &cli.visit {
        print_step(session.run_line(href).await?);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match session.run_line(&line).await {
            Ok(Step::Quit) => break,
            Ok(step) => print_step(step),
            Err(e) => eprintln!("error: {e:#}"),
        }
    }

    tracing::info!("Session ended");
    Ok(())
}

fn print_step(step: Step) {
    if let Step::Print(out) = step {
        println!("{out}");
    }
}
