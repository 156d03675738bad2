use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pagechrome_core::{AppConfig, PageLayout};

mod commands;

#[derive(Parser)]
#[command(name = "pagechrome")]
#[command(author, version, about = "Preview and simulate landing page chrome behavior")]
struct Cli {
    /// Config file (defaults to ~/.config/pagechrome/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal preview of a landing page
    Preview {
        /// Page layout file (TOML); the built-in demo page when omitted
        #[arg(short, long)]
        layout: Option<PathBuf>,
    },
    /// Replay a scripted session and print a JSON snapshot after every step
    Simulate {
        /// Script file (TOML) with a list of steps
        #[arg(short, long)]
        script: PathBuf,
        /// Page layout file (TOML); the built-in demo page when omitted
        #[arg(short, long)]
        layout: Option<PathBuf>,
        /// Pretty-print each snapshot
        #[arg(long)]
        pretty: bool,
    },
    /// Print a page layout, or its measured geometry
    Layout {
        /// Page layout file (TOML); the built-in demo page when omitted
        layout: Option<PathBuf>,
        /// Print element positions instead of the layout TOML
        #[arg(short, long)]
        measure: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load()?,
    };

    // The preview owns the terminal, so it logs to a file
    let log_to_file = matches!(cli.command, Some(Commands::Preview { .. }) | None);
    let _guard = init_logging(&config, log_to_file)?;

    match cli.command {
        Some(Commands::Preview { layout }) => {
            commands::preview::run(config, load_layout(layout.as_deref())?).await
        }
        None => commands::preview::run(config, PageLayout::default()).await,
        Some(Commands::Simulate {
            script,
            layout,
            pretty,
        }) => commands::simulate::run(&config, load_layout(layout.as_deref())?, &script, pretty),
        Some(Commands::Layout { layout, measure }) => {
            commands::layout::run(&config, &load_layout(layout.as_deref())?, measure)
        }
    }
}

/// Initialize tracing; `RUST_LOG` overrides the configured level
fn init_logging(config: &AppConfig, log_to_file: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if log_to_file {
        let dir = AppConfig::log_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let appender = tracing_appender::rolling::daily(&dir, "preview.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(false),
            )
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .init();
        Ok(None)
    }
}

fn load_layout(path: Option<&Path>) -> Result<PageLayout> {
    match path {
        Some(path) => PageLayout::load(path)
            .with_context(|| format!("Failed to load layout {}", path.display())),
        None => Ok(PageLayout::default()),
    }
}
