use clap::Parser;
use file_tree_viewer::app::{self, state::AppState};
use file_tree_viewer::config::settings;
use std::path::PathBuf;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Browse a directory as a checkbox tree and export it, with the content of
/// checked files, as plain text.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory to open (defaults to the current directory).
    directory: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let directory = std::path::absolute(args.directory.unwrap_or_else(|| PathBuf::from(".")))?;

    let mut config = settings::load_or_default(None);
    if directory.is_dir() {
        config.add_recent_directory(&directory);
        if let Err(e) = settings::save_config(&config, None) {
            tracing::error!("Failed to save config: {}", e);
        }
    } else {
        tracing::warn!("{} is not a directory", directory.display());
    }

    let state = AppState::new(config, None, directory);
    let (proxy, rx) = mpsc::unbounded_channel();
    let input = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    app::run_shell(state, proxy, rx, input, &mut stdout).await?;
    Ok(())
}
