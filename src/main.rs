mod api;
mod app;
mod config;
mod event;
mod logging;
mod sync;
mod ui;

use api::client::UsersClient;
use api::types::Part;
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use sync::SyncController;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(about = "A terminal UI for the users of a CRUD backend, grouped by part")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/roster/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Users collection URL, e.g. http://localhost:8080/user
  #[arg(short, long)]
  base_url: Option<String>,

  /// Part to show first (web, ios or server)
  #[arg(short, long)]
  part: Option<Part>,
}

// Remote calls share the UI thread; nothing runs on worker threads.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let overrides = config::Overrides {
    base_url: args.base_url,
    env_base_url: std::env::var(config::BASE_URL_ENV).ok(),
    part: args.part,
  };
  let config = config::Config::load(args.config.as_deref(), overrides)?;

  let _log_guard = logging::init(&config.log)?;
  info!(base_url = %config.api.base_url, "configuration loaded");

  let client = UsersClient::new(&config)?;
  let sync = SyncController::new(Arc::new(client), config.default_part);

  let mut app = app::App::new(sync, config.display_title());
  app.run().await?;

  Ok(())
}
