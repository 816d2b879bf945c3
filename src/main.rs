use std::sync::Arc;

use app_version::{config::Config, plugins, prelude::*, state::AppState};
use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "app_version=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env().context("Failed to load configuration")?;

  info!("Starting App Version Server v{}", env!("CARGO_PKG_VERSION"));
  if !config.api.enabled {
    warn!("Version API is disabled, checks will answer 503");
  }

  let app = Arc::new(AppState::new(config).await?);

  let running = plugins::App::new().register(plugins::server::Plugin).run(app);

  tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
  info!("Shutting down...");
  running.shutdown().await;

  Ok(())
}
