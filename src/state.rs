use std::sync::atomic::{AtomicBool, Ordering};

use migration::Migrator;

use crate::{cache::DecisionCache, config::Config, prelude::*, sv};

pub struct Services<'a> {
  pub releases: sv::Releases<'a>,
  pub updates: sv::Updates<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
  pub cache: DecisionCache,
  api_enabled: AtomicBool,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(config.database_url.as_str())
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Ok(Self::with_db(db, config))
  }

  /// State over an already migrated connection.
  pub fn with_db(db: DatabaseConnection, config: Config) -> Self {
    Self {
      db,
      api_enabled: AtomicBool::new(config.api.enabled),
      cache: DecisionCache::new(),
      config,
    }
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      releases: sv::Releases::new(&self.db, &self.config),
      updates: sv::Updates::new(&self.db, &self.config),
    }
  }

  pub fn api_enabled(&self) -> bool {
    self.api_enabled.load(Ordering::Relaxed)
  }

  pub fn set_api_enabled(&self, enabled: bool) {
    let was = self.api_enabled.swap(enabled, Ordering::Relaxed);
    if was != enabled {
      info!("Version API {}", if enabled { "enabled" } else { "disabled" });
    }
  }

  /// Forgets cached decisions, e.g. after releases were edited.
  pub fn invalidate_cache(&self) {
    self.cache.clear();
  }

  pub fn gc_cache(&self) {
    let purged = self.cache.purge_expired();
    if purged > 0 {
      debug!("Purged {purged} expired cache entries");
    }
  }
}
