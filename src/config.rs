//! Service configuration
//!
//! Everything is read once at startup from the environment (a `.env` file is
//! loaded first by `main`) and then handed to the components that need it.

use std::str::FromStr;

use crate::{
  platform::{PlatformDef, Platforms},
  prelude::*,
};

/// Upper bound for the `locale` request field.
pub const MAX_LOCALE_LENGTH: usize = 10;

/// Upper bound for `VERSION_CACHE_TTL`.
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub enabled: bool,
  pub prefix: String,
  /// Zero disables the decision cache.
  pub cache_ttl: Duration,
  pub enable_stats: bool,
  pub rate_limit_per_minute: u32,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      prefix: String::from("/api/version"),
      cache_ttl: Duration::from_secs(300),
      enable_stats: false,
      rate_limit_per_minute: 60,
    }
  }
}

#[derive(Debug, Clone)]
pub struct ValidationConfig {
  pub semantic_versioning: bool,
  pub max_version_length: usize,
  pub max_build_number_length: usize,
}

impl Default for ValidationConfig {
  fn default() -> Self {
    Self {
      semantic_versioning: true,
      max_version_length: 20,
      max_build_number_length: 50,
    }
  }
}

#[derive(Debug, Clone)]
pub struct LocaleConfig {
  pub default_locale: String,
  pub fallback_locale: String,
}

impl Default for LocaleConfig {
  fn default() -> Self {
    Self {
      default_locale: String::from("en"),
      fallback_locale: String::from("en"),
    }
  }
}

#[derive(Debug, Clone)]
pub struct Config {
  pub api: ApiConfig,
  pub validation: ValidationConfig,
  pub localization: LocaleConfig,
  pub platforms: Platforms,
  pub database_url: String,
  pub port: u16,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api: ApiConfig::default(),
      validation: ValidationConfig::default(),
      localization: LocaleConfig::default(),
      platforms: Platforms::default(),
      database_url: String::from("sqlite:app_versions.db?mode=rwc"),
      port: 3000,
    }
  }
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "0" | "false" | "no" | "off" => Ok(false),
    other => anyhow::bail!("{key}: expected a boolean, got `{other}`"),
  }
}

fn parse_num<T>(key: &str, value: &str) -> anyhow::Result<T>
where
  T: FromStr,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  value.trim().parse().with_context(|| format!("{key}: invalid number"))
}

/// `300` is seconds, anything else goes through humantime (`5m`, `1h 30m`).
fn parse_duration(
  key: &str,
  value: &str,
  max: Duration,
) -> anyhow::Result<Duration> {
  let value = value.trim();
  let duration = match value.parse::<u64>() {
    Ok(secs) => Duration::from_secs(secs),
    Err(_) => humantime::parse_duration(value)
      .with_context(|| format!("{key}: invalid duration `{value}`"))?,
  };
  anyhow::ensure!(
    duration <= max,
    "{key}: `{value}` exceeds the maximum of {}",
    humantime::format_duration(max)
  );
  Ok(duration)
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  pub fn from_lookup(
    var: impl Fn(&str) -> Option<String>,
  ) -> anyhow::Result<Self> {
    let mut config = Self::default();

    if let Some(v) = var("VERSION_API_ENABLED") {
      config.api.enabled = parse_bool("VERSION_API_ENABLED", &v)?;
    }
    if let Some(v) = var("VERSION_API_PREFIX") {
      let prefix = v.trim().trim_end_matches('/');
      config.api.prefix = if prefix.starts_with('/') {
        prefix.to_string()
      } else {
        format!("/{prefix}")
      };
    }
    if let Some(v) = var("VERSION_CACHE_TTL") {
      config.api.cache_ttl = parse_duration("VERSION_CACHE_TTL", &v, MAX_CACHE_TTL)?;
    }
    if let Some(v) = var("VERSION_STATS_ENABLED") {
      config.api.enable_stats = parse_bool("VERSION_STATS_ENABLED", &v)?;
    }
    if let Some(v) = var("VERSION_RATE_LIMIT") {
      config.api.rate_limit_per_minute = parse_num("VERSION_RATE_LIMIT", &v)?;
      anyhow::ensure!(
        config.api.rate_limit_per_minute > 0,
        "VERSION_RATE_LIMIT must be positive"
      );
    }

    if let Some(v) = var("VERSION_SEMVER_VALIDATION") {
      config.validation.semantic_versioning =
        parse_bool("VERSION_SEMVER_VALIDATION", &v)?;
    }
    if let Some(v) = var("VERSION_MAX_LENGTH") {
      config.validation.max_version_length =
        parse_num("VERSION_MAX_LENGTH", &v)?;
    }
    if let Some(v) = var("VERSION_MAX_BUILD_NUMBER_LENGTH") {
      config.validation.max_build_number_length =
        parse_num("VERSION_MAX_BUILD_NUMBER_LENGTH", &v)?;
    }

    if let Some(v) = var("VERSION_DEFAULT_LOCALE") {
      config.localization.default_locale = v.trim().to_string();
    }
    if let Some(v) = var("VERSION_FALLBACK_LOCALE") {
      config.localization.fallback_locale = v.trim().to_string();
    }

    let defs = match var("VERSION_PLATFORMS") {
      Some(list) => Platforms::parse_list(&list)
        .context("VERSION_PLATFORMS: invalid platform list")?,
      None => vec![
        PlatformDef::new("ios", "iOS"),
        PlatformDef::new("android", "Android"),
      ],
    };
    let wildcard = PlatformDef::new(
      var("VERSION_WILDCARD_PLATFORM").unwrap_or_else(|| "all".into()),
      var("VERSION_WILDCARD_LABEL").unwrap_or_else(|| "All Platforms".into()),
    );
    config.platforms = Platforms::new(defs, wildcard)
      .context("Invalid platform configuration")?;

    if let Some(v) = var("DATABASE_URL") {
      config.database_url = v;
    }
    if let Some(v) = var("PORT") {
      config.port = parse_num("PORT", &v)?;
    }

    Ok(config)
  }
}
