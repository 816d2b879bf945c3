//! Error types for the version service

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Database error: {0}")]
  Database(#[from] sea_orm::DbErr),

  #[error("Invalid version format: `{0}`")]
  InvalidVersion(String),

  #[error("Version {version} already exists for platform `{platform}`")]
  ReleaseExists { version: String, platform: String },

  #[error("Release not found")]
  ReleaseNotFound,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
