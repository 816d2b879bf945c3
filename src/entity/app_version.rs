//! Published app releases, one row per `(version, platform)`

use std::cmp::Ordering;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::version;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_versions")]
pub struct Model {
  /// Auto increment, doubles as creation order.
  #[sea_orm(primary_key)]
  pub id: i32,
  pub version: String,
  pub build_number: Option<String>,
  pub platform: String,
  /// Stored for administrators, not consulted when deciding updates.
  pub minimum_required_version: Option<String>,
  /// Locale code -> text.
  pub release_notes: Option<Json>,
  pub release_date: Date,
  pub download_url: Option<String>,
  pub force_update: bool,
  pub is_active: bool,
  pub is_beta: bool,
  pub is_rollback: bool,
  pub metadata: Option<Json>,
  pub created_by: Option<i64>,
  pub updated_by: Option<i64>,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
  /// Strict semver comparison; unparseable versions are never newer.
  pub fn is_newer_than(&self, other: &str) -> bool {
    version::compare(&self.version, other) == Some(Ordering::Greater)
  }

  pub fn is_older_than(&self, other: &str) -> bool {
    version::compare(&self.version, other) == Some(Ordering::Less)
  }

  /// The force flag only matters when this release is ahead of the client.
  pub fn requires_force_update_from(&self, other: &str) -> bool {
    self.force_update && self.is_newer_than(other)
  }
}
