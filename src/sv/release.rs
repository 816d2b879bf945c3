use json::Value;

use crate::{
  config::Config,
  entity::app_version,
  platform::Platform,
  prelude::*,
  version,
};

/// Input for [`Releases::create`].
#[derive(Debug, Clone)]
pub struct NewRelease {
  pub version: String,
  pub platform: Platform,
  pub release_date: Date,
  pub build_number: Option<String>,
  pub minimum_required_version: Option<String>,
  pub release_notes: Option<Value>,
  pub download_url: Option<String>,
  pub force_update: bool,
  pub is_active: bool,
  pub is_beta: bool,
  pub is_rollback: bool,
  pub metadata: Option<Value>,
  pub created_by: Option<i64>,
}

impl NewRelease {
  pub fn new(
    version: impl Into<String>,
    platform: Platform,
    release_date: Date,
  ) -> Self {
    Self {
      version: version.into(),
      platform,
      release_date,
      build_number: None,
      minimum_required_version: None,
      release_notes: None,
      download_url: None,
      force_update: false,
      is_active: true,
      is_beta: false,
      is_rollback: false,
      metadata: None,
      created_by: None,
    }
  }
}

pub struct Releases<'a> {
  db: &'a DatabaseConnection,
  config: &'a Config,
}

impl<'a> Releases<'a> {
  pub fn new(db: &'a DatabaseConnection, config: &'a Config) -> Self {
    Self { db, config }
  }

  /// Rows visible to `platform`: its own and the wildcard's.
  fn visible_to(&self, platform: &Platform) -> Condition {
    let wildcard = self.config.platforms.wildcard();
    Condition::any()
      .add(app_version::Column::Platform.eq(platform.as_str()))
      .add(app_version::Column::Platform.eq(wildcard.as_str()))
  }

  /// The current latest stable release for `platform`: newest release date,
  /// ties going to the most recently created row.
  pub async fn latest(
    &self,
    platform: &Platform,
  ) -> Result<Option<app_version::Model>> {
    let release = app_version::Entity::find()
      .filter(self.visible_to(platform))
      .filter(app_version::Column::IsActive.eq(true))
      .filter(app_version::Column::IsBeta.eq(false))
      .order_by_desc(app_version::Column::ReleaseDate)
      .order_by_desc(app_version::Column::Id)
      .one(self.db)
      .await?;
    Ok(release)
  }

  pub async fn by_version(
    &self,
    version: &str,
    platform: &Platform,
  ) -> Result<Option<app_version::Model>> {
    let release = app_version::Entity::find()
      .filter(app_version::Column::Version.eq(version))
      .filter(app_version::Column::Platform.eq(platform.as_str()))
      .one(self.db)
      .await?;
    Ok(release)
  }

  pub async fn create(&self, new: NewRelease) -> Result<app_version::Model> {
    let rules = &self.config.validation;
    if new.version.chars().count() > rules.max_version_length
      || (rules.semantic_versioning && !version::validate(&new.version))
    {
      return Err(Error::InvalidVersion(new.version));
    }

    if self.by_version(&new.version, &new.platform).await?.is_some() {
      return Err(Error::ReleaseExists {
        version: new.version,
        platform: new.platform.to_string(),
      });
    }

    let now = Utc::now().naive_utc();
    let release = app_version::ActiveModel {
      id: NotSet,
      version: Set(new.version),
      build_number: Set(new.build_number),
      platform: Set(new.platform.to_string()),
      minimum_required_version: Set(new.minimum_required_version),
      release_notes: Set(new.release_notes),
      release_date: Set(new.release_date),
      download_url: Set(new.download_url),
      force_update: Set(new.force_update),
      is_active: Set(new.is_active),
      is_beta: Set(new.is_beta),
      is_rollback: Set(new.is_rollback),
      metadata: Set(new.metadata),
      created_by: Set(new.created_by),
      updated_by: Set(new.created_by),
      created_at: Set(now),
      updated_at: Set(now),
    };

    Ok(release.insert(self.db).await?)
  }

  pub async fn set_active(&self, id: i32, active: bool) -> Result<()> {
    let release = app_version::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::ReleaseNotFound)?;

    app_version::ActiveModel {
      is_active: Set(active),
      updated_at: Set(Utc::now().naive_utc()),
      ..release.into()
    }
    .update(self.db)
    .await?;

    Ok(())
  }

  /// Every release, newest release date first.
  pub async fn all(&self) -> Result<Vec<app_version::Model>> {
    let releases = app_version::Entity::find()
      .order_by_desc(app_version::Column::ReleaseDate)
      .order_by_desc(app_version::Column::Id)
      .all(self.db)
      .await?;
    Ok(releases)
  }

  pub async fn count(&self) -> Result<u64> {
    Ok(app_version::Entity::find().count(self.db).await?)
  }

  pub async fn count_active(&self) -> Result<u64> {
    let count = app_version::Entity::find()
      .filter(app_version::Column::IsActive.eq(true))
      .count(self.db)
      .await?;
    Ok(count)
  }

  pub async fn count_beta(&self) -> Result<u64> {
    let count = app_version::Entity::find()
      .filter(app_version::Column::IsBeta.eq(true))
      .count(self.db)
      .await?;
    Ok(count)
  }

  /// Includes wildcard releases.
  pub async fn count_for_platform(&self, platform: &Platform) -> Result<u64> {
    let count = app_version::Entity::find()
      .filter(self.visible_to(platform))
      .count(self.db)
      .await?;
    Ok(count)
  }

  pub async fn count_active_for_platform(
    &self,
    platform: &Platform,
  ) -> Result<u64> {
    let count = app_version::Entity::find()
      .filter(self.visible_to(platform))
      .filter(app_version::Column::IsActive.eq(true))
      .count(self.db)
      .await?;
    Ok(count)
  }

  /// Aggregate counts with a per-platform breakdown, keyed by token in
  /// registry order.
  pub async fn stats(&self) -> Result<Value> {
    let mut platforms = json::Map::new();

    for def in self.config.platforms.defs() {
      let Some(platform) = self.config.platforms.get(&def.token) else {
        continue;
      };

      let latest = self.latest(&platform).await?.map(|r| r.version);
      platforms.insert(
        def.token.clone(),
        json::json!({
          "label": def.label,
          "total_versions": self.count_for_platform(&platform).await?,
          "active_versions": self.count_active_for_platform(&platform).await?,
          "latest_version": latest,
        }),
      );
    }

    Ok(json::json!({
      "success": true,
      "total_versions": self.count().await?,
      "active_versions": self.count_active().await?,
      "beta_versions": self.count_beta().await?,
      "platforms": platforms,
    }))
  }
}
