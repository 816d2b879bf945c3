use std::cmp::Ordering;

use json::Value;
use serde::Serialize;

use crate::{
  config::Config,
  locale::{self, ReleaseNotes},
  platform::Platform,
  prelude::*,
  sv::Releases,
  version,
};

/// Update decision for one client, independent of when it was computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Decision {
  pub update_available: bool,
  pub latest_version: Option<String>,
  pub force_update: bool,
  pub download_url: Option<String>,
  pub release_date: Option<Date>,
  pub release_notes: Option<ReleaseNotes>,
  /// Only present when an update is available.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub metadata: Option<Value>,
}

fn has_content(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Object(map) => !map.is_empty(),
    Value::Array(items) => !items.is_empty(),
    _ => true,
  }
}

pub struct Updates<'a> {
  releases: Releases<'a>,
  config: &'a Config,
}

impl<'a> Updates<'a> {
  pub fn new(db: &'a DatabaseConnection, config: &'a Config) -> Self {
    Self { releases: Releases::new(db, config), config }
  }

  /// Decides whether a client on `current` should update. Read-only.
  pub async fn check(
    &self,
    current: &str,
    platform: &Platform,
    locale: Option<&str>,
  ) -> Result<Decision> {
    let strict = self.config.validation.semantic_versioning;
    if strict && !version::validate(current) {
      return Err(Error::InvalidVersion(current.to_string()));
    }

    let Some(latest) = self.releases.latest(platform).await? else {
      return Ok(Decision::default());
    };

    let ordering = if strict {
      version::compare(&latest.version, current)
    } else {
      version::compare_lenient(&latest.version, current)
    };
    if ordering.is_none() {
      warn!(
        latest = %latest.version,
        current_version = %current,
        %platform,
        "Versions are not comparable, reporting no update"
      );
    }
    let update_available = ordering == Some(Ordering::Greater);
    let force_update = update_available && latest.force_update;

    let l10n = &self.config.localization;
    let release_notes = locale::resolve(
      latest.release_notes.as_ref(),
      locale,
      &l10n.default_locale,
      &l10n.fallback_locale,
    );

    let metadata = if update_available {
      latest.metadata.filter(has_content)
    } else {
      None
    };

    Ok(Decision {
      update_available,
      latest_version: Some(latest.version),
      force_update,
      download_url: latest.download_url,
      release_date: Some(latest.release_date),
      release_notes,
      metadata,
    })
  }
}

#[cfg(test)]
mod tests {
  use json::json;

  use super::*;
  use crate::{
    config::{Config, LocaleConfig, ValidationConfig},
    sv::{
      NewRelease,
      testing::{date, setup},
    },
  };

  async fn seed(db: &DatabaseConnection, config: &Config) {
    let releases = Releases::new(db, config);
    let ios = config.platforms.get("ios").unwrap();

    releases
      .create(NewRelease {
        is_active: false,
        ..NewRelease::new("1.0.0", ios.clone(), date(2026, 1, 1))
      })
      .await
      .unwrap();
    releases
      .create(NewRelease {
        is_beta: true,
        ..NewRelease::new("1.1.0", ios.clone(), date(2026, 1, 5))
      })
      .await
      .unwrap();
    releases
      .create(NewRelease::new("1.2.0", ios.clone(), date(2026, 1, 10)))
      .await
      .unwrap();
    releases
      .create(NewRelease {
        force_update: true,
        download_url: Some("https://apps.apple.com/app/id1".into()),
        release_notes: Some(json!({ "en": "Bug fixes", "ar": "إصلاحات" })),
        metadata: Some(json!({ "size_mb": 48 })),
        ..NewRelease::new("1.3.0", ios, date(2026, 2, 1))
      })
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn older_client_must_update() {
    let (_dir, db, config) = setup(Config::default()).await;
    seed(&db, &config).await;
    let ios = config.platforms.get("ios").unwrap();

    let decision =
      Updates::new(&db, &config).check("1.0.0", &ios, None).await.unwrap();

    assert!(decision.update_available);
    assert!(decision.force_update);
    assert_eq!(decision.latest_version.as_deref(), Some("1.3.0"));
    assert_eq!(
      decision.download_url.as_deref(),
      Some("https://apps.apple.com/app/id1")
    );
    assert_eq!(decision.release_date, Some(date(2026, 2, 1)));
    assert_eq!(decision.metadata, Some(json!({ "size_mb": 48 })));
    assert!(matches!(decision.release_notes, Some(ReleaseNotes::All(_))));
  }

  #[tokio::test]
  async fn newer_client_ignores_force_flag() {
    let (_dir, db, config) = setup(Config::default()).await;
    seed(&db, &config).await;
    let ios = config.platforms.get("ios").unwrap();

    let decision =
      Updates::new(&db, &config).check("2.0.0", &ios, None).await.unwrap();

    assert!(!decision.update_available);
    assert!(!decision.force_update);
    assert_eq!(decision.latest_version.as_deref(), Some("1.3.0"));
    assert_eq!(decision.metadata, None);
  }

  #[tokio::test]
  async fn up_to_date_client_has_no_update() {
    let (_dir, db, config) = setup(Config::default()).await;
    seed(&db, &config).await;
    let ios = config.platforms.get("ios").unwrap();

    let decision = Updates::new(&db, &config)
      .check("1.3.0+build.77", &ios, None)
      .await
      .unwrap();

    assert!(!decision.update_available);
    assert!(!decision.force_update);
  }

  #[tokio::test]
  async fn prerelease_client_is_behind_release() {
    let (_dir, db, config) = setup(Config::default()).await;
    seed(&db, &config).await;
    let ios = config.platforms.get("ios").unwrap();

    let decision = Updates::new(&db, &config)
      .check("1.3.0-rc.2", &ios, None)
      .await
      .unwrap();

    assert!(decision.update_available);
  }

  #[tokio::test]
  async fn no_release_means_no_update() {
    let (_dir, db, config) = setup(Config::default()).await;
    seed(&db, &config).await;
    let android = config.platforms.get("android").unwrap();

    let decision =
      Updates::new(&db, &config).check("1.0.0", &android, None).await.unwrap();

    assert_eq!(decision, Decision::default());
  }

  #[tokio::test]
  async fn localizes_release_notes() {
    let config = Config {
      localization: LocaleConfig {
        default_locale: "ar".into(),
        fallback_locale: "en".into(),
      },
      ..Config::default()
    };
    let (_dir, db, config) = setup(config).await;
    seed(&db, &config).await;
    let ios = config.platforms.get("ios").unwrap();
    let updates = Updates::new(&db, &config);

    let en = updates.check("1.0.0", &ios, Some("en")).await.unwrap();
    let fr = updates.check("1.0.0", &ios, Some("fr")).await.unwrap();

    assert_eq!(en.release_notes, Some(ReleaseNotes::Text("Bug fixes".into())));
    assert_eq!(fr.release_notes, Some(ReleaseNotes::Text("إصلاحات".into())));
  }

  #[tokio::test]
  async fn rejects_invalid_current_version() {
    let (_dir, db, config) = setup(Config::default()).await;
    seed(&db, &config).await;
    let ios = config.platforms.get("ios").unwrap();

    let err =
      Updates::new(&db, &config).check("v1.0", &ios, None).await.unwrap_err();
    assert!(matches!(err, Error::InvalidVersion(v) if v == "v1.0"));
  }

  #[tokio::test]
  async fn lenient_mode_accepts_partial_versions() {
    let config = Config {
      validation: ValidationConfig {
        semantic_versioning: false,
        ..ValidationConfig::default()
      },
      ..Config::default()
    };
    let (_dir, db, config) = setup(config).await;
    seed(&db, &config).await;
    let ios = config.platforms.get("ios").unwrap();
    let updates = Updates::new(&db, &config);

    let behind = updates.check("v1.2", &ios, None).await.unwrap();
    assert!(behind.update_available);
    assert!(behind.force_update);

    let garbage = updates.check("nightly", &ios, None).await.unwrap();
    assert!(!garbage.update_available);
    assert_eq!(garbage.latest_version.as_deref(), Some("1.3.0"));
  }

  #[tokio::test]
  async fn non_semver_release_is_never_newer_in_strict_mode() {
    let lenient = Config {
      validation: ValidationConfig {
        semantic_versioning: false,
        ..ValidationConfig::default()
      },
      ..Config::default()
    };
    let (_dir, db, lenient) = setup(lenient).await;
    let ios = lenient.platforms.get("ios").unwrap();
    Releases::new(&db, &lenient)
      .create(NewRelease {
        force_update: true,
        ..NewRelease::new("v2", ios.clone(), date(2026, 4, 1))
      })
      .await
      .unwrap();

    let strict = Config::default();
    let decision =
      Updates::new(&db, &strict).check("1.0.0", &ios, None).await.unwrap();
    assert!(!decision.update_available);
    assert!(!decision.force_update);
    assert_eq!(decision.latest_version.as_deref(), Some("v2"));

    let decision =
      Updates::new(&db, &lenient).check("1.0.0", &ios, None).await.unwrap();
    assert!(decision.update_available);
  }

  #[tokio::test]
  async fn empty_metadata_is_omitted() {
    let (_dir, db, config) = setup(Config::default()).await;
    let releases = Releases::new(&db, &config);
    let android = config.platforms.get("android").unwrap();

    releases
      .create(NewRelease {
        metadata: Some(json!({})),
        ..NewRelease::new("2.0.0", android.clone(), date(2026, 1, 1))
      })
      .await
      .unwrap();

    let decision =
      Updates::new(&db, &config).check("1.0.0", &android, None).await.unwrap();

    assert!(decision.update_available);
    assert_eq!(decision.metadata, None);
  }

  #[tokio::test]
  async fn repeated_checks_are_identical() {
    let (_dir, db, config) = setup(Config::default()).await;
    seed(&db, &config).await;
    let ios = config.platforms.get("ios").unwrap();
    let updates = Updates::new(&db, &config);

    let first = updates.check("1.2.0", &ios, Some("en")).await.unwrap();
    let second = updates.check("1.2.0", &ios, Some("en")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
      json::to_vec(&first).unwrap(),
      json::to_vec(&second).unwrap()
    );
  }
}
