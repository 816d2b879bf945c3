#![allow(dead_code)]

use std::sync::Arc;

use app_version::{
  config::Config,
  plugins::server,
  prelude::*,
  state::AppState,
  sv::NewRelease,
};
use axum::{
  Router,
  body::{Body, to_bytes},
  http::{Request, StatusCode, header},
};
use json::{Value, json};
use migration::Migrator;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
  pub state: Arc<AppState>,
  pub router: Router,
  _dir: TempDir,
}

pub fn date(y: i32, m: u32, d: u32) -> Date {
  Date::from_ymd_opt(y, m, d).unwrap()
}

impl TestApp {
  pub async fn new(config: Config) -> Self {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("api.db");
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let db = Database::connect(url.as_str()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let state = Arc::new(AppState::with_db(db, config));
    let router = server::router(state.clone());

    Self { state, router, _dir: dir }
  }

  /// `1.2.0` and `1.3.0` (forced, localized notes, metadata) for iOS, plus
  /// inactive and beta rows that must stay invisible.
  pub async fn seeded(config: Config) -> Self {
    let app = Self::new(config).await;
    let releases = app.state.sv().releases;
    let ios = app.state.config.platforms.get("ios").unwrap();

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
        build_number: Some("130".into()),
        download_url: Some("https://apps.apple.com/app/id1".into()),
        release_notes: Some(json!({
          "en": "Bug fixes",
          "ar": "إصلاحات",
        })),
        metadata: Some(json!({ "size_mb": 48 })),
        ..NewRelease::new("1.3.0", ios, date(2026, 2, 1))
      })
      .await
      .unwrap();

    app
  }

  pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
    self.post_raw(path, json::to_vec(&body).unwrap()).await
  }

  pub async fn post_raw(
    &self,
    path: &str,
    body: Vec<u8>,
  ) -> (StatusCode, Value) {
    let req = Request::post(path)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body))
      .unwrap();
    self.send(req).await
  }

  pub async fn get(&self, path: &str) -> (StatusCode, Value) {
    let req = Request::get(path).body(Body::empty()).unwrap();
    self.send(req).await
  }

  async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
    let res = self.router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
  }
}
