use std::sync::Arc;

use axum::{
  Json,
  body::Bytes,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::SecondsFormat;
use json::Value;
use serde::Serialize;

use super::request::{CheckReq, FieldErrors};
use crate::{
  cache::CheckKey,
  locale::ReleaseNotes,
  platform::Platform,
  prelude::*,
  state::AppState,
};

pub const VERSION_CHECK_FAILED: &str = "VERSION_CHECK_FAILED";
pub const INVALID_VERSION_FORMAT: &str = "INVALID_VERSION_FORMAT";
pub const STATS_FAILED: &str = "STATS_FAILED";

const INVALID_VERSION_MESSAGE: &str =
  "Invalid version format. Please use semantic versioning (e.g., 1.0.0)";

#[derive(Debug, Serialize)]
pub struct Failure {
  pub success: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub errors: Option<FieldErrors>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error_code: Option<&'static str>,
}

impl Failure {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      success: false,
      message: message.into(),
      errors: None,
      error_code: None,
    }
  }

  pub fn code(self, code: &'static str) -> Self {
    Self { error_code: Some(code), ..self }
  }

  pub fn errors(self, errors: FieldErrors) -> Self {
    Self { errors: Some(errors), ..self }
  }

  pub fn disabled() -> (StatusCode, Json<Self>) {
    (
      StatusCode::SERVICE_UNAVAILABLE,
      Json(Self::new("Version API is disabled")),
    )
  }
}

#[derive(Debug, Serialize)]
pub struct CheckRes {
  pub success: bool,
  pub current_version: String,
  pub platform: Platform,
  pub platform_label: String,
  pub update_available: bool,
  pub latest_version: Option<String>,
  pub force_update: bool,
  pub download_url: Option<String>,
  pub release_date: Option<Date>,
  pub release_notes: Option<ReleaseNotes>,
  pub checked_at: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub metadata: Option<Value>,
}

pub async fn check(State(app): State<Arc<AppState>>, body: Bytes) -> Response {
  if !app.api_enabled() {
    return Failure::disabled().into_response();
  }

  let req = match CheckReq::parse(&body, &app.config) {
    Ok(req) => req,
    Err(errors) => {
      return (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(Failure::new("Validation failed").errors(errors)),
      )
        .into_response();
    }
  };

  let key = CheckKey {
    platform: req.platform.clone(),
    current_version: req.current_version.clone(),
    build_number: req.build_number.clone(),
    locale: req.locale.clone(),
  };

  let decision = app
    .cache
    .get_or_compute(key, app.config.api.cache_ttl, || async {
      app
        .sv()
        .updates
        .check(&req.current_version, &req.platform, req.locale.as_deref())
        .await
    })
    .await;

  let decision = match decision {
    Ok(decision) => decision,
    Err(Error::InvalidVersion(_)) => {
      let failure =
        Failure::new(INVALID_VERSION_MESSAGE).code(INVALID_VERSION_FORMAT);
      return Json(failure).into_response();
    }
    Err(err) => {
      error!(
        current_version = %req.current_version,
        platform = %req.platform,
        error = %err,
        "Version check failed"
      );
      return Json(
        Failure::new("An error occurred while checking for updates")
          .code(VERSION_CHECK_FAILED),
      )
      .into_response();
    }
  };

  let platform_label = app.config.platforms.label(&req.platform).to_string();

  Json(CheckRes {
    success: true,
    current_version: req.current_version,
    platform: req.platform,
    platform_label,
    update_available: decision.update_available,
    latest_version: decision.latest_version,
    force_update: decision.force_update,
    download_url: decision.download_url,
    release_date: decision.release_date,
    release_notes: decision.release_notes,
    checked_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    metadata: decision.metadata,
  })
  .into_response()
}

pub async fn stats(State(app): State<Arc<AppState>>) -> Response {
  if !app.api_enabled() {
    return Failure::disabled().into_response();
  }

  match app.sv().releases.stats().await {
    Ok(stats) => Json(stats).into_response(),
    Err(err) => {
      error!(error = %err, "Version stats failed");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(
          Failure::new("An error occurred while fetching version statistics")
            .code(STATS_FAILED),
        ),
      )
        .into_response()
    }
  }
}

pub async fn health() -> &'static str {
  "OK"
}
