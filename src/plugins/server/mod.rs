mod handlers;
mod request;

use std::{net::SocketAddr, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

pub use self::{
  handlers::{CheckRes, Failure},
  request::{CheckReq, FieldErrors},
};
use crate::{prelude::*, state::AppState};

/// Routes without the network-facing layers (rate limiting needs the peer
/// address, which only exists behind a real listener).
pub fn router(app: Arc<AppState>) -> Router {
  let mut api = Router::new().route("/check", post(handlers::check));
  if app.config.api.enable_stats {
    api = api.route("/stats", get(handlers::stats));
  }

  let router = Router::new().route("/health", get(handlers::health));
  let router = match app.config.api.prefix.as_str() {
    "" | "/" => router.merge(api),
    prefix => router.nest(prefix, api),
  };

  router
    .layer(
      ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
          .allow_origin(Any)
          .allow_methods(Any)
          .allow_headers(Any),
      ),
    )
    .with_state(app)
}

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let per_minute = app.config.api.rate_limit_per_minute.max(1);
    let governor_conf = Arc::new(
      GovernorConfigBuilder::default()
        .per_millisecond((60_000 / u64::from(per_minute)).max(1))
        .burst_size(per_minute)
        .finish()
        .context("Failed to build rate limiter config")?,
    );

    let limiter = governor_conf.limiter().clone();

    let router = router(app.clone())
      .layer(GovernorLayer::new(governor_conf))
      .into_make_service_with_connect_info::<SocketAddr>();

    let addr = SocketAddr::from(([0, 0, 0, 0], app.config.port));
    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP Server listening on {addr}");

    let housekeeping = async {
      loop {
        time::sleep(Duration::from_secs(60)).await;
        limiter.retain_recent();
        app.gc_cache();
      }
    };

    let server = async {
      axum::serve(listener, router).await.context("Axum server error")
    };

    tokio::select! {
      result = server => {
        match &result {
          Ok(_) => info!("Server stopped gracefully"),
          Err(err) => error!("Server stopped with error: {err}"),
        }
        result
      }
      _ = housekeeping => {
        error!("Housekeeping loop stopped unexpectedly!");
        Ok(())
      }
    }
  }
}
