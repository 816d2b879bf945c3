pub mod server;

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::sleep};
use tracing::{error, info, warn};

use crate::state::AppState;

const RESTART_DELAY: Duration = Duration::from_secs(5);

/// A long-running service supervised by [`App`].
#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct App {
  plugins: Vec<Arc<dyn Plugin>>,
}

/// Supervisors of the registered plugins.
pub struct Running {
  supervisors: Vec<(&'static str, JoinHandle<()>)>,
}

impl Running {
  pub async fn shutdown(self) {
    for (name, supervisor) in self.supervisors {
      supervisor.abort();
      if let Err(err) = supervisor.await
        && !err.is_cancelled()
      {
        error!("Service `{name}` failed during shutdown: {err}");
      }
      info!("SYSTEM: Service `{name}` stopped");
    }
  }
}

impl App {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  /// Spawns every plugin; a plugin that returns or crashes is restarted
  /// after [`RESTART_DELAY`].
  pub fn run(self, app: Arc<AppState>) -> Running {
    let supervisors = self
      .plugins
      .into_iter()
      .map(|plugin| {
        let name = plugin.name();
        (name, tokio::spawn(supervise(plugin, app.clone())))
      })
      .collect();

    Running { supervisors }
  }
}

/// Cancels the wrapped task when the supervisor itself is aborted.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
  fn drop(&mut self) {
    self.0.abort();
  }
}

async fn supervise(plugin: Arc<dyn Plugin>, app: Arc<AppState>) {
  let name = plugin.name();
  info!("SYSTEM: Service `{name}` initialized");

  loop {
    let mut task = {
      let plugin = plugin.clone();
      let app = app.clone();
      AbortOnDrop(tokio::spawn(async move { plugin.start(app).await }))
    };

    match (&mut task.0).await {
      Ok(Ok(())) => warn!("Service `{name}` stopped unexpectedly (Ok)."),
      Ok(Err(err)) => error!("Service `{name}` crashed with error: {err:#}."),
      Err(err) if err.is_cancelled() => {
        info!("Service `{name}` shutdown.");
        break;
      }
      Err(_) => error!("Service `{name}` PANICKED!"),
    }

    sleep(RESTART_DELAY).await;
    info!("SYSTEM: Restarting service `{name}`...");
  }
}
