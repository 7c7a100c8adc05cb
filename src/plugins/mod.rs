pub mod cron;
pub mod server;

use std::sync::Arc;

use crate::{prelude::*, state::AppState};

#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

pub struct App {
  plugins: Vec<Box<dyn Plugin>>,
}

impl App {
  pub fn new() -> Self {
    Self { plugins: Vec::new() }
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Box::new(plugin));
    self
  }

  /// Run every registered plugin to completion. Long-lived plugins
  /// (the archiver loop) keep the process alive.
  pub async fn run(self, app: Arc<AppState>) {
    let mut tasks = tokio::task::JoinSet::new();

    for plugin in self.plugins {
      let app = app.clone();
      let name = plugin.name();

      info!("init `{}`", name);

      tasks.spawn(async move {
        if let Err(err) = plugin.start(app).await {
          error!("failed `{}`: {err}", name);
        }
      });
    }

    while tasks.join_next().await.is_some() {}
  }
}
