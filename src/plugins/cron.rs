use std::sync::Arc;

use async_trait::async_trait;

use crate::{plugins::Plugin, prelude::*, state::AppState, sv};

/// Rolls aged daily stats into lifetime totals once a day. There is no
/// persisted last-run checkpoint: process downtime delays the next run,
/// it never replays a missed one.
pub struct Archiver;

#[async_trait]
impl Plugin for Archiver {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    info!("Stat archiver started (interval: 24h)");

    let mut interval = tokio::time::interval(Duration::from_secs(24 * 3600));

    // the first tick fires immediately, skip it
    interval.tick().await;

    loop {
      interval.tick().await;

      match sv::Stats::new(&app.db).perform_archive().await {
        Ok(0) => debug!("No daily stats old enough to archive"),
        Ok(deleted) => info!("Archived {} daily stat rows", deleted),
        Err(err) => error!("Stat archive failed: {}", err),
      }
    }
  }
}
