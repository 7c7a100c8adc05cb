mod entity;
mod error;
mod plugins;
mod prelude;
mod state;
mod sv;

use std::env;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{prelude::*, state::AppState};

#[tokio::main]
async fn main() {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "quizcore=debug,tower_http=debug,axum=trace,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_url = env::var("DATABASE_URL")
    .unwrap_or_else(|_| "sqlite:quizcore.db?mode=rwc".into());
  let secret = env::var("SERVER_SECRET").expect("SERVER_SECRET not set");

  info!("Starting quizcore v{}", env!("CARGO_PKG_VERSION"));

  let app_state = Arc::new(AppState::new(&db_url, &secret).await);

  plugins::App::new()
    .register(plugins::server::Plugin)
    .register(plugins::cron::Archiver)
    .run(app_state)
    .await;
}
