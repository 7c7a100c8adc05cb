use migration::{Migrator, MigratorTrait};

use crate::{prelude::*, sv::ConfigCache};

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: ConfigCache,
  pub secret: String,
}

impl AppState {
  pub async fn new(db_url: &str, secret: &str) -> Self {
    let db = Database::connect(db_url)
      .await
      .expect("Failed to connect to database");

    Migrator::up(&db, None).await.expect("Failed to run migrations");

    let config = ConfigCache::new();
    config.init(&db).await.expect("Failed to initialize config cache");

    Self { db, config, secret: secret.to_string() }
  }
}
