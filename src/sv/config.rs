use std::sync::RwLock;

use crate::{entity::config, prelude::*};

pub mod keys {
  pub const COMMISSION_RATE: &str = "commission_rate";
  pub const POINT_RATIO: &str = "point_ratio";
}

/// Seeded into the backing table on first start; existing rows win.
const DEFAULTS: &[(&str, &str)] =
  &[(keys::COMMISSION_RATE, "0.20"), (keys::POINT_RATIO, "1.0")];

/// In-memory mirror of the `configs` table. The table is the source of
/// truth; writes become visible only through a full `reload`.
pub struct ConfigCache {
  entries: RwLock<HashMap<String, String>>,
}

impl ConfigCache {
  pub fn new() -> Self {
    Self { entries: RwLock::new(HashMap::new()) }
  }

  /// Seed defaults for missing keys, then load the whole table.
  pub async fn init(&self, db: &DatabaseConnection) -> Result<()> {
    for (key, value) in DEFAULTS {
      config::Entity::insert(config::ActiveModel {
        key: Set((*key).to_string()),
        value: Set((*value).to_string()),
      })
      .on_conflict(
        OnConflict::column(config::Column::Key).do_nothing().to_owned(),
      )
      .exec_without_returning(db)
      .await?;
    }

    self.reload(db).await
  }

  /// Replace the entire in-memory mapping from the database.
  pub async fn reload(&self, db: &DatabaseConnection) -> Result<()> {
    let rows = config::Entity::find().all(db).await?;
    let entries: HashMap<String, String> =
      rows.into_iter().map(|row| (row.key, row.value)).collect();

    *self.entries.write().expect("config cache lock poisoned") = entries;
    Ok(())
  }

  /// Upsert a row and reload so the new value becomes visible.
  pub async fn put(
    &self,
    db: &DatabaseConnection,
    key: &str,
    value: &str,
  ) -> Result<()> {
    config::Entity::insert(config::ActiveModel {
      key: Set(key.to_string()),
      value: Set(value.to_string()),
    })
    .on_conflict(
      OnConflict::column(config::Column::Key)
        .update_column(config::Column::Value)
        .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    self.reload(db).await
  }

  /// Raw value for a key, empty string if unset.
  pub fn get(&self, key: &str) -> String {
    self
      .entries
      .read()
      .expect("config cache lock poisoned")
      .get(key)
      .cloned()
      .unwrap_or_default()
  }

  /// Parse a stored value as a float. Misconfiguration never fails the
  /// caller, it only falls back to `default`.
  pub fn get_float(&self, key: &str, default: f64) -> f64 {
    let raw = self.get(key);
    if raw.is_empty() {
      return default;
    }

    match raw.parse() {
      Ok(value) => value,
      Err(_) => {
        warn!("Config `{key}` is not a number (`{raw}`), using {default}");
        default
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::test_db;

  #[tokio::test]
  async fn test_seed_and_read() {
    let db = test_db::setup().await;

    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();

    assert_eq!(cache.get(keys::COMMISSION_RATE), "0.20");
    assert_eq!(cache.get_float(keys::COMMISSION_RATE, 0.1), 0.2);
  }

  #[tokio::test]
  async fn test_get_float_missing_key() {
    let db = test_db::setup().await;

    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();

    assert_eq!(cache.get_float("missing_key", 0.2), 0.2);
    assert_eq!(cache.get("missing_key"), "");
  }

  #[tokio::test]
  async fn test_get_float_malformed_value() {
    let db = test_db::setup().await;

    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();
    cache.put(&db, keys::COMMISSION_RATE, "abc").await.unwrap();

    assert_eq!(cache.get_float(keys::COMMISSION_RATE, 0.3), 0.3);
  }

  #[tokio::test]
  async fn test_put_becomes_visible() {
    let db = test_db::setup().await;

    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();
    cache.put(&db, keys::COMMISSION_RATE, "0.50").await.unwrap();

    assert_eq!(cache.get_float(keys::COMMISSION_RATE, 0.2), 0.5);
  }

  #[tokio::test]
  async fn test_seed_does_not_overwrite() {
    let db = test_db::setup().await;

    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();
    cache.put(&db, keys::COMMISSION_RATE, "0.50").await.unwrap();

    // a second startup must keep the admin-written value
    cache.init(&db).await.unwrap();

    assert_eq!(cache.get(keys::COMMISSION_RATE), "0.50");
  }

  #[tokio::test]
  async fn test_reload_replaces_whole_map() {
    let db = test_db::setup().await;

    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();
    cache.put(&db, "motd", "hello").await.unwrap();

    config::Entity::delete_by_id("motd").exec(&db).await.unwrap();
    cache.reload(&db).await.unwrap();

    assert_eq!(cache.get("motd"), "");
    assert_eq!(cache.get(keys::COMMISSION_RATE), "0.20");
  }
}
