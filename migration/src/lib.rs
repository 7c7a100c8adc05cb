pub use sea_orm_migration::prelude::*;

mod m20260712_000001_create_users;
mod m20260712_000002_create_daily_stats;
mod m20260712_000003_create_archived_stats;
mod m20260718_000004_create_orders;
mod m20260718_000005_create_commission_logs;
mod m20260725_000006_create_configs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260712_000001_create_users::Migration),
      Box::new(m20260712_000002_create_daily_stats::Migration),
      Box::new(m20260712_000003_create_archived_stats::Migration),
      Box::new(m20260718_000004_create_orders::Migration),
      Box::new(m20260718_000005_create_commission_logs::Migration),
      Box::new(m20260725_000006_create_configs::Migration),
    ]
  }
}
