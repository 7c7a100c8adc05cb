use sea_orm_migration::prelude::*;

use super::m20260712_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(DailyStats::Table)
          .if_not_exists()
          .col(ColumnDef::new(DailyStats::UserId).big_integer().not_null())
          .col(ColumnDef::new(DailyStats::Day).date().not_null())
          .col(
            ColumnDef::new(DailyStats::Count)
              .big_integer()
              .not_null()
              .default(0),
          )
          .primary_key(
            Index::create()
              .name("pk_daily_stats")
              .col(DailyStats::UserId)
              .col(DailyStats::Day),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_daily_stats_user")
              .from(DailyStats::Table, DailyStats::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_daily_stats_day")
          .table(DailyStats::Table)
          .col(DailyStats::Day)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(DailyStats::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum DailyStats {
  Table,
  UserId,
  Day,
  Count,
}
