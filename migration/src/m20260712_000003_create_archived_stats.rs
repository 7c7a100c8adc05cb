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
          .table(ArchivedStats::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(ArchivedStats::UserId)
              .big_integer()
              .not_null()
              .primary_key(),
          )
          .col(
            ColumnDef::new(ArchivedStats::TotalCount)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(ArchivedStats::LastArchived).date_time().not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_archived_stats_user")
              .from(ArchivedStats::Table, ArchivedStats::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(ArchivedStats::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum ArchivedStats {
  Table,
  UserId,
  TotalCount,
  LastArchived,
}
