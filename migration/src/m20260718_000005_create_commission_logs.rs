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
          .table(CommissionLogs::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(CommissionLogs::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(CommissionLogs::AgentId).big_integer().not_null())
          .col(ColumnDef::new(CommissionLogs::UserId).big_integer().not_null())
          .col(ColumnDef::new(CommissionLogs::OrderNo).string().not_null())
          .col(ColumnDef::new(CommissionLogs::Amount).double().not_null())
          .col(ColumnDef::new(CommissionLogs::Rate).double().not_null())
          .col(ColumnDef::new(CommissionLogs::Profit).double().not_null())
          .col(
            ColumnDef::new(CommissionLogs::Withdrawn)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(CommissionLogs::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_commission_logs_agent")
              .from(CommissionLogs::Table, CommissionLogs::AgentId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_commission_logs_agent")
          .table(CommissionLogs::Table)
          .col(CommissionLogs::AgentId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(CommissionLogs::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum CommissionLogs {
  Table,
  Id,
  AgentId,
  UserId,
  OrderNo,
  Amount,
  Rate,
  Profit,
  Withdrawn,
  CreatedAt,
}
