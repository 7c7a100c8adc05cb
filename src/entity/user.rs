use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{archived_stat, daily_stat, order};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: i64,
  pub reg_date: DateTime,
  pub points: i64,
  /// one-level referral: the agent who invited this user, if any
  pub invited_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "daily_stat::Entity")]
  DailyStats,
  #[sea_orm(has_one = "archived_stat::Entity")]
  ArchivedStats,
  #[sea_orm(has_many = "order::Entity")]
  Orders,
}

impl Related<daily_stat::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::DailyStats.def()
  }
}

impl Related<archived_stat::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::ArchivedStats.def()
  }
}

impl Related<order::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Orders.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
