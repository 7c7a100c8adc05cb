use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user;

/// Append-only profit record for a referring agent. The rate is a
/// snapshot taken at settlement time; later rate changes never touch
/// rows already written.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commission_logs")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub agent_id: i64,
  pub user_id: i64,
  pub order_no: String,
  pub amount: f64,
  pub rate: f64,
  pub profit: f64,
  pub withdrawn: bool,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::AgentId",
    to = "user::Column::Id"
  )]
  Agent,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Agent.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
