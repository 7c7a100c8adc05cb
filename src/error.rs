use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Db(#[from] sea_orm::DbErr),

  #[error("user not found")]
  UserNotFound,

  #[error("order not found")]
  OrderNotFound,

  #[error("invalid arguments: {0}")]
  InvalidArgs(String),
}
