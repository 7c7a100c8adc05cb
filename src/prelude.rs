pub use std::{collections::HashMap, sync::Arc, time::Duration};

pub use chrono::{Days, NaiveDate, NaiveDateTime as DateTime, Utc};
pub use sea_orm::{
  ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection,
  EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
  Set, TransactionTrait,
  sea_query::{Expr, OnConflict},
};
pub use tracing::{debug, error, info, trace, warn};

pub use crate::error::{Error, Result};
