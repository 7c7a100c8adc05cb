use crate::{
  entity::{archived_stat, daily_stat},
  prelude::*,
  sv,
};

/// Daily rows older than this many days get rolled into `archived_stats`.
const RETENTION_DAYS: u64 = 365;

pub struct Stats<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Stats<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Bump today's answer counter for a user. Insert-or-increment in a
  /// single statement, so concurrent submissions never lose a count.
  pub async fn record_answer(&self, user_id: i64) -> Result<()> {
    sv::User::new(self.db).get_or_create(user_id).await?;

    let today = Utc::now().date_naive();
    daily_stat::Entity::insert(daily_stat::ActiveModel {
      user_id: Set(user_id),
      day: Set(today),
      count: Set(1),
    })
    .on_conflict(
      OnConflict::columns([daily_stat::Column::UserId, daily_stat::Column::Day])
        .value(
          daily_stat::Column::Count,
          Expr::col(daily_stat::Column::Count).add(1),
        )
        .to_owned(),
    )
    .exec_without_returning(self.db)
    .await?;

    Ok(())
  }

  /// Roll every daily row older than the cutoff into its user's
  /// lifetime total, then delete the rolled-up rows. Runs in one
  /// transaction; a failure at any step leaves both tables untouched.
  /// Returns the number of detail rows removed.
  pub async fn perform_archive(&self) -> Result<u64> {
    let cutoff = Utc::now().date_naive() - Days::new(RETENTION_DAYS);
    let now = Utc::now().naive_utc();

    let txn = self.db.begin().await?;

    let rolled: Vec<(i64, Option<i64>)> = daily_stat::Entity::find()
      .select_only()
      .column(daily_stat::Column::UserId)
      .column_as(Expr::col(daily_stat::Column::Count).sum(), "total")
      .filter(daily_stat::Column::Day.lt(cutoff))
      .group_by(daily_stat::Column::UserId)
      .into_tuple()
      .all(&txn)
      .await?;

    if rolled.is_empty() {
      txn.commit().await?;
      return Ok(0);
    }

    for (user_id, total) in rolled {
      let total = total.unwrap_or(0);

      // insert-or-add in one statement, never read-modify-write
      archived_stat::Entity::insert(archived_stat::ActiveModel {
        user_id: Set(user_id),
        total_count: Set(total),
        last_archived: Set(now),
      })
      .on_conflict(
        OnConflict::column(archived_stat::Column::UserId)
          .value(
            archived_stat::Column::TotalCount,
            Expr::col(archived_stat::Column::TotalCount).add(total),
          )
          .value(archived_stat::Column::LastArchived, Expr::value(now))
          .to_owned(),
      )
      .exec_without_returning(&txn)
      .await?;
    }

    // same predicate as the rollup query above
    let deleted = daily_stat::Entity::delete_many()
      .filter(daily_stat::Column::Day.lt(cutoff))
      .exec(&txn)
      .await?;

    txn.commit().await?;
    Ok(deleted.rows_affected)
  }

  /// Archived total plus whatever detail rows remain.
  pub async fn lifetime_total(&self, user_id: i64) -> Result<i64> {
    let archived = archived_stat::Entity::find_by_id(user_id)
      .one(self.db)
      .await?
      .map(|row| row.total_count)
      .unwrap_or(0);

    let recent: Option<Option<i64>> = daily_stat::Entity::find()
      .select_only()
      .column_as(Expr::col(daily_stat::Column::Count).sum(), "total")
      .filter(daily_stat::Column::UserId.eq(user_id))
      .into_tuple()
      .one(self.db)
      .await?;

    Ok(archived + recent.flatten().unwrap_or(0))
  }
}
