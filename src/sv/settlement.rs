use uuid::Uuid;

use crate::{
  entity::{OrderStatus, commission_log, order, user},
  prelude::*,
  sv::{self, ConfigCache, config::keys},
};

/// Fallback when `commission_rate` is unset or malformed.
pub const DEFAULT_COMMISSION_RATE: f64 = 0.2;

pub struct Settlement<'a> {
  db: &'a DatabaseConnection,
  config: &'a ConfigCache,
}

impl<'a> Settlement<'a> {
  pub fn new(db: &'a DatabaseConnection, config: &'a ConfigCache) -> Self {
    Self { db, config }
  }

  /// Create a PENDING order. The point award is fixed here from the
  /// current `point_ratio`, not recomputed at settlement time.
  pub async fn checkout(
    &self,
    user_id: i64,
    amount: f64,
  ) -> Result<order::Model> {
    if amount <= 0.0 {
      return Err(Error::InvalidArgs("Order amount must be positive".into()));
    }

    sv::User::new(self.db).get_or_create(user_id).await?;

    let ratio = self.config.get_float(keys::POINT_RATIO, 1.0);
    let points = (amount * ratio) as i64;
    let now = Utc::now().naive_utc();

    let order = order::ActiveModel {
      order_no: Set(Uuid::new_v4().to_string()),
      user_id: Set(user_id),
      amount: Set(amount),
      points: Set(points),
      status: Set(OrderStatus::Pending),
      trade_no: Set(None),
      pay_time: Set(None),
      created_at: Set(now),
    };

    Ok(order.insert(self.db).await?)
  }

  /// Finalize a payment exactly once: mark the order paid, credit the
  /// buyer's points, and log the referrer's commission. Everything runs
  /// in one transaction; a failure anywhere rolls the whole settlement
  /// back, so a partially-paid order cannot exist. Re-invoking on a
  /// paid order is a no-op, which makes retried provider callbacks safe.
  pub async fn settle(&self, order_no: &str, trade_no: &str) -> Result<()> {
    let txn = self.db.begin().await?;

    // row lock serializes duplicate callbacks for the same order
    let order = order::Entity::find_by_id(order_no)
      .lock_exclusive()
      .one(&txn)
      .await?
      .ok_or(Error::OrderNotFound)?;

    if order.status == OrderStatus::Paid {
      debug!("Order {order_no} already settled, skipping");
      txn.commit().await?;
      return Ok(());
    }

    let user_id = order.user_id;
    let amount = order.amount;
    let points = order.points;
    let now = Utc::now().naive_utc();

    order::ActiveModel {
      status: Set(OrderStatus::Paid),
      trade_no: Set(Some(trade_no.to_string())),
      pay_time: Set(Some(now)),
      ..order.into()
    }
    .update(&txn)
    .await?;

    // atomic increment, tolerant of concurrent point changes
    let credited = user::Entity::update_many()
      .col_expr(
        user::Column::Points,
        Expr::col(user::Column::Points).add(points),
      )
      .filter(user::Column::Id.eq(user_id))
      .exec(&txn)
      .await?;

    if credited.rows_affected == 0 {
      return Err(Error::UserNotFound);
    }

    let buyer = user::Entity::find_by_id(user_id)
      .one(&txn)
      .await?
      .ok_or(Error::UserNotFound)?;

    if let Some(agent_id) = buyer.invited_by {
      if user::Entity::find_by_id(agent_id).one(&txn).await?.is_some() {
        let rate = self
          .config
          .get_float(keys::COMMISSION_RATE, DEFAULT_COMMISSION_RATE);
        let profit = amount * rate;

        if profit > 0.0 {
          commission_log::ActiveModel {
            id: NotSet,
            agent_id: Set(agent_id),
            user_id: Set(user_id),
            order_no: Set(order_no.to_string()),
            amount: Set(amount),
            rate: Set(rate),
            profit: Set(profit),
            withdrawn: Set(false),
            created_at: Set(now),
          }
          .insert(&txn)
          .await?;
        }
      } else {
        warn!("Order {order_no}: referrer {agent_id} does not exist");
      }
    }

    txn.commit().await?;

    info!("Order {order_no} settled (user {user_id}, +{points} points)");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::test_db;

  async fn insert_user(
    db: &DatabaseConnection,
    id: i64,
    invited_by: Option<i64>,
  ) {
    let now = Utc::now().naive_utc();
    user::ActiveModel {
      id: Set(id),
      reg_date: Set(now),
      points: Set(0),
      invited_by: Set(invited_by),
    }
    .insert(db)
    .await
    .unwrap();
  }

  async fn insert_order(
    db: &DatabaseConnection,
    order_no: &str,
    user_id: i64,
    amount: f64,
    points: i64,
  ) {
    let now = Utc::now().naive_utc();
    order::ActiveModel {
      order_no: Set(order_no.to_string()),
      user_id: Set(user_id),
      amount: Set(amount),
      points: Set(points),
      status: Set(OrderStatus::Pending),
      trade_no: Set(None),
      pay_time: Set(None),
      created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
  }

  async fn points_of(db: &DatabaseConnection, id: i64) -> i64 {
    user::Entity::find_by_id(id).one(db).await.unwrap().unwrap().points
  }

  #[tokio::test]
  async fn test_settle_credits_buyer_and_agent() {
    let db = test_db::setup().await;
    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();

    insert_user(&db, 3, None).await;
    insert_user(&db, 7, Some(3)).await;
    insert_order(&db, "X1", 7, 100.0, 50).await;

    Settlement::new(&db, &cache).settle("X1", "TRADE1").await.unwrap();

    let order =
      order::Entity::find_by_id("X1").one(&db).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.trade_no.as_deref(), Some("TRADE1"));
    assert!(order.pay_time.is_some());

    assert_eq!(points_of(&db, 7).await, 50);

    let logs = commission_log::Entity::find().all(&db).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].agent_id, 3);
    assert_eq!(logs[0].user_id, 7);
    assert_eq!(logs[0].order_no, "X1");
    assert_eq!(logs[0].amount, 100.0);
    assert_eq!(logs[0].rate, 0.2);
    assert_eq!(logs[0].profit, 20.0);
    assert!(!logs[0].withdrawn);
  }

  #[tokio::test]
  async fn test_settle_is_idempotent() {
    let db = test_db::setup().await;
    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();

    insert_user(&db, 3, None).await;
    insert_user(&db, 7, Some(3)).await;
    insert_order(&db, "X1", 7, 100.0, 50).await;

    let sv = Settlement::new(&db, &cache);
    sv.settle("X1", "TRADE1").await.unwrap();
    sv.settle("X1", "TRADE1-RETRY").await.unwrap();

    // only the first call has effect
    let order =
      order::Entity::find_by_id("X1").one(&db).await.unwrap().unwrap();
    assert_eq!(order.trade_no.as_deref(), Some("TRADE1"));
    assert_eq!(points_of(&db, 7).await, 50);

    let logs = commission_log::Entity::find().all(&db).await.unwrap();
    assert_eq!(logs.len(), 1);
  }

  #[tokio::test]
  async fn test_settle_without_referrer() {
    let db = test_db::setup().await;
    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();

    insert_user(&db, 7, None).await;
    insert_order(&db, "X1", 7, 100.0, 50).await;

    Settlement::new(&db, &cache).settle("X1", "TRADE1").await.unwrap();

    assert_eq!(points_of(&db, 7).await, 50);

    let logs = commission_log::Entity::find().all(&db).await.unwrap();
    assert!(logs.is_empty());
  }

  #[tokio::test]
  async fn test_settle_with_dangling_referrer() {
    let db = test_db::setup().await;
    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();

    insert_user(&db, 7, Some(99)).await;
    insert_order(&db, "X1", 7, 100.0, 50).await;

    Settlement::new(&db, &cache).settle("X1", "TRADE1").await.unwrap();

    assert_eq!(points_of(&db, 7).await, 50);
    assert!(commission_log::Entity::find().all(&db).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_rate_is_snapshotted_per_settlement() {
    let db = test_db::setup().await;
    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();

    insert_user(&db, 3, None).await;
    insert_user(&db, 7, Some(3)).await;
    insert_order(&db, "X1", 7, 100.0, 50).await;
    insert_order(&db, "X2", 7, 100.0, 50).await;

    let sv = Settlement::new(&db, &cache);
    sv.settle("X1", "T1").await.unwrap();

    cache.put(&db, keys::COMMISSION_RATE, "0.50").await.unwrap();
    sv.settle("X2", "T2").await.unwrap();

    let logs = commission_log::Entity::find().all(&db).await.unwrap();
    assert_eq!(logs.len(), 2);

    let first = logs.iter().find(|log| log.order_no == "X1").unwrap();
    let second = logs.iter().find(|log| log.order_no == "X2").unwrap();

    // the later rate change never rewrites the earlier audit record
    assert_eq!(first.rate, 0.2);
    assert_eq!(first.profit, 20.0);
    assert_eq!(second.rate, 0.5);
    assert_eq!(second.profit, 50.0);
  }

  #[tokio::test]
  async fn test_zero_rate_writes_no_log() {
    let db = test_db::setup().await;
    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();
    cache.put(&db, keys::COMMISSION_RATE, "0").await.unwrap();

    insert_user(&db, 3, None).await;
    insert_user(&db, 7, Some(3)).await;
    insert_order(&db, "X1", 7, 100.0, 50).await;

    Settlement::new(&db, &cache).settle("X1", "TRADE1").await.unwrap();

    assert_eq!(points_of(&db, 7).await, 50);
    assert!(commission_log::Entity::find().all(&db).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_settle_unknown_order() {
    let db = test_db::setup().await;
    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();

    let result = Settlement::new(&db, &cache).settle("NOPE", "T").await;
    assert!(matches!(result, Err(Error::OrderNotFound)));
  }

  #[tokio::test]
  async fn test_checkout_creates_pending_order() {
    let db = test_db::setup().await;
    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();

    let order =
      Settlement::new(&db, &cache).checkout(7, 80.0).await.unwrap();

    assert_eq!(order.user_id, 7);
    assert_eq!(order.amount, 80.0);
    assert_eq!(order.points, 80);
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.trade_no.is_none());
    assert!(order.pay_time.is_none());
  }

  #[tokio::test]
  async fn test_checkout_rejects_non_positive_amount() {
    let db = test_db::setup().await;
    let cache = ConfigCache::new();
    cache.init(&db).await.unwrap();

    let result = Settlement::new(&db, &cache).checkout(7, 0.0).await;
    assert!(matches!(result, Err(Error::InvalidArgs(_))));
  }
}
