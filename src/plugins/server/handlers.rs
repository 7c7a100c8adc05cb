use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{prelude::*, state::AppState, sv};

#[derive(Serialize)]
pub struct Status {
  success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  msg: Option<String>,
}

impl Status {
  fn ok() -> Json<Self> {
    Json(Self { success: true, msg: None })
  }

  fn err(msg: impl Into<String>) -> Json<Self> {
    Json(Self { success: false, msg: Some(msg.into()) })
  }
}

fn status_of(err: &Error) -> StatusCode {
  match err {
    Error::UserNotFound | Error::OrderNotFound => StatusCode::NOT_FOUND,
    Error::InvalidArgs(_) => StatusCode::BAD_REQUEST,
    _ => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

fn authorized(app: &AppState, headers: &HeaderMap) -> bool {
  headers
    .get("x-server-secret")
    .and_then(|value| value.to_str().ok())
    .is_some_and(|value| value == app.secret)
}

pub async fn health() -> (StatusCode, Json<json::Value>) {
  (
    StatusCode::OK,
    Json(json::json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") })),
  )
}

#[derive(Deserialize)]
pub struct AnswerReq {
  pub user_id: i64,
}

pub async fn submit_answer(
  State(app): State<Arc<AppState>>,
  Json(req): Json<AnswerReq>,
) -> (StatusCode, Json<Status>) {
  match sv::Stats::new(&app.db).record_answer(req.user_id).await {
    Ok(()) => (StatusCode::OK, Status::ok()),
    Err(err) => (status_of(&err), Status::err(err.to_string())),
  }
}

pub async fn user_stats(
  State(app): State<Arc<AppState>>,
  Path(user_id): Path<i64>,
) -> (StatusCode, Json<json::Value>) {
  let user = match sv::User::new(&app.db).by_id(user_id).await {
    Ok(Some(user)) => user,
    Ok(None) => {
      return (
        StatusCode::NOT_FOUND,
        Json(json::json!({ "error": Error::UserNotFound.to_string() })),
      );
    }
    Err(err) => {
      return (
        status_of(&err),
        Json(json::json!({ "error": err.to_string() })),
      );
    }
  };

  match sv::Stats::new(&app.db).lifetime_total(user_id).await {
    Ok(total) => (
      StatusCode::OK,
      Json(json::json!({
        "user_id": user_id,
        "points": user.points,
        "lifetime_answers": total,
      })),
    ),
    Err(err) => {
      (status_of(&err), Json(json::json!({ "error": err.to_string() })))
    }
  }
}

#[derive(Deserialize)]
pub struct ReferralReq {
  pub user_id: i64,
  pub agent_id: i64,
}

pub async fn bind_referrer(
  State(app): State<Arc<AppState>>,
  Json(req): Json<ReferralReq>,
) -> (StatusCode, Json<Status>) {
  let sv = sv::User::new(&app.db);
  match sv.set_invited_by(req.user_id, req.agent_id).await {
    Ok(()) => (StatusCode::OK, Status::ok()),
    Err(err) => (status_of(&err), Status::err(err.to_string())),
  }
}

#[derive(Deserialize)]
pub struct CheckoutReq {
  pub user_id: i64,
  pub amount: f64,
}

pub async fn checkout(
  State(app): State<Arc<AppState>>,
  Json(req): Json<CheckoutReq>,
) -> (StatusCode, Json<json::Value>) {
  let sv = sv::Settlement::new(&app.db, &app.config);
  match sv.checkout(req.user_id, req.amount).await {
    Ok(order) => (
      StatusCode::OK,
      Json(json::json!({ "order_no": order.order_no, "points": order.points })),
    ),
    Err(err) => {
      (status_of(&err), Json(json::json!({ "error": err.to_string() })))
    }
  }
}

#[derive(Deserialize)]
pub struct NotifyReq {
  pub order_no: String,
  pub trade_no: String,
}

/// Payment-provider callback; retried deliveries are safe because
/// settlement is idempotent.
pub async fn payment_notify(
  State(app): State<Arc<AppState>>,
  Json(req): Json<NotifyReq>,
) -> (StatusCode, Json<Status>) {
  let sv = sv::Settlement::new(&app.db, &app.config);
  match sv.settle(&req.order_no, &req.trade_no).await {
    Ok(()) => (StatusCode::OK, Status::ok()),
    Err(err) => (status_of(&err), Status::err(err.to_string())),
  }
}

#[derive(Deserialize)]
pub struct SimulateReq {
  pub order_no: String,
}

/// Manual "payment succeeded" trigger for operators; settles with a
/// synthetic trade reference.
pub async fn simulate_payment(
  State(app): State<Arc<AppState>>,
  headers: HeaderMap,
  Json(req): Json<SimulateReq>,
) -> (StatusCode, Json<Status>) {
  if !authorized(&app, &headers) {
    return (StatusCode::UNAUTHORIZED, Status::err("Invalid secret"));
  }

  let trade_no = format!("SIM-{}", Uuid::new_v4());
  let sv = sv::Settlement::new(&app.db, &app.config);
  match sv.settle(&req.order_no, &trade_no).await {
    Ok(()) => (StatusCode::OK, Status::ok()),
    Err(err) => (status_of(&err), Status::err(err.to_string())),
  }
}

#[derive(Deserialize)]
pub struct ConfigReq {
  pub key: String,
  pub value: String,
}

pub async fn set_config(
  State(app): State<Arc<AppState>>,
  headers: HeaderMap,
  Json(req): Json<ConfigReq>,
) -> (StatusCode, Json<Status>) {
  if !authorized(&app, &headers) {
    return (StatusCode::UNAUTHORIZED, Status::err("Invalid secret"));
  }

  match app.config.put(&app.db, &req.key, &req.value).await {
    Ok(()) => (StatusCode::OK, Status::ok()),
    Err(err) => (status_of(&err), Status::err(err.to_string())),
  }
}
