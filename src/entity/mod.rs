pub mod archived_stat;
pub mod commission_log;
pub mod config;
pub mod daily_stat;
pub mod order;
pub mod user;

#[allow(unused_imports)]
pub use order::OrderStatus;
