//! Expense tracker is the storage and aggregation core of a personal finance
//! app.
//!
//! Income and expense transactions are kept in a local SQLite database. A
//! [TransactionStore] creates, updates and deletes them and publishes the full
//! list to every [TransactionSubscription] after each change. The functions in
//! [summary] turn a list into the balance, income and expense totals shown to
//! the user.

#![warn(missing_docs)]

mod app_state;
mod database_id;
mod error;
mod timezone;

pub mod db;
pub mod logging;
pub mod seed;
pub mod stores;
pub mod summary;
pub mod transaction;

pub use app_state::AppState;
pub use database_id::{DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use stores::{SQLiteTransactionStore, TransactionList, TransactionStore, TransactionSubscription};
pub use summary::Summary;
pub use timezone::{get_local_offset, today_in};
