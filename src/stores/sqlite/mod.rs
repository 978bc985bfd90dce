//! Store implementations backed by SQLite.

pub mod transaction;

pub use transaction::SQLiteTransactionStore;
