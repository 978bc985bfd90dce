//! Contains traits and implementations for objects that store the domain
//! [transactions](crate::transaction).

mod subscription;
mod transaction;

pub mod sqlite;

pub use sqlite::SQLiteTransactionStore;
pub use subscription::{TransactionList, TransactionSubscription};
pub use transaction::TransactionStore;
