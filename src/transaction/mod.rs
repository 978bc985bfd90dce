//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - Helpers for reading transaction fields from form input

mod core;
mod form;

pub use core::{
    Category, Transaction, TransactionBuilder, TransactionDate, TransactionType, count_transactions,
    create_transaction, create_transaction_table, delete_transaction, format_date,
    get_all_transactions, get_transaction, map_transaction_row, parse_date, update_transaction,
};
pub use form::parse_amount;
