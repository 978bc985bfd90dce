//! Implements a struct that holds the state shared by the screens of the app.

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    db::initialize,
    stores::SQLiteTransactionStore,
    timezone::today_in,
    transaction::{Category, Transaction, TransactionBuilder, TransactionType},
};

/// The state of the app.
///
/// Construct one per database and pass it, or clones of it, to whatever
/// needs to read or change transactions.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The store for the transactions.
    pub transaction_store: SQLiteTransactionStore,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database, adding the sample
    /// transactions if the database is new. `local_timezone` should be a
    /// valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the timezone is not valid or the database cannot be
    /// initialized.
    pub fn new(db_connection: Connection, local_timezone: &str) -> Result<Self, Error> {
        initialize(&db_connection, today_in(local_timezone)?)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            transaction_store: SQLiteTransactionStore::new(connection)?,
        })
    }

    /// Open, or create, the database file at `db_path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or [AppState::new] fails.
    pub fn open(db_path: impl AsRef<Path>, local_timezone: &str) -> Result<Self, Error> {
        let db_path = db_path.as_ref();
        tracing::debug!("opening database at {}", db_path.display());

        Self::new(Connection::open(db_path)?, local_timezone)
    }

    /// Close the database.
    ///
    /// Returns `true` if the connection was closed, or `false` if another
    /// clone of the store is still using it, in which case it is closed when
    /// the last clone is dropped.
    ///
    /// # Errors
    /// Returns an error if SQLite could not close the connection cleanly.
    pub fn close(self) -> Result<bool, Error> {
        self.transaction_store.close()
    }

    /// Today's date in the local timezone.
    ///
    /// # Errors
    /// Returns an error if the local timezone is not valid.
    pub fn today(&self) -> Result<Date, Error> {
        today_in(&self.local_timezone)
    }

    /// Start a new transaction dated today.
    ///
    /// # Errors
    /// Returns an error if the local timezone is not valid.
    pub fn new_transaction(
        &self,
        title: &str,
        amount: f64,
        category: Category,
        kind: TransactionType,
    ) -> Result<TransactionBuilder, Error> {
        Ok(Transaction::build(
            title,
            amount,
            self.today()?,
            category,
            kind,
        ))
    }
}
