/*! Sets up the application's database. */

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use time::Date;

use crate::{
    Error,
    seed::seed_transactions,
    transaction::{create_transaction, create_transaction_table},
};

/// The schema version written to `PRAGMA user_version` once the tables exist.
///
/// A database with a version of zero has never been initialized.
pub const SCHEMA_VERSION: i64 = 1;

/// Create the tables and add the sample transactions dated `today`, unless the
/// database has already been initialized.
///
/// Returns `true` if the database was created by this call.
///
/// The schema and the sample transactions are committed together, so the
/// sample transactions are only ever added once per database, even if they are
/// later deleted.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection, today: Date) -> Result<bool, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    if schema_version(&transaction)? >= SCHEMA_VERSION {
        transaction.commit()?;
        tracing::debug!("database already initialized");
        return Ok(false);
    }

    create_transaction_table(&transaction)?;

    for builder in seed_transactions(today) {
        create_transaction(builder, &transaction)?;
    }

    transaction.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    transaction.commit()?;

    tracing::info!("created database with sample transactions");

    Ok(true)
}

/// Read the schema version marker of the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn schema_version(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .map_err(|error| error.into())
}
