//! Defines the crate level error type.

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error, e.g. the database file could not be
    /// written to.
    ///
    /// Writes are not retried, callers decide whether to try again.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The background task running a database operation did not finish.
    #[error("the database task failed: {0}")]
    TaskFailed(String),

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// A change was saved, but the updated list of transactions could not be
    /// read back, so subscribers were not told about it.
    ///
    /// The change is durable. Subscribers keep the previous list until the
    /// next successful change.
    #[error("the change was saved but the transaction list could not be refreshed: {0}")]
    ListRefreshFailed(String),

    /// A date could not be converted to or from its stored text.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn other_sql_errors_are_wrapped() {
        let error = Error::from(rusqlite::Error::InvalidQuery);

        assert_eq!(error, Error::SqlError(rusqlite::Error::InvalidQuery));
    }
}
