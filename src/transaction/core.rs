//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// The format dates are stored and displayed in, e.g. "18/10/2026".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// A `Transaction` always refers to a row in the database. To create a new
/// transaction, use [Transaction::build] and hand the builder to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID assigned by the store when the transaction was created.
    pub id: TransactionId,
    /// A short text description of what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// The day the transaction was recorded.
    pub date: TransactionDate,
    /// What the money was spent on or where it came from.
    pub category: Category,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        title: &str,
        amount: f64,
        date: Date,
        category: Category,
        kind: TransactionType,
    ) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            amount,
            date: TransactionDate::Day(date),
            category,
            kind,
        }
    }

    /// Whether this transaction counts towards income.
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }
}

/// A transaction that has not been stored yet, and so has no ID.
///
/// No validation is done on any of the fields: empty titles, negative
/// amounts and unknown categories or types are all stored as given.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TransactionBuilder {
    /// A short text description of the transaction.
    ///
    /// # Examples
    /// - `"Pizza"`
    /// - `"Netflix"`
    pub title: String,

    /// The monetary amount of the transaction.
    ///
    /// Amounts are entered as non-negative numbers, the direction of the money
    /// is given by [TransactionBuilder::kind].
    pub amount: f64,

    /// The day the transaction was recorded, usually today.
    pub date: TransactionDate,

    /// The category of the transaction, e.g. "Food", "Shopping".
    pub category: Category,

    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl TransactionBuilder {
    /// Set the title for the transaction.
    pub fn title(mut self, title: &str) -> Self {
        title.clone_into(&mut self.title);
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Attach the store-assigned `id` to create the stored [Transaction].
    pub(crate) fn finalize(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            title: self.title,
            amount: self.amount,
            date: self.date,
            category: self.category,
            kind: self.kind,
        }
    }
}

/// The day a transaction was recorded.
///
/// Dates are stored as "dd/MM/yyyy" text. Text in any other format is kept
/// verbatim in [TransactionDate::Unparsed] so the row can still be read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionDate {
    /// A date in the stored format.
    Day(Date),
    /// Stored text that is not a "dd/MM/yyyy" date.
    Unparsed(String),
}

impl TransactionDate {
    /// The calendar date, if the stored text was a valid date.
    pub fn day(&self) -> Option<Date> {
        match self {
            TransactionDate::Day(date) => Some(*date),
            TransactionDate::Unparsed(_) => None,
        }
    }
}

impl From<Date> for TransactionDate {
    fn from(value: Date) -> Self {
        TransactionDate::Day(value)
    }
}

impl From<String> for TransactionDate {
    fn from(value: String) -> Self {
        match Date::parse(&value, DATE_FORMAT) {
            Ok(date) => TransactionDate::Day(date),
            Err(error) => {
                tracing::warn!("keeping unparsed transaction date {value:?}: {error}");
                TransactionDate::Unparsed(value)
            }
        }
    }
}

impl From<TransactionDate> for String {
    fn from(value: TransactionDate) -> Self {
        value.to_string()
    }
}

impl Display for TransactionDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionDate::Day(date) => match format_date(*date) {
                Ok(text) => f.write_str(&text),
                Err(_) => write!(f, "{date}"),
            },
            TransactionDate::Unparsed(text) => f.write_str(text),
        }
    }
}

impl ToSql for TransactionDate {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            TransactionDate::Day(date) => date
                .format(DATE_FORMAT)
                .map(ToSqlOutput::from)
                .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error))),
            TransactionDate::Unparsed(text) => Ok(ToSqlOutput::from(text.as_str())),
        }
    }
}

impl FromSql for TransactionDate {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .map(|text| TransactionDate::from(text.to_owned()))
    }
}

/// Whether money was earned or spent.
///
/// Stored as free text, anything other than "Income" or "Expense" is kept
/// verbatim in [TransactionType::Other].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    /// Money that was earned.
    Income,
    /// Money that was spent.
    Expense,
    /// A type label that is not recognised.
    Other(String),
}

impl TransactionType {
    /// The types offered when entering a transaction.
    pub const OPTIONS: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    /// The text stored in the database for this type.
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
            TransactionType::Other(label) => label,
        }
    }
}

impl From<&str> for TransactionType {
    fn from(value: &str) -> Self {
        match value {
            "Income" => TransactionType::Income,
            "Expense" => TransactionType::Expense,
            other => TransactionType::Other(other.to_owned()),
        }
    }
}

impl From<String> for TransactionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Income" => TransactionType::Income,
            "Expense" => TransactionType::Expense,
            _ => TransactionType::Other(value),
        }
    }
}

impl From<TransactionType> for String {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Other(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(TransactionType::from)
    }
}

/// What a transaction was for.
///
/// The named variants are the labels offered when entering a transaction.
/// Any other text is kept verbatim in [Category::Custom].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Food and drink.
    Food,
    /// Clothes, groceries and other purchases.
    Shopping,
    /// Subscriptions, outings and hobbies.
    Entertainment,
    /// Fuel, fares and parking.
    Transportation,
    /// Courses, books and fees.
    Education,
    /// Anything that does not fit the other labels.
    Other,
    /// A label outside of the standard set, e.g. "Salary".
    Custom(String),
}

impl Category {
    /// The categories offered when entering a transaction.
    pub const OPTIONS: [Category; 6] = [
        Category::Food,
        Category::Shopping,
        Category::Entertainment,
        Category::Transportation,
        Category::Education,
        Category::Other,
    ];

    /// The text stored in the database for this category.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Food => "Food",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Transportation => "Transportation",
            Category::Education => "Education",
            Category::Other => "Other",
            Category::Custom(label) => label,
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::OPTIONS
            .into_iter()
            .find(|category| category.as_str() == value)
            .unwrap_or_else(|| Category::Custom(value.to_owned()))
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match Category::from(value.as_str()) {
            Category::Custom(_) => Category::Custom(value),
            known => known,
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Custom(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(Category::from)
    }
}

/// Format `date` the way it is stored and shown, e.g. "05/01/2026".
///
/// # Errors
/// Returns an [Error::InvalidDate] if the date cannot be formatted.
pub fn format_date(date: Date) -> Result<String, Error> {
    date.format(DATE_FORMAT)
        .map_err(|error| Error::InvalidDate(error.to_string()))
}

/// Parse a date in the stored "dd/MM/yyyy" format.
///
/// # Errors
/// Returns an [Error::InvalidDate] if `text` is not a valid date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, DATE_FORMAT).map_err(|error| Error::InvalidDate(format!("{text:?}: {error}")))
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let id = connection
        .prepare(
            "INSERT INTO transaction_table (title, amount, date, category, type)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id",
        )?
        .query_row(
            (
                &builder.title,
                builder.amount,
                &builder.date,
                &builder.category,
                &builder.kind,
            ),
            |row| row.get(0),
        )?;

    Ok(builder.finalize(id))
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, title, amount, date, category, type FROM transaction_table WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction in the order they were created.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare("SELECT id, title, amount, date, category, type FROM transaction_table ORDER BY id ASC")?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Replace every field of the stored transaction that has the same ID as
/// `transaction`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if no transaction has the ID,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(transaction: &Transaction, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE transaction_table
         SET title = ?1, amount = ?2, date = ?3, category = ?4, type = ?5
         WHERE id = ?6",
        (
            &transaction.title,
            transaction.amount,
            &transaction.date,
            &transaction.category,
            &transaction.kind,
            transaction.id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete the transaction with `id` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if no transaction has the ID,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM transaction_table WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transaction_table;", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    // AUTOINCREMENT stops the IDs of deleted rows from being handed out again.
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transaction_table (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                type TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let amount = row.get(2)?;
    let date = row.get(3)?;
    let category = row.get(4)?;
    let kind = row.get(5)?;

    Ok(Transaction {
        id,
        title,
        amount,
        date,
        category,
        kind,
    })
}

// ============================================================================
// TESTS
// ============================================================================
