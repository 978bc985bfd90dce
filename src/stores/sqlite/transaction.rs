//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tokio::{sync::watch, task};

use crate::{
    Error,
    database_id::TransactionId,
    stores::{TransactionList, TransactionStore, TransactionSubscription},
    transaction::{
        Transaction, TransactionBuilder, create_transaction, delete_transaction,
        get_all_transactions, get_transaction, update_transaction,
    },
};

/// Stores transactions in a SQLite database.
///
/// The transaction table must already exist, see [crate::db::initialize].
/// Clones share the same connection and subscribers.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
    sender: Arc<watch::Sender<TransactionList>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// # Errors
    /// Returns an error if the current transactions cannot be read.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Result<Self, Error> {
        let transactions = {
            let connection = connection.lock().map_err(|_| Error::DatabaseLockError)?;
            get_all_transactions(&connection)?
        };

        let (sender, _) = watch::channel(TransactionList::from(transactions));

        Ok(Self {
            connection,
            sender: Arc::new(sender),
        })
    }

    /// Close the database connection.
    ///
    /// Returns `true` if the connection was closed. If other clones of this
    /// store are still alive, the connection stays open until the last one is
    /// dropped and `false` is returned.
    ///
    /// # Errors
    /// Returns an error if SQLite could not close the connection cleanly.
    pub fn close(self) -> Result<bool, Error> {
        let Ok(connection) = Arc::try_unwrap(self.connection) else {
            tracing::debug!("store is still shared, leaving the connection open");
            return Ok(false);
        };

        connection
            .into_inner()
            .map_err(|_| Error::DatabaseLockError)?
            .close()
            .map_err(|(_, error)| Error::from(error))?;

        Ok(true)
    }

    /// Run `operation` against the connection on the blocking thread pool.
    async fn run<F, T>(&self, operation: F) -> Result<T, Error>
    where
        F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
        T: Send + 'static,
    {
        let connection = self.connection.clone();

        task::spawn_blocking(move || {
            let connection = connection.lock().map_err(|_| Error::DatabaseLockError)?;
            operation(&connection)
        })
        .await
        .map_err(|error| Error::TaskFailed(error.to_string()))?
    }

    /// Run `operation` and, if it succeeds, publish the new transaction list.
    ///
    /// The list is read and published while the connection is still locked so
    /// that subscribers never see lists out of order.
    ///
    /// # Errors
    /// Returns an [Error::ListRefreshFailed] if `operation` succeeded but the
    /// new list could not be read. The change made by `operation` is kept.
    async fn mutate<F, T>(&self, operation: F) -> Result<T, Error>
    where
        F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.sender.clone();

        self.run(move |connection| {
            let result = operation(connection)?;

            let transactions = get_all_transactions(connection).map_err(|error| {
                tracing::error!("could not refresh the transaction list: {error}");
                Error::ListRefreshFailed(error.to_string())
            })?;
            sender.send_replace(transactions.into());

            Ok(result)
        })
        .await
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    async fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let transaction = self
            .mutate(move |connection| create_transaction(builder, connection))
            .await?;

        tracing::debug!("created transaction {}", transaction.id);

        Ok(transaction)
    }

    /// Update a transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingTransaction] if the transaction is not in the database,
    /// - or [Error::SqlError] if there is some other SQL error.
    async fn update(&self, transaction: &Transaction) -> Result<(), Error> {
        let id = transaction.id;
        let transaction = transaction.clone();

        self.mutate(move |connection| update_transaction(&transaction, connection))
            .await?;

        tracing::debug!("updated transaction {id}");

        Ok(())
    }

    /// Delete a transaction from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingTransaction] if the transaction is not in the database,
    /// - or [Error::SqlError] if there is some other SQL error.
    async fn delete(&self, transaction: &Transaction) -> Result<(), Error> {
        let id = transaction.id;

        self.mutate(move |connection| delete_transaction(id, connection))
            .await?;

        tracing::debug!("deleted transaction {id}");

        Ok(())
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    async fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        self.run(move |connection| get_transaction(id, connection))
            .await
    }

    /// Retrieve every transaction in the database in creation order.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    async fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        self.run(get_all_transactions).await
    }

    fn subscribe(&self) -> TransactionSubscription {
        TransactionSubscription::new(self.sender.subscribe())
    }
}

#[cfg(test)]
mod sqlite_transaction_store_tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use rusqlite::Connection;
    use time::macros::date;
    use tokio::time::timeout;

    use crate::{
        Error,
        db::initialize,
        seed::SEED_TRANSACTION_COUNT,
        stores::TransactionStore,
        transaction::{
            Category, Transaction, TransactionBuilder, TransactionType, count_transactions,
            create_transaction_table,
        },
    };

    use super::SQLiteTransactionStore;

    fn get_store() -> SQLiteTransactionStore {
        let connection = Connection::open_in_memory().unwrap();
        create_transaction_table(&connection).unwrap();

        SQLiteTransactionStore::new(Arc::new(Mutex::new(connection))).unwrap()
    }

    fn groceries() -> TransactionBuilder {
        Transaction::build(
            "Groceries",
            54.3,
            date!(2026 - 10 - 18),
            Category::Shopping,
            TransactionType::Expense,
        )
    }

    #[tokio::test]
    async fn create_adds_exactly_one_transaction_with_new_id() {
        let store = get_store();
        let existing = store.create(groceries()).await.unwrap();

        let created = store.create(groceries().title("Bus fare")).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_ne!(created.id, existing.id);
        assert_eq!(all.iter().filter(|t| t.id == created.id).count(), 1);
    }

    #[tokio::test]
    async fn created_transaction_reads_back_unchanged() {
        let store = get_store();
        let builder = groceries();

        let created = store.create(builder.clone()).await.unwrap();
        let got = store.get(created.id).await.unwrap();

        assert_eq!(got, builder.finalize(created.id));
    }

    #[tokio::test]
    async fn update_is_visible_and_keeps_other_fields() {
        let store = get_store();
        let created = store.create(groceries()).await.unwrap();
        let mut changed = created.clone();
        changed.title = "Weekly groceries".to_owned();

        store.update(&changed).await.unwrap();

        let got = store.get(created.id).await.unwrap();
        assert_eq!(got.title, "Weekly groceries");
        assert_eq!(got.amount, created.amount);
        assert_eq!(got.date, created.date);
        assert_eq!(got.category, created.category);
        assert_eq!(got.kind, created.kind);
    }

    #[tokio::test]
    async fn update_missing_transaction_fails() {
        let store = get_store();

        let result = store.update(&groceries().finalize(99)).await;

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let store = get_store();
        let first = store.create(groceries()).await.unwrap();
        let second = store.create(groceries()).await.unwrap();

        store.delete(&first).await.unwrap();

        assert_eq!(store.get_all().await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn delete_missing_transaction_fails() {
        let store = get_store();

        let result = store.delete(&groceries().finalize(3)).await;

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }

    #[tokio::test]
    async fn subscription_starts_with_current_list() {
        let store = get_store();
        let created = store.create(groceries()).await.unwrap();
        let mut subscription = store.subscribe();

        let list = subscription.next().await.unwrap();

        assert_eq!(list.to_vec(), vec![created]);
    }

    #[tokio::test]
    async fn subscription_sees_each_mutation() {
        let store = get_store();
        let mut subscription = store.subscribe();
        assert_eq!(subscription.next().await.unwrap().len(), 0);

        let mut created = store.create(groceries()).await.unwrap();
        assert_eq!(subscription.next().await.unwrap().to_vec(), vec![created.clone()]);

        created.amount = 60.0;
        store.update(&created).await.unwrap();
        assert_eq!(subscription.next().await.unwrap()[0].amount, 60.0);

        store.delete(&created).await.unwrap();
        assert_eq!(subscription.next().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn failed_mutation_does_not_publish() {
        let store = get_store();
        let mut subscription = store.subscribe();
        subscription.next().await;

        let _ = store.delete(&groceries().finalize(1)).await;

        let next = timeout(Duration::from_millis(50), subscription.next()).await;
        assert!(next.is_err(), "want no new list, got {next:?}");
    }

    #[tokio::test]
    async fn subscription_ends_when_store_dropped() {
        let store = get_store();
        let mut subscription = store.subscribe();
        subscription.next().await;

        drop(store);

        assert!(subscription.next().await.is_none());
    }

    #[tokio::test]
    async fn store_reads_seeded_database() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection, date!(2026 - 10 - 18)).unwrap();
        let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(connection))).unwrap();

        let list = store.subscribe().latest();

        assert_eq!(list.len(), SEED_TRANSACTION_COUNT);
    }

    #[tokio::test]
    async fn close_releases_connection() {
        let store = get_store();

        assert_eq!(store.close(), Ok(true));
    }

    #[tokio::test]
    async fn close_leaves_shared_connection_open() {
        let store = get_store();
        let clone = store.clone();

        assert_eq!(store.close(), Ok(false));
        assert!(clone.create(groceries()).await.is_ok());
        assert_eq!(clone.close(), Ok(true));
    }

    #[tokio::test]
    async fn unreadable_list_after_save_is_reported() {
        let store = get_store();
        let mut subscription = store.subscribe();
        subscription.next().await;
        store
            .connection
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO transaction_table (title, amount, date, category, type)
                 VALUES ('Broken', 'not a number', '18/10/2026', 'Food', 'Expense')",
                (),
            )
            .unwrap();

        let result = store.create(groceries()).await;

        assert!(
            matches!(result, Err(Error::ListRefreshFailed(_))),
            "want ListRefreshFailed, got {result:?}"
        );
        let count = count_transactions(&store.connection.lock().unwrap()).unwrap();
        assert_eq!(count, 2, "the new transaction should still be saved");
        let next = timeout(Duration::from_millis(50), subscription.next()).await;
        assert!(next.is_err(), "want no new list, got {next:?}");
    }

    #[tokio::test]
    async fn every_subscriber_sees_a_change() {
        let store = get_store();
        let mut first = store.subscribe();
        let mut second = store.subscribe();
        first.next().await;
        second.next().await;

        let created = store.create(groceries()).await.unwrap();

        assert_eq!(first.next().await.unwrap().to_vec(), vec![created.clone()]);
        assert_eq!(second.next().await.unwrap().to_vec(), vec![created]);
    }

    #[tokio::test]
    async fn dropping_a_subscription_affects_nothing_else() {
        let store = get_store();
        let existing = store.create(groceries()).await.unwrap();
        let mut kept = store.subscribe();
        let dropped = store.subscribe();
        kept.next().await;

        drop(dropped);
        let created = store.create(groceries().title("Bus fare")).await.unwrap();

        assert_eq!(
            store.get_all().await.unwrap(),
            vec![existing.clone(), created.clone()]
        );
        assert_eq!(kept.next().await.unwrap().to_vec(), vec![existing, created]);
    }
}
