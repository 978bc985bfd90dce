//! Defines the transaction store trait.

use std::future::Future;

use crate::{
    Error,
    database_id::TransactionId,
    stores::TransactionSubscription,
    transaction::{Transaction, TransactionBuilder},
};

/// Handles the creation, retrieval, update and deletion of transactions.
///
/// Mutations resolve once the change has been saved, and every successful
/// mutation publishes the new list of transactions to all subscribers.
pub trait TransactionStore {
    /// Save a new transaction and return it with its newly assigned ID.
    ///
    /// IDs increase with each transaction and are never reused.
    fn create(
        &self,
        builder: TransactionBuilder,
    ) -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Replace every field of the stored transaction with the same ID.
    ///
    /// Fails with [Error::UpdateMissingTransaction] if there is no such transaction.
    fn update(&self, transaction: &Transaction)
    -> impl Future<Output = Result<(), Error>> + Send;

    /// Remove the stored transaction with the same ID.
    ///
    /// Fails with [Error::DeleteMissingTransaction] if there is no such transaction.
    fn delete(&self, transaction: &Transaction)
    -> impl Future<Output = Result<(), Error>> + Send;

    /// Retrieve a transaction from the store.
    fn get(&self, id: TransactionId) -> impl Future<Output = Result<Transaction, Error>> + Send;

    /// Retrieve every transaction in the order they were created.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Transaction>, Error>> + Send;

    /// Subscribe to the list of all transactions.
    fn subscribe(&self) -> TransactionSubscription;
}
