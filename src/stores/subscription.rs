//! A live view of every transaction in a store.

use std::sync::Arc;

use tokio::sync::watch;

use crate::transaction::Transaction;

/// The full list of transactions in creation order.
pub type TransactionList = Arc<[Transaction]>;

/// Receives the full list of transactions each time the store changes.
///
/// The first call to [TransactionSubscription::next] returns the list as it
/// was when the subscription was created, later calls wait for the next
/// change. Changes that happen faster than they are read are merged, so the
/// subscriber always sees the latest list rather than every intermediate one.
///
/// Dropping the subscription cancels it.
#[derive(Debug)]
pub struct TransactionSubscription {
    receiver: watch::Receiver<TransactionList>,
    seen_initial: bool,
}

impl TransactionSubscription {
    pub(crate) fn new(receiver: watch::Receiver<TransactionList>) -> Self {
        Self {
            receiver,
            seen_initial: false,
        }
    }

    /// Wait for the next list of transactions.
    ///
    /// Returns `None` once the store has been dropped and the latest list has
    /// already been returned.
    pub async fn next(&mut self) -> Option<TransactionList> {
        if !self.seen_initial {
            self.seen_initial = true;
            return Some(self.receiver.borrow_and_update().clone());
        }

        self.receiver.changed().await.ok()?;

        Some(self.receiver.borrow_and_update().clone())
    }

    /// The most recently published list, without waiting.
    pub fn latest(&self) -> TransactionList {
        self.receiver.borrow().clone()
    }
}
