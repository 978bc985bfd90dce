//! Sample transactions added to a newly created database.

use time::Date;

use crate::transaction::{Category, Transaction, TransactionBuilder, TransactionType};

/// The number of transactions in [seed_transactions].
pub const SEED_TRANSACTION_COUNT: usize = 4;

/// The sample transactions, all dated `today`.
pub fn seed_transactions(today: Date) -> [TransactionBuilder; SEED_TRANSACTION_COUNT] {
    let salary = || Category::Custom("Salary".to_owned());

    [
        Transaction::build(
            "Pizza",
            100.0,
            today,
            Category::Food,
            TransactionType::Expense,
        ),
        Transaction::build("Upwork", 1000.0, today, salary(), TransactionType::Income),
        Transaction::build(
            "Netflix",
            399.0,
            today,
            Category::Entertainment,
            TransactionType::Expense,
        ),
        Transaction::build("Salary", 5000.0, today, salary(), TransactionType::Income),
    ]
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{summary::Summary, transaction::TransactionType};

    use super::seed_transactions;

    #[test]
    fn seeds_are_dated_today() {
        let today = date!(2026 - 10 - 18);

        assert!(
            seed_transactions(today)
                .iter()
                .all(|seed| seed.date.day() == Some(today))
        );
    }

    #[test]
    fn seed_totals() {
        let transactions: Vec<_> = seed_transactions(date!(2026 - 10 - 18))
            .into_iter()
            .enumerate()
            .map(|(i, builder)| builder.finalize(i as i64 + 1))
            .collect();

        let summary = Summary::from_transactions(&transactions);

        assert_eq!(summary.income, "$ 6000.00");
        assert_eq!(summary.expense, "$ 499.00");
        assert_eq!(summary.balance, "$ 5501.00");
        assert_eq!(
            transactions
                .iter()
                .filter(|transaction| transaction.kind == TransactionType::Income)
                .count(),
            2
        );
    }
}
