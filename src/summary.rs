//! Totals shown on the home screen.
//!
//! Every function here is pure and is meant to be called again with the full
//! list each time the list of transactions changes.

use rust_decimal::{Decimal, RoundingStrategy, prelude::FromPrimitive};
use serde::Serialize;

use crate::transaction::{Transaction, TransactionType};

/// The marker placed in front of every formatted amount.
pub const CURRENCY_MARKER: &str = "$";

/// The three totals for a list of transactions, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Income minus expenses, e.g. "$ 4501.00".
    pub balance: String,
    /// The sum of all income.
    pub income: String,
    /// The sum of all expenses.
    pub expense: String,
}

impl Summary {
    /// Compute the totals for `transactions`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        Self {
            balance: balance_text(transactions),
            income: income_text(transactions),
            expense: expense_text(transactions),
        }
    }
}

/// Income minus expenses.
///
/// Transactions with an unrecognised type are left out.
pub fn total_balance(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .map(|transaction| match transaction.kind {
            TransactionType::Income => transaction.amount,
            TransactionType::Expense => -transaction.amount,
            TransactionType::Other(_) => 0.0,
        })
        .fold(0.0, |total, amount| total + amount)
}

/// The sum of the amounts of income transactions.
pub fn total_income(transactions: &[Transaction]) -> f64 {
    sum_of_type(transactions, &TransactionType::Income)
}

/// The sum of the amounts of expense transactions.
pub fn total_expense(transactions: &[Transaction]) -> f64 {
    sum_of_type(transactions, &TransactionType::Expense)
}

fn sum_of_type(transactions: &[Transaction], kind: &TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|transaction| &transaction.kind == kind)
        .map(|transaction| transaction.amount)
        .fold(0.0, |total, amount| total + amount)
}

/// [total_balance] formatted as currency.
pub fn balance_text(transactions: &[Transaction]) -> String {
    format_currency(total_balance(transactions))
}

/// [total_income] formatted as currency.
pub fn income_text(transactions: &[Transaction]) -> String {
    format_currency(total_income(transactions))
}

/// [total_expense] formatted as currency.
pub fn expense_text(transactions: &[Transaction]) -> String {
    format_currency(total_expense(transactions))
}

/// Format `value` as currency, e.g. "$ 4501.00".
pub fn format_currency(value: f64) -> String {
    format!("{CURRENCY_MARKER} {}", format_amount(value))
}

/// Format `value` with exactly two decimal places, rounding halves away from
/// zero, e.g. `0.125` becomes "0.13".
pub fn format_amount(value: f64) -> String {
    // Non-finite values have no decimal representation.
    let Some(decimal) = Decimal::from_f64(value) else {
        return format!("{value:.2}");
    };

    let mut rounded = decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // Both -0.0 and small negatives like -0.001 would otherwise print as "-0.00".
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(2);

    rounded.to_string()
}

/// The amount of a transaction as shown in the list, e.g. "+ 1000.00" for
/// income and "- 100.00" for anything else.
pub fn amount_label(transaction: &Transaction) -> String {
    let sign = if transaction.is_income() { '+' } else { '-' };

    format!("{sign} {}", format_amount(transaction.amount))
}

/// The first `limit` transactions, in the order the store lists them.
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
    transactions.iter().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::transaction::{Category, Transaction, TransactionType};

    use super::{
        Summary, amount_label, balance_text, expense_text, format_currency, income_text,
        recent_transactions, total_balance,
    };

    fn transaction(id: i64, amount: f64, kind: TransactionType) -> Transaction {
        Transaction::build(
            "Test",
            amount,
            date!(2026 - 10 - 18),
            Category::Other,
            kind,
        )
        .finalize(id)
    }

    #[test]
    fn empty_list_totals_are_zero() {
        assert_eq!(balance_text(&[]), "$ 0.00");
        assert_eq!(income_text(&[]), "$ 0.00");
        assert_eq!(expense_text(&[]), "$ 0.00");
    }

    #[test]
    fn totals_for_income_and_expense() {
        let transactions = [
            transaction(1, 100.0, TransactionType::Expense),
            transaction(2, 1000.0, TransactionType::Income),
        ];

        let summary = Summary::from_transactions(&transactions);

        assert_eq!(
            summary,
            Summary {
                balance: "$ 900.00".to_owned(),
                income: "$ 1000.00".to_owned(),
                expense: "$ 100.00".to_owned(),
            }
        );
    }

    #[test]
    fn balance_can_be_negative() {
        let transactions = [
            transaction(1, 250.5, TransactionType::Expense),
            transaction(2, 100.0, TransactionType::Income),
        ];

        assert_eq!(balance_text(&transactions), "$ -150.50");
    }

    #[test]
    fn unrecognised_type_is_left_out_of_every_total() {
        let transactions = [
            transaction(1, 1000.0, TransactionType::Income),
            transaction(2, 40.0, TransactionType::Other("Transfer".to_owned())),
        ];

        let summary = Summary::from_transactions(&transactions);

        assert_eq!(total_balance(&transactions), 1000.0);
        assert_eq!(summary.income, "$ 1000.00");
        assert_eq!(summary.expense, "$ 0.00");
    }

    #[test]
    fn rounds_halves_away_from_zero() {
        assert_eq!(format_currency(0.125), "$ 0.13");
        assert_eq!(format_currency(-0.125), "$ -0.13");
        assert_eq!(format_currency(2.5), "$ 2.50");
        assert_eq!(format_currency(4501.0), "$ 4501.00");
    }

    #[test]
    fn rounding_is_display_only() {
        let transactions = [
            transaction(1, 0.004, TransactionType::Income),
            transaction(2, 0.004, TransactionType::Income),
        ];

        assert_eq!(income_text(&transactions), "$ 0.01");
    }

    #[test]
    fn amount_label_shows_direction() {
        assert_eq!(
            amount_label(&transaction(1, 1000.0, TransactionType::Income)),
            "+ 1000.00"
        );
        assert_eq!(
            amount_label(&transaction(2, 100.0, TransactionType::Expense)),
            "- 100.00"
        );
    }

    #[test]
    fn recent_transactions_keep_store_order() {
        let transactions: Vec<_> = (1..=5)
            .map(|id| transaction(id, 1.0, TransactionType::Expense))
            .collect();

        let ids: Vec<i64> = recent_transactions(&transactions, 3)
            .into_iter()
            .map(|transaction| transaction.id)
            .collect();

        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn zero_totals_have_no_sign() {
        let transactions = [transaction(1, 0.0, TransactionType::Expense)];

        assert_eq!(balance_text(&transactions), "$ 0.00");
        assert_eq!(expense_text(&transactions), "$ 0.00");
        assert_eq!(format_currency(-0.0), "$ 0.00");
        assert_eq!(format_currency(-0.001), "$ 0.00");
    }
}
