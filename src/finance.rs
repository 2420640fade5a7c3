//! Reduces enriched transactions into per-user monthly income and expense
//! totals, the target variables for the income and expense predictors.

use std::collections::HashMap;

use time::Month;

use crate::transaction::{Direction, Transaction};

/// Income and expense totals for one user in one calendar month.
///
/// A user-month that only appears in one direction still gets a row, with
/// the absent direction's sum and count filled with zero.
#[derive(Debug, Clone, PartialEq)]
pub struct UserMonthFinance {
    /// The anonymised user ID.
    pub user_id: String,
    /// The calendar month the totals cover.
    pub month: Month,
    /// Total incoming amount for the month.
    pub income: f64,
    /// Number of incoming transactions for the month.
    pub count_in: u32,
    /// Total outgoing amount for the month.
    pub expenses: f64,
    /// Number of outgoing transactions for the month.
    pub count_out: u32,
    /// `income - expenses`, computed after zero-filling.
    pub net: f64,
}

#[derive(Default)]
struct DirectionTotals {
    income: f64,
    count_in: u32,
    expenses: f64,
    count_out: u32,
}

/// Aggregates transactions into one finance row per (user, month) pair.
///
/// Every pair present in the input in either direction produces exactly one
/// row. Rows are sorted by (user, month) so downstream iteration is
/// deterministic.
pub fn aggregate_user_finances(transactions: &[Transaction]) -> Vec<UserMonthFinance> {
    let mut totals: HashMap<(&str, Month), DirectionTotals> = HashMap::new();

    for transaction in transactions {
        let entry = totals
            .entry((transaction.user_id.as_str(), transaction.month()))
            .or_default();

        match transaction.direction {
            Direction::In => {
                entry.income += transaction.amount;
                entry.count_in += 1;
            }
            Direction::Out => {
                entry.expenses += transaction.amount;
                entry.count_out += 1;
            }
        }
    }

    let mut rows: Vec<UserMonthFinance> = totals
        .into_iter()
        .map(|((user_id, month), totals)| UserMonthFinance {
            user_id: user_id.to_owned(),
            month,
            income: totals.income,
            count_in: totals.count_in,
            expenses: totals.expenses,
            count_out: totals.count_out,
            net: totals.income - totals.expenses,
        })
        .collect();

    rows.sort_by(|a, b| {
        a.user_id
            .cmp(&b.user_id)
            .then(u8::from(a.month).cmp(&u8::from(b.month)))
    });

    tracing::debug!("aggregated {} user-month finance rows", rows.len());

    rows
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use super::aggregate_user_finances;
    use crate::transaction::{Direction, Transaction, TransactionType};

    fn transaction(
        user_id: &str,
        date: time::Date,
        amount: f64,
        direction: Direction,
    ) -> Transaction {
        Transaction {
            user_id: user_id.to_owned(),
            date,
            transaction_type: match direction {
                Direction::In => TransactionType::CT,
                Direction::Out => TransactionType::PT,
            },
            amount,
            direction,
            agent: "User".to_owned(),
        }
    }

    #[test]
    fn sums_and_counts_per_direction() {
        let transactions = vec![
            transaction("u1", date!(2019 - 03 - 04), 100.0, Direction::In),
            transaction("u1", date!(2019 - 03 - 11), 250.0, Direction::In),
            transaction("u1", date!(2019 - 03 - 12), 40.0, Direction::Out),
        ];

        let rows = aggregate_user_finances(&transactions);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].income, 350.0);
        assert_eq!(rows[0].count_in, 2);
        assert_eq!(rows[0].expenses, 40.0);
        assert_eq!(rows[0].count_out, 1);
        assert_eq!(rows[0].net, 310.0);
    }

    #[test]
    fn absent_direction_zero_fills_instead_of_dropping_the_row() {
        let transactions = vec![transaction("u1", date!(2019 - 04 - 02), 75.0, Direction::Out)];

        let rows = aggregate_user_finances(&transactions);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].income, 0.0);
        assert_eq!(rows[0].count_in, 0);
        assert_eq!(rows[0].expenses, 75.0);
        assert_eq!(rows[0].count_out, 1);
        assert_eq!(rows[0].net, -75.0);
    }

    #[test]
    fn one_row_per_user_month_pair() {
        let transactions = vec![
            transaction("u1", date!(2019 - 03 - 04), 10.0, Direction::In),
            transaction("u1", date!(2019 - 04 - 04), 20.0, Direction::In),
            transaction("u2", date!(2019 - 03 - 05), 30.0, Direction::Out),
        ];

        let rows = aggregate_user_finances(&transactions);

        assert_eq!(rows.len(), 3);
        // Sorted by (user, month).
        assert_eq!(rows[0].user_id, "u1");
        assert_eq!(rows[0].month, Month::March);
        assert_eq!(rows[1].user_id, "u1");
        assert_eq!(rows[1].month, Month::April);
        assert_eq!(rows[2].user_id, "u2");
    }

    #[test]
    fn net_is_income_minus_expenses_for_every_row() {
        let transactions = vec![
            transaction("u1", date!(2019 - 03 - 04), 100.0, Direction::In),
            transaction("u1", date!(2019 - 03 - 06), 60.0, Direction::Out),
            transaction("u2", date!(2019 - 03 - 07), 5.0, Direction::In),
        ];

        for row in aggregate_user_finances(&transactions) {
            assert_eq!(row.net, row.income - row.expenses);
        }
    }
}
