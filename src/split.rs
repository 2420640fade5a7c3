//! Partitions the user-month finance table into train, validation, and
//! holdout sets for the income and expense predictors.

use std::collections::HashSet;

use time::Month;

use crate::{
    Error,
    features::{FeatureVector, MonthlyFeatures},
    finance::UserMonthFinance,
    transaction::Direction,
};

/// The default activity threshold applied to the target columns.
pub const DEFAULT_THRESHOLD: f64 = 0.0;

/// The six row-subsets produced by [split_dataset].
///
/// The in/out variants of each split are independent filters on the same
/// rows, not partitions of each other: a row below the threshold on one
/// target can still appear in the other variant.
#[derive(Debug, Default, PartialEq)]
pub struct DatasetSplit {
    /// Training rows with income above the threshold.
    pub train_in: Vec<UserMonthFinance>,
    /// Training rows with expenses above the threshold.
    pub train_out: Vec<UserMonthFinance>,
    /// Validation rows with income above the threshold.
    pub val_in: Vec<UserMonthFinance>,
    /// Validation rows with expenses above the threshold.
    pub val_out: Vec<UserMonthFinance>,
    /// Holdout rows with income above the threshold.
    pub holdout_in: Vec<UserMonthFinance>,
    /// Holdout rows with expenses above the threshold.
    pub holdout_out: Vec<UserMonthFinance>,
}

/// Splits the finance table by a held-out month and a held-out user set.
///
/// - train: rows outside the held-out month from users not in the held-out set,
/// - validation: rows in the held-out month from users not in the held-out set,
/// - holdout: rows in the held-out month from users in the held-out set.
///
/// Rows from held-out users outside the held-out month belong to no split.
/// Each split is then filtered into its in/out variants by a strict
/// greater-than check on the respective target column.
pub fn split_dataset(
    rows: &[UserMonthFinance],
    holdout_month: Month,
    holdout_users: &HashSet<String>,
    threshold: f64,
) -> DatasetSplit {
    let mut split = DatasetSplit::default();

    for row in rows {
        let held_out_user = holdout_users.contains(&row.user_id);
        let (in_rows, out_rows) = if row.month != holdout_month && !held_out_user {
            (&mut split.train_in, &mut split.train_out)
        } else if row.month == holdout_month && !held_out_user {
            (&mut split.val_in, &mut split.val_out)
        } else if row.month == holdout_month {
            (&mut split.holdout_in, &mut split.holdout_out)
        } else {
            continue;
        };

        if row.income > threshold {
            in_rows.push(row.clone());
        }
        if row.expenses > threshold {
            out_rows.push(row.clone());
        }
    }

    split
}

/// Resolves a split's rows to a feature matrix and target vector.
///
/// Each row's (month, user) pair is looked up in the feature engine's
/// output; the target is the row's income for [Direction::In] and its
/// expenses for [Direction::Out].
///
/// Returns `Error::MissingFeatureVector` if a pair has no computed feature
/// vector, which happens when feature computation ran on a different data
/// slice than the split.
pub fn get_x_y(
    rows: &[UserMonthFinance],
    features: &MonthlyFeatures,
    direction: Direction,
) -> Result<(Vec<FeatureVector>, Vec<f64>), Error> {
    let mut x = Vec::with_capacity(rows.len());
    let mut y = Vec::with_capacity(rows.len());

    for row in rows {
        let vector = features
            .get(&row.month)
            .and_then(|users| users.get(&row.user_id))
            .ok_or_else(|| Error::MissingFeatureVector {
                month: row.month,
                user_id: row.user_id.clone(),
            })?;

        x.push(vector.clone());
        y.push(match direction {
            Direction::In => row.income,
            Direction::Out => row.expenses,
        });
    }

    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use time::Month;

    use super::{DEFAULT_THRESHOLD, get_x_y, split_dataset};
    use crate::{
        Error,
        features::MonthlyFeatures,
        finance::UserMonthFinance,
        transaction::Direction,
    };

    fn row(user_id: &str, month: Month, income: f64, expenses: f64) -> UserMonthFinance {
        UserMonthFinance {
            user_id: user_id.to_owned(),
            month,
            income,
            count_in: if income > 0.0 { 1 } else { 0 },
            expenses,
            count_out: if expenses > 0.0 { 1 } else { 0 },
            net: income - expenses,
        }
    }

    fn holdout_users(users: &[&str]) -> HashSet<String> {
        users.iter().map(|user| user.to_string()).collect()
    }

    #[test]
    fn splits_by_month_and_user_set() {
        let rows = vec![
            row("u1", Month::March, 100.0, 50.0),
            row("u1", Month::July, 200.0, 80.0),
            row("u2", Month::July, 150.0, 60.0),
        ];

        let split = split_dataset(
            &rows,
            Month::July,
            &holdout_users(&["u2"]),
            DEFAULT_THRESHOLD,
        );

        assert_eq!(split.train_in, vec![rows[0].clone()]);
        assert_eq!(split.val_in, vec![rows[1].clone()]);
        assert_eq!(split.holdout_in, vec![rows[2].clone()]);
    }

    #[test]
    fn holdout_user_outside_holdout_month_is_in_no_split() {
        let rows = vec![row("u2", Month::March, 100.0, 50.0)];

        let split = split_dataset(
            &rows,
            Month::July,
            &holdout_users(&["u2"]),
            DEFAULT_THRESHOLD,
        );

        assert_eq!(split, super::DatasetSplit::default());
    }

    #[test]
    fn threshold_filters_each_target_independently() {
        // Income above the threshold, expenses below it.
        let rows = vec![row("u1", Month::March, 100.0, 5.0)];

        let split = split_dataset(&rows, Month::July, &HashSet::new(), 10.0);

        assert_eq!(split.train_in.len(), 1);
        assert!(split.train_out.is_empty());
    }

    #[test]
    fn threshold_check_is_strictly_greater_than() {
        let rows = vec![row("u1", Month::March, 10.0, 10.0)];

        let split = split_dataset(&rows, Month::July, &HashSet::new(), 10.0);

        assert!(split.train_in.is_empty());
        assert!(split.train_out.is_empty());
    }

    #[test]
    fn every_in_subset_row_exceeds_the_threshold() {
        let rows = vec![
            row("u1", Month::March, 0.0, 50.0),
            row("u2", Month::March, 25.0, 0.0),
            row("u3", Month::July, 40.0, 40.0),
        ];

        let split = split_dataset(&rows, Month::July, &HashSet::new(), DEFAULT_THRESHOLD);

        assert!(split.train_in.iter().all(|row| row.income > 0.0));
        assert!(split.train_out.iter().all(|row| row.expenses > 0.0));
        assert!(split.val_in.iter().all(|row| row.income > 0.0));
        assert!(split.val_out.iter().all(|row| row.expenses > 0.0));
    }

    #[test]
    fn get_x_y_fails_on_a_missing_feature_vector() {
        let rows = vec![row("u1", Month::March, 100.0, 50.0)];
        let features = MonthlyFeatures::new();

        let result = get_x_y(&rows, &features, Direction::In);

        assert_eq!(
            result,
            Err(Error::MissingFeatureVector {
                month: Month::March,
                user_id: "u1".to_owned(),
            })
        );
    }

    #[test]
    fn get_x_y_picks_the_target_for_the_direction() {
        use crate::{
            features::compute_feature_vectors,
            transaction::{Transaction, TransactionType},
        };
        use time::macros::date;

        let transactions = vec![
            Transaction {
                user_id: "u1".to_owned(),
                date: date!(2019 - 03 - 04),
                transaction_type: TransactionType::CT,
                amount: 100.0,
                direction: Direction::In,
                agent: "User".to_owned(),
            },
            Transaction {
                user_id: "u1".to_owned(),
                date: date!(2019 - 03 - 05),
                transaction_type: TransactionType::PT,
                amount: 50.0,
                direction: Direction::Out,
                agent: "User".to_owned(),
            },
        ];
        let features = compute_feature_vectors(&transactions).unwrap();
        let rows = vec![row("u1", Month::March, 100.0, 50.0)];

        let (x, y_in) = get_x_y(&rows, &features, Direction::In).unwrap();
        let (_, y_out) = get_x_y(&rows, &features, Direction::Out).unwrap();

        assert_eq!(x.len(), 1);
        assert_eq!(y_in, vec![100.0]);
        assert_eq!(y_out, vec![50.0]);
    }
}
