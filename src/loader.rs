//! Loads the raw transaction dataset and its static lookup table from CSV
//! files, and enriches each row with its direction, agent, and calendar
//! fields.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    finance::{UserMonthFinance, aggregate_user_finances},
    transaction::{
        Direction, Transaction, TransactionType, TransactionTypeInfo, TransactionTypeLookup,
    },
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Where to find the transaction dataset and its side files.
///
/// The side-file path is explicit configuration rather than a hardcoded
/// relative path, so callers control where the lookup table lives.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// File path to the transactions CSV.
    ///
    /// Expected columns: `user_id,transaction_date,transaction_type,amount`
    /// with dates formatted as `YYYY-MM-DD`.
    pub transactions_path: PathBuf,
    /// File path to the transaction type lookup CSV.
    ///
    /// Expected columns: `type,direction,agent`.
    pub transaction_types_path: PathBuf,
    /// Whether to shuffle the row order after loading.
    ///
    /// A pure permutation for unbiased downstream sampling; aggregates are
    /// unaffected.
    pub shuffle: bool,
}

#[derive(Debug, Deserialize)]
struct TransactionRow {
    user_id: String,
    transaction_date: String,
    transaction_type: String,
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct TransactionTypeRow {
    #[serde(rename = "type")]
    type_code: String,
    direction: Direction,
    agent: String,
}

/// Loads the transaction type lookup table from a CSV side file.
///
/// Returns `Error::UnknownTransactionType` if the file contains a type code
/// outside the closed [TransactionType] set.
pub fn load_transaction_types(path: &Path) -> Result<TransactionTypeLookup, Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut lookup = TransactionTypeLookup::new();

    for row in reader.deserialize() {
        let row: TransactionTypeRow = row?;
        let code: TransactionType = row.type_code.parse()?;
        lookup.insert(
            code,
            TransactionTypeInfo {
                direction: row.direction,
                agent: row.agent,
            },
        );
    }

    Ok(lookup)
}

/// Loads the transaction dataset and enriches each row with its direction,
/// agent, and calendar fields.
///
/// Returns `Error::InvalidInput` if the dataset path does not point to a CSV
/// file, and `Error::UnknownTransactionType` if a row's type code is missing
/// from the lookup table.
pub fn load_transactions(config: &LoaderConfig) -> Result<Vec<Transaction>, Error> {
    if config.transactions_path.extension().and_then(|e| e.to_str()) != Some("csv") {
        return Err(Error::InvalidInput(
            config.transactions_path.display().to_string(),
        ));
    }

    let lookup = load_transaction_types(&config.transaction_types_path)?;
    let mut reader = csv::Reader::from_path(&config.transactions_path)?;
    let mut transactions = Vec::new();

    for row in reader.deserialize() {
        let row: TransactionRow = row?;
        let date = Date::parse(&row.transaction_date, &DATE_FORMAT).map_err(|error| {
            Error::InvalidCsv(format!(
                "could not parse '{}' as a date: {error}",
                row.transaction_date
            ))
        })?;
        let transaction_type: TransactionType = row.transaction_type.parse()?;
        let info = lookup
            .get(&transaction_type)
            .ok_or_else(|| Error::UnknownTransactionType(row.transaction_type.clone()))?;

        transactions.push(Transaction {
            user_id: row.user_id,
            date,
            transaction_type,
            amount: row.amount,
            direction: info.direction,
            agent: info.agent.clone(),
        });
    }

    if config.shuffle {
        transactions.shuffle(&mut rand::thread_rng());
    }

    tracing::debug!(
        "loaded {} transactions from {}",
        transactions.len(),
        config.transactions_path.display()
    );

    Ok(transactions)
}

/// Loads the transaction dataset together with the per-user monthly finance
/// table derived from it.
pub fn load_dataset(
    config: &LoaderConfig,
) -> Result<(Vec<Transaction>, Vec<UserMonthFinance>), Error> {
    let transactions = load_transactions(config)?;
    let finances = aggregate_user_finances(&transactions);

    Ok((transactions, finances))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{LoaderConfig, load_transactions};
    use crate::Error;

    #[test]
    fn non_csv_path_is_rejected() {
        let config = LoaderConfig {
            transactions_path: PathBuf::from("transactions.parquet"),
            transaction_types_path: PathBuf::from("transaction_types.csv"),
            shuffle: false,
        };

        let result = load_transactions(&config);

        assert_eq!(
            result,
            Err(Error::InvalidInput("transactions.parquet".to_owned()))
        );
    }
}
