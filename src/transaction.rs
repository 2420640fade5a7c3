//! The transaction data model: directions, the closed set of transaction
//! type codes, the static type lookup, and the enriched transaction record.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::Deserialize;
use time::{Date, Month, Weekday};

use crate::Error;

/// Whether a transaction moves money towards or away from a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Direction {
    /// An incoming transaction (income).
    In,
    /// An outgoing transaction (expense).
    Out,
}

/// The transaction type codes that occur in the dataset.
///
/// The set is closed and the declaration order is significant: it fixes the
/// ordering of the type-count block of the feature vector. New codes in the
/// input data fail parsing rather than being silently bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[allow(missing_docs)]
pub enum TransactionType {
    PT,
    DT,
    CT,
    DD,
    DR,
    FT,
    BBU,
    BUB,
    TUB,
}

impl TransactionType {
    /// Every transaction type code, in feature order.
    pub const ALL: [TransactionType; 9] = [
        TransactionType::PT,
        TransactionType::DT,
        TransactionType::CT,
        TransactionType::DD,
        TransactionType::DR,
        TransactionType::FT,
        TransactionType::BBU,
        TransactionType::BUB,
        TransactionType::TUB,
    ];

    /// The position of this code in the fixed feature order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The code as it appears in the dataset.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::PT => "PT",
            TransactionType::DT => "DT",
            TransactionType::CT => "CT",
            TransactionType::DD => "DD",
            TransactionType::DR => "DR",
            TransactionType::FT => "FT",
            TransactionType::BBU => "BBU",
            TransactionType::BUB => "BUB",
            TransactionType::TUB => "TUB",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "PT" => Ok(TransactionType::PT),
            "DT" => Ok(TransactionType::DT),
            "CT" => Ok(TransactionType::CT),
            "DD" => Ok(TransactionType::DD),
            "DR" => Ok(TransactionType::DR),
            "FT" => Ok(TransactionType::FT),
            "BBU" => Ok(TransactionType::BBU),
            "BUB" => Ok(TransactionType::BUB),
            "TUB" => Ok(TransactionType::TUB),
            _ => Err(Error::UnknownTransactionType(code.to_owned())),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The static lookup attributes for one transaction type code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionTypeInfo {
    /// Whether transactions of this type are incoming or outgoing.
    pub direction: Direction,
    /// Who initiates transactions of this type (e.g. the user or the bank).
    pub agent: String,
}

/// Maps each transaction type code to its direction and agent.
pub type TransactionTypeLookup = HashMap<TransactionType, TransactionTypeInfo>;

/// One raw transaction row after enrichment by the loader.
///
/// Immutable once loaded; every downstream component only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The anonymised ID of the user the transaction belongs to.
    pub user_id: String,
    /// The calendar date the transaction happened on.
    pub date: Date,
    /// The transaction type code.
    pub transaction_type: TransactionType,
    /// The transaction amount in the dataset's fixed currency.
    pub amount: f64,
    /// Whether the transaction is incoming or outgoing, from the type lookup.
    pub direction: Direction,
    /// Who initiated the transaction, from the type lookup.
    pub agent: String,
}

impl Transaction {
    /// The calendar month the transaction falls in.
    pub fn month(&self) -> Month {
        self.date.month()
    }

    /// The weekday the transaction happened on.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// The weekday as an index, 0 = Monday through 6 = Sunday.
    pub fn weekday_index(&self) -> usize {
        self.date.weekday().number_days_from_monday() as usize
    }

    /// The 1-based day of the year the transaction happened on.
    pub fn day_of_year(&self) -> u16 {
        self.date.ordinal()
    }
}
