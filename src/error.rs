//! Defines the crate level error type.

use time::Month;

/// The errors that may occur while loading, transforming, or scoring the
/// transaction dataset.
///
/// Errors are always propagated to the caller unmodified. There is no retry
/// or recovery logic anywhere in the crate: a failed batch run should halt
/// and be inspected.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The dataset path did not point to a recognised tabular data file.
    #[error("\"{0}\" is not a path to a CSV dataset")]
    InvalidInput(String),

    /// The CSV had issues that prevented it from being parsed.
    #[error("could not parse the CSV file: {0}")]
    InvalidCsv(String),

    /// A transaction type code had no entry in the static type lookup.
    ///
    /// The lookup table maps each transaction type to its direction and
    /// agent. A row with an unmapped type cannot be enriched, so loading
    /// stops rather than producing a partially joined table.
    #[error("transaction type \"{0}\" has no lookup entry")]
    UnknownTransactionType(String),

    /// Feature computation was invoked on an empty transaction slice.
    #[error("cannot compute feature vectors for an empty transaction slice")]
    EmptyMonth,

    /// A split row's (month, user) pair had no computed feature vector.
    ///
    /// This happens when the feature engine was run on a different data
    /// slice than the one the split was derived from.
    #[error("no feature vector was computed for user \"{user_id}\" in {month:?}")]
    MissingFeatureVector {
        /// The month of the row that missed.
        month: Month,
        /// The user ID of the row that missed.
        user_id: String,
    },

    /// A metric was given empty input arrays.
    #[error("metric inputs must not be empty")]
    EmptyMetricInput,

    /// A metric was given true and predicted arrays of different lengths.
    #[error("metric inputs must be the same length, got {0} and {1}")]
    MetricLengthMismatch(usize, usize),
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::InvalidCsv(value.to_string())
    }
}
