//! Spendlens is a batch analysis library for a personal-finance transaction
//! dataset.
//!
//! It loads raw transaction records from CSV, derives per-user monthly
//! income and expense targets, engineers one fixed-order feature vector per
//! (month, user) pair, splits the result into train/validation/holdout
//! sets, and scores predictions with a relative-tolerance accuracy metric.
//!
//! All processing is single-threaded, offline, and pure: each component
//! returns new data structures and never mutates its input.

#![warn(missing_docs)]

pub mod chart;
mod error;
pub mod features;
pub mod finance;
pub mod loader;
pub mod metrics;
pub mod split;
pub mod transaction;

pub use error::Error;
