//! Runs the full pipeline against a transactions CSV and logs a summary.

use std::{collections::HashSet, path::PathBuf};

use clap::Parser;
use time::Month;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use spendlens::{
    features::compute_feature_vectors,
    loader::{LoaderConfig, load_dataset},
    split::{DEFAULT_THRESHOLD, split_dataset},
};

/// Computes per-user monthly feature vectors from a transactions CSV.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the transactions CSV.
    #[arg(long)]
    transactions: PathBuf,

    /// File path to the transaction type lookup CSV.
    #[arg(long)]
    transaction_types: PathBuf,

    /// Shuffle the row order after loading.
    #[arg(long, default_value_t = false)]
    shuffle: bool,

    /// The month (1-12) to hold out for validation, if any.
    #[arg(long)]
    holdout_month: Option<u8>,

    /// The activity threshold applied to the split target columns.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,
}

fn main() {
    setup_logging();

    let args = Args::parse();

    let config = LoaderConfig {
        transactions_path: args.transactions,
        transaction_types_path: args.transaction_types,
        shuffle: args.shuffle,
    };

    let (transactions, finances) = load_dataset(&config).expect("Could not load the dataset");
    tracing::info!(
        "loaded {} transactions covering {} user-months",
        transactions.len(),
        finances.len()
    );

    let features =
        compute_feature_vectors(&transactions).expect("Could not compute feature vectors");

    for (month, users) in &features {
        tracing::info!("{month:?}: feature vectors for {} users", users.len());
    }

    if let Some(month_number) = args.holdout_month {
        let holdout_month =
            Month::try_from(month_number).expect("The holdout month must be between 1 and 12");
        let split = split_dataset(&finances, holdout_month, &HashSet::new(), args.threshold);

        tracing::info!(
            "split with {holdout_month:?} held out: train in/out {}/{}, validation in/out {}/{}",
            split.train_in.len(),
            split.train_out.len(),
            split.val_in.len(),
            split.val_out.len()
        );
    }
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_filter(filter::LevelFilter::INFO),
        )
        .init();
}
