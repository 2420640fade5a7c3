//! The feature engine: turns a month slice of transactions into one
//! fixed-order numeric feature vector per (month, user) pair.
//!
//! Four independent feature groups are computed on each month slice and
//! concatenated per user:
//! - counts of each transaction type,
//! - statistics on the per-day transaction frequency (In and Out combined),
//! - day-of-week histograms of incoming and outgoing amounts,
//! - quarter-of-month histograms of incoming and outgoing amounts.

use std::collections::HashMap;

use time::{Date, Month};

use crate::{
    Error,
    transaction::{Direction, Transaction, TransactionType},
};

/// The number of dimensions in a feature vector.
pub const FEATURE_COUNT: usize = 34;

const TYPE_OFFSET: usize = 0;
const FREQ_OFFSET: usize = 9;
const DOW_IN_OFFSET: usize = 12;
const DOW_OUT_OFFSET: usize = 19;
const QUARTER_IN_OFFSET: usize = 26;
const QUARTER_OUT_OFFSET: usize = 30;

/// The canonical, ordered names of the feature dimensions.
///
/// The ordering here is the ordering of the values in a [FeatureVector].
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    // transaction type counts
    "PT_cnt", "DT_cnt", "CT_cnt", "DD_cnt", "DR_cnt", "FT_cnt", "BBU_cnt", "BUB_cnt", "TUB_cnt",
    // transaction frequency statistics
    "mean_tf", "max_tf", "90th_tf",
    // day-of-week incoming amount histogram
    "d0_in_freq", "d1_in_freq", "d2_in_freq", "d3_in_freq", "d4_in_freq", "d5_in_freq",
    "d6_in_freq",
    // day-of-week outgoing amount histogram
    "d0_out_freq", "d1_out_freq", "d2_out_freq", "d3_out_freq", "d4_out_freq", "d5_out_freq",
    "d6_out_freq",
    // quarter-of-month incoming amount histogram
    "q0_in_freq", "q1_in_freq", "q2_in_freq", "q3_in_freq",
    // quarter-of-month outgoing amount histogram
    "q0_out_freq", "q1_out_freq", "q2_out_freq", "q3_out_freq",
];

/// A fixed-order feature vector for one (month, user) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// All feature values in [FEATURE_NAMES] order.
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// The transaction type counts, in [TransactionType::ALL] order.
    pub fn type_counts(&self) -> &[f64] {
        &self.0[TYPE_OFFSET..FREQ_OFFSET]
    }

    /// Mean, max, and 90th percentile of per-day transaction counts.
    pub fn frequency_stats(&self) -> &[f64] {
        &self.0[FREQ_OFFSET..DOW_IN_OFFSET]
    }

    /// The day-of-week incoming amount histogram, 0 = Monday.
    pub fn dayofweek_in(&self) -> &[f64] {
        &self.0[DOW_IN_OFFSET..DOW_OUT_OFFSET]
    }

    /// The day-of-week outgoing amount histogram, 0 = Monday.
    pub fn dayofweek_out(&self) -> &[f64] {
        &self.0[DOW_OUT_OFFSET..QUARTER_IN_OFFSET]
    }

    /// The quarter-of-month incoming amount histogram.
    pub fn quarter_in(&self) -> &[f64] {
        &self.0[QUARTER_IN_OFFSET..QUARTER_OUT_OFFSET]
    }

    /// The quarter-of-month outgoing amount histogram.
    pub fn quarter_out(&self) -> &[f64] {
        &self.0[QUARTER_OUT_OFFSET..FEATURE_COUNT]
    }
}

/// Feature vectors for every user, grouped by calendar month.
pub type MonthlyFeatures = HashMap<Month, HashMap<String, FeatureVector>>;

/// Computes one feature vector per (month, user) pair in the input.
///
/// Each calendar month is processed independently on its month slice; every
/// user appearing anywhere in a slice receives a full vector, zero-filled
/// for the histograms of a direction they have no transactions in.
///
/// Returns `Error::EmptyMonth` if the input slice is empty.
pub fn compute_feature_vectors(transactions: &[Transaction]) -> Result<MonthlyFeatures, Error> {
    if transactions.is_empty() {
        return Err(Error::EmptyMonth);
    }

    let mut month_slices: HashMap<Month, Vec<&Transaction>> = HashMap::new();
    for transaction in transactions {
        month_slices
            .entry(transaction.month())
            .or_default()
            .push(transaction);
    }

    let mut features = MonthlyFeatures::new();

    for (month, slice) in month_slices {
        let days_in_month =
            time::util::days_in_year_month(slice[0].date.year(), month) as usize;

        let type_counts = transaction_type_counts(&slice);
        let frequency_stats = transaction_frequency_stats(&slice, days_in_month);
        let (dayofweek_in, dayofweek_out) = dayofweek_histograms(&slice);
        let (quarter_in, quarter_out) = quarter_histograms(&slice);

        let mut user_vectors = HashMap::new();

        for (user, counts) in type_counts {
            let mut values = [0.0; FEATURE_COUNT];
            values[TYPE_OFFSET..FREQ_OFFSET].copy_from_slice(&counts);
            values[FREQ_OFFSET..DOW_IN_OFFSET].copy_from_slice(&frequency_stats[user]);
            values[DOW_IN_OFFSET..DOW_OUT_OFFSET]
                .copy_from_slice(&dayofweek_in.get(user).copied().unwrap_or_default());
            values[DOW_OUT_OFFSET..QUARTER_IN_OFFSET]
                .copy_from_slice(&dayofweek_out.get(user).copied().unwrap_or_default());
            values[QUARTER_IN_OFFSET..QUARTER_OUT_OFFSET]
                .copy_from_slice(&quarter_in.get(user).copied().unwrap_or_default());
            values[QUARTER_OUT_OFFSET..FEATURE_COUNT]
                .copy_from_slice(&quarter_out.get(user).copied().unwrap_or_default());

            user_vectors.insert(user.to_owned(), FeatureVector(values));
        }

        tracing::debug!(
            "computed feature vectors for {} users in {month:?}",
            user_vectors.len()
        );
        features.insert(month, user_vectors);
    }

    Ok(features)
}

/// Counts how many times each transaction type was used by each user.
///
/// Types the user never used count as zero rather than being omitted.
fn transaction_type_counts<'a>(slice: &[&'a Transaction]) -> HashMap<&'a str, [f64; 9]> {
    let mut counts: HashMap<&str, [f64; 9]> = HashMap::new();

    for transaction in slice {
        let user_counts = counts
            .entry(transaction.user_id.as_str())
            .or_insert([0.0; 9]);
        user_counts[transaction.transaction_type.index()] += 1.0;
    }

    counts
}

/// Computes the mean, max, and 90th percentile of each user's per-day
/// transaction counts.
///
/// Days with no transactions count as zero: the per-user day-count sequence
/// is padded up to the number of days in the month. Incoming and outgoing
/// transactions are combined.
fn transaction_frequency_stats<'a>(
    slice: &[&'a Transaction],
    days_in_month: usize,
) -> HashMap<&'a str, [f64; 3]> {
    let mut per_day: HashMap<(&str, Date), u32> = HashMap::new();
    for transaction in slice {
        *per_day
            .entry((transaction.user_id.as_str(), transaction.date))
            .or_insert(0) += 1;
    }

    let mut day_counts: HashMap<&str, Vec<f64>> = HashMap::new();
    for ((user, _), count) in per_day {
        day_counts.entry(user).or_default().push(count as f64);
    }

    day_counts
        .into_iter()
        .map(|(user, mut counts)| {
            counts.resize(days_in_month, 0.0);
            counts.sort_by(f64::total_cmp);

            let mean = counts.iter().sum::<f64>() / counts.len() as f64;
            let max = counts[counts.len() - 1];
            let p90 = percentile(&counts, 90.0);

            (user, [mean, max, p90])
        })
        .collect()
}

/// Accumulates incoming and outgoing amounts into 7-bin day-of-week
/// histograms per user, then normalizes each non-zero histogram to sum to 1.
///
/// A user with transactions in only one direction gets no entry in the other
/// direction's map; the caller zero-fills.
fn dayofweek_histograms<'a>(
    slice: &[&'a Transaction],
) -> (HashMap<&'a str, [f64; 7]>, HashMap<&'a str, [f64; 7]>) {
    let mut incoming: HashMap<&str, [f64; 7]> = HashMap::new();
    let mut outgoing: HashMap<&str, [f64; 7]> = HashMap::new();

    for transaction in slice {
        let histograms = match transaction.direction {
            Direction::In => &mut incoming,
            Direction::Out => &mut outgoing,
        };
        let bins = histograms
            .entry(transaction.user_id.as_str())
            .or_insert([0.0; 7]);
        bins[transaction.weekday_index()] += transaction.amount;
    }

    normalize_histograms(&mut incoming);
    normalize_histograms(&mut outgoing);

    (incoming, outgoing)
}

/// Accumulates incoming and outgoing amounts into 4-bin quarter-of-month
/// histograms per user, then normalizes each non-zero histogram to sum to 1.
fn quarter_histograms<'a>(
    slice: &[&'a Transaction],
) -> (HashMap<&'a str, [f64; 4]>, HashMap<&'a str, [f64; 4]>) {
    let mut incoming: HashMap<&str, [f64; 4]> = HashMap::new();
    let mut outgoing: HashMap<&str, [f64; 4]> = HashMap::new();

    for transaction in slice {
        let histograms = match transaction.direction {
            Direction::In => &mut incoming,
            Direction::Out => &mut outgoing,
        };
        let bins = histograms
            .entry(transaction.user_id.as_str())
            .or_insert([0.0; 4]);
        bins[quarter_of_month(transaction.date.day())] += transaction.amount;
    }

    normalize_histograms(&mut incoming);
    normalize_histograms(&mut outgoing);

    (incoming, outgoing)
}

/// The quarter-of-month bucket for a day of the month.
///
/// The month is split into days 1-7, 8-14, 15-21, and 22 to the end, so the
/// last bucket is 8 to 10 days wide depending on the month.
fn quarter_of_month(day: u8) -> usize {
    match day {
        1..=7 => 0,
        8..=14 => 1,
        15..=21 => 2,
        _ => 3,
    }
}

fn normalize_histograms<const BINS: usize>(histograms: &mut HashMap<&str, [f64; BINS]>) {
    for bins in histograms.values_mut() {
        let total: f64 = bins.iter().sum();

        if total != 0.0 {
            for bin in bins.iter_mut() {
                *bin /= total;
            }
        }
    }
}

/// The q-th percentile of an ascending-sorted sequence, with linear
/// interpolation between the two nearest ranks.
pub(crate) fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
