//! Timestamped forecast series and "from now on" windowing.

use chrono::{DateTime, Utc};

/// Parallel timestamps and values, one sample per index.
///
/// Timestamps are expected to be non-decreasing, as Open-Meteo emits them.
/// Values are optional because the API reports gaps as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimestampedSeries {
    times: Vec<DateTime<Utc>>,
    values: Vec<Option<f64>>,
}

impl TimestampedSeries {
    /// Build a series, truncating to the shorter input so the arrays stay parallel
    pub fn new(mut times: Vec<DateTime<Utc>>, mut values: Vec<Option<f64>>) -> Self {
        if times.len() != values.len() {
            tracing::warn!(
                "Series length mismatch ({} times, {} values), truncating",
                times.len(),
                values.len()
            );
            let len = times.len().min(values.len());
            times.truncate(len);
            values.truncate(len);
        }
        Self { times, values }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (DateTime<Utc>, Option<f64>)>) -> Self {
        let (times, values) = pairs.into_iter().unzip();
        Self { times, values }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, Option<f64>)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }
}

/// The first `count` samples at or after `now`, in order.
///
/// Fewer samples (including none) is a normal result meaning there is
/// nothing left to show.
pub fn future_window(
    series: &TimestampedSeries,
    now: DateTime<Utc>,
    count: usize,
) -> TimestampedSeries {
    TimestampedSeries::from_pairs(series.iter().filter(|(t, _)| *t >= now).take(count))
}

/// Index of the first sample at or after `now`.
///
/// Falls back to the last index when every sample is in the past, and is
/// `None` only for an empty slice.
pub fn first_current_index(times: &[DateTime<Utc>], now: DateTime<Utc>) -> Option<usize> {
    times
        .iter()
        .position(|t| *t >= now)
        .or_else(|| times.len().checked_sub(1))
}
