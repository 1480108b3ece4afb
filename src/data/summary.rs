use chrono::NaiveDateTime;

use super::model::Dataset;

/// Number of hour-of-day buckets.
pub const HOURS_PER_DAY: usize = 24;

/// Aggregates over the full loaded dataset (never the filtered subset).
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub distinct_bases: usize,
    /// `(min, max)` timestamp; `None` when the dataset is empty.
    pub time_range: Option<(NaiveDateTime, NaiveDateTime)>,
    /// `hourly_histogram[h]` = records picked up during hour `h`.
    pub hourly_histogram: [usize; HOURS_PER_DAY],
}

/// Compute count, distinct bases, timestamp extrema and the hour histogram in
/// a single pass.
pub fn summarize(dataset: &Dataset) -> Summary {
    let mut hourly_histogram = [0usize; HOURS_PER_DAY];
    let mut time_range: Option<(NaiveDateTime, NaiveDateTime)> = None;

    for r in &dataset.records {
        hourly_histogram[r.hour() as usize] += 1;
        time_range = Some(match time_range {
            None => (r.timestamp, r.timestamp),
            Some((lo, hi)) => (lo.min(r.timestamp), hi.max(r.timestamp)),
        });
    }

    Summary {
        count: dataset.len(),
        distinct_bases: dataset.bases.len(),
        time_range,
        hourly_histogram,
    }
}
