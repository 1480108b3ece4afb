use std::collections::BTreeSet;

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Record – one pickup event
// ---------------------------------------------------------------------------

/// A single pickup (one row of the source CSV).
///
/// Field names on the wire match the upstream header so an exported file can
/// be loaded again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "date/time")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Dispatch provider that logged the pickup, e.g. `B02512`.
    pub base: String,
}

impl Record {
    /// Hour-of-day bucket (0..=23).
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with its pre-computed base index.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records, in source order.
    pub records: Vec<Record>,
    /// Sorted set of distinct `base` values.
    pub bases: BTreeSet<String>,
}

impl Dataset {
    /// Build the base index from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let bases = records.iter().map(|r| r.base.clone()).collect();
        Dataset { records, bases }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
