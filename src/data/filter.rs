use std::collections::BTreeSet;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Filter predicate: accepted bases and one hour of day
// ---------------------------------------------------------------------------

/// Selection made in the side panel, rebuilt on every interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Accepted `base` values. Empty means nothing passes.
    pub bases: BTreeSet<String>,
    /// Accepted hour of day. Values above 23 match nothing.
    pub hour: u32,
}

impl FilterCriteria {
    /// Criteria accepting every base present in `dataset` at `hour`.
    pub fn all_bases(dataset: &Dataset, hour: u32) -> Self {
        FilterCriteria {
            bases: dataset.bases.clone(),
            hour,
        }
    }
}

/// Return indices of records that pass both predicates, in source order.
///
/// A record passes when:
/// * its `base` is in `criteria.bases`, and
/// * the hour of its timestamp equals `criteria.hour`.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    if criteria.bases.is_empty() || criteria.hour > 23 {
        return Vec::new();
    }
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.hour() == criteria.hour && criteria.bases.contains(&r.base))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{record, three_pickups};
    use crate::data::model::Dataset;

    fn criteria(bases: &[&str], hour: u32) -> FilterCriteria {
        FilterCriteria {
            bases: bases.iter().map(|b| b.to_string()).collect(),
            hour,
        }
    }

    #[test]
    fn test_single_base_single_hour() {
        let ds = three_pickups();
        assert_eq!(filtered_indices(&ds, &criteria(&["B02512"], 5)), vec![0]);
    }

    #[test]
    fn test_all_bases_keeps_order() {
        let ds = three_pickups();
        let all = FilterCriteria::all_bases(&ds, 5);
        assert_eq!(filtered_indices(&ds, &all), vec![0, 1]);
    }

    #[test]
    fn test_empty_selection_matches_nothing() {
        let ds = three_pickups();
        for hour in 0..24 {
            assert!(filtered_indices(&ds, &criteria(&[], hour)).is_empty());
        }
    }

    #[test]
    fn test_out_of_range_hour_matches_nothing() {
        let ds = three_pickups();
        for hour in [24, 25, 99, u32::MAX] {
            let all = FilterCriteria::all_bases(&ds, hour);
            assert!(filtered_indices(&ds, &all).is_empty(), "hour={hour}");
        }
    }

    #[test]
    fn test_result_is_exactly_the_matching_rows() {
        let ds = Dataset::from_records(vec![
            record("B02512", 1, 17, 40.7, -73.9),
            record("B02598", 1, 17, 40.7, -73.9),
            record("B02617", 1, 17, 40.7, -73.9),
            record("B02512", 2, 18, 40.7, -73.9),
            record("B02598", 3, 17, 40.7, -73.9),
        ]);
        let crit = criteria(&["B02512", "B02598", "B09999"], 17);
        let hits = filtered_indices(&ds, &crit);
        assert_eq!(hits, vec![0, 1, 4]);

        for (i, r) in ds.records.iter().enumerate() {
            let matches = crit.bases.contains(&r.base) && r.hour() == crit.hour;
            assert_eq!(matches, hits.contains(&i), "row {i}");
        }
    }
}
