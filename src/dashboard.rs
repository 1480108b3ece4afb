use std::collections::BTreeSet;
use std::sync::Arc;

use crate::data::error::LoadError;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::heatmap::{HeatGrid, Viewport};
use crate::data::loader::Loader;
use crate::data::model::{Dataset, Record};
use crate::data::source::DataSource;
use crate::data::summary::{summarize, Summary};

pub const ROW_LIMIT_MIN: usize = 10_000;
pub const ROW_LIMIT_MAX: usize = 1_000_000;
pub const ROW_LIMIT_STEP: usize = 50_000;
pub const ROW_LIMIT_DEFAULT: usize = 100_000;
pub const HOUR_DEFAULT: u32 = 17;

/// Rows shown in the raw-data preview.
pub const PREVIEW_ROWS: usize = 1_000;

/// Heat layer radius, in viewport pixels.
pub const HEAT_RADIUS_PX: f32 = 60.0;
pub const HEAT_CELL_PX: f32 = 8.0;

// ---------------------------------------------------------------------------
// Inputs – everything the user controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub row_limit: usize,
    /// `None` until the user edits the selection: every base is accepted.
    pub bases: Option<BTreeSet<String>>,
    pub hour: u32,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            row_limit: ROW_LIMIT_DEFAULT,
            bases: None,
            hour: HOUR_DEFAULT,
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardView – everything the UI draws
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub dataset: Arc<Dataset>,
    /// Over the full dataset.
    pub summary: Summary,
    /// Criteria actually applied, with the default selection resolved.
    pub criteria: FilterCriteria,
    /// Indices into `dataset.records`, in source order.
    pub filtered: Vec<usize>,
    pub heatmap: HeatGrid,
    pub viewport: Viewport,
}

impl DashboardView {
    pub fn filtered_records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.filtered.iter().map(|&i| &self.dataset.records[i])
    }

    /// First [`PREVIEW_ROWS`] filtered records.
    pub fn preview(&self) -> impl Iterator<Item = &Record> + '_ {
        self.filtered_records().take(PREVIEW_ROWS)
    }
}

/// Produce the view for `inputs`.
///
/// The summary of `previous` is reused when the dataset handle is unchanged,
/// so the histogram is only recomputed when the row-count bound changes.
pub fn render<S: DataSource>(
    loader: &mut Loader<S>,
    inputs: &Inputs,
    previous: Option<&DashboardView>,
) -> Result<DashboardView, LoadError> {
    let dataset = loader.load(inputs.row_limit)?;

    let summary = match previous {
        Some(prev) if Arc::ptr_eq(&prev.dataset, &dataset) => prev.summary.clone(),
        _ => summarize(&dataset),
    };

    let criteria = match &inputs.bases {
        Some(bases) => FilterCriteria {
            bases: bases.clone(),
            hour: inputs.hour,
        },
        None => FilterCriteria::all_bases(&dataset, inputs.hour),
    };
    let filtered = filtered_indices(&dataset, &criteria);

    let viewport = Viewport::NYC;
    let heatmap = HeatGrid::build(
        filtered
            .iter()
            .map(|&i| (dataset.records[i].longitude, dataset.records[i].latitude)),
        &viewport,
        HEAT_CELL_PX,
        HEAT_RADIUS_PX,
    );

    Ok(DashboardView {
        dataset,
        summary,
        criteria,
        filtered,
        heatmap,
        viewport,
    })
}
