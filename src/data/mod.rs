/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  remote .csv.gz / local .csv
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  open stream, gunzip if needed
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → Dataset, memoized per row limit (cache)
///   └──────────┘
///        │
///        ├──────────────────────┐
///        ▼                      ▼
///   ┌──────────┐          ┌──────────┐
///   │  summary  │          │  filter   │  bases + hour → filtered indices
///   └──────────┘          └──────────┘
///                               │
///                               ▼
///                         ┌──────────┐
///                         │  heatmap  │  project + smooth → HeatGrid
///                         └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod heatmap;
pub mod loader;
pub mod model;
pub mod source;
pub mod summary;
