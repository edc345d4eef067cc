/// Data layer: raw tables, join, filtering and the derived report.
///
/// Architecture:
/// ```text
///  olist_*.csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → RawTables
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   join    │  left-join chain, project, clean → FlatTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category / payment / review predicates → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ presentation  │  toggles → (metrics, chart) layout → Report
///   └──────────────┘
/// ```

pub mod chart;
pub mod error;
pub mod export;
pub mod filter;
pub mod join;
pub mod labels;
pub mod loader;
pub mod model;
pub mod presentation;
pub mod summary;
