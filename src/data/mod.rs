/// Data layer: schema, loading, and the date-range pipeline.
///
/// Architecture:
/// ```text
///  data/*.csv  (twelve known sources)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  per-source CSV → Result<Dataset, LoadError>
///   └──────────┘       collapsed to Option at the Session boundary
///        │
///        ▼
///   ┌──────────┐
///   │  range    │  compute_bounds → validate → filter_by_date
///   └──────────┘
///        │
///        ▼
///    role dashboards (ui)
/// ```
pub mod loader;
pub mod model;
pub mod range;
pub mod schema;
