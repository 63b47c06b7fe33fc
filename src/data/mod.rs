/// Data layer: core types, loading, caching, filtering and trend analysis.
///
/// Architecture:
/// ```text
///  cursos.csv (`;`-separated)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + normalise cells → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  one Arc<Table> per source, kept until invalidated
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year / program selection → new Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  trend    │  first vs last year per program → TrendRecord
///   └──────────┘
/// ```

pub mod cache;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod trend;
