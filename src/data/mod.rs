/// Data layer: core types, loading, filtering, and export.
///
/// Architecture:
/// ```text
///  .csv / .json / built-in sample
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse source → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   Table   │  named columns, ordered rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply conditions + quality cut → good/bad subsets
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  serialize subsets to timestamped CSV
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
