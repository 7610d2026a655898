/// Data layer: raw tables, cleaning, range filtering and export.
///
/// Architecture:
/// ```text
///   uploaded .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → RawTable (untyped cells)
///   └──────────┘
///        │  + ColumnSelection
///        ▼
///   ┌───────────┐
///   │ normalize  │  coerce time/value, drop bad rows, sort → CleanedDataset
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  [lower, upper] on value → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  FilteredView → CSV bytes
///   └──────────┘
/// ```

pub mod coerce;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
