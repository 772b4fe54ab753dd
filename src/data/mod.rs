/// Data layer: roster types, views, statistics and export.
///
/// Architecture:
/// ```text
///   seed / add form
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  Roster: Vec<StudentRecord> (validated)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  search / min score / class → view (indices)
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  stats    │   │  export   │  full roster → .xlsx / .csv bytes
///   └──────────┘   └──────────┘
/// ```

pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod stats;
