//! Data layer: core types, loading, caching, filtering and summaries.
//!
//! Architecture:
//! ```text
//!   environment_data.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse CSV → Dataset   (cache keeps it in memory)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  Vec<Reading>, locations, time bounds
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  time range + locations → indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  summary  │  per-group means and first→last deltas
//!   └──────────┘
//! ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;

pub use cache::DatasetCache;
pub use error::LoadError;
pub use filter::{FilterCriteria, FilterResult, TimeRange, filter_and_summarize, filtered_indices};
pub use loader::load_csv;
pub use model::{Dataset, Reading, TimeKind, Timestamp};
pub use summary::{GroupKey, Summary, summarize};
