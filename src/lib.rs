/// Liked Videos Analyzer - Rust Implementation
///
/// Turns a liked-videos library export into a filterable analytical view:
/// date, text and channel filters plus channel, category, duration, tag and
/// title keyword statistics.

pub mod analytics;
pub mod category;
pub mod config;
pub mod dataset;
pub mod duration;
pub mod error;
pub mod library;
pub mod pipeline;
pub mod record;
pub mod report;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::dataset::{ChannelSelection, DateField, DateRange, Dataset, FilterChain};
pub use crate::duration::{format_duration, parse_duration};
pub use crate::error::{AnalyzerError, Result};
pub use crate::library::{load_library, parse_library};
pub use crate::pipeline::{compute_view, DashboardView};
pub use crate::record::{normalize, normalize_all, RawRecord, Row};
