//! Derived statistics over a filtered set of rows
//!
//! Every aggregator is a pure function of its input rows and returns a
//! well-defined empty projection for an empty input.

pub mod durations;
pub mod frequency;
pub mod stop_words;
pub mod tfidf;

pub use durations::{duration_distribution, DurationDistribution, DurationStats, Histogram, HistogramBin};
pub use frequency::{category_frequency, channel_frequency, tag_frequency, FrequencyEntry, FrequencyTable};
pub use tfidf::{title_term_weights, TermScore, TermScoreTable, TfIdfConfig};

/// Number of entries shown in ranked tables
pub const DEFAULT_TOP_N: usize = 10;

/// Number of equal-width duration histogram bins
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;
