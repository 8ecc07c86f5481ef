//! One full recomputation pass: filter the dataset and derive every projection

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analytics::{
    category_frequency, channel_frequency, duration_distribution, tag_frequency,
    title_term_weights, DurationDistribution, FrequencyTable, TermScoreTable,
};
use crate::config::AnalyticsConfig;
use crate::dataset::{Dataset, FilterChain};
use crate::record::Row;

pub const CHANNELS_TITLE: &str = "Top 10 Channels by Video Count";
pub const CATEGORIES_TITLE: &str = "Most Popular Categories";
pub const DURATIONS_TITLE: &str = "Distribution of Video Durations";
pub const TAGS_TITLE: &str = "Top 10 Most Popular Tags";
pub const TITLE_TERMS_TITLE: &str = "Top 10 Words by TF-IDF Score";

/// A projection together with its display title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Titled<T> {
    pub title: String,
    pub data: T,
}

impl<T> Titled<T> {
    pub fn new(title: &str, data: T) -> Self {
        Self {
            title: title.to_string(),
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowCounts {
    pub total_row_count: usize,
    pub filtered_row_count: usize,
}

/// Everything the presentation layer needs for one set of filter values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub rows: Vec<Row>,
    pub counts: RowCounts,
    pub channels: Titled<FrequencyTable>,
    pub categories: Titled<FrequencyTable>,
    pub durations: Titled<DurationDistribution>,
    pub tags: Titled<FrequencyTable>,
    pub title_terms: Titled<TermScoreTable>,
}

impl DashboardView {
    /// No rows matched the filters
    pub fn is_empty(&self) -> bool {
        self.counts.filtered_row_count == 0
    }
}

/// Filter the dataset and compute all projections over the result
pub fn compute_view(dataset: &Dataset, chain: &FilterChain, config: &AnalyticsConfig) -> DashboardView {
    let rows = dataset.filter(chain);
    debug!("🔎 {} of {} rows match {:?}", rows.len(), dataset.total(), chain);

    if rows.is_empty() {
        warn!("No videos match the current filters");
    }

    DashboardView {
        counts: RowCounts {
            total_row_count: dataset.total(),
            filtered_row_count: rows.len(),
        },
        channels: Titled::new(CHANNELS_TITLE, channel_frequency(&rows, config.top_n)),
        categories: Titled::new(CATEGORIES_TITLE, category_frequency(&rows)),
        durations: Titled::new(
            DURATIONS_TITLE,
            duration_distribution(&rows, config.histogram_bins, config.log_count_axis),
        ),
        tags: Titled::new(TAGS_TITLE, tag_frequency(&rows, config.top_n)),
        title_terms: Titled::new(
            TITLE_TERMS_TITLE,
            title_term_weights(&rows, &config.tfidf, config.top_n),
        ),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ChannelSelection;

    fn row(id: &str, title: &str, channel: &str, duration: f64) -> Row {
        Row {
            id: id.to_string(),
            title: title.to_string(),
            channel: channel.to_string(),
            duration_seconds: duration,
            published_at: None,
            liked_at: None,
            category_id: Some(10),
            tags: vec!["music".to_string()],
        }
    }

    #[test]
    fn test_view_counts_and_projections() {
        let dataset = Dataset::new(vec![
            row("1", "Live concert", "Band", 3600.0),
            row("2", "Studio session", "Band", 600.0),
            row("3", "Pasta recipe", "Kitchen", 300.0),
        ]);

        let chain = FilterChain::new().with_channel(ChannelSelection::parse("Band"));
        let view = compute_view(&dataset, &chain, &AnalyticsConfig::default());

        assert_eq!(view.counts, RowCounts { total_row_count: 3, filtered_row_count: 2 });
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.channels.title, CHANNELS_TITLE);
        assert_eq!(view.channels.data.pairs(), vec![("Band", 2)]);
        assert_eq!(view.categories.data.pairs(), vec![("Music", 2)]);
        assert_eq!(view.tags.data.pairs(), vec![("music", 2)]);
        assert_eq!(view.durations.data.stats.count, 2);
        assert!(!view.title_terms.data.is_empty());
        assert!(!view.is_empty());
    }

    #[test]
    fn test_empty_view() {
        let dataset = Dataset::new(vec![row("1", "Live concert", "Band", 3600.0)]);
        let chain = FilterChain::new().with_query("no such video");
        let view = compute_view(&dataset, &chain, &AnalyticsConfig::default());

        assert!(view.is_empty());
        assert_eq!(view.counts.total_row_count, 1);
        assert!(view.channels.data.is_empty());
        assert!(view.title_terms.data.is_empty());
        assert!(view.durations.data.stats.is_empty());
    }

    #[test]
    fn test_view_serializes() {
        let dataset = Dataset::new(vec![row("1", "Live concert", "Band", 3600.0)]);
        let view = compute_view(&dataset, &FilterChain::new(), &AnalyticsConfig::default());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["counts"]["filtered_row_count"], 1);
        assert_eq!(json["durations"]["title"], DURATIONS_TITLE);
    }
}
