//! API request handlers

use anyhow::Result;
use serde_json::Value;

use super::models::{DateBounds, ViewQuery};
use crate::config::Config;
use crate::dataset::{channel_options, ChannelSelection, DateField, Dataset, FilterChain};
use crate::pipeline::{compute_view, DashboardView};

/// Handle health check requests
pub fn health_check(dataset: &Dataset) -> Value {
    serde_json::json!({
        "status": "healthy",
        "service": "liked-videos-analyzer",
        "version": env!("CARGO_PKG_VERSION"),
        "videos": dataset.total(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

/// Build a request-scoped filter chain. An open-ended range takes its
/// missing bound from the dataset.
pub fn filter_chain(dataset: &Dataset, query: &ViewQuery) -> Result<FilterChain> {
    Ok(FilterChain {
        published: dataset.resolve_range(DateField::PublishedAt, query.published_from, query.published_to)?,
        liked: dataset.resolve_range(DateField::LikedAt, query.liked_from, query.liked_to)?,
        query: query.search.clone().unwrap_or_default(),
        channel: query
            .channel
            .as_deref()
            .map(ChannelSelection::parse)
            .unwrap_or_default(),
    })
}

/// Handle view requests
pub fn get_view(dataset: &Dataset, config: &Config, query: &ViewQuery) -> Result<DashboardView> {
    let chain = filter_chain(dataset, query)?;
    Ok(compute_view(dataset, &chain, &config.analytics))
}

/// Channel options for the current filters, ignoring the channel selection itself
pub fn list_channels(dataset: &Dataset, query: &ViewQuery) -> Result<Vec<String>> {
    let mut chain = filter_chain(dataset, query)?;
    chain.channel = ChannelSelection::All;
    Ok(channel_options(&dataset.filter(&chain)))
}

/// Handle date bound requests
pub fn get_bounds(dataset: &Dataset) -> DateBounds {
    DateBounds {
        published: dataset.date_bounds(DateField::PublishedAt),
        liked: dataset.date_bounds(DateField::LikedAt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Row;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn dataset() -> Dataset {
        let row = |id: &str, channel: &str, day: u32| Row {
            id: id.to_string(),
            title: format!("Video {}", id),
            channel: channel.to_string(),
            duration_seconds: 30.0,
            published_at: Some(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()),
            liked_at: None,
            category_id: None,
            tags: Vec::new(),
        };
        Dataset::new(vec![row("a", "A", 1), row("b", "B", 10), row("c", "A", 20)])
    }

    #[test]
    fn test_open_ended_range_uses_dataset_bounds() {
        let query = ViewQuery {
            published_from: NaiveDate::from_ymd_opt(2024, 1, 5),
            ..ViewQuery::default()
        };
        let chain = filter_chain(&dataset(), &query).unwrap();
        assert_eq!(chain.published.unwrap().to, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());

        let view = get_view(&dataset(), &Config::default(), &query).unwrap();
        assert_eq!(view.counts.filtered_row_count, 2);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let query = ViewQuery {
            published_from: NaiveDate::from_ymd_opt(2024, 2, 1),
            published_to: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..ViewQuery::default()
        };
        assert!(get_view(&dataset(), &Config::default(), &query).is_err());
    }

    #[test]
    fn test_channels_ignore_selected_channel() {
        let query = ViewQuery {
            channel: Some("A".to_string()),
            ..ViewQuery::default()
        };
        assert_eq!(list_channels(&dataset(), &query).unwrap(), vec!["All", "A", "B"]);
    }
}
