//! In-memory row collection and the composable filter chain

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::warn;

use crate::error::{AnalyzerError, Result};
use crate::record::Row;

/// Channel option meaning "no channel filter"
pub const ALL_CHANNELS: &str = "All";

/// Which timestamp a date range applies to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    PublishedAt,
    LikedAt,
}

impl DateField {
    fn timestamp(self, row: &Row) -> Option<DateTime<Utc>> {
        match self {
            DateField::PublishedAt => row.published_at,
            DateField::LikedAt => row.liked_at,
        }
    }
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Channel drop-down selection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChannelSelection {
    #[default]
    All,
    Channel(String),
}

impl ChannelSelection {
    pub fn parse(value: &str) -> Self {
        if value == ALL_CHANNELS {
            ChannelSelection::All
        } else {
            ChannelSelection::Channel(value.to_string())
        }
    }
}

/// A single row predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    DateRange { field: DateField, range: DateRange },
    /// Lower-cased needle
    TextSearch(String),
    Channel(String),
    PassAll,
}

impl Predicate {
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Predicate::DateRange { field, range } => field
                .timestamp(row)
                .map(|ts| range.contains(ts.date_naive()))
                .unwrap_or(false),
            Predicate::TextSearch(needle) => {
                row.title.to_lowercase().contains(needle.as_str())
                    || row.channel.to_lowercase().contains(needle.as_str())
            }
            Predicate::Channel(channel) => row.channel == *channel,
            Predicate::PassAll => true,
        }
    }
}

/// Rows pass iff their `field` timestamp exists and falls within `[from, to]` by date
pub fn apply_date_range(field: DateField, from: NaiveDate, to: NaiveDate) -> Predicate {
    Predicate::DateRange {
        field,
        range: DateRange::new(from, to),
    }
}

/// Case-insensitive substring search over title and channel; empty query passes everything
pub fn apply_text_search(query: &str) -> Predicate {
    if query.is_empty() {
        Predicate::PassAll
    } else {
        Predicate::TextSearch(query.to_lowercase())
    }
}

/// Exact channel match; `All` passes everything
pub fn apply_channel_filter(selection: &ChannelSelection) -> Predicate {
    match selection {
        ChannelSelection::All => Predicate::PassAll,
        ChannelSelection::Channel(name) => Predicate::Channel(name.clone()),
    }
}

/// Filter settings for one recomputation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterChain {
    pub published: Option<DateRange>,
    pub liked: Option<DateRange>,
    pub query: String,
    pub channel: ChannelSelection,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_published(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.published = Some(DateRange::new(from, to));
        self
    }

    pub fn with_liked(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.liked = Some(DateRange::new(from, to));
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_channel(mut self, channel: ChannelSelection) -> Self {
        self.channel = channel;
        self
    }

    /// Active predicates in application order: date ranges, search, channel
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(range) = self.published {
            predicates.push(apply_date_range(DateField::PublishedAt, range.from, range.to));
        }
        if let Some(range) = self.liked {
            predicates.push(apply_date_range(DateField::LikedAt, range.from, range.to));
        }
        predicates.push(apply_text_search(&self.query));
        predicates.push(apply_channel_filter(&self.channel));

        predicates.retain(|p| *p != Predicate::PassAll);
        predicates
    }
}

/// Rows satisfying every predicate in the chain, in their original order
pub fn filter(rows: &[Row], chain: &FilterChain) -> Vec<Row> {
    let predicates = chain.predicates();
    rows.iter()
        .filter(|row| predicates.iter().all(|p| p.matches(row)))
        .cloned()
        .collect()
}

/// Channel drop-down options: "All" followed by the sorted distinct channels
pub fn channel_options(rows: &[Row]) -> Vec<String> {
    let channels: BTreeSet<&str> = rows.iter().map(|r| r.channel.as_str()).collect();

    std::iter::once(ALL_CHANNELS.to_string())
        .chain(channels.into_iter().map(str::to_string))
        .collect()
}

/// Immutable collection of normalized rows
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset, keeping the first row for any repeated id
    pub fn new(rows: Vec<Row>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(rows.len());

        for row in rows {
            if seen.insert(row.id.clone()) {
                unique.push(row);
            } else {
                warn!("Duplicate video id {} ignored", row.id);
            }
        }

        Self { rows: unique }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn filter(&self, chain: &FilterChain) -> Vec<Row> {
        filter(&self.rows, chain)
    }

    /// Complete a possibly open-ended range with the dataset's own bounds for
    /// `field`. `None` when neither end is given.
    pub fn resolve_range(
        &self,
        field: DateField,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Option<DateRange>> {
        if from.is_none() && to.is_none() {
            return Ok(None);
        }

        let bounds = self.date_bounds(field);
        let from = from.or(bounds.map(|b| b.from)).unwrap_or(NaiveDate::MIN);
        let to = to.or(bounds.map(|b| b.to)).unwrap_or(NaiveDate::MAX);

        if from > to {
            return Err(AnalyzerError::Configuration(format!(
                "date range starts after it ends: {} > {}",
                from, to
            )));
        }

        Ok(Some(DateRange::new(from, to)))
    }

    /// Earliest and latest date present for `field`, ignoring rows without one
    pub fn date_bounds(&self, field: DateField) -> Option<DateRange> {
        let dates = self
            .rows
            .iter()
            .filter_map(|row| field.timestamp(row))
            .map(|ts| ts.date_naive());

        dates.fold(None, |bounds: Option<DateRange>, date| match bounds {
            None => Some(DateRange::new(date, date)),
            Some(r) => Some(DateRange::new(r.from.min(date), r.to.max(date))),
        })
    }
}
