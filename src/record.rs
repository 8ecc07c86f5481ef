use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::duration::parse_duration;

/// Default for missing title and channel fields
pub const UNKNOWN: &str = "Unknown";

/// One entry of the library export, keyed by video id.
///
/// `video_data` is the catalog metadata for the video and is absent when the
/// video is deleted or private. `playlist_data` is the playlist item that
/// recorded when the video was liked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    #[serde(skip)]
    pub id: String,

    #[serde(default)]
    pub video_data: Option<Value>,

    #[serde(default)]
    pub playlist_data: Option<Value>,
}

impl RawRecord {
    /// Build a record from the JSON value stored under `id` in the export.
    /// Anything that is not an object becomes a record without metadata.
    pub fn from_value(id: impl Into<String>, value: &Value) -> Self {
        let sub_document = |key: &str| value.get(key).filter(|v| v.is_object()).cloned();

        Self {
            id: id.into(),
            video_data: sub_document("video_data"),
            playlist_data: sub_document("playlist_data"),
        }
    }
}

/// Normalized video row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Row {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub duration_seconds: f64,
    pub published_at: Option<DateTime<Utc>>,
    pub liked_at: Option<DateTime<Utc>>,
    pub category_id: Option<u32>,
    pub tags: Vec<String>,
}

/// Normalize one raw record. Returns `None` when the catalog metadata is missing;
/// malformed fields fall back to their defaults instead of failing.
pub fn normalize(raw: &RawRecord) -> Option<Row> {
    let video = raw.video_data.as_ref()?;
    let snippet = &video["snippet"];

    let text_or_unknown = |value: &Value| value.as_str().unwrap_or(UNKNOWN).to_string();

    let duration_seconds = match video["contentDetails"]["duration"].as_str() {
        Some(text) => match parse_duration(text) {
            Ok(seconds) => seconds,
            Err(e) => {
                debug!("{}: {}, using 0s", raw.id, e);
                0.0
            }
        },
        None => 0.0,
    };

    let tags = snippet["tags"]
        .as_array()
        .map(|tags| {
            tags.iter()
                .filter_map(|t| t.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let liked_at = raw
        .playlist_data
        .as_ref()
        .and_then(|playlist| parse_timestamp(&playlist["publishedAt"]));

    Some(Row {
        id: raw.id.clone(),
        title: text_or_unknown(&snippet["title"]),
        channel: text_or_unknown(&snippet["channelTitle"]),
        duration_seconds,
        published_at: parse_timestamp(&snippet["publishedAt"]),
        liked_at,
        category_id: parse_category_id(&snippet["categoryId"]),
        tags,
    })
}

/// Normalize a whole export, keeping document order
pub fn normalize_all(records: &[RawRecord]) -> Vec<Row> {
    let rows: Vec<Row> = records.iter().filter_map(normalize).collect();

    let skipped = records.len() - rows.len();
    if skipped > 0 {
        info!("🚫 Skipped {} unavailable videos (deleted or private)", skipped);
    }

    rows
}

/// Parse a timestamp leniently: RFC 3339 first, then naive date-times and bare dates as UTC.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_category_id(value: &Value) -> Option<u32> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}
