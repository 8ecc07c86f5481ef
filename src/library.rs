//! Loading the liked-videos export produced by the acquisition step

use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::error::{AnalyzerError, Result};
use crate::record::RawRecord;

/// Read and parse the export at `path`. Any failure here is fatal for the session.
pub async fn load_library<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AnalyzerError::fatal_input(path, e))?;

    let records =
        parse_library(&content).map_err(|e| AnalyzerError::fatal_input(path, e))?;

    info!("📚 Loaded {} library entries from: {}", records.len(), path.display());
    Ok(records)
}

/// Parse the export text: a JSON object mapping video id to its record.
/// Records are returned in document order.
pub fn parse_library(content: &str) -> Result<Vec<RawRecord>> {
    let document: Value = serde_json::from_str(content)?;

    let entries = document.as_object().ok_or_else(|| {
        AnalyzerError::Configuration("library export must be a JSON object keyed by video id".to_string())
    })?;

    Ok(entries
        .iter()
        .map(|(id, value)| RawRecord::from_value(id.as_str(), value))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_document_order() {
        let content = r#"{
            "zzz": { "video_data": {} },
            "aaa": { "playlist_data": {} },
            "mmm": { "video_data": {}, "playlist_data": {} }
        }"#;

        let records = parse_library(content).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["zzz", "aaa", "mmm"]);
        assert!(records[1].video_data.is_none());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(parse_library("[1, 2, 3]").is_err());
        assert!(parse_library("{ not json").is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_fatal() {
        let err = load_library("/definitely/not/here/liked.json").await.unwrap_err();
        assert!(matches!(err, AnalyzerError::FatalInput { .. }));
    }
}
