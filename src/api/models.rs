//! API data models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::DateRange;

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Filter values as sent by the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewQuery {
    pub published_from: Option<NaiveDate>,
    pub published_to: Option<NaiveDate>,
    pub liked_from: Option<NaiveDate>,
    pub liked_to: Option<NaiveDate>,
    pub search: Option<String>,
    pub channel: Option<String>,
}

/// Slider limits for the two date filters
#[derive(Debug, Serialize, Deserialize)]
pub struct DateBounds {
    pub published: Option<DateRange>,
    pub liked: Option<DateRange>,
}
