use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::record::Row;

/// Half-open bin `[start, end)`; the last bin also includes its end
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram over the full range of values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    /// Presentation hint: counts are heavily skewed, plot them on a log axis
    pub log_count_axis: bool,
}

impl Histogram {
    /// Bucket `values` into `bin_count` equal-width bins spanning min..=max.
    /// A zero-width range uses unit-width bins starting at the value.
    pub fn build(values: &[f64], bin_count: usize, log_count_axis: bool) -> Self {
        let bin_count = bin_count.max(1);

        let (start, width) = match min_max(values) {
            Some((min, max)) if max > min => (min, (max - min) / bin_count as f64),
            Some((min, _)) => (min, 1.0),
            None => (0.0, 1.0),
        };

        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                start: start + width * i as f64,
                end: start + width * (i + 1) as f64,
                count: 0,
            })
            .collect();

        for &value in values {
            let slot = ((value - start) / width).floor().max(0.0) as usize;
            bins[slot.min(bin_count - 1)].count += 1;
        }

        Self { bins, log_count_axis }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Summary statistics of durations in seconds. All zero when there is no data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DurationStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Smallest of the most frequent values
    pub mode: f64,
}

impl DurationStats {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean: sorted.iter().sum::<f64>() / count as f64,
            median,
            mode: mode_of_sorted(&sorted),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Histogram and summary statistics over the same values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DurationDistribution {
    pub histogram: Histogram,
    pub stats: DurationStats,
}

pub fn duration_distribution(rows: &[Row], bin_count: usize, log_count_axis: bool) -> DurationDistribution {
    let values: Vec<f64> = rows.iter().map(|r| r.duration_seconds).collect();

    DurationDistribution {
        histogram: Histogram::build(&values, bin_count, log_count_axis),
        stats: DurationStats::from_values(&values),
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Sorted input, so the first run reaching the highest count is the smallest mode
fn mode_of_sorted(sorted: &[f64]) -> f64 {
    let mut best = (sorted[0], 0usize);
    let mut run = (sorted[0], 0usize);

    for &value in sorted {
        if value.total_cmp(&run.0) == Ordering::Equal {
            run.1 += 1;
        } else {
            run = (value, 1);
        }
        if run.1 > best.1 {
            best = run;
        }
    }

    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_with(durations: &[f64]) -> Vec<Row> {
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| Row {
                id: i.to_string(),
                title: String::new(),
                channel: String::new(),
                duration_seconds: d,
                published_at: None,
                liked_at: None,
                category_id: None,
                tags: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_stats_odd_count() {
        let stats = DurationStats::from_values(&[300.0, 60.0, 60.0, 3600.0, 120.0]);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, 60.0);
        assert_eq!(stats.max, 3600.0);
        assert_eq!(stats.mean, 828.0);
        assert_eq!(stats.median, 120.0);
        assert_eq!(stats.mode, 60.0);
    }

    #[test]
    fn test_stats_even_count_median() {
        let stats = DurationStats::from_values(&[10.0, 40.0, 20.0, 30.0]);
        assert_eq!(stats.median, 25.0);
    }

    #[test]
    fn test_mode_prefers_smallest_on_tie() {
        let stats = DurationStats::from_values(&[90.0, 30.0, 90.0, 30.0, 5.0]);
        assert_eq!(stats.mode, 30.0);

        let all_unique = DurationStats::from_values(&[7.0, 3.0, 9.0]);
        assert_eq!(all_unique.mode, 3.0);
    }

    #[test]
    fn test_histogram_covers_full_range() {
        let values = [0.0, 10.0, 20.0, 30.0, 3000.0];
        let histogram = Histogram::build(&values, 30, true);

        assert_eq!(histogram.bins.len(), 30);
        assert_eq!(histogram.total(), values.len());
        assert_eq!(histogram.bins[0].start, 0.0);
        assert_eq!(histogram.bins[29].end, 3000.0);
        assert_eq!(histogram.bins[0].count, 4);
        assert_eq!(histogram.bins[29].count, 1);
    }

    #[test]
    fn test_histogram_single_value() {
        let histogram = Histogram::build(&[42.0, 42.0], 30, true);
        assert_eq!(histogram.bins[0].count, 2);
        assert_eq!(histogram.total(), 2);
    }

    #[test]
    fn test_empty_distribution() {
        let distribution = duration_distribution(&[], 30, true);
        assert_eq!(distribution.histogram.bins.len(), 30);
        assert!(distribution.histogram.bins.iter().all(|b| b.count == 0));
        assert_eq!(distribution.stats, DurationStats::default());
        assert!(distribution.stats.is_empty());
    }

    #[test]
    fn test_distribution_from_rows() {
        let distribution = duration_distribution(&rows_with(&[60.0, 120.0, 180.0]), 3, true);
        let counts: Vec<usize> = distribution.histogram.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1]);
        assert_eq!(distribution.stats.mean, 120.0);
    }
}
