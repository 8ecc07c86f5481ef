//! Plain-text rendering of a dashboard view for the terminal

use std::fmt::Write;

use crate::analytics::{DurationStats, FrequencyTable, TermScoreTable};
use crate::duration::format_duration;
use crate::pipeline::{DashboardView, Titled};
use crate::record::Row;

pub const NO_MATCHES: &str = "No videos match the current filters.";

/// Render the whole view. `show_rows` adds the filtered video table.
pub fn render_text(view: &DashboardView, show_rows: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Total number of videos: {}", view.counts.total_row_count);
    let _ = writeln!(out, "Number of videos in the selected range: {}", view.counts.filtered_row_count);

    if view.is_empty() {
        let _ = writeln!(out, "\n{}", NO_MATCHES);
        return out;
    }

    if show_rows {
        out.push('\n');
        out.push_str(&render_rows(&view.rows));
    }

    out.push_str(&render_frequency(&view.channels));
    out.push_str(&render_frequency(&view.categories));

    let _ = writeln!(out, "\n== {} ==", view.durations.title);
    out.push_str(&render_stats(&view.durations.data.stats));

    out.push_str(&render_frequency(&view.tags));
    out.push_str(&render_terms(&view.title_terms));

    out
}

fn render_rows(rows: &[Row]) -> String {
    let mut out = String::new();
    for row in rows {
        let published = row
            .published_at
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<11}  {:>11}  {:<10}  {}  ({})",
            row.id,
            format_duration(row.duration_seconds),
            published,
            row.title,
            row.channel
        );
    }
    out
}

fn render_frequency(table: &Titled<FrequencyTable>) -> String {
    let mut out = format!("\n== {} ==\n", table.title);
    if table.data.is_empty() {
        out.push_str("(no data)\n");
    }
    for entry in &table.data.entries {
        let _ = writeln!(out, "{:>6}  {}", entry.count, entry.key);
    }
    out
}

fn render_stats(stats: &DurationStats) -> String {
    if stats.is_empty() {
        return "(no data)\n".to_string();
    }

    [
        ("Min", stats.min),
        ("Max", stats.max),
        ("Mean", stats.mean),
        ("Median", stats.median),
        ("Mode", stats.mode),
    ]
    .iter()
    .map(|(label, value)| format!("{:<7} {}\n", label, format_duration(*value)))
    .collect()
}

fn render_terms(table: &Titled<TermScoreTable>) -> String {
    let mut out = format!("\n== {} ==\n", table.title);
    if table.data.is_empty() {
        out.push_str("(no data)\n");
    }
    for entry in &table.data.entries {
        let _ = writeln!(out, "{:>8.4}  {}", entry.score, entry.term);
    }
    out
}
