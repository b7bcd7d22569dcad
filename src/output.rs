use crate::dashboard::{Chart, Dashboard, Summary};
use crate::errors::AppResult;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s)?;
    Ok(())
}

/// Markdown table of the first `max_rows` rows.
pub fn render_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    let mut table = Table::new(slice);
    table.with(Style::markdown());
    let mut out = table.to_string();
    if rows.len() > max_rows {
        out.push_str(&format!("\n... {} more rows", rows.len() - max_rows));
    }
    out
}

pub fn render_summary<T>(summary: &Summary<T>) -> String
where
    T: Tabled + Clone,
{
    match summary.value() {
        Some(v) => render_rows(std::slice::from_ref(v), 1),
        None => "(no data)".to_string(),
    }
}

fn chart_header<T>(chart: &Chart<T>) -> String {
    format!("[{}] {}", chart.id, chart.title)
}

/// Console rendering of all eight charts.
pub fn render_dashboard(d: &Dashboard, max_rows: usize) -> String {
    let sections = [
        (chart_header(&d.calls_per_day), render_rows(&d.calls_per_day.data, max_rows)),
        (chart_header(&d.status_by_region), render_rows(&d.status_by_region.data, max_rows)),
        (chart_header(&d.calls_per_bucket), render_rows(&d.calls_per_bucket.data, max_rows)),
        (chart_header(&d.bucket_trend), render_rows(&d.bucket_trend.data, max_rows)),
        (chart_header(&d.answered_share), render_rows(&d.answered_share.data, max_rows)),
        (chart_header(&d.top_attendant), render_summary(&d.top_attendant.data)),
        (chart_header(&d.top_region_answered), render_summary(&d.top_region_answered.data)),
        (chart_header(&d.top_region_unanswered), render_summary(&d.top_region_unanswered.data)),
    ];
    sections
        .into_iter()
        .map(|(header, body)| format!("{}\n\n{}\n", header, body))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the tabular charts as CSV plus the full dashboard as JSON.
/// Returns the files written.
pub fn export_dashboard(dir: &Path, d: &Dashboard) -> AppResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let mut csv_file = |name: &str| {
        let path = dir.join(name);
        written.push(path.clone());
        path
    };
    write_csv(&csv_file("graph1_calls_per_day.csv"), &d.calls_per_day.data)?;
    write_csv(&csv_file("graph2_status_by_region.csv"), &d.status_by_region.data)?;
    write_csv(&csv_file("graph3_calls_per_bucket.csv"), &d.calls_per_bucket.data)?;
    write_csv(&csv_file("graph5_answered_share.csv"), &d.answered_share.data)?;

    let json = dir.join("dashboard.json");
    write_json(&json, d)?;
    written.push(json);
    Ok(written)
}
