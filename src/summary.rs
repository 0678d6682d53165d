//! Per-configuration summary tables
//!
//! This module provides a textual companion to the figures:
//! - [`SummaryRow`] type holding the headline numbers of one configuration
//! - ASCII table formatting using the [`tabled`] crate

use crate::dataset::AggregatedDataset;
use crate::stats::{percentile, sorted_finite};
use tabled::{Table, Tabled};

/// Headline numbers of one configuration.
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "Scale function")]
    pub scale_function: String,
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "q")]
    pub value_label: String,
    #[tabled(rename = "Axis")]
    pub axis_value: i32,
    #[tabled(rename = "Trials")]
    pub trials: usize,
    /// Median absolute error, formatted in scientific notation.
    #[tabled(rename = "Median error")]
    pub median_error: String,
    #[tabled(rename = "P95 error")]
    pub p95_error: String,
    #[tabled(rename = "Median norm error")]
    pub median_norm_error: String,
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.3e}"))
}

/// Builds one row per configuration, ordered by scale function, location and
/// axis position.
pub fn summarize(dataset: &AggregatedDataset) -> Vec<SummaryRow> {
    let mut rows: Vec<_> = dataset
        .iter()
        .map(|(key, axis_value, table)| {
            let errors = sorted_finite(table.error_q());
            let norm_errors = sorted_finite(table.norm_error_q());
            SummaryRow {
                scale_function: key.scale_function.prefix().to_string(),
                location: key.location.clone(),
                value_label: key.value_label.clone(),
                axis_value: axis_value.0,
                trials: table.len(),
                median_error: format_value(percentile(&errors, 50.0)),
                p95_error: format_value(percentile(&errors, 95.0)),
                median_norm_error: format_value(percentile(&norm_errors, 50.0)),
            }
        })
        .collect();

    // Key order sorts labels as text; tables read better along the axis.
    rows.sort_by(|a, b| {
        (&a.scale_function, &a.location, a.axis_value).cmp(&(
            &b.scale_function,
            &b.location,
            b.axis_value,
        ))
    });
    rows
}

/// Formats summary rows as an ASCII table using the [`tabled`] crate
///
/// # Arguments
/// * `rows` - A slice of [`SummaryRow`] to format
/// * `title` - Optional title for the table
///
/// # Returns
/// A formatted ASCII table as a [`String`]
pub fn format_summary_table(rows: &[SummaryRow], title: Option<&str>) -> String {
    if rows.is_empty() {
        return "No data available for summary".to_string();
    }

    let table = Table::new(rows).to_string();

    if let Some(title) = title {
        format!("{}\n{}\n{}", title, "=".repeat(title.len()), table)
    } else {
        table
    }
}
