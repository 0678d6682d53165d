//! Figure layouts used in the paper
//!
//! Each builder reads an [`AggregatedDataset`] and produces a [`Figure`]; nothing
//! here touches the file system or a plotting backend.

use crate::config::{Distribution, Implementation, ScaleFunction};
use crate::dataset::{pair_name, AggregatedDataset, ConfigKey, SizeKey};
use crate::request::{ChartKind, Figure, PlotRequest, Scale, Series, SeriesData};
use crate::tables::ErrorTable;
use std::path::PathBuf;
use thiserror::Error;

/// Percentiles the box plot whiskers are drawn at.
pub const WHISKER_PERCENTILES: (f64, f64) = (5.0, 95.0);

/// Horizontal shift separating the two boxes of a comparison at one position.
pub const COMPARISON_OFFSET: f64 = 0.15;

/// Centroid count histogram of single location figures.
pub const LOCATION_HISTOGRAM: ChartKind = ChartKind::Histogram {
    min: 5.0,
    max: 95.0,
    bins: 30,
};

/// Centroid count histogram of comparison figures.
pub const COMPARISON_HISTOGRAM: ChartKind = ChartKind::Histogram {
    min: 20.0,
    max: 100.0,
    bins: 40,
};

/// Positions labelled on the x axis of comparison figures.
pub const COMPARISON_POSITIONS: (i32, i32) = (-5, 5);

/// Panels per row of the error figures.
const ERROR_FIGURE_COLUMNS: usize = 3;

/// Errors that can occur when pairing centroid sizes with error tables
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("No {what} loaded for {location}")]
    MissingData { what: &'static str, location: String },

    #[error("Centroid index {index} is out of range for trial {trial} in {location}")]
    CentroidIndexOutOfRange {
        index: isize,
        trial: usize,
        location: String,
    },

    #[error("{location} has {sizes} centroid size rows but {errors} error rows")]
    RowCountMismatch {
        location: String,
        sizes: usize,
        errors: usize,
    },
}

fn box_plot() -> ChartKind {
    ChartKind::BoxPlot {
        lower_whisker: WHISKER_PERCENTILES.0,
        upper_whisker: WHISKER_PERCENTILES.1,
    }
}

/// Positioned error samples of one scale function at one location.
fn positioned(
    dataset: &AggregatedDataset,
    scale_function: ScaleFunction,
    location: &str,
    column: fn(&ErrorTable) -> &[f64],
) -> SeriesData {
    SeriesData::Positioned(
        dataset
            .series(scale_function, location)
            .into_iter()
            .map(|entry| (entry.axis_value, column(entry.table).to_vec()))
            .collect(),
    )
}

fn centroid_counts(dataset: &AggregatedDataset, scale_function: ScaleFunction, location: &str) -> SeriesData {
    SeriesData::Samples(
        dataset
            .centroid_counts(scale_function, location)
            .map(|series| series.values().to_vec())
            .unwrap_or_default(),
    )
}

/// Error, normalized error and centroid count panels for every scale function of
/// one location.
///
/// `title_suffix` follows the scale function name in every title, e.g. `" (tree, uniform)"`.
pub fn location_figure(
    dataset: &AggregatedDataset,
    scale_functions: &[ScaleFunction],
    location: &str,
    title_suffix: &str,
    output_path: Option<PathBuf>,
) -> Figure {
    let mut panels = Vec::with_capacity(scale_functions.len() * ERROR_FIGURE_COLUMNS);
    for &scale_function in scale_functions {
        let name = format!("{}{}", scale_function.display_name(), title_suffix);

        panels.push(
            PlotRequest::new(format!("{name} error"), box_plot(), Scale::Log).with_series(
                Series::new(positioned(dataset, scale_function, location, ErrorTable::error_q)),
            ),
        );
        panels.push(
            PlotRequest::new(format!("{name} norm_error"), box_plot(), Scale::Log).with_series(
                Series::new(positioned(dataset, scale_function, location, ErrorTable::norm_error_q)),
            ),
        );
        panels.push(
            PlotRequest::new(format!("{name} centroid_counts"), LOCATION_HISTOGRAM, Scale::Linear)
                .with_series(Series::new(centroid_counts(dataset, scale_function, location))),
        );
    }

    Figure::new(output_path, ERROR_FIGURE_COLUMNS, panels)
}

/// Like [`location_figure`], with two locations side by side in every panel.
///
/// `locations` holds `(location name, legend label)` pairs. The first location's
/// boxes sit left of each position, the second's right of it.
pub fn comparison_figure(
    dataset: &AggregatedDataset,
    scale_functions: &[ScaleFunction],
    locations: [(&str, &str); 2],
    title_suffix: &str,
    output_path: Option<PathBuf>,
) -> Figure {
    let offsets = [-COMPARISON_OFFSET, COMPARISON_OFFSET];
    let (min_position, max_position) = COMPARISON_POSITIONS;

    let mut panels = Vec::with_capacity(scale_functions.len() * ERROR_FIGURE_COLUMNS);
    for &scale_function in scale_functions {
        let name = format!("{}{}", scale_function.display_name(), title_suffix);

        let mut error = PlotRequest::new(format!("{name} error"), box_plot(), Scale::Log)
            .with_position_range(min_position, max_position);
        let mut norm_error = PlotRequest::new(format!("{name} norm_error"), box_plot(), Scale::Log)
            .with_position_range(min_position, max_position);
        let mut counts =
            PlotRequest::new(format!("{name} centroid_counts"), COMPARISON_HISTOGRAM, Scale::Linear);

        for ((location, label), offset) in locations.into_iter().zip(offsets) {
            error = error.with_series(
                Series::new(positioned(dataset, scale_function, location, ErrorTable::error_q))
                    .with_label(label)
                    .with_offset(offset),
            );
            norm_error = norm_error.with_series(
                Series::new(positioned(dataset, scale_function, location, ErrorTable::norm_error_q))
                    .with_label(label)
                    .with_offset(offset),
            );
            counts = counts.with_series(
                Series::new(centroid_counts(dataset, scale_function, location)).with_label(label),
            );
        }

        panels.extend([error, norm_error, counts]);
    }

    Figure::new(output_path, ERROR_FIGURE_COLUMNS, panels)
}

/// Scatter plots of one centroid's size against the normalized error, one panel
/// per implementation/distribution pair (implementations are rows).
///
/// Row `i` of the centroid size listing is paired with row `i` of the error
/// table. Negative `centroid_index` values count from the last centroid.
///
/// # Errors
///
/// Fails if a pair was not loaded, the two files disagree on the number of
/// trials, or a trial has too few centroids for `centroid_index`.
pub fn size_figure(
    dataset: &AggregatedDataset,
    scale_function: ScaleFunction,
    value_label: &str,
    centroid_index: isize,
    implementations: &[Implementation],
    distributions: &[Distribution],
    output_path: Option<PathBuf>,
) -> Result<Figure, AlignmentError> {
    let mut panels = Vec::with_capacity(implementations.len() * distributions.len());

    for &implementation in implementations {
        for &distribution in distributions {
            let location = pair_name(implementation, distribution);
            let missing = |what| AlignmentError::MissingData {
                what,
                location: location.clone(),
            };

            let table = dataset
                .error_table(&ConfigKey::new(scale_function, location.as_str(), value_label))
                .ok_or_else(|| missing("error table"))?;
            let sizes = dataset
                .centroid_sizes(&SizeKey::new(implementation, distribution, scale_function))
                .ok_or_else(|| missing("centroid sizes"))?;

            if sizes.len() != table.len() {
                return Err(AlignmentError::RowCountMismatch {
                    location,
                    sizes: sizes.len(),
                    errors: table.len(),
                });
            }

            let selected = sizes.select(centroid_index).map_err(|trial| {
                AlignmentError::CentroidIndexOutOfRange {
                    index: centroid_index,
                    trial,
                    location: location.clone(),
                }
            })?;

            let points = selected
                .into_iter()
                .zip(table.norm_error_q())
                .map(|(size, &norm_error)| (size as f64, norm_error))
                .collect();

            let title = format!(
                "{}, {}, {}, q={}, index {}",
                scale_function.display_name(),
                implementation.dir_name(),
                distribution.display_name(),
                value_label,
                centroid_index
            );
            panels.push(
                PlotRequest::new(title, ChartKind::Scatter, Scale::Linear)
                    .with_series(Series::new(SeriesData::Points(points))),
            );
        }
    }

    Ok(Figure::new(output_path, distributions.len(), panels))
}
