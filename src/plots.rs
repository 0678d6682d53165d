//! PNG rendering of figures using the [`plotters`] crate
//!
//! [`PngRenderer`] implements [`PlottingBackend`]: every [`Figure`] becomes one
//! bitmap with its panels laid out on a grid. Log scaled panels are drawn by
//! plotting `log10` of each value and labelling ticks with the unscaled values.
//! Box statistics are taken over every sample before moving onto the log axis;
//! histogram and scatter values at or below zero are left out.

use crate::request::{ChartKind, Figure, PlotRequest, PlottingBackend, Scale, Series, SeriesData};
use crate::stats::{histogram, BoxSummary};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs::create_dir_all;
use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Series colours, in series order.
const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(255, 127, 14),
    RGBColor(31, 119, 180),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

/// Half the width of a box, in axis positions.
const BOX_HALF_WIDTH: f64 = 0.1;

/// Radius of scatter plot markers, in pixels.
const MARKER_SIZE: i32 = 3;

/// Renders figures to PNG files.
#[derive(Debug, Clone)]
pub struct PngRenderer {
    /// Width of a whole figure in pixels.
    pub width: u32,
    /// Height of one grid row in pixels.
    pub row_height: u32,
    /// Directory for figures that do not name an output path.
    pub fallback_dir: PathBuf,
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self {
            width: 1500,
            row_height: 400,
            fallback_dir: PathBuf::from("."),
        }
    }
}

impl PngRenderer {
    pub fn new(fallback_dir: impl Into<PathBuf>) -> Self {
        Self {
            fallback_dir: fallback_dir.into(),
            ..Self::default()
        }
    }

    /// Path a figure is written to.
    pub fn output_path(&self, figure: &Figure) -> PathBuf {
        match &figure.output_path {
            Some(path) => path.clone(),
            None => {
                let title = figure
                    .panels
                    .first()
                    .map_or("figure", |panel| panel.title.as_str());
                self.fallback_dir.join(format!("{}.png", file_stem(title)))
            }
        }
    }
}

impl PlottingBackend for PngRenderer {
    type Error = PlotError;

    /// Renders `figure` to a PNG file, creating parent directories as needed.
    ///
    /// Panels without values are drawn as empty charts.
    fn render(&mut self, figure: &Figure) -> Result<()> {
        validate(figure)?;

        let output_path = self.output_path(figure);
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }

        let rows = figure.rows();
        let root = BitMapBackend::new(&output_path, (self.width, self.row_height * rows as u32))
            .into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

        let areas = root.split_evenly((rows, figure.columns));
        for (panel, area) in figure.panels.iter().zip(&areas) {
            draw_panel(area, panel)?;
        }

        root.present()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        info!(path = %output_path.display(), panels = figure.panels.len(), "rendered figure");
        Ok(())
    }
}

/// Rejects figures a chart cannot be drawn from.
fn validate(figure: &Figure) -> Result<()> {
    if figure.panels.is_empty() {
        return Err(PlotError::InvalidData("Figure has no panels".to_string()));
    }

    for panel in &figure.panels {
        for series in &panel.series {
            let matches = matches!(
                (&panel.chart_kind, &series.data),
                (ChartKind::BoxPlot { .. }, SeriesData::Positioned(_))
                    | (ChartKind::Histogram { .. }, SeriesData::Samples(_))
                    | (ChartKind::Scatter, SeriesData::Points(_))
            );
            if !matches {
                return Err(PlotError::InvalidData(format!(
                    "Panel '{}' holds series data that does not fit its chart kind",
                    panel.title
                )));
            }
        }

        if let ChartKind::Histogram { min, max, bins } = panel.chart_kind {
            if bins == 0 || max <= min {
                return Err(PlotError::InvalidData(format!(
                    "Panel '{}' has an empty histogram range",
                    panel.title
                )));
            }
        }
    }

    Ok(())
}

fn draw_panel(area: &Area<'_>, panel: &PlotRequest) -> Result<()> {
    match panel.chart_kind {
        ChartKind::BoxPlot {
            lower_whisker,
            upper_whisker,
        } => draw_box_plot(area, panel, lower_whisker, upper_whisker),
        ChartKind::Histogram { min, max, bins } => draw_histogram(area, panel, min, max, bins),
        ChartKind::Scatter => draw_scatter(area, panel),
    }
}

/// Maps a value onto the drawn axis; [`None`] if it cannot be shown.
fn to_axis(scale: Scale, value: f64) -> Option<f64> {
    match scale {
        Scale::Linear => value.is_finite().then_some(value),
        Scale::Log => (value.is_finite() && value > 0.0).then(|| value.log10()),
    }
}

fn tick_label(scale: Scale, value: f64) -> String {
    match scale {
        Scale::Linear => format!("{value:.3}"),
        Scale::Log => format!("{:.0e}", 10f64.powf(value)),
    }
}

/// Range spanning `values` with a small margin; `0..1` if there are none.
fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if max - min < f64::EPSILON {
        return (min - 0.5)..(max + 0.5);
    }

    let margin = (max - min) * 0.05;
    (min - margin)..(max + margin)
}

/// Box summary of all finite `values`, moved onto the drawn axis.
///
/// On log panels, parts of the box at or below zero sit on the lowest positive
/// part of the box. Boxes with nothing above zero are not drawn.
fn axis_summary(
    values: &[f64],
    scale: Scale,
    lower_whisker: f64,
    upper_whisker: f64,
) -> Option<BoxSummary> {
    let summary = BoxSummary::from_values(values, lower_whisker, upper_whisker)?;
    match scale {
        Scale::Linear => Some(summary),
        Scale::Log => {
            let floor = [
                summary.lower_whisker,
                summary.q1,
                summary.median,
                summary.q3,
                summary.upper_whisker,
            ]
            .into_iter()
            .filter_map(|v| to_axis(Scale::Log, v))
            .reduce(f64::min)?;
            Some(summary.map(|v| to_axis(Scale::Log, v).unwrap_or(floor)))
        }
    }
}

fn series_color(index: usize) -> RGBColor {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

fn draw_box_plot(
    area: &Area<'_>,
    panel: &PlotRequest,
    lower_whisker: f64,
    upper_whisker: f64,
) -> Result<()> {
    // (series index, x, summary on the drawn axis)
    let mut boxes = Vec::new();
    for (index, series) in panel.series.iter().enumerate() {
        let SeriesData::Positioned(groups) = &series.data else {
            continue;
        };
        for (position, values) in groups {
            let Some(summary) = axis_summary(values, panel.scale, lower_whisker, upper_whisker)
            else {
                continue;
            };
            boxes.push((index, position.as_f64() + series.offset, summary));
        }
    }

    let x_range = match panel.position_range {
        Some((min, max)) => (f64::from(min) - 0.5)..(f64::from(max) + 0.5),
        None => {
            let positions = panel
                .series
                .iter()
                .flat_map(|s| s.data.positions().into_iter().map(move |p| p.as_f64() + s.offset));
            let range = padded_range(positions);
            (range.start - 0.5)..(range.end + 0.5)
        }
    };
    let y_range = padded_range(
        boxes
            .iter()
            .flat_map(|(_, _, s)| [s.lower_whisker, s.upper_whisker]),
    );

    let scale = panel.scale;
    let x_formatter = |x: &f64| format!("{x:.0}");
    let y_formatter = move |y: &f64| tick_label(scale, *y);
    let x_ticks = (x_range.end - x_range.start).round().max(1.0) as usize;

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(x_ticks)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (index, series) in panel.series.iter().enumerate() {
        let color = series_color(index);
        let elements: Vec<PathElement<(f64, f64)>> = boxes
            .iter()
            .filter(|(i, _, _)| *i == index)
            .flat_map(|(_, x, summary)| box_elements(*x, summary, color))
            .collect();

        let annotation = chart
            .draw_series(elements)
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        if let Some(label) = &series.label {
            annotation
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
        }
    }

    draw_legend(&mut chart, &panel.series)
}

/// Outline, median and whiskers of one box.
fn box_elements(x: f64, summary: &BoxSummary, color: RGBColor) -> Vec<PathElement<(f64, f64)>> {
    let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
    let (cap_left, cap_right) = (x - BOX_HALF_WIDTH / 2.0, x + BOX_HALF_WIDTH / 2.0);
    let line = color.stroke_width(1);

    vec![
        PathElement::new(
            vec![
                (left, summary.q1),
                (right, summary.q1),
                (right, summary.q3),
                (left, summary.q3),
                (left, summary.q1),
            ],
            line,
        ),
        PathElement::new(
            vec![(left, summary.median), (right, summary.median)],
            color.stroke_width(3),
        ),
        PathElement::new(vec![(x, summary.q3), (x, summary.upper_whisker)], line),
        PathElement::new(vec![(x, summary.q1), (x, summary.lower_whisker)], line),
        PathElement::new(
            vec![
                (cap_left, summary.upper_whisker),
                (cap_right, summary.upper_whisker),
            ],
            line,
        ),
        PathElement::new(
            vec![
                (cap_left, summary.lower_whisker),
                (cap_right, summary.lower_whisker),
            ],
            line,
        ),
    ]
}

fn draw_histogram(area: &Area<'_>, panel: &PlotRequest, min: f64, max: f64, bins: usize) -> Result<()> {
    let width = (max - min) / bins as f64;
    let counts: Vec<Vec<usize>> = panel
        .series
        .iter()
        .map(|series| match &series.data {
            SeriesData::Samples(values) => histogram(values, min, max, bins),
            _ => vec![0; bins],
        })
        .collect();

    let highest = counts.iter().flatten().copied().max().unwrap_or(0).max(1);

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(min..max, 0.0..(highest as f64 * 1.1))
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (index, (series, counts)) in panel.series.iter().zip(&counts).enumerate() {
        let fill = series_color(index).mix(0.5).filled();
        let bars = counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(bin, &count)| {
                let left = min + bin as f64 * width;
                Rectangle::new([(left, 0.0), (left + width, count as f64)], fill)
            });

        let annotation = chart
            .draw_series(bars)
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        if let Some(label) = &series.label {
            annotation
                .label(label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill));
        }
    }

    draw_legend(&mut chart, &panel.series)
}

fn draw_scatter(area: &Area<'_>, panel: &PlotRequest) -> Result<()> {
    let scale = panel.scale;
    let points: Vec<Vec<(f64, f64)>> = panel
        .series
        .iter()
        .map(|series| match &series.data {
            SeriesData::Points(points) => points
                .iter()
                .filter(|(x, _)| x.is_finite())
                .filter_map(|&(x, y)| to_axis(scale, y).map(|y| (x, y)))
                .collect(),
            _ => Vec::new(),
        })
        .collect();

    let x_range = padded_range(points.iter().flatten().map(|(x, _)| *x));
    let y_range = padded_range(points.iter().flatten().map(|(_, y)| *y));
    let x_formatter = |x: &f64| format!("{x:.0}");
    let y_formatter = move |y: &f64| tick_label(scale, *y);

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (index, (series, points)) in panel.series.iter().zip(points).enumerate() {
        let style = series_color(index).filled();
        let annotation = chart
            .draw_series(points.into_iter().map(|p| Circle::new(p, MARKER_SIZE, style)))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        if let Some(label) = &series.label {
            annotation
                .label(label.as_str())
                .legend(move |(x, y)| Circle::new((x, y), MARKER_SIZE, style));
        }
    }

    draw_legend(&mut chart, &panel.series)
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    series: &[Series],
) -> Result<()> {
    if series.iter().all(|s| s.label.is_none()) {
        return Ok(());
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))
}

/// Turns a chart title into a file name stem.
fn file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}
