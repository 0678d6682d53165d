//! Plot requests: the only data handed to a plotting backend
//!
//! Requests carry prepared, ordered series and a description of the chart to draw.
//! How (or whether) a backend renders them is not the aggregator's concern.

use crate::config::AxisValue;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of chart a panel is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChartKind {
    /// Box and whisker plot. Whiskers are drawn at the given percentiles and
    /// outliers are not shown.
    BoxPlot {
        lower_whisker: f64,
        upper_whisker: f64,
    },
    /// Histogram over `[min, max]` with `bins` equal width bins.
    Histogram { min: f64, max: f64, bins: usize },
    /// Scatter plot of paired observations.
    Scatter,
}

/// Scale of a panel's value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    Linear,
    Log,
}

/// Values of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeriesData {
    /// One sample set per axis position, in ascending position order.
    Positioned(Vec<(AxisValue, Vec<f64>)>),
    /// A single sample set.
    Samples(Vec<f64>),
    /// `(x, y)` observations.
    Points(Vec<(f64, f64)>),
}

impl SeriesData {
    /// True if the series holds no values at all.
    pub fn is_empty(&self) -> bool {
        match self {
            SeriesData::Positioned(groups) => groups.iter().all(|(_, values)| values.is_empty()),
            SeriesData::Samples(values) => values.is_empty(),
            SeriesData::Points(points) => points.is_empty(),
        }
    }

    /// Axis positions of a positioned series; other series have none.
    pub fn positions(&self) -> Vec<AxisValue> {
        match self {
            SeriesData::Positioned(groups) => groups.iter().map(|(position, _)| *position).collect(),
            SeriesData::Samples(_) | SeriesData::Points(_) => Vec::new(),
        }
    }
}

/// One series of a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Legend entry; unlabelled series get none.
    pub label: Option<String>,
    /// Shift applied to every position, so several series can share a position.
    pub offset: f64,
    pub data: SeriesData,
}

impl Series {
    /// Unlabelled series without offset.
    pub fn new(data: SeriesData) -> Self {
        Self {
            label: None,
            offset: 0.0,
            data,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }
}

/// A single chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRequest {
    pub title: String,
    pub series: Vec<Series>,
    pub chart_kind: ChartKind,
    pub scale: Scale,
    /// Fixed range of integer ticks on the position axis; derived from the data if unset.
    pub position_range: Option<(i32, i32)>,
    /// Where to save the chart when rendered on its own.
    pub output_path: Option<PathBuf>,
}

impl PlotRequest {
    pub fn new(title: impl Into<String>, chart_kind: ChartKind, scale: Scale) -> Self {
        Self {
            title: title.into(),
            series: Vec::new(),
            chart_kind,
            scale,
            position_range: None,
            output_path: None,
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_position_range(mut self, min: i32, max: i32) -> Self {
        self.position_range = Some((min, max));
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }

    /// True if no series holds any value; such a request renders an empty panel.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.data.is_empty())
    }
}

/// Panels laid out in a row-major grid and saved as one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Where to save the image. Backends choose a location when unset.
    pub output_path: Option<PathBuf>,
    /// Panels per row.
    pub columns: usize,
    pub panels: Vec<PlotRequest>,
}

impl Figure {
    pub fn new(output_path: Option<PathBuf>, columns: usize, panels: Vec<PlotRequest>) -> Self {
        Self {
            output_path,
            columns: columns.max(1),
            panels,
        }
    }

    /// Figure holding one request, saved to the request's own output path.
    pub fn single(mut request: PlotRequest) -> Self {
        let output_path = request.output_path.take();
        Self::new(output_path, 1, vec![request])
    }

    /// Number of grid rows.
    pub fn rows(&self) -> usize {
        self.panels.len().div_ceil(self.columns.max(1))
    }
}

/// Renders figures.
pub trait PlottingBackend {
    type Error: std::error::Error;

    /// Draws every panel of `figure` and persists or displays the result.
    fn render(&mut self, figure: &Figure) -> Result<(), Self::Error>;
}
