//! # digest-figures
//! Turns the per-configuration CSV output of a t-digest accuracy benchmark into
//! figures: error box plots along the quantile axis, centroid count histograms
//! and centroid size scatter plots.

/// Quantile axis lookup and the experiment's enumerated axes.
pub mod config;

/// Classifies result files by name.
pub mod scanner;

/// Typed tables loaded from result files.
pub mod tables;

/// CSV and centroid size readers.
pub mod loader;

/// Aggregation of result directories into one dataset.
pub mod dataset;

/// Backend independent plot requests.
pub mod request;

/// Percentiles and histogram binning.
pub mod stats;

/// Figure layouts built from a dataset.
pub mod figures;

/// Text summaries of a dataset.
pub mod summary;

/// PNG rendering via plotters.
pub mod plots;

/// The full set of figures for one benchmark run.
pub mod plan;

pub mod prelude {
    pub use crate::config::{
        AggregatorConfig, AxisLabels, AxisValue, Distribution, Implementation, ScaleFunction,
    };
    pub use crate::dataset::{AggregateError, AggregatedDataset, Aggregator, ConfigKey, Location};
    pub use crate::plan::{FigureJob, FigurePlan, JobError, PlanOutcome};
    pub use crate::plots::{PlotError, PngRenderer};
    pub use crate::request::{Figure, PlotRequest, PlottingBackend};
}
