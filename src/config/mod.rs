//! Immutable configuration shared by the scanner, aggregator and figure builders
//!
//! Nothing here is global state: an [`AggregatorConfig`] is built once and handed
//! to whatever needs it, so tests can swap in their own tables.

pub mod axis_labels;
pub mod scale_function;

pub use axis_labels::{AxisLabels, AxisValue, LookupError};
pub use scale_function::{Distribution, Implementation, ScaleFunction};

/// Filename suffix of centroid count files, following the scale function prefix.
pub const CENTROID_COUNTS_SUFFIX: &str = "_centroid_counts.csv";

/// Filename suffix of centroid size files, following the scale function prefix.
pub const CENTROID_SIZES_SUFFIX: &str = "_centroid_sizes.csv";

/// Extension of every file written by the benchmark.
pub const CSV_EXTENSION: &str = ".csv";

/// Configuration injected into an [`Aggregator`](crate::dataset::Aggregator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Quantile label to axis position lookup.
    pub axis_labels: AxisLabels,
    /// Scale functions considered when building a full plan.
    pub scale_functions: Vec<ScaleFunction>,
    /// Implementation directories under the data root.
    pub implementations: Vec<Implementation>,
    /// Distribution directories under each implementation.
    pub distributions: Vec<Distribution>,
}

impl AggregatorConfig {
    /// Configuration matching the benchmark's output layout.
    pub fn standard() -> Self {
        Self {
            axis_labels: AxisLabels::standard(),
            scale_functions: ScaleFunction::ALL.to_vec(),
            implementations: Implementation::ALL.to_vec(),
            distributions: Distribution::ALL.to_vec(),
        }
    }

    /// Replaces the axis lookup, keeping the remaining settings.
    pub fn with_axis_labels(mut self, axis_labels: AxisLabels) -> Self {
        self.axis_labels = axis_labels;
        self
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self::standard()
    }
}
