//! Aggregation of many result files into one typed dataset
//!
//! An [`Aggregator`] walks the configured result locations, classifies their
//! files through the [`scanner`](crate::scanner) and loads them through the
//! [`loader`](crate::loader). The resulting [`AggregatedDataset`] is keyed by
//! [`ConfigKey`] and never changes after construction.

use crate::config::{
    AggregatorConfig, AxisValue, Distribution, Implementation, LookupError, ScaleFunction,
    CENTROID_SIZES_SUFFIX, CSV_EXTENSION,
};
use crate::loader::{
    load_centroid_counts, load_centroid_sizes, load_error_table, LoaderError,
};
use crate::scanner::{scan_directory, ScanError};
use crate::tables::{CentroidCountSeries, CentroidSizeMatrix, ErrorTable};
use derive_new::new;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while aggregating a dataset
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LoaderError,
    },

    #[error("{source} (found in {})", .path.display())]
    Lookup {
        path: PathBuf,
        #[source]
        source: LookupError,
    },
}

type Result<T> = core::result::Result<T, AggregateError>;

/// Identifies the results of one experiment configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct ConfigKey {
    pub scale_function: ScaleFunction,
    /// Name of the [`Location`] the results were read from.
    #[new(into)]
    pub location: String,
    /// Quantile label as spelled in the file name.
    #[new(into)]
    pub value_label: String,
}

/// Identifies one centroid size listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct SizeKey {
    pub implementation: Implementation,
    pub distribution: Distribution,
    pub scale_function: ScaleFunction,
}

/// A named directory of benchmark results.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Location {
    /// Key used in [`ConfigKey::location`]; also the legend label in comparisons.
    #[new(into)]
    pub name: String,
    #[new(into)]
    pub path: PathBuf,
}

impl Location {
    /// Location of one implementation/distribution pair below `root`,
    /// i.e. `<root>/<implementation>/<distribution>`.
    pub fn for_pair(root: &Path, implementation: Implementation, distribution: Distribution) -> Self {
        Self {
            name: pair_name(implementation, distribution),
            path: root
                .join(implementation.dir_name())
                .join(distribution.dir_name()),
        }
    }
}

/// Location name used for results of one implementation/distribution pair.
pub fn pair_name(implementation: Implementation, distribution: Distribution) -> String {
    format!("{}/{}", implementation.dir_name(), distribution.dir_name())
}

/// Error tables of one configuration, together with the axis position of its quantile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedTable<'a> {
    pub axis_value: AxisValue,
    pub value_label: &'a str,
    pub table: &'a ErrorTable,
}

/// Every table loaded for one figure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedDataset {
    error_tables: BTreeMap<ConfigKey, (AxisValue, ErrorTable)>,
    centroid_counts: BTreeMap<(ScaleFunction, String), CentroidCountSeries>,
    centroid_sizes: BTreeMap<SizeKey, CentroidSizeMatrix>,
}

impl AggregatedDataset {
    /// Error table of a single configuration.
    pub fn error_table(&self, key: &ConfigKey) -> Option<&ErrorTable> {
        self.error_tables.get(key).map(|(_, table)| table)
    }

    /// All error tables of one scale function at one location, sorted by axis position.
    ///
    /// Directory listings come back in no particular order; this is the order
    /// every positional chart must use.
    pub fn series(&self, scale_function: ScaleFunction, location: &str) -> Vec<PositionedTable<'_>> {
        self.error_tables
            .iter()
            .filter(|(key, _)| key.scale_function == scale_function && key.location == location)
            .map(|(key, (axis_value, table))| PositionedTable {
                axis_value: *axis_value,
                value_label: key.value_label.as_str(),
                table,
            })
            .sorted_by(|a, b| {
                a.axis_value
                    .cmp(&b.axis_value)
                    .then_with(|| a.value_label.cmp(b.value_label))
            })
            .collect()
    }

    /// Centroid counts of one scale function at one location, if the file existed.
    pub fn centroid_counts(
        &self,
        scale_function: ScaleFunction,
        location: &str,
    ) -> Option<&CentroidCountSeries> {
        self.centroid_counts
            .get(&(scale_function, location.to_string()))
    }

    /// Centroid sizes loaded for a size analysis.
    pub fn centroid_sizes(&self, key: &SizeKey) -> Option<&CentroidSizeMatrix> {
        self.centroid_sizes.get(key)
    }

    /// Iterates over every configuration in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ConfigKey, AxisValue, &ErrorTable)> {
        self.error_tables
            .iter()
            .map(|(key, (axis_value, table))| (key, *axis_value, table))
    }

    /// Number of error tables.
    pub fn len(&self) -> usize {
        self.error_tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.error_tables.is_empty()
    }
}

/// Builds [`AggregatedDataset`]s from result directories.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Loads every error table and centroid count file of `scale_functions` from
    /// each of `locations`.
    ///
    /// Quantile labels are discovered per location; locations need not share them.
    /// Missing centroid count files are skipped.
    ///
    /// # Errors
    ///
    /// Fails on the first unreadable directory or file, malformed file, or quantile
    /// label without an axis position.
    pub fn aggregate(
        &self,
        scale_functions: &[ScaleFunction],
        locations: &[Location],
    ) -> Result<AggregatedDataset> {
        let mut dataset = AggregatedDataset::default();

        for &scale_function in scale_functions {
            for location in locations {
                let scan = scan_directory(&location.path, scale_function.prefix())?;

                for file in &scan.error_files {
                    let axis_value = self
                        .config
                        .axis_labels
                        .axis_value(&file.value_label)
                        .map_err(|source| AggregateError::Lookup {
                            path: file.path.clone(),
                            source,
                        })?;
                    let table = load_error_table(&file.path).map_err(load_error(&file.path))?;
                    dataset.error_tables.insert(
                        ConfigKey::new(scale_function, &location.name, &file.value_label),
                        (axis_value, table),
                    );
                }

                if let Some(path) = &scan.centroid_counts {
                    let counts = load_centroid_counts(path).map_err(load_error(path))?;
                    dataset
                        .centroid_counts
                        .insert((scale_function, location.name.clone()), counts);
                }
            }
        }

        info!(
            scale_functions = scale_functions.len(),
            locations = locations.len(),
            tables = dataset.len(),
            "aggregated dataset"
        );
        Ok(dataset)
    }

    /// Loads one quantile's error table and the centroid sizes of `scale_function`
    /// for every implementation/distribution pair below `root`.
    ///
    /// Error tables are keyed by the pair's [`pair_name`]. Both files are required.
    pub fn aggregate_sizes(
        &self,
        root: &Path,
        scale_function: ScaleFunction,
        value_label: &str,
        implementations: &[Implementation],
        distributions: &[Distribution],
    ) -> Result<AggregatedDataset> {
        let mut dataset = AggregatedDataset::default();
        let axis_value = self
            .config
            .axis_labels
            .axis_value(value_label)
            .map_err(|source| AggregateError::Lookup {
                path: root.to_path_buf(),
                source,
            })?;

        for (&implementation, &distribution) in
            implementations.iter().cartesian_product(distributions)
        {
            let location = Location::for_pair(root, implementation, distribution);
            let prefix = scale_function.prefix();

            let table_path = location
                .path
                .join(format!("{prefix}_{value_label}{CSV_EXTENSION}"));
            let table = load_error_table(&table_path).map_err(load_error(&table_path))?;

            let sizes_path = location
                .path
                .join(format!("{prefix}{CENTROID_SIZES_SUFFIX}"));
            let sizes = load_centroid_sizes(&sizes_path).map_err(load_error(&sizes_path))?;

            dataset.error_tables.insert(
                ConfigKey::new(scale_function, location.name, value_label),
                (axis_value, table),
            );
            dataset.centroid_sizes.insert(
                SizeKey::new(implementation, distribution, scale_function),
                sizes,
            );
        }

        info!(
            prefix = scale_function.prefix(),
            value_label,
            tables = dataset.len(),
            "aggregated centroid size dataset"
        );
        Ok(dataset)
    }
}

fn load_error(path: &Path) -> impl FnOnce(LoaderError) -> AggregateError + '_ {
    move |source| AggregateError::Load {
        path: path.to_path_buf(),
        source,
    }
}
