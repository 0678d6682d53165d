//! The set of figures generated from one benchmark run
//!
//! A [`FigurePlan`] lists independent [`FigureJob`]s. Each job aggregates its own
//! dataset, turns it into a [`Figure`] and hands that to a [`PlottingBackend`].
//! A failing job is logged and does not stop the jobs after it.

use crate::config::{AggregatorConfig, Distribution, Implementation, ScaleFunction};
use crate::dataset::{pair_name, AggregateError, Aggregator, Location};
use crate::figures::{comparison_figure, location_figure, size_figure, AlignmentError};
use crate::request::{Figure, PlottingBackend};
use crate::summary::{format_summary_table, summarize, SummaryRow};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

/// Scale functions drawn together in one figure, with the figure's name suffix.
pub const SCALE_FUNCTION_GROUPS: [(&str, [ScaleFunction; 2]); 4] = [
    ("K_0q", [ScaleFunction::K0Usual, ScaleFunction::KQuadratic]),
    ("K_1", [ScaleFunction::K1Usual, ScaleFunction::K1Glued]),
    ("K_2", [ScaleFunction::K2Usual, ScaleFunction::K2Glued]),
    ("K_3", [ScaleFunction::K3Usual, ScaleFunction::K3Glued]),
];

/// Quantiles the centroid size figures are drawn for.
pub const SIZE_FIGURE_VALUES: [&str; 2] = ["0.99", "0.999"];

/// Centroid plotted in the size figures; the last one.
pub const SIZE_FIGURE_CENTROID_INDEX: isize = -1;

const COMPARISON_DIR: &str = "BOTH";
const SIZE_DIR: &str = "size";
const FIGURE_PREFIX: &str = "t_digest_figs_";

/// Errors that can occur while producing one figure
#[derive(Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    #[error("Failed to render {}: {source}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to write summary {}: {source}", .path.display())]
    Summary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One figure of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FigureJob {
    /// Both distributions of one implementation side by side.
    Comparison {
        implementation: Implementation,
        distributions: [Distribution; 2],
        scale_functions: Vec<ScaleFunction>,
        output_path: PathBuf,
    },
    /// A single implementation/distribution pair.
    Location {
        implementation: Implementation,
        distribution: Distribution,
        scale_functions: Vec<ScaleFunction>,
        output_path: PathBuf,
    },
    /// Centroid size against normalized error for every pair.
    Size {
        scale_function: ScaleFunction,
        value_label: String,
        centroid_index: isize,
        implementations: Vec<Implementation>,
        distributions: Vec<Distribution>,
        output_path: PathBuf,
    },
}

impl FigureJob {
    pub fn output_path(&self) -> &Path {
        match self {
            FigureJob::Comparison { output_path, .. }
            | FigureJob::Location { output_path, .. }
            | FigureJob::Size { output_path, .. } => output_path,
        }
    }

    /// Comma separated file prefixes the job reads.
    pub fn prefixes(&self) -> String {
        match self {
            FigureJob::Comparison {
                scale_functions, ..
            }
            | FigureJob::Location {
                scale_functions, ..
            } => scale_functions.iter().map(|f| f.prefix()).join(","),
            FigureJob::Size { scale_function, .. } => scale_function.prefix().to_string(),
        }
    }

    /// Result location the job reads, relative to the input root.
    pub fn location(&self) -> String {
        match self {
            FigureJob::Comparison {
                implementation,
                distributions,
                ..
            } => distributions
                .iter()
                .map(|&d| pair_name(*implementation, d))
                .join(" + "),
            FigureJob::Location {
                implementation,
                distribution,
                ..
            } => pair_name(*implementation, *distribution),
            FigureJob::Size {
                implementations,
                distributions,
                ..
            } => implementations
                .iter()
                .cartesian_product(distributions)
                .map(|(&i, &d)| pair_name(i, d))
                .join(" + "),
        }
    }

    /// Aggregates the job's results below `input` and lays them out.
    ///
    /// Also returns the summary rows of the aggregated dataset.
    pub fn build(
        &self,
        aggregator: &Aggregator,
        input: &Path,
    ) -> Result<(Figure, Vec<SummaryRow>), JobError> {
        match self {
            FigureJob::Comparison {
                implementation,
                distributions,
                scale_functions,
                output_path,
            } => {
                let locations = distributions.map(|d| Location::for_pair(input, *implementation, d));
                let dataset = aggregator.aggregate(scale_functions, &locations)?;
                let figure = comparison_figure(
                    &dataset,
                    scale_functions,
                    [
                        (locations[0].name.as_str(), distributions[0].display_name()),
                        (locations[1].name.as_str(), distributions[1].display_name()),
                    ],
                    &format!(" ({})", implementation.dir_name()),
                    Some(output_path.clone()),
                );
                Ok((figure, summarize(&dataset)))
            }
            FigureJob::Location {
                implementation,
                distribution,
                scale_functions,
                output_path,
            } => {
                let location = Location::for_pair(input, *implementation, *distribution);
                let dataset = aggregator.aggregate(scale_functions, std::slice::from_ref(&location))?;
                let figure = location_figure(
                    &dataset,
                    scale_functions,
                    &location.name,
                    &format!(
                        " ({}, {})",
                        implementation.dir_name(),
                        distribution.display_name()
                    ),
                    Some(output_path.clone()),
                );
                Ok((figure, summarize(&dataset)))
            }
            FigureJob::Size {
                scale_function,
                value_label,
                centroid_index,
                implementations,
                distributions,
                output_path,
            } => {
                let dataset = aggregator.aggregate_sizes(
                    input,
                    *scale_function,
                    value_label,
                    implementations,
                    distributions,
                )?;
                let figure = size_figure(
                    &dataset,
                    *scale_function,
                    value_label,
                    *centroid_index,
                    implementations,
                    distributions,
                    Some(output_path.clone()),
                )?;
                Ok((figure, summarize(&dataset)))
            }
        }
    }

    /// Builds, renders and summarises the figure.
    ///
    /// The summary table is written next to the image, with a `.txt` extension.
    pub fn run<B>(&self, aggregator: &Aggregator, input: &Path, backend: &mut B) -> Result<(), JobError>
    where
        B: PlottingBackend,
        B::Error: Send + Sync + 'static,
    {
        let (figure, summary) = self.build(aggregator, input)?;

        backend.render(&figure).map_err(|source| JobError::Render {
            path: self.output_path().to_path_buf(),
            source: Box::new(source),
        })?;

        let summary_path = self.output_path().with_extension("txt");
        let title = summary_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = format_summary_table(&summary, Some(&title));
        let write_summary = || -> std::io::Result<()> {
            if let Some(parent) = summary_path.parent() {
                create_dir_all(parent)?;
            }
            write(&summary_path, text)
        };
        write_summary().map_err(|source| JobError::Summary {
            path: summary_path.clone(),
            source,
        })
    }
}

/// Outcome of running a whole plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanOutcome {
    pub rendered: usize,
    pub failed: usize,
}

impl PlanOutcome {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Every figure generated from one input root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigurePlan {
    pub input: PathBuf,
    pub jobs: Vec<FigureJob>,
}

impl FigurePlan {
    /// The figures of the paper.
    ///
    /// For each implementation, one comparison figure per scale function group,
    /// then the centroid size figures. `per_location` adds a figure per scale
    /// function group for every implementation/distribution pair.
    ///
    /// Only scale functions, implementations and distributions enabled in
    /// `config` are planned. Comparisons need exactly two distributions.
    pub fn standard(config: &AggregatorConfig, input: &Path, output: &Path, per_location: bool) -> Self {
        let groups: Vec<(&str, Vec<ScaleFunction>)> = SCALE_FUNCTION_GROUPS
            .iter()
            .map(|(name, group)| {
                let enabled: Vec<_> = group
                    .iter()
                    .copied()
                    .filter(|f| config.scale_functions.contains(f))
                    .collect();
                (*name, enabled)
            })
            .filter(|(_, group)| !group.is_empty())
            .collect();
        let figure_name = |group: &str| format!("{FIGURE_PREFIX}{group}.png");

        let mut jobs = Vec::new();
        match config.distributions[..] {
            [first, second] => {
                for &implementation in &config.implementations {
                    let dir = output.join(implementation.dir_name()).join(COMPARISON_DIR);
                    for (name, scale_functions) in &groups {
                        jobs.push(FigureJob::Comparison {
                            implementation,
                            distributions: [first, second],
                            scale_functions: scale_functions.clone(),
                            output_path: dir.join(figure_name(name)),
                        });
                    }
                }
            }
            _ => warn!(
                distributions = config.distributions.len(),
                "comparison figures need exactly two distributions, skipping them"
            ),
        }

        if config.scale_functions.contains(&ScaleFunction::K0Usual) {
            for value_label in SIZE_FIGURE_VALUES {
                let file_name = format!(
                    "{}_{}_{}.png",
                    ScaleFunction::K0Usual.prefix(),
                    value_label,
                    SIZE_FIGURE_CENTROID_INDEX
                );
                jobs.push(FigureJob::Size {
                    scale_function: ScaleFunction::K0Usual,
                    value_label: value_label.to_string(),
                    centroid_index: SIZE_FIGURE_CENTROID_INDEX,
                    implementations: config.implementations.clone(),
                    distributions: config.distributions.clone(),
                    output_path: output.join(SIZE_DIR).join(file_name),
                });
            }
        }

        if per_location {
            for (&implementation, &distribution) in config
                .implementations
                .iter()
                .cartesian_product(&config.distributions)
            {
                let dir = output
                    .join(implementation.dir_name())
                    .join(distribution.dir_name());
                for (name, scale_functions) in &groups {
                    jobs.push(FigureJob::Location {
                        implementation,
                        distribution,
                        scale_functions: scale_functions.clone(),
                        output_path: dir.join(figure_name(name)),
                    });
                }
            }
        }

        Self {
            input: input.to_path_buf(),
            jobs,
        }
    }

    /// Runs every job in order, logging the ones that fail.
    pub fn run<B>(&self, aggregator: &Aggregator, backend: &mut B) -> PlanOutcome
    where
        B: PlottingBackend,
        B::Error: Send + Sync + 'static,
    {
        let mut outcome = PlanOutcome::default();
        for job in &self.jobs {
            match job.run(aggregator, &self.input, backend) {
                Ok(()) => outcome.rendered += 1,
                Err(e) => {
                    error!(
                        prefixes = %job.prefixes(),
                        location = %job.location(),
                        error = %e,
                        "figure failed"
                    );
                    outcome.failed += 1;
                }
            }
        }

        info!(
            rendered = outcome.rendered,
            failed = outcome.failed,
            "figure plan finished"
        );
        outcome
    }
}
