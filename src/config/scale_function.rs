//! Experiment axes: scale functions, digest implementations and input distributions

use core::fmt;
use serde::{Deserialize, Serialize};

/// Scale function variant a digest was benchmarked with.
///
/// Each variant owns the filename prefix the benchmark writes its results under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScaleFunction {
    K1Usual,
    K1Glued,
    K2Usual,
    K2Glued,
    K3Usual,
    K3Glued,
    K0Usual,
    KQuadratic,
}

impl ScaleFunction {
    /// Every scale function, in the order figures list them.
    pub const ALL: [ScaleFunction; 8] = [
        ScaleFunction::K1Usual,
        ScaleFunction::K1Glued,
        ScaleFunction::K2Usual,
        ScaleFunction::K2Glued,
        ScaleFunction::K3Usual,
        ScaleFunction::K3Glued,
        ScaleFunction::K0Usual,
        ScaleFunction::KQuadratic,
    ];

    /// Filename prefix, e.g. `K_1_GLUED`.
    pub fn prefix(self) -> &'static str {
        match self {
            ScaleFunction::K1Usual => "K_1_USUAL",
            ScaleFunction::K1Glued => "K_1_GLUED",
            ScaleFunction::K2Usual => "K_2_USUAL",
            ScaleFunction::K2Glued => "K_2_GLUED",
            ScaleFunction::K3Usual => "K_3_USUAL",
            ScaleFunction::K3Glued => "K_3_GLUED",
            ScaleFunction::K0Usual => "K_0_USUAL",
            ScaleFunction::KQuadratic => "K_QUADRATIC",
        }
    }

    /// Name used in chart titles, e.g. `k_1_glued` or `k_0`.
    pub fn display_name(self) -> &'static str {
        match self {
            ScaleFunction::K1Usual => "k_1",
            ScaleFunction::K1Glued => "k_1_glued",
            ScaleFunction::K2Usual => "k_2",
            ScaleFunction::K2Glued => "k_2_glued",
            ScaleFunction::K3Usual => "k_3",
            ScaleFunction::K3Glued => "k_3_glued",
            ScaleFunction::K0Usual => "k_0",
            ScaleFunction::KQuadratic => "k_quadratic",
        }
    }

    /// Looks up a scale function by its filename prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.prefix() == prefix)
    }
}

impl fmt::Display for ScaleFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Digest implementation that produced a result directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Implementation {
    Tree,
    Merging,
}

impl Implementation {
    pub const ALL: [Implementation; 2] = [Implementation::Tree, Implementation::Merging];

    /// Directory name under the data root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Implementation::Tree => "tree",
            Implementation::Merging => "merging",
        }
    }
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Input distribution the benchmark sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Distribution {
    Uniform,
    Exponential,
}

impl Distribution {
    pub const ALL: [Distribution; 2] = [Distribution::Uniform, Distribution::Exponential];

    /// Directory name under an implementation directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            Distribution::Uniform => "UNIFORM",
            Distribution::Exponential => "EXPONENTIAL",
        }
    }

    /// Lowercase name used in titles and legends.
    pub fn display_name(self) -> &'static str {
        match self {
            Distribution::Uniform => "uniform",
            Distribution::Exponential => "exponential",
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
