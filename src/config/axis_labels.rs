//! Lookup from quantile labels to chart axis positions
//!
//! The benchmark writes quantiles with whatever spelling its number formatter
//! produced (`0.99`, `.99`, `1.0E-5`). Every spelling of the same quantile maps
//! to one integer exponent, which is the x position used by box plots.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer x position of a quantile on the figure axis.
///
/// Quantiles below the median map to negative values (`0.001` → `-3`),
/// quantiles above it to positive values (`0.999` → `3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AxisValue(pub i32);

impl AxisValue {
    /// Returns the position as a floating point chart coordinate.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

/// Errors that can occur when resolving a quantile label
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Quantile label '{0}' has no axis position")]
    UnmappedLabel(String),
}

/// Immutable mapping of quantile labels to [`AxisValue`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLabels {
    labels: HashMap<String, AxisValue>,
}

/// Spellings emitted by the benchmark, paired with their axis exponent.
const STANDARD_LABELS: [(&str, i32); 24] = [
    (".5", 0),
    ("0.5", 0),
    (".9", 1),
    ("0.9", 1),
    (".99", 2),
    ("0.99", 2),
    (".999", 3),
    ("0.999", 3),
    (".9999", 4),
    ("0.9999", 4),
    (".99999", 5),
    ("0.99999", 5),
    (".1", -1),
    ("0.1", -1),
    (".01", -2),
    ("0.01", -2),
    (".001", -3),
    ("0.001", -3),
    (".0001", -4),
    ("0.0001", -4),
    ("1.0E-4", -4),
    (".00001", -5),
    ("0.00001", -5),
    ("1.0E-5", -5),
];

impl AxisLabels {
    /// Builds a lookup from arbitrary `(label, exponent)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        let labels = pairs
            .into_iter()
            .map(|(label, value)| (label.into(), AxisValue(value)))
            .collect();
        Self { labels }
    }

    /// The lookup table used by the paper figures.
    pub fn standard() -> Self {
        Self::from_pairs(STANDARD_LABELS)
    }

    /// Resolves a quantile label to its axis position.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::UnmappedLabel`] for labels missing from the table.
    /// Callers must not substitute a default position.
    pub fn axis_value(&self, label: &str) -> Result<AxisValue, LookupError> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| LookupError::UnmappedLabel(label.to_string()))
    }

    /// Returns true if the label has an axis position.
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for AxisLabels {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest(short, long, expected,
        case(".5", "0.5", 0),
        case(".9", "0.9", 1),
        case(".99", "0.99", 2),
        case(".999", "0.999", 3),
        case(".9999", "0.9999", 4),
        case(".99999", "0.99999", 5),
        case(".1", "0.1", -1),
        case(".01", "0.01", -2),
        case(".001", "0.001", -3),
        case(".0001", "0.0001", -4),
        case("1.0E-4", "0.0001", -4),
        case(".00001", "0.00001", -5),
        case("1.0E-5", "0.00001", -5)
    )]
    fn spellings_share_axis_value(short: &str, long: &str, expected: i32) {
        let labels = AxisLabels::standard();
        assert_eq!(labels.axis_value(short), Ok(AxisValue(expected)));
        assert_eq!(labels.axis_value(long), Ok(AxisValue(expected)));
    }

    #[test]
    fn unmapped_label_is_an_error() {
        let labels = AxisLabels::standard();
        assert_eq!(
            labels.axis_value("0.75"),
            Err(LookupError::UnmappedLabel("0.75".to_string()))
        );
    }

    #[test]
    fn substituted_table_does_not_touch_standard() {
        let custom = AxisLabels::from_pairs([("0.75", 7)]);
        assert_eq!(custom.axis_value("0.75"), Ok(AxisValue(7)));
        assert!(custom.axis_value("0.99").is_err());
        assert!(!AxisLabels::standard().contains("0.75"));
    }

    #[test]
    fn standard_table_has_every_spelling() {
        assert_eq!(AxisLabels::standard().len(), STANDARD_LABELS.len());
    }
}
