//! Percentile helpers for summaries and box plots

use serde::{Deserialize, Serialize};

/// Returns the finite values of `values`, sorted ascending.
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Percentile `p` (0 to 100) of already sorted data, interpolating linearly
/// between the two closest ranks.
///
/// Returns [`None`] for empty input.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (p.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Five values describing one box of a box plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

impl BoxSummary {
    /// Summarises `values` with whiskers at the given percentiles.
    ///
    /// Non-finite values are ignored. Returns [`None`] if nothing is left.
    pub fn from_values(values: &[f64], lower_whisker: f64, upper_whisker: f64) -> Option<Self> {
        let sorted = sorted_finite(values);
        Some(Self {
            lower_whisker: percentile(&sorted, lower_whisker)?,
            q1: percentile(&sorted, 25.0)?,
            median: percentile(&sorted, 50.0)?,
            q3: percentile(&sorted, 75.0)?,
            upper_whisker: percentile(&sorted, upper_whisker)?,
        })
    }

    /// Applies `f` to every value, e.g. to move the box onto a log axis.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            lower_whisker: f(self.lower_whisker),
            q1: f(self.q1),
            median: f(self.median),
            q3: f(self.q3),
            upper_whisker: f(self.upper_whisker),
        }
    }
}

/// Counts `values` into `bins` equal width bins over `[min, max]`.
///
/// Values outside the range are dropped; `max` itself lands in the last bin.
pub fn histogram(values: &[f64], min: f64, max: f64, bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    if bins == 0 || max <= min {
        return counts;
    }

    let width = (max - min) / bins as f64;
    for &value in values {
        if !(min..=max).contains(&value) {
            continue;
        }
        let bin = (((value - min) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest(p, expected,
        case(0.0, 1.0),
        case(25.0, 2.0),
        case(50.0, 3.0),
        case(95.0, 4.8),
        case(100.0, 5.0)
    )]
    fn interpolates_percentiles(p: f64, expected: f64) {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        let value = percentile(&sorted, p).unwrap();
        assert!((value - expected).abs() < 1e-12, "p{p} = {value}");
    }

    #[test]
    fn empty_percentile_is_none() {
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(BoxSummary::from_values(&[f64::NAN], 5.0, 95.0), None);
    }

    #[test]
    fn box_summary_ignores_order_and_non_finite() {
        let summary = BoxSummary::from_values(&[5.0, f64::INFINITY, 1.0, 3.0, 2.0, 4.0], 0.0, 100.0)
            .unwrap();
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.upper_whisker, 5.0);
    }

    #[test]
    fn histogram_bins_inclusive_range() {
        let counts = histogram(&[5.0, 6.0, 50.0, 95.0, 96.0, 4.0], 5.0, 95.0, 30);
        assert_eq!(counts.len(), 30);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[15], 1);
        assert_eq!(counts[29], 1);
        assert_eq!(counts.iter().sum::<usize>(), 4);
    }

    #[test]
    fn degenerate_histogram_is_all_zero() {
        assert_eq!(histogram(&[1.0], 2.0, 2.0, 3), vec![0, 0, 0]);
        assert!(histogram(&[1.0], 0.0, 2.0, 0).is_empty());
    }
}
