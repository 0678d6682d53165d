//! In-memory tables loaded from benchmark output files
//!
//! All tables are read-only once constructed. Row order is the order of the
//! trials in the source file and is preserved everywhere, because centroid size
//! rows are matched to error rows by position.

use serde::{Deserialize, Serialize};

/// Per-trial errors measured at one quantile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorTable {
    error_q: Vec<f64>,
    norm_error_q: Vec<f64>,
}

impl ErrorTable {
    /// Creates a table from its two columns.
    ///
    /// Returns [`None`] if the columns differ in length.
    pub fn new(error_q: Vec<f64>, norm_error_q: Vec<f64>) -> Option<Self> {
        (error_q.len() == norm_error_q.len()).then_some(Self {
            error_q,
            norm_error_q,
        })
    }

    /// Absolute quantile error of each trial.
    pub fn error_q(&self) -> &[f64] {
        &self.error_q
    }

    /// Normalized quantile error of each trial.
    pub fn norm_error_q(&self) -> &[f64] {
        &self.norm_error_q
    }

    /// Number of trials.
    pub fn len(&self) -> usize {
        self.error_q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.error_q.is_empty()
    }
}

/// Number of centroids the digest held at the end of each trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CentroidCountSeries {
    centroid_count: Vec<f64>,
}

impl CentroidCountSeries {
    pub fn new(centroid_count: Vec<f64>) -> Self {
        Self { centroid_count }
    }

    pub fn values(&self) -> &[f64] {
        &self.centroid_count
    }

    pub fn len(&self) -> usize {
        self.centroid_count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroid_count.is_empty()
    }
}

/// Centroid sizes of each trial's digest, one row per trial.
///
/// Rows vary in length, as every digest ends up with its own number of centroids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentroidSizeMatrix {
    rows: Vec<Vec<u64>>,
}

impl CentroidSizeMatrix {
    pub fn new(rows: Vec<Vec<u64>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    /// Number of trials.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Picks one centroid out of every row.
    ///
    /// Non-negative indices count from the first centroid, negative ones from the
    /// last (`-1` is the last centroid). Returns the 0-based number of the first
    /// row that is too short on failure.
    pub fn select(&self, index: isize) -> Result<Vec<u64>, usize> {
        self.rows
            .iter()
            .enumerate()
            .map(|(row_number, row)| {
                resolve_index(index, row.len())
                    .map(|i| row[i])
                    .ok_or(row_number)
            })
            .collect()
    }
}

fn resolve_index(index: isize, len: usize) -> Option<usize> {
    if index >= 0 {
        let index = index as usize;
        (index < len).then_some(index)
    } else {
        len.checked_sub(index.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn error_table_requires_equal_columns() {
        assert!(ErrorTable::new(vec![1.0, 2.0], vec![0.5]).is_none());

        let table = ErrorTable::new(vec![1.0, 2.0], vec![0.5, 0.25]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.error_q(), &[1.0, 2.0]);
        assert_eq!(table.norm_error_q(), &[0.5, 0.25]);
    }

    #[rstest(index, expected,
        case(0, Ok(vec![3, 7])),
        case(1, Ok(vec![5, 8])),
        case(-1, Ok(vec![2, 8])),
        case(-2, Ok(vec![5, 7])),
        case(2, Err(1)),
        case(-3, Err(1))
    )]
    fn selects_centroid_from_each_row(index: isize, expected: Result<Vec<u64>, usize>) {
        let matrix = CentroidSizeMatrix::new(vec![vec![3, 5, 2], vec![7, 8]]);
        assert_eq!(matrix.select(index), expected);
    }

    #[test]
    fn select_on_empty_matrix_is_empty() {
        assert_eq!(CentroidSizeMatrix::default().select(-1), Ok(vec![]));
    }
}
