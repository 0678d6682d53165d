//! Parsing of benchmark output files into tables
//!
//! Two formats are handled:
//! - Comma separated tables with a header row (error data and centroid counts),
//!   read through the [`csv`] crate. Only the named columns are required.
//! - Centroid size listings: one line per trial, each a comma separated (and
//!   comma terminated) list of integers.
//!
//! Nothing is coerced: missing columns, non-numeric cells and malformed lines
//! are all fatal.

use crate::tables::{CentroidCountSeries, CentroidSizeMatrix, ErrorTable};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::{read_to_string, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Column holding the absolute quantile error.
pub const ERROR_COLUMN: &str = "error_q";

/// Column holding the normalized quantile error.
pub const NORM_ERROR_COLUMN: &str = "norm_error_q";

/// Column holding the centroid count.
pub const CENTROID_COUNT_COLUMN: &str = "centroid_count";

/// Errors that can occur when loading a benchmark output file
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Non-numeric value '{value}' in column '{column}' at row {row}")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid centroid size list on line {line}: '{content}'")]
    InvalidCentroidSizeLine { line: usize, content: String },
}

type Result<T> = core::result::Result<T, LoaderError>;

/// Reads an error data table from any CSV source.
///
/// # Errors
///
/// Fails if either [`ERROR_COLUMN`] or [`NORM_ERROR_COLUMN`] is missing, or if a
/// cell in one of them is not a number.
pub fn read_error_table<R: Read>(reader: R) -> Result<ErrorTable> {
    let [error_q, norm_error_q] = read_columns(reader, [ERROR_COLUMN, NORM_ERROR_COLUMN])?;

    // Both columns come from the same records, so they always line up.
    ErrorTable::new(error_q, norm_error_q)
        .ok_or_else(|| LoaderError::MissingColumn(NORM_ERROR_COLUMN.to_string()))
}

/// Loads the error data file at `path`.
pub fn load_error_table(path: &Path) -> Result<ErrorTable> {
    let table = read_error_table(open(path)?)?;
    debug!(path = %path.display(), trials = table.len(), "loaded error table");
    Ok(table)
}

/// Reads a centroid count table from any CSV source.
pub fn read_centroid_counts<R: Read>(reader: R) -> Result<CentroidCountSeries> {
    let [counts] = read_columns(reader, [CENTROID_COUNT_COLUMN])?;
    Ok(CentroidCountSeries::new(counts))
}

/// Loads the centroid count file at `path`.
pub fn load_centroid_counts(path: &Path) -> Result<CentroidCountSeries> {
    let series = read_centroid_counts(open(path)?)?;
    debug!(path = %path.display(), trials = series.len(), "loaded centroid counts");
    Ok(series)
}

/// Parses a centroid size listing.
///
/// Every line must hold at least one integer. Line endings and trailing commas
/// are stripped before splitting, so `"3,5,2,\n7,7,\n"` yields two rows.
///
/// # Errors
///
/// Returns [`LoaderError::InvalidCentroidSizeLine`] for empty lines and lines with
/// tokens that are not non-negative integers.
pub fn parse_centroid_sizes(text: &str) -> Result<CentroidSizeMatrix> {
    let rows = text
        .lines()
        .enumerate()
        .map(|(index, line)| parse_centroid_size_line(index + 1, line))
        .collect::<Result<Vec<_>>>()?;
    Ok(CentroidSizeMatrix::new(rows))
}

/// Loads the centroid size file at `path`.
pub fn load_centroid_sizes(path: &Path) -> Result<CentroidSizeMatrix> {
    let text = read_to_string(path).map_err(|source| LoaderError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let matrix = parse_centroid_sizes(&text)?;
    debug!(path = %path.display(), trials = matrix.len(), "loaded centroid sizes");
    Ok(matrix)
}

fn parse_centroid_size_line(line_number: usize, line: &str) -> Result<Vec<u64>> {
    let invalid = || LoaderError::InvalidCentroidSizeLine {
        line: line_number,
        content: line.to_string(),
    };

    let trimmed = line.trim_end_matches(['\r', '\n', ',']);
    if trimmed.trim().is_empty() {
        return Err(invalid());
    }

    trimmed
        .split(',')
        .map(|token| token.trim().parse::<u64>().map_err(|_| invalid()))
        .collect()
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| LoaderError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the named numeric columns, in file order, from a CSV source with headers.
fn read_columns<R: Read, const N: usize>(reader: R, columns: [&str; N]) -> Result<[Vec<f64>; N]> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut indices = [0usize; N];
    for (slot, column) in indices.iter_mut().zip(columns) {
        *slot = column_index(&headers, column)?;
    }

    let mut values: [Vec<f64>; N] = core::array::from_fn(|_| Vec::new());
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        for ((target, &index), column) in values.iter_mut().zip(&indices).zip(columns) {
            target.push(parse_cell(&record, index, column, row + 1)?);
        }
    }

    Ok(values)
}

fn column_index(headers: &StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| LoaderError::MissingColumn(column.to_string()))
}

fn parse_cell(record: &StringRecord, index: usize, column: &str, row: usize) -> Result<f64> {
    let value = record.get(index).unwrap_or_default();
    value.parse::<f64>().map_err(|_| LoaderError::InvalidNumber {
        column: column.to_string(),
        row,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs::write;
    use tempfile::TempDir;

    #[test]
    fn error_table_round_trips_in_order() {
        let error_q = [0.003, 1.5e-7, 0.0, 42.0, 0.25];
        let norm_error_q = [0.9, 0.1, 0.5, 0.0001, 12.0];

        let mut text = String::from("trial,error_q,norm_error_q,q\n");
        for (i, (e, n)) in error_q.iter().zip(&norm_error_q).enumerate() {
            text.push_str(&format!("{i},{e:?},{n:?},0.99\n"));
        }

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("K_0_USUAL_0.99.csv");
        write(&path, text).unwrap();

        let table = load_error_table(&path).unwrap();
        assert_eq!(table.error_q(), &error_q);
        assert_eq!(table.norm_error_q(), &norm_error_q);
    }

    #[test]
    fn column_order_does_not_matter() {
        let table = read_error_table("norm_error_q,error_q\n2,1\n4,3\n".as_bytes()).unwrap();
        assert_eq!(table.error_q(), &[1.0, 3.0]);
        assert_eq!(table.norm_error_q(), &[2.0, 4.0]);
    }

    #[test]
    fn header_only_file_is_empty_table() {
        let table = read_error_table("error_q,norm_error_q\n".as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn missing_norm_error_column_is_fatal() {
        let result = read_error_table("error_q,other\n1,2\n".as_bytes());
        assert!(matches!(result, Err(LoaderError::MissingColumn(c)) if c == NORM_ERROR_COLUMN));
    }

    #[rstest(cell,
        case("abc"),
        case(""),
        case("1.0.0")
    )]
    fn non_numeric_cell_is_fatal(cell: &str) {
        let text = format!("error_q,norm_error_q\n1,2\n{cell},3\n");
        let result = read_error_table(text.as_bytes());
        assert!(matches!(
            result,
            Err(LoaderError::InvalidNumber { ref column, row: 2, .. }) if column == ERROR_COLUMN
        ));
    }

    #[test]
    fn ragged_row_is_fatal() {
        let result = read_error_table("error_q,norm_error_q\n1,2\n3\n".as_bytes());
        assert!(matches!(result, Err(LoaderError::Csv(_))));
    }

    #[test]
    fn reads_centroid_counts() {
        let series = read_centroid_counts("centroid_count\n41\n44\n39\n".as_bytes()).unwrap();
        assert_eq!(series.values(), &[41.0, 44.0, 39.0]);

        let result = read_centroid_counts("count\n41\n".as_bytes());
        assert!(matches!(result, Err(LoaderError::MissingColumn(_))));
    }

    #[test]
    fn parses_centroid_sizes() {
        let matrix = parse_centroid_sizes("3,5,2,\n7,7,\n").unwrap();
        assert_eq!(matrix.rows(), &[vec![3, 5, 2], vec![7, 7]]);
    }

    #[test]
    fn parses_centroid_sizes_without_trailing_comma_or_with_crlf() {
        let matrix = parse_centroid_sizes("1,2\r\n3,\r\n").unwrap();
        assert_eq!(matrix.rows(), &[vec![1, 2], vec![3]]);
    }

    #[rstest(text, line,
        case("3,5,\n\n7,\n", 2),
        case("3,5,\n,\n", 2),
        case("3,x,\n", 1),
        case("3,5,\n7,-1,\n", 2),
        case("3,,5,\n", 1)
    )]
    fn malformed_centroid_sizes_are_fatal(text: &str, line: usize) {
        let result = parse_centroid_sizes(text);
        assert!(
            matches!(result, Err(LoaderError::InvalidCentroidSizeLine { line: l, .. }) if l == line),
            "{result:?}"
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("K_0_USUAL_centroid_sizes.csv");

        let result = load_centroid_sizes(&path);
        assert!(matches!(result, Err(LoaderError::FileRead { path: p, .. }) if p == path));
    }
}
