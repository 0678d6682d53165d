//! Discovery of benchmark output files within a result directory
//!
//! File names follow a fixed grammar relative to a scale function prefix:
//!
//! ```text
//! file        := prefix "_" rest
//! rest        := "centroid_counts.csv"    -> CentroidCounts
//!              | "centroid_sizes.csv"     -> CentroidSizes
//!              | value_label ".csv"       -> ErrorData(value_label)
//! value_label := one or more characters
//! ```
//!
//! Names that do not fit the grammar are [`FileKind::NonMatching`].
//! [`classify_file_name`] holds the grammar; [`scan_directory`] only does I/O.

use crate::config::{CENTROID_COUNTS_SUFFIX, CENTROID_SIZES_SUFFIX, CSV_EXTENSION};
use std::fs::read_dir;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while scanning a result directory
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

type Result<T> = core::result::Result<T, ScanError>;

/// What a file in a result directory holds, relative to one prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind<'a> {
    /// Per-trial errors measured at the given quantile label.
    ErrorData(&'a str),
    /// Centroid count per trial.
    CentroidCounts,
    /// Centroid sizes per trial.
    CentroidSizes,
    /// Not produced for this prefix.
    NonMatching,
}

/// Classifies a bare file name (no directory) against a scale function prefix.
pub fn classify_file_name<'a>(prefix: &str, file_name: &'a str) -> FileKind<'a> {
    let Some(after_prefix) = file_name.strip_prefix(prefix) else {
        return FileKind::NonMatching;
    };

    if after_prefix == CENTROID_COUNTS_SUFFIX {
        return FileKind::CentroidCounts;
    }
    if after_prefix == CENTROID_SIZES_SUFFIX {
        return FileKind::CentroidSizes;
    }

    // Diagnostics written under a longer name are never error data.
    if after_prefix.ends_with(CENTROID_COUNTS_SUFFIX) || after_prefix.ends_with(CENTROID_SIZES_SUFFIX)
    {
        return FileKind::NonMatching;
    }

    match after_prefix
        .strip_prefix('_')
        .and_then(|rest| rest.strip_suffix(CSV_EXTENSION))
    {
        Some(label) if !label.is_empty() => FileKind::ErrorData(label),
        _ => FileKind::NonMatching,
    }
}

/// Error data file discovered for one quantile label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDataFile {
    pub value_label: String,
    pub path: PathBuf,
}

/// Files belonging to one prefix inside one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Error data files, ordered by file name.
    pub error_files: Vec<ErrorDataFile>,
    pub centroid_counts: Option<PathBuf>,
    pub centroid_sizes: Option<PathBuf>,
}

impl ScanResult {
    /// True when the directory held nothing for the prefix.
    pub fn is_empty(&self) -> bool {
        self.error_files.is_empty() && self.centroid_counts.is_none() && self.centroid_sizes.is_none()
    }
}

/// Lists `directory` once and collects every file belonging to `prefix`.
///
/// A prefix without any files yields an empty [`ScanResult`].
///
/// # Errors
///
/// Returns [`ScanError::ReadDirectory`] if the directory is missing or unreadable.
pub fn scan_directory(directory: &Path, prefix: &str) -> Result<ScanResult> {
    let io_error = |source: std::io::Error| ScanError::ReadDirectory {
        path: directory.to_path_buf(),
        source,
    };

    let mut result = ScanResult::default();
    for entry in read_dir(directory).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        if entry.file_type().map_err(io_error)?.is_dir() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };

        match classify_file_name(prefix, file_name) {
            FileKind::ErrorData(label) => result.error_files.push(ErrorDataFile {
                value_label: label.to_string(),
                path: entry.path(),
            }),
            FileKind::CentroidCounts => result.centroid_counts = Some(entry.path()),
            FileKind::CentroidSizes => result.centroid_sizes = Some(entry.path()),
            FileKind::NonMatching => {}
        }
    }

    result.error_files.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(
        directory = %directory.display(),
        prefix,
        error_files = result.error_files.len(),
        "scanned result directory"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs::{create_dir, write};
    use tempfile::TempDir;

    #[rstest(file_name, expected,
        case("K_0_USUAL_0.99.csv", FileKind::ErrorData("0.99")),
        case("K_0_USUAL_.99.csv", FileKind::ErrorData(".99")),
        case("K_0_USUAL_1.0E-5.csv", FileKind::ErrorData("1.0E-5")),
        case("K_0_USUAL_centroid_counts.csv", FileKind::CentroidCounts),
        case("K_0_USUAL_centroid_sizes.csv", FileKind::CentroidSizes),
        case("K_0_USUAL_extra_centroid_sizes.csv", FileKind::NonMatching),
        case("K_0_USUAL_.csv", FileKind::NonMatching),
        case("K_0_USUAL_0.99.txt", FileKind::NonMatching),
        case("K_0_USUAL0.99.csv", FileKind::NonMatching),
        case("K_QUADRATIC_0.99.csv", FileKind::NonMatching),
        case("notes.md", FileKind::NonMatching)
    )]
    fn classifies_file_names(file_name: &str, expected: FileKind) {
        assert_eq!(classify_file_name("K_0_USUAL", file_name), expected);
    }

    #[test]
    fn classification_is_exclusive_across_prefixes() {
        let names = [
            "K_1_USUAL_0.5.csv",
            "K_1_GLUED_0.5.csv",
            "K_1_USUAL_centroid_counts.csv",
            "K_1_GLUED_centroid_sizes.csv",
            "K_QUADRATIC_0.001.csv",
        ];

        for name in names {
            let matches = crate::config::ScaleFunction::ALL
                .iter()
                .filter(|f| classify_file_name(f.prefix(), name) != FileKind::NonMatching)
                .count();
            assert_eq!(matches, 1, "{name} matched {matches} prefixes");
        }
    }

    #[test]
    fn scans_directory_by_kind() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        for name in [
            "K_0_USUAL_0.5.csv",
            "K_0_USUAL_0.99.csv",
            "K_0_USUAL_centroid_counts.csv",
            "K_0_USUAL_centroid_sizes.csv",
            "K_QUADRATIC_0.5.csv",
        ] {
            write(base_path.join(name), "error_q,norm_error_q\n").unwrap();
        }
        create_dir(base_path.join("K_0_USUAL_0.9.csv")).unwrap();

        let result = scan_directory(base_path, "K_0_USUAL").unwrap();
        let labels: Vec<_> = result
            .error_files
            .iter()
            .map(|f| f.value_label.as_str())
            .collect();

        assert_eq!(labels, vec!["0.5", "0.99"]);
        assert_eq!(
            result.centroid_counts,
            Some(base_path.join("K_0_USUAL_centroid_counts.csv"))
        );
        assert_eq!(
            result.centroid_sizes,
            Some(base_path.join("K_0_USUAL_centroid_sizes.csv"))
        );
    }

    #[test]
    fn prefix_without_files_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path().join("K_0_USUAL_0.5.csv"), "").unwrap();

        let result = scan_directory(temp_dir.path(), "K_2_GLUED").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nonexistent_directory");

        let result = scan_directory(&missing, "K_0_USUAL");
        assert!(matches!(result, Err(ScanError::ReadDirectory { path, .. }) if path == missing));
    }
}
