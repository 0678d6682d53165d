use digest_figures::figures::comparison_figure;
use digest_figures::loader::{load_error_table, parse_centroid_sizes};
use digest_figures::prelude::*;
use digest_figures::request::SeriesData;
use digest_figures::scanner::{classify_file_name, FileKind};
use rstest::rstest;
use std::fs::{create_dir_all, write};
use std::path::Path;
use tempfile::TempDir;

fn write_results(dir: &Path, prefix: &str, label: &str, rows: &[(f64, f64)]) {
    create_dir_all(dir).unwrap();
    let mut text = String::from("error_q,norm_error_q\n");
    for (error, norm_error) in rows {
        text.push_str(&format!("{error},{norm_error}\n"));
    }
    write(dir.join(format!("{prefix}_{label}.csv")), text).unwrap();
}

#[rstest(short, long,
    case(".5", "0.5"),
    case(".99", "0.99"),
    case(".00001", "0.00001"),
    case("1.0E-5", "0.00001"),
    case("1.0E-4", "0.0001")
)]
fn quantile_spellings_share_axis_position(short: &str, long: &str) {
    let labels = AxisLabels::standard();
    assert_eq!(labels.axis_value(short), labels.axis_value(long));
}

#[rstest(file_name, expected,
    case("K_0_USUAL_0.99.csv", FileKind::ErrorData("0.99")),
    case("K_0_USUAL_centroid_counts.csv", FileKind::CentroidCounts),
    case("K_0_USUAL_centroid_sizes.csv", FileKind::CentroidSizes),
    case("K_0_USUAL_0.99.txt", FileKind::NonMatching),
    case("K_QUADRATIC_0.99.csv", FileKind::NonMatching)
)]
fn every_file_has_one_kind(file_name: &str, expected: FileKind) {
    assert_eq!(classify_file_name("K_0_USUAL", file_name), expected);
}

#[test]
fn written_table_loads_back_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let rows = [(0.5, 0.25), (0.125, 3.0), (1.0e-6, 7.5)];
    write_results(temp_dir.path(), "K_2_USUAL", "0.9", &rows);

    let table = load_error_table(&temp_dir.path().join("K_2_USUAL_0.9.csv")).unwrap();
    assert_eq!(table.error_q(), &[0.5, 0.125, 1.0e-6]);
    assert_eq!(table.norm_error_q(), &[0.25, 3.0, 7.5]);
}

#[test]
fn centroid_sizes_drop_trailing_commas() {
    let matrix = parse_centroid_sizes("3,5,2,\n7,7,\n").unwrap();
    assert_eq!(matrix.rows(), &[vec![3, 5, 2], vec![7, 7]]);
}

#[test]
fn only_present_labels_are_aggregated() {
    let temp_dir = TempDir::new().unwrap();
    write_results(temp_dir.path(), "K_0_USUAL", "0.5", &[(1.0, 1.0)]);
    write_results(temp_dir.path(), "K_0_USUAL", "0.99", &[(2.0, 2.0)]);

    let dataset = Aggregator::default()
        .aggregate(
            &[ScaleFunction::K0Usual],
            &[Location::new("tree/UNIFORM", temp_dir.path())],
        )
        .unwrap();

    let positions: Vec<_> = dataset
        .series(ScaleFunction::K0Usual, "tree/UNIFORM")
        .iter()
        .map(|entry| entry.axis_value)
        .collect();
    assert_eq!(positions, vec![AxisValue(0), AxisValue(2)]);
}

#[test]
fn missing_norm_error_column_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path().join("K_1_USUAL_0.5.csv"), "error_q,other\n1,2\n").unwrap();

    let result = Aggregator::default().aggregate(
        &[ScaleFunction::K1Usual],
        &[Location::new("tree/UNIFORM", temp_dir.path())],
    );
    assert!(matches!(result, Err(AggregateError::Load { .. })));
}

#[test]
fn aggregating_twice_is_equal() {
    let root = TempDir::new().unwrap();
    for distribution in Distribution::ALL {
        let dir = root
            .path()
            .join(Implementation::Merging.dir_name())
            .join(distribution.dir_name());
        write_results(&dir, "K_3_GLUED", "0.001", &[(0.5, 1.0), (0.25, 2.0)]);
        write_results(&dir, "K_3_GLUED", ".99", &[(0.125, 4.0)]);
    }

    let locations: Vec<_> = Distribution::ALL
        .into_iter()
        .map(|d| Location::for_pair(root.path(), Implementation::Merging, d))
        .collect();
    let aggregator = Aggregator::default();
    let first = aggregator.aggregate(&[ScaleFunction::K3Glued], &locations).unwrap();
    let second = aggregator.aggregate(&[ScaleFunction::K3Glued], &locations).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn comparison_figure_end_to_end() {
    let root = TempDir::new().unwrap();
    let uniform = Location::for_pair(root.path(), Implementation::Tree, Distribution::Uniform);
    let exponential = Location::for_pair(root.path(), Implementation::Tree, Distribution::Exponential);
    write_results(&uniform.path, "K_1_GLUED", "0.999", &[(1.0, 1.0)]);
    write_results(&uniform.path, "K_1_GLUED", "0.1", &[(2.0, 2.0)]);
    write_results(&exponential.path, "K_1_GLUED", "0.01", &[(3.0, 3.0)]);

    let dataset = Aggregator::default()
        .aggregate(&[ScaleFunction::K1Glued], &[uniform.clone(), exponential.clone()])
        .unwrap();
    let figure = comparison_figure(
        &dataset,
        &[ScaleFunction::K1Glued],
        [
            (uniform.name.as_str(), Distribution::Uniform.display_name()),
            (exponential.name.as_str(), Distribution::Exponential.display_name()),
        ],
        " (tree)",
        None,
    );

    assert_eq!(figure.panels.len(), 3);
    let error = &figure.panels[0];
    assert_eq!(error.title, "k_1_glued (tree) error");
    assert_eq!(
        error.series[0].data,
        SeriesData::Positioned(vec![(AxisValue(-1), vec![2.0]), (AxisValue(3), vec![1.0])])
    );
    assert_eq!(
        error.series[1].data,
        SeriesData::Positioned(vec![(AxisValue(-2), vec![3.0])])
    );
    // No centroid count files: histograms are empty rather than missing.
    assert!(figure.panels[2].is_empty());
}
