use criterion::{black_box, Criterion};
use digest_figures::loader::{parse_centroid_sizes, read_error_table};
use digest_figures::stats::BoxSummary;

use crate::assets;

pub fn bench_read_error_table(c: &mut Criterion) {
    for rows in [1000, 10000] {
        let text = assets::error_table_csv(rows);
        c.bench_function(&format!("read_error_table_{}", rows), |b| {
            b.iter(|| read_error_table(black_box(text.as_bytes())).unwrap())
        });
    }
}

pub fn bench_parse_centroid_sizes(c: &mut Criterion) {
    for rows in [1000, 10000] {
        let text = assets::centroid_sizes_text(rows, 60);
        c.bench_function(&format!("parse_centroid_sizes_{}", rows), |b| {
            b.iter(|| parse_centroid_sizes(black_box(&text)).unwrap())
        });
    }
}

pub fn bench_box_summary(c: &mut Criterion) {
    let table = read_error_table(assets::error_table_csv(10000).as_bytes()).unwrap();
    c.bench_function("box_summary_10000", |b| {
        b.iter(|| BoxSummary::from_values(black_box(table.error_q()), 5.0, 95.0))
    });
}
