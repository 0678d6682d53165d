/// Error table text with `rows` trials, shaped like the benchmark's output.
pub fn error_table_csv(rows: usize) -> String {
    let mut text = String::from("error_q,norm_error_q\n");
    for row in 0..rows {
        let error = (row % 97) as f64 * 1.0e-5;
        text.push_str(&format!("{},{}\n", error, error * 31.0));
    }
    text
}

/// Centroid size listing with `rows` trials of `centroids` centroids each.
pub fn centroid_sizes_text(rows: usize, centroids: usize) -> String {
    let mut text = String::new();
    for row in 0..rows {
        for centroid in 0..centroids {
            text.push_str(&format!("{},", (row + centroid * 7) % 1000 + 1));
        }
        text.push('\n');
    }
    text
}
