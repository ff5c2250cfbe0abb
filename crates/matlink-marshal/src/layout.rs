//! Storage-order conversion between row-major and column-major buffers.
//!
//! A layout bug here corrupts numeric results without crashing, so the
//! transpose copy is kept out of the encoders and tested on its own.

/// Reorder a row-major `rows`x`cols` buffer into column-major order.
pub fn row_major_to_column_major(data: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    debug_assert_eq!(data.len(), rows * cols);
    let mut out = Vec::with_capacity(data.len());
    for c in 0..cols {
        for r in 0..rows {
            out.push(data[r * cols + c]);
        }
    }
    out
}

/// Reorder a column-major `rows`x`cols` buffer into row-major order.
pub fn column_major_to_row_major(data: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    debug_assert_eq!(data.len(), rows * cols);
    let mut out = Vec::with_capacity(data.len());
    for r in 0..rows {
        for c in 0..cols {
            out.push(data[r + c * rows]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_column_major_rectangular() {
        // [1 2 3; 4 5 6] row-major
        let rm = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let cm = row_major_to_column_major(&rm, 2, 3);
        assert_eq!(cm, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_column_to_row_major_rectangular() {
        let cm = [1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
        let rm = column_major_to_row_major(&cm, 2, 3);
        assert_eq!(rm, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_round_trip_tall_and_wide() {
        for (rows, cols) in [(3, 1), (1, 4), (4, 3), (2, 5)] {
            let data: Vec<f64> = (0..rows * cols).map(|i| i as f64).collect();
            let there = row_major_to_column_major(&data, rows, cols);
            let back = column_major_to_row_major(&there, rows, cols);
            assert_eq!(back, data, "{rows}x{cols}");
        }
    }

    #[test]
    fn test_degenerate_shapes_are_identity() {
        let data = [7.0, 8.0, 9.0];
        // A single row or single column has the same flat order either way.
        assert_eq!(row_major_to_column_major(&data, 1, 3), data.to_vec());
        assert_eq!(row_major_to_column_major(&data, 3, 1), data.to_vec());
        assert!(row_major_to_column_major(&[], 0, 0).is_empty());
    }
}
