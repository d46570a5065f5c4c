//! Small dense linear algebra helpers.
//!
//! Regression design matrices here have at most four columns, so a plain
//! Gauss-Jordan elimination on the normal equations is sufficient.

use ndarray::Array2;

/// Relative pivot tolerance below which a matrix is treated as singular.
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Invert a square matrix with Gauss-Jordan elimination and partial pivoting.
///
/// Returns `None` when the matrix is not square or is numerically singular,
/// i.e. a pivot falls below [`SINGULAR_TOLERANCE`] times the largest
/// absolute entry.
pub fn invert(matrix: &Array2<f64>) -> Option<Array2<f64>> {
    let n = matrix.nrows();
    if n == 0 || n != matrix.ncols() {
        return None;
    }

    let scale = matrix.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let tolerance = scale * SINGULAR_TOLERANCE;

    let mut a = matrix.clone();
    let mut inv = Array2::<f64>::eye(n);

    for col in 0..n {
        // Partial pivoting
        let (pivot_row, pivot_abs) = (col..n)
            .map(|r| (r, a[[r, col]].abs()))
            .fold((col, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        if pivot_abs <= tolerance {
            return None;
        }
        if pivot_row != col {
            swap_rows(&mut a, pivot_row, col);
            swap_rows(&mut inv, pivot_row, col);
        }

        let pivot = a[[col, col]];
        for j in 0..n {
            a[[col, j]] /= pivot;
            inv[[col, j]] /= pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = a[[row, col]];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                let (a_cj, inv_cj) = (a[[col, j]], inv[[col, j]]);
                a[[row, j]] -= factor * a_cj;
                inv[[row, j]] -= factor * inv_cj;
            }
        }
    }

    Some(inv)
}

fn swap_rows(m: &mut Array2<f64>, i: usize, j: usize) {
    for k in 0..m.ncols() {
        m.swap([i, k], [j, k]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_invert_identity() {
        let eye = Array2::<f64>::eye(3);
        let inv = invert(&eye).unwrap();
        assert_eq!(inv, eye);
    }

    #[test]
    fn test_invert_symmetric() {
        let m = array![[4.0, 2.0, 0.6], [2.0, 2.0, 0.4], [0.6, 0.4, 1.0]];
        let inv = invert(&m).unwrap();
        let product = m.dot(&inv);

        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(product[[i, j]], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_invert_needs_pivoting() {
        let m = array![[0.0, 1.0], [1.0, 0.0]];
        let inv = invert(&m).unwrap();
        assert_eq!(inv, m);
    }

    #[test]
    fn test_singular_matrix() {
        let m = array![[1.0, 2.0], [2.0, 4.0]];
        assert!(invert(&m).is_none());
    }

    #[test]
    fn test_non_square_matrix() {
        let m = Array2::<f64>::zeros((2, 3));
        assert!(invert(&m).is_none());
    }
}
