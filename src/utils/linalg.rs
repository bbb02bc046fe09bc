//! Least-squares fitting via Cholesky-solved normal equations.

use crate::error::{PipelineError, Result};

/// Ridge term added to the normal-equation diagonal. Keeps the solve stable
/// when design columns are collinear or near-zero.
const RIDGE: f64 = 1e-8;

/// Solve `min ||X b - y||^2` where `columns` are the columns of `X`.
///
/// Returns one coefficient per column, in column order. The caller supplies
/// an explicit intercept column when one is wanted.
pub fn least_squares(columns: &[Vec<f64>], y: &[f64]) -> Result<Vec<f64>> {
    let n = y.len();
    if n == 0 {
        return Err(PipelineError::EmptyData);
    }
    if columns.is_empty() {
        return Err(PipelineError::InvalidParameter(
            "least squares requires at least one design column".to_string(),
        ));
    }
    for col in columns {
        if col.len() != n {
            return Err(PipelineError::DimensionMismatch {
                expected: n,
                got: col.len(),
            });
        }
    }

    let k = columns.len();
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];

    for i in 0..k {
        for j in i..k {
            let dot: f64 = columns[i]
                .iter()
                .zip(&columns[j])
                .map(|(a, b)| a * b)
                .sum();
            xtx[i][j] = dot;
            xtx[j][i] = dot;
        }
        xty[i] = columns[i].iter().zip(y).map(|(a, b)| a * b).sum();
    }

    for (i, row) in xtx.iter_mut().enumerate() {
        row[i] += RIDGE;
    }

    cholesky_solve(&xtx, &xty).ok_or_else(|| {
        PipelineError::ComputationError("normal equations are not positive definite".to_string())
    })
}

/// Solve `A x = b` for symmetric positive definite `A`.
fn cholesky_solve(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L L'
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward solve L z = b, then back solve L' x = z.
    let mut z = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * z[j];
        }
        z[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = z[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
