//! Least squares regression over dense design matrices
//!
//! The forecasting backend fits trend and seasonal coefficients jointly, so
//! the solver works on an arbitrary number of columns rather than the single
//! slope/intercept pair of a simple linear regression.

use crate::{MathError, Result};

/// Coefficients and fitted values from a least squares solve
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    /// One coefficient per design column
    pub coefficients: Vec<f64>,
    /// Fitted values for every design row
    pub fitted: Vec<f64>,
}

impl LeastSquaresFit {
    /// Evaluate the fitted linear combination for a single design row
    pub fn predict(&self, row: &[f64]) -> f64 {
        dot(&self.coefficients, row)
    }

    /// Residuals `target - fitted`
    pub fn residuals(&self, target: &[f64]) -> Vec<f64> {
        target
            .iter()
            .zip(self.fitted.iter())
            .map(|(y, f)| y - f)
            .collect()
    }
}

/// Solve `min ||X b - y||^2 + sum(penalty_j * b_j^2)`.
///
/// `design` is row-major: one inner vector per observation. `penalties`
/// holds the ridge penalty for each column; a zero penalty leaves that
/// column unregularized.
pub fn ridge_least_squares(
    design: &[Vec<f64>],
    target: &[f64],
    penalties: &[f64],
) -> Result<LeastSquaresFit> {
    if design.is_empty() {
        return Err(MathError::InsufficientData(
            "Design matrix has no rows".to_string(),
        ));
    }
    if design.len() != target.len() {
        return Err(MathError::InvalidInput(format!(
            "Design rows ({}) don't match target length ({})",
            design.len(),
            target.len()
        )));
    }

    let width = design[0].len();
    if width == 0 {
        return Err(MathError::InvalidInput(
            "Design matrix has no columns".to_string(),
        ));
    }
    if design.iter().any(|row| row.len() != width) {
        return Err(MathError::InvalidInput(
            "Design matrix rows have inconsistent widths".to_string(),
        ));
    }
    if penalties.len() != width {
        return Err(MathError::InvalidInput(format!(
            "Expected {} penalties, got {}",
            width,
            penalties.len()
        )));
    }

    // Normal equations: (X'X + diag(penalties)) b = X'y
    let mut gram = vec![vec![0.0; width]; width];
    let mut moment = vec![0.0; width];
    for (row, &y) in design.iter().zip(target.iter()) {
        for i in 0..width {
            moment[i] += row[i] * y;
            for j in i..width {
                gram[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..width {
        for j in 0..i {
            gram[i][j] = gram[j][i];
        }
        gram[i][i] += penalties[i];
    }

    let coefficients = solve_linear_system(gram, moment)?;
    let fitted = design.iter().map(|row| dot(&coefficients, row)).collect();

    Ok(LeastSquaresFit {
        coefficients,
        fitted,
    })
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting
pub fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(MathError::InvalidInput(
            "Linear system must be square and match the right-hand side".to_string(),
        ));
    }

    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let tolerance = scale.max(1.0) * 1e-12;

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);

        if a[pivot][col].abs() < tolerance {
            return Err(MathError::CalculationError(format!(
                "Singular system: column {} has no usable pivot",
                col
            )));
        }

        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(MathError::CalculationError(
            "Solution contains non-finite values".to_string(),
        ));
    }

    Ok(x)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
