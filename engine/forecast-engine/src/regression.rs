//! Ordinary least squares over an arbitrary feature count
//!
//! Solves the normal equations with partial-pivot Gaussian elimination. A
//! small ridge term keeps the system solvable when the training window is
//! shorter than the feature count.

/// Keeps X'X invertible for short windows without visibly biasing the fit
const RIDGE: f64 = 1e-8;

/// Pivot magnitude below which the system counts as singular
const PIVOT_EPSILON: f64 = 1e-12;

/// Fitted linear model: intercept plus one coefficient per feature.
#[derive(Debug, Clone)]
pub struct OlsModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl OlsModel {
    /// Predict the target for one feature row.
    pub fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

/// Fit `targets` on `rows` of features. Returns `None` when the inputs are
/// empty, ragged, non-finite, or the normal equations are degenerate.
pub fn fit_ols(rows: &[Vec<f64>], targets: &[f64]) -> Option<OlsModel> {
    let n = rows.len();
    if n == 0 || n != targets.len() {
        return None;
    }
    let feature_count = rows[0].len();
    if rows.iter().any(|r| r.len() != feature_count) {
        return None;
    }
    if rows.iter().flatten().any(|v| !v.is_finite())
        || targets.iter().any(|v| !v.is_finite())
    {
        return None;
    }

    // design matrix carries a leading 1s column for the intercept
    let k = feature_count + 1;
    let design: Vec<Vec<f64>> = rows
        .iter()
        .map(|r| {
            let mut row = Vec::with_capacity(k);
            row.push(1.0);
            row.extend_from_slice(r);
            row
        })
        .collect();

    // normal equations: (X'X + ridge*I) beta = X'y
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &y) in design.iter().zip(targets.iter()) {
        for i in 0..k {
            for j in 0..k {
                xtx[i][j] += row[i] * row[j];
            }
            xty[i] += row[i] * y;
        }
    }
    for (i, row) in xtx.iter_mut().enumerate() {
        row[i] += RIDGE;
    }

    let beta = solve(xtx, xty)?;
    if beta.iter().any(|b| !b.is_finite()) {
        return None;
    }

    Some(OlsModel {
        intercept: beta[0],
        coefficients: beta[1..].to_vec(),
    })
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot_row][col].abs() < PIVOT_EPSILON {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        let pivot = a[col].clone();
        let pivot_b = b[col];
        for row in (col + 1)..n {
            let factor = a[row][col] / pivot[col];
            for k in col..n {
                a[row][k] -= factor * pivot[k];
            }
            b[row] -= factor * pivot_b;
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for col in (row + 1)..n {
            sum -= a[row][col] * x[col];
        }
        x[row] = sum / a[row][row];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_a_linear_relationship() {
        // y = 3 + 2x
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..10).map(|i| 3.0 + 2.0 * i as f64).collect();

        let model = fit_ols(&rows, &targets).expect("fit");
        assert!((model.intercept - 3.0).abs() < 1e-6);
        assert!((model.coefficients[0] - 2.0).abs() < 1e-6);
        assert!((model.predict(&[12.0]) - 27.0).abs() < 1e-5);
    }

    #[test]
    fn fits_two_features() {
        // y = 1 + 2a - 3b
        let rows = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![2.0, 1.0],
            vec![2.0, 3.0],
        ];
        let targets: Vec<f64> = rows.iter().map(|r| 1.0 + 2.0 * r[0] - 3.0 * r[1]).collect();

        let model = fit_ols(&rows, &targets).expect("fit");
        assert!((model.intercept - 1.0).abs() < 1e-5);
        assert!((model.coefficients[0] - 2.0).abs() < 1e-5);
        assert!((model.coefficients[1] + 3.0).abs() < 1e-5);
    }

    #[test]
    fn underdetermined_window_still_fits() {
        // five rows, six features: the window the model manager trains on
        // at the minimum history length
        let rows: Vec<Vec<f64>> = (0..5)
            .map(|i| vec![i as f64, 10.0, 0.2, 0.1, 0.5, 50.0 + i as f64])
            .collect();
        let targets: Vec<f64> = (0..5).map(|i| 50.0 + i as f64).collect();

        let model = fit_ols(&rows, &targets).expect("fit");
        let predicted = model.predict(&[5.0, 10.0, 0.2, 0.1, 0.5, 54.0]);
        assert!(predicted.is_finite());
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(fit_ols(&[], &[]).is_none());
        assert!(fit_ols(&[vec![1.0]], &[1.0, 2.0]).is_none());
        assert!(fit_ols(&[vec![1.0], vec![1.0, 2.0]], &[1.0, 2.0]).is_none());
        assert!(fit_ols(&[vec![f64::NAN], vec![1.0]], &[1.0, 2.0]).is_none());
    }
}
