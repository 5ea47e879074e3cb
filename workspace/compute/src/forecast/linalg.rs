use crate::error::{ComputeError, Result};

/// Solves the ridge-regularized least squares problem
/// `min |X·θ − y|² + Σ penalty_j·θ_j²` through its normal equations.
///
/// Every penalty must be strictly positive, which keeps the system positive
/// definite.
pub fn solve_ridge(rows: &[Vec<f64>], y: &[f64], penalty: &[f64]) -> Result<Vec<f64>> {
    let p = penalty.len();
    if rows.len() != y.len() {
        return Err(ComputeError::ForecastComputation(format!(
            "design matrix has {} rows but target has {}",
            rows.len(),
            y.len()
        )));
    }

    let mut gram = vec![vec![0.0; p]; p];
    let mut rhs = vec![0.0; p];

    for (row, target) in rows.iter().zip(y) {
        if row.len() != p {
            return Err(ComputeError::ForecastComputation(format!(
                "design row has {} features, expected {}",
                row.len(),
                p
            )));
        }
        for i in 0..p {
            rhs[i] += row[i] * target;
            for j in 0..=i {
                gram[i][j] += row[i] * row[j];
            }
        }
    }

    for i in 0..p {
        gram[i][i] += penalty[i];
        for j in 0..i {
            gram[j][i] = gram[i][j];
        }
    }

    cholesky_solve(gram, rhs)
}

/// Solves `A·x = b` for a symmetric positive definite `A`.
fn cholesky_solve(mut a: Vec<Vec<f64>>, b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    // In-place lower factor
    for j in 0..n {
        let mut diag = a[j][j];
        for k in 0..j {
            diag -= a[j][k] * a[j][k];
        }
        if !(diag > 0.0) || !diag.is_finite() {
            return Err(ComputeError::ForecastComputation(format!(
                "normal equations are not positive definite (pivot {} = {})",
                j, diag
            )));
        }
        let diag = diag.sqrt();
        a[j][j] = diag;

        for i in (j + 1)..n {
            let mut value = a[i][j];
            for k in 0..j {
                value -= a[i][k] * a[j][k];
            }
            a[i][j] = value / diag;
        }
    }

    // L·z = b
    let mut z = vec![0.0; n];
    for i in 0..n {
        let mut value = b[i];
        for k in 0..i {
            value -= a[i][k] * z[k];
        }
        z[i] = value / a[i][i];
    }

    // Lᵀ·x = z
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut value = z[i];
        for k in (i + 1)..n {
            value -= a[k][i] * x[k];
        }
        x[i] = value / a[i][i];
    }

    Ok(x)
}

/// Quantile function of the standard normal distribution.
///
/// Rational approximation by P. J. Acklam, relative error below 1.2e-9.
pub fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const LOW: f64 = 0.02425;

    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}
