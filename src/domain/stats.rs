//! Sample statistics over return series.
//!
//! Standard deviation and covariance use the N-1 denominator. Statistics over
//! fewer observations than they need are `NaN`.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

pub fn sample_std(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Column means of a row-major matrix.
pub fn column_means(rows: &[Vec<f64>], columns: usize) -> Vec<f64> {
    if rows.is_empty() {
        return vec![f64::NAN; columns];
    }
    let n = rows.len() as f64;
    (0..columns)
        .map(|j| rows.iter().map(|row| row[j]).sum::<f64>() / n)
        .collect()
}

/// Sample covariance matrix of the columns of a row-major matrix.
pub fn covariance_matrix(rows: &[Vec<f64>], columns: usize) -> Vec<Vec<f64>> {
    if rows.len() < 2 {
        return vec![vec![f64::NAN; columns]; columns];
    }
    let means = column_means(rows, columns);
    let denom = (rows.len() - 1) as f64;

    let mut cov = vec![vec![0.0; columns]; columns];
    for i in 0..columns {
        for j in i..columns {
            let c = rows
                .iter()
                .map(|row| (row[i] - means[i]) * (row[j] - means[j]))
                .sum::<f64>()
                / denom;
            cov[i][j] = c;
            cov[j][i] = c;
        }
    }
    cov
}

/// Matrix-vector product.
pub fn mat_vec(mat: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    mat.iter().map(|row| dot(row, v)).collect()
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
