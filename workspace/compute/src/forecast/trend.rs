/// Places the potential changepoints of the piecewise-linear trend.
///
/// `t` holds the scaled observation times in ascending order. Changepoints are
/// spread uniformly over the first `range` share of the observations; short
/// histories get fewer of them.
pub fn place_changepoints(t: &[f64], n_changepoints: usize, range: f64) -> Vec<f64> {
    let hist_size = (t.len() as f64 * range).floor() as usize;
    let n = n_changepoints.min(hist_size.saturating_sub(1));
    if n == 0 {
        return Vec::new();
    }

    let last = (hist_size - 1) as f64;
    (1..=n)
        .map(|i| {
            let idx = (i as f64 * last / n as f64).round() as usize;
            t[idx]
        })
        .collect()
}

/// Trend feature of a changepoint: the time elapsed since it, zero before it.
pub fn hinge(t: f64, changepoint: f64) -> f64 {
    (t - changepoint).max(0.0)
}

/// Standard deviation of the trend `dt` scaled time units past the history.
///
/// Future changepoints arrive at the historical density and change the rate
/// by a Laplace amount with mean magnitude `mean_abs_delta`; each one shifts
/// the trend linearly from its arrival onwards.
pub fn future_trend_sd(dt: f64, changepoint_count: usize, mean_abs_delta: f64) -> f64 {
    if dt <= 0.0 || changepoint_count == 0 {
        return 0.0;
    }
    let delta_variance = 2.0 * mean_abs_delta * mean_abs_delta;
    (changepoint_count as f64 * delta_variance * dt.powi(3) / 3.0).sqrt()
}
