//! Statistics behind the histogram, heatmap, boxplot and violin charts.

/// Linear-interpolated percentile of already sorted data, `p` in [0, 1].
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted_data[0];
    }

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        sorted_data[lower_idx]
    } else {
        let weight = rank - lower_idx as f64;
        sorted_data[lower_idx] * (1.0 - weight) + sorted_data[upper_idx] * weight
    }
}

/// Finite values of `values`, sorted ascending.
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    out.sort_by(f64::total_cmp);
    out
}

/// Min and max of the finite values, if any.
pub fn finite_extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Quartiles with whiskers at the furthest points inside 1.5 × IQR.
/// `None` when there is no finite value.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let ys = sorted_finite(values);
    if ys.is_empty() {
        return None;
    }

    let q1 = percentile(&ys, 0.25);
    let median = percentile(&ys, 0.50);
    let q3 = percentile(&ys, 0.75);
    let iqr = q3 - q1;

    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    // ys is sorted, so the first/last value inside the fences are the whiskers
    let lower_whisker = ys.iter().copied().find(|&v| v >= lower_fence).unwrap_or(q1);
    let upper_whisker = ys.iter().rev().copied().find(|&v| v <= upper_fence).unwrap_or(q3);

    let outliers = ys
        .iter()
        .copied()
        .filter(|&v| v < lower_fence || v > upper_fence)
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Silverman's rule of thumb for bandwidth selection
pub fn silverman_bandwidth(data: &[f64]) -> f64 {
    let n = data.len() as f64;
    if n < 2.0 {
        return 1.0;
    }

    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    let sorted = sorted_finite(data);
    let iqr = percentile(&sorted, 0.75) - percentile(&sorted, 0.25);

    // h = 0.9 * min(std, IQR/1.34) * n^(-1/5)
    let scale = if iqr > 0.0 { std_dev.min(iqr / 1.34) } else { std_dev };
    if scale <= 0.0 {
        return 1.0;
    }
    0.9 * scale * n.powf(-0.2)
}

fn gaussian_kernel(u: f64) -> f64 {
    const SQRT_2PI: f64 = 2.5066282746310002;
    (-0.5 * u * u).exp() / SQRT_2PI
}

/// A density curve sampled on an evenly spaced grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Density {
    pub grid: Vec<f64>,
    /// Normalized so the peak is 1.
    pub density: Vec<f64>,
}

const KDE_GRID_POINTS: usize = 128;

/// Gaussian KDE with Silverman bandwidth, tails extended by three bandwidths.
pub fn kde(values: &[f64]) -> Density {
    let data = sorted_finite(values);
    if data.is_empty() {
        return Density {
            grid: vec![],
            density: vec![],
        };
    }

    let bandwidth = silverman_bandwidth(&data);
    let n = data.len() as f64;
    let min_y = data[0];
    let max_y = data[data.len() - 1];

    let extend = 3.0 * bandwidth;
    let y_start = min_y - extend;
    let y_end = max_y + extend;
    let step = (y_end - y_start) / (KDE_GRID_POINTS - 1) as f64;

    let mut grid = Vec::with_capacity(KDE_GRID_POINTS);
    let mut density = Vec::with_capacity(KDE_GRID_POINTS);

    for i in 0..KDE_GRID_POINTS {
        let y = y_start + i as f64 * step;
        let d: f64 = data
            .iter()
            .map(|&xi| gaussian_kernel((y - xi) / bandwidth))
            .sum::<f64>()
            / (n * bandwidth);
        grid.push(y);
        density.push(d);
    }

    let max_density = density.iter().fold(0.0f64, |a, &b| a.max(b));
    if max_density > 0.0 {
        for d in &mut density {
            *d /= max_density;
        }
    }

    Density { grid, density }
}

/// Equal-width bins over the data range.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Bin the finite values into exactly `bins` equal-width bins over
/// `[min, max]`; the last bin is closed on the right.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let (lo, hi) = match finite_extent(values) {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
        Some(extent) => extent,
    };
    let width = (hi - lo) / bins as f64;

    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { hi } else { lo + i as f64 * width })
        .collect();

    let mut counts = vec![0usize; bins];
    for v in values.iter().copied().filter(|v| v.is_finite()) {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}

/// Pearson correlation over the rows where both values are present.
/// NaN when fewer than two such rows or either side has zero variance.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| (x, y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (da, db) = (x - mean_a, y - mean_b);
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return f64::NAN;
    }
    (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
}

/// Symmetric pairwise correlation matrix of the given columns.
pub fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = columns.len();
    let mut matrix = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&columns[i], &columns[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&data, 0.0), 1.0);
        assert_eq!(percentile(&data, 0.5), 2.5);
        assert_eq!(percentile(&data, 1.0), 4.0);
        assert_eq!(percentile(&[], 0.5), 0.0);
    }

    #[test]
    fn test_box_stats_outliers() {
        let stats = box_stats(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(stats.median, 3.5);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);
    }

    #[test]
    fn test_box_stats_ignores_missing() {
        let stats = box_stats(&[f64::NAN, 2.0, 4.0]).unwrap();
        assert_eq!(stats.median, 3.0);
        assert!(box_stats(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_kde_shape() {
        let density = kde(&[1.0, 2.0, 2.5, 3.0, 10.0]);
        assert_eq!(density.grid.len(), 128);
        let peak = density.density.iter().cloned().fold(0.0, f64::max);
        assert!((peak - 1.0).abs() < 1e-12);
        assert!(density.grid[0] < 1.0);
        assert!(density.grid[127] > 10.0);
    }

    #[test]
    fn test_kde_constant_data() {
        let density = kde(&[5.0, 5.0, 5.0]);
        assert_eq!(density.grid.len(), 128);
        assert!(density.density.iter().all(|d| d.is_finite()));
    }

    #[test]
    fn test_histogram_default_bins() {
        let values: Vec<f64> = (0..1000).map(|i| i as f64).collect();
        let hist = histogram(&values, 20);
        assert_eq!(hist.counts.len(), 20);
        assert_eq!(hist.edges.len(), 21);
        assert_eq!(hist.counts.iter().sum::<usize>(), 1000);
        assert_eq!(hist.counts[0], 50);
        assert_eq!(hist.edges[20], 999.0);
    }

    #[test]
    fn test_histogram_last_bin_closed() {
        let hist = histogram(&[0.0, 1.0, 2.0], 2);
        assert_eq!(hist.counts, vec![1, 2]);
    }

    #[test]
    fn test_histogram_degenerate_ranges() {
        let hist = histogram(&[3.0, 3.0], 4);
        assert_eq!(hist.edges[0], 2.5);
        assert_eq!(hist.edges[4], 3.5);
        assert_eq!(hist.counts.iter().sum::<usize>(), 2);

        let empty = histogram(&[f64::NAN], 5);
        assert_eq!(empty.counts, vec![0; 5]);
        assert_eq!(empty.edges[0], 0.0);
    }

    #[test]
    fn test_correlation_fully_correlated() {
        let a: Vec<f64> = (0..50).map(|i| i as f64 * 0.37).collect();
        let b: Vec<f64> = a.iter().map(|v| 3.0 * v - 2.0).collect();
        let m = correlation_matrix(&[a, b]);
        for row in &m {
            for &r in row {
                assert!((r - 1.0).abs() < 1e-9, "r = {}", r);
            }
        }
    }

    #[test]
    fn test_correlation_pairwise_complete_and_constant() {
        let a = vec![1.0, 2.0, f64::NAN, 4.0];
        let b = vec![2.0, 4.0, 100.0, 8.0];
        assert!((pearson(&a, &b) - 1.0).abs() < 1e-9);

        let flat = vec![1.0, 1.0, 1.0, 1.0];
        assert!(pearson(&flat, &b).is_nan());
        let anti: Vec<f64> = b.iter().map(|v| -v).collect();
        assert!((pearson(&b, &anti) + 1.0).abs() < 1e-9);
    }
}
