//! Shared numeric helpers for the candidate-evaluation loop.

use realfft::RealFftPlanner;

/// Size threshold (series length * query length) above which the FFT path
/// is used. Below it, the naive loop wins on constant overhead.
const FFT_THRESHOLD: usize = 256 * 1024;

/// Dot products between `query` and every stride-1 window of `series`.
///
/// Element `i` of the result is `dot(query, series[i..i + m])`, so the
/// result has `series.len() - m + 1` entries. Dispatches to an FFT-based
/// O(n log n) cross-correlation for large inputs.
pub fn window_dot_products(query: &[f64], series: &[f64]) -> Vec<f64> {
    let m = query.len();
    let n = series.len();
    assert!(n >= m, "series shorter than query");
    if n * m > FFT_THRESHOLD {
        window_dot_products_fft(query, series)
    } else {
        window_dot_products_naive(query, series)
    }
}

/// Naive O(n*m) window dot products.
pub fn window_dot_products_naive(query: &[f64], series: &[f64]) -> Vec<f64> {
    let m = query.len();
    assert!(series.len() >= m, "series shorter than query");
    (0..=series.len() - m)
        .map(|i| query.iter().zip(&series[i..i + m]).map(|(q, s)| q * s).sum())
        .collect()
}

/// FFT-based window dot products via cross-correlation.
///
/// Convolves the reversed query with the series using a real-to-complex
/// transform and reads the dot products out of the convolution tail.
pub fn window_dot_products_fft(query: &[f64], series: &[f64]) -> Vec<f64> {
    let m = query.len();
    let n = series.len();
    assert!(n >= m, "series shorter than query");
    let n_windows = n - m + 1;
    let fft_len = (n + m - 1).next_power_of_two();

    let mut planner = RealFftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_len);
    let inverse = planner.plan_fft_inverse(fft_len);

    let mut q_padded = vec![0.0; fft_len];
    for (i, &q) in query.iter().enumerate() {
        q_padded[m - 1 - i] = q;
    }
    let mut s_padded = vec![0.0; fft_len];
    s_padded[..n].copy_from_slice(series);

    let mut q_spectrum = forward.make_output_vec();
    let mut s_spectrum = forward.make_output_vec();
    forward.process(&mut q_padded, &mut q_spectrum).unwrap();
    forward.process(&mut s_padded, &mut s_spectrum).unwrap();

    for (q, s) in q_spectrum.iter_mut().zip(&s_spectrum) {
        *q *= s;
    }

    let mut conv = vec![0.0; fft_len];
    inverse.process(&mut q_spectrum, &mut conv).unwrap();

    // The inverse transform is unnormalized; the dot products sit at
    // convolution lags m-1 .. m-1+n_windows.
    let norm = 1.0 / fft_len as f64;
    conv[m - 1..m - 1 + n_windows].iter().map(|&x| x * norm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_dot_products_simple() {
        // query = [1, 2], series = [1, 2, 3, 4]
        let result = window_dot_products(&[1.0, 2.0], &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(result.len(), 3);
        assert!((result[0] - 5.0).abs() < 1e-10);
        assert!((result[1] - 8.0).abs() < 1e-10);
        assert!((result[2] - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_window_dot_products_exact_fit() {
        let result = window_dot_products(&[3.0, 4.0, 5.0], &[3.0, 4.0, 5.0]);
        assert_eq!(result.len(), 1);
        assert!((result[0] - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_fft_vs_naive_equivalence() {
        for (n, m) in [(64, 4), (500, 20), (2000, 64)] {
            let series: Vec<f64> = (0..n).map(|i| (i as f64 * 0.17).sin()).collect();
            let query = &series[3..3 + m];
            let naive = window_dot_products_naive(query, &series);
            let fft = window_dot_products_fft(query, &series);
            assert_eq!(naive.len(), fft.len());
            for (i, (a, b)) in naive.iter().zip(&fft).enumerate() {
                assert!(
                    (a - b).abs() < 1e-8,
                    "mismatch at {i} (n={n}, m={m}): naive={a}, fft={b}"
                );
            }
        }
    }
}
