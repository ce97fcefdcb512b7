/// Trailing window (in envelope hops) for the adaptive threshold.
pub const MOVING_AVERAGE_WINDOW: usize = 20;
/// How far above the local mean a hop must rise to count as an onset.
pub const SENSITIVITY: f32 = 0.25;

/// Causal moving average: each output is the mean of the trailing `window`
/// values, or of everything seen so far near the start.
pub fn moving_average(values: &[f32], window: usize) -> Vec<f32> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0f64;
    for (i, &v) in values.iter().enumerate() {
        sum += v as f64;
        if i >= window {
            sum -= values[i - window] as f64;
        }
        out.push((sum / (i + 1).min(window) as f64) as f32);
    }
    out
}

/// Envelope indices that rise above the moving average by `sensitivity`
/// and form a local maximum.
///
/// The predecessor comparison is strict and the successor one is not, so a
/// flat plateau yields a single peak at its first index.
pub fn detect_peaks(env: &[f32], window: usize, sensitivity: f32) -> Vec<usize> {
    if env.len() < 3 {
        return Vec::new();
    }
    let avg = moving_average(env, window);
    (1..env.len() - 1)
        .filter(|&i| {
            env[i] > avg[i] + sensitivity && env[i] > env[i - 1] && env[i] >= env[i + 1]
        })
        .collect()
}

/// Convert peak indices to seconds.
pub fn peak_times(peaks: &[usize], hop: usize, sample_rate: u32) -> Vec<f64> {
    if sample_rate == 0 {
        return Vec::new();
    }
    peaks
        .iter()
        .map(|&i| (i * hop) as f64 / sample_rate as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_warms_up() {
        let avg = moving_average(&[1.0, 3.0, 5.0, 7.0], 2);
        assert_eq!(avg, vec![1.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn finds_isolated_spike() {
        let mut env = vec![0.0f32; 30];
        env[10] = 1.0;
        assert_eq!(detect_peaks(&env, 20, 0.25), vec![10]);
    }

    #[test]
    fn plateau_reports_first_index_only() {
        let mut env = vec![0.0f32; 30];
        env[10] = 1.0;
        env[11] = 1.0;
        env[12] = 1.0;
        assert_eq!(detect_peaks(&env, 20, 0.25), vec![10]);
    }

    #[test]
    fn endpoints_never_peak() {
        let env = [1.0f32, 0.0, 0.0, 0.0, 1.0];
        assert!(detect_peaks(&env, 20, 0.25).is_empty());
    }

    #[test]
    fn below_threshold_is_ignored() {
        let mut env = vec![0.5f32; 30];
        env[15] = 0.7;
        assert!(detect_peaks(&env, 20, 0.25).is_empty());
    }

    #[test]
    fn times_scale_by_hop() {
        let t = peak_times(&[0, 10, 25], 441, 44100);
        assert_eq!(t, vec![0.0, 0.1, 0.25]);
        assert!(peak_times(&[3], 441, 0).is_empty());
    }
}
