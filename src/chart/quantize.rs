/// Default minimum spacing between kept notes.
pub const DEFAULT_MIN_GAP_MS: i64 = 120;
/// Upper bound on requested density.
pub const MAX_NPS: f64 = 7.0;
pub const DEFAULT_NPS: f64 = 4.0;

/// Seconds per beat, or `None` when the tempo cannot drive a grid.
pub fn beat_seconds(bpm: f64) -> Option<f64> {
    if bpm.is_finite() && bpm > 0.0 {
        Some(60.0 / bpm)
    } else {
        None
    }
}

/// Eighth-note grid unit in seconds.
pub fn grid_seconds(bpm: f64) -> Option<f64> {
    beat_seconds(bpm).map(|beat| beat / 2.0)
}

/// Snap onset times (seconds) to the nearest eighth-note and convert to whole ms.
pub fn quantize_to_grid(times_sec: &[f64], bpm: f64) -> Vec<i64> {
    let Some(grid) = grid_seconds(bpm) else {
        return Vec::new();
    };
    times_sec
        .iter()
        .map(|&t| ((t / grid).round() * grid * 1000.0).round() as i64)
        .collect()
}

/// Keep a time only when it is at least `min_gap_ms` after the last kept one.
pub fn filter_min_gap(times_ms: &[i64], min_gap_ms: i64) -> Vec<i64> {
    let mut sorted = times_ms.to_vec();
    sorted.sort_unstable();

    let mut out: Vec<i64> = Vec::with_capacity(sorted.len());
    for t in sorted {
        match out.last() {
            Some(&last) if t - last < min_gap_ms => {}
            _ => out.push(t),
        }
    }
    out
}

/// Requested density clamped to `[0, MAX_NPS]`; `None` means the default.
pub fn clamp_nps(density_nps: Option<f64>) -> f64 {
    let nps = density_nps.filter(|v| v.is_finite()).unwrap_or(DEFAULT_NPS);
    nps.clamp(0.0, MAX_NPS)
}

/// Note budget for a song: `max(1, floor(nps * duration))`.
pub fn max_notes(target_nps: f64, duration_sec: f64) -> usize {
    ((target_nps * duration_sec).floor() as usize).max(1)
}

/// Bound the number of notes, keeping evenly spaced survivors across the
/// whole song rather than a prefix.
pub fn limit_density(times_ms: &[i64], target_nps: f64, duration_sec: f64) -> Vec<i64> {
    let budget = max_notes(target_nps, duration_sec);
    if times_ms.len() <= budget {
        return times_ms.to_vec();
    }
    let len = times_ms.len();
    (0..budget).map(|i| times_ms[i * len / budget]).collect()
}
