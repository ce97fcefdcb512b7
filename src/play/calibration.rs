use serde::Serialize;

pub const CLICK_COUNT: usize = 32;
pub const CLICK_INTERVAL_MS: f64 = 600.0;
pub const CLICK_LEAD_IN_MS: f64 = 500.0;

/// Metronome click times used by the calibration run.
pub fn click_schedule() -> Vec<f64> {
    (0..CLICK_COUNT)
        .map(|i| CLICK_LEAD_IN_MS + i as f64 * CLICK_INTERVAL_MS)
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationEstimate {
    pub samples: u32,
    pub average_lag_ms: i64,
    /// Offset to apply so taps line up with the beat.
    pub recommended_offset_ms: i64,
}

/// Estimates input lag from taps played along to a click track.
///
/// Each tap is paired with its nearest click; the lag is kept as a running
/// average rounded to whole milliseconds after every tap.
pub struct Calibrator {
    clicks: Vec<f64>,
    estimate: CalibrationEstimate,
}

impl Calibrator {
    pub fn new(clicks: Vec<f64>) -> Self {
        Self { clicks, estimate: CalibrationEstimate::default() }
    }

    pub fn record_tap(&mut self, tap_ms: f64) -> Option<CalibrationEstimate> {
        let nearest = self
            .clicks
            .iter()
            .copied()
            .min_by(|a, b| (a - tap_ms).abs().total_cmp(&(b - tap_ms).abs()))?;
        let lag = (tap_ms - nearest).round() as i64;

        let n = self.estimate.samples as i64 + 1;
        let avg = ((self.estimate.average_lag_ms * (n - 1) + lag) as f64 / n as f64).round() as i64;
        self.estimate = CalibrationEstimate {
            samples: n as u32,
            average_lag_ms: avg,
            recommended_offset_ms: -avg,
        };
        Some(self.estimate)
    }

    pub fn estimate(&self) -> CalibrationEstimate {
        self.estimate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_spacing() {
        let clicks = click_schedule();
        assert_eq!(clicks.len(), 32);
        assert_eq!(clicks[0], 500.0);
        assert_eq!(clicks[1], 1100.0);
    }

    #[test]
    fn late_taps_recommend_negative_offset() {
        let mut cal = Calibrator::new(click_schedule());
        cal.record_tap(540.0);
        cal.record_tap(1160.0);
        let est = cal.record_tap(1730.0).unwrap();
        assert_eq!(est.samples, 3);
        assert_eq!(est.average_lag_ms, 43);
        assert_eq!(est.recommended_offset_ms, -43);
    }

    #[test]
    fn early_taps_pair_with_next_click() {
        let mut cal = Calibrator::new(click_schedule());
        let est = cal.record_tap(1080.0).unwrap();
        assert_eq!(est.average_lag_ms, -20);
        assert_eq!(est.recommended_offset_ms, 20);
    }

    #[test]
    fn no_clicks_no_estimate() {
        let mut cal = Calibrator::new(Vec::new());
        assert!(cal.record_tap(100.0).is_none());
        assert_eq!(cal.estimate().samples, 0);
    }
}
