use serde::{Deserialize, Serialize};

use super::assign::{assign, clamp_scratch_ratio};
use super::fallback::generate_fallback;
use super::quantize::{clamp_nps, filter_min_gap, limit_density, quantize_to_grid, DEFAULT_MIN_GAP_MS};
use super::Chart;
use crate::audio::decode::AudioSamples;
use crate::audio::envelope::{hop_size, rms_envelope};
use crate::audio::onset::{detect_peaks, peak_times, MOVING_AVERAGE_WINDOW, SENSITIVITY};

/// Inputs shared by the audio-driven and fallback generators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateParams {
    pub song_id: String,
    pub bpm: f64,
    pub duration_sec: f64,
    #[serde(default)]
    pub density_nps: Option<f64>,
    #[serde(default)]
    pub scratch_ratio: Option<f64>,
}

impl GenerateParams {
    pub fn is_valid(&self) -> bool {
        self.bpm.is_finite() && self.bpm > 0.0 && self.duration_sec.is_finite() && self.duration_sec > 0.0
    }

    pub fn target_nps(&self) -> f64 {
        clamp_nps(self.density_nps)
    }

    pub fn scratch_ratio(&self) -> f64 {
        clamp_scratch_ratio(self.scratch_ratio)
    }
}

/// Where a chart came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartSource {
    Audio,
    Fallback,
}

/// Onset-driven chart: envelope → peaks → grid → min gap → density → lanes.
pub fn generate_from_audio(audio: &AudioSamples, params: &GenerateParams) -> Chart {
    if !params.is_valid() {
        log::warn!(
            "Degenerate chart input (bpm={}, duration={}s), emitting empty chart",
            params.bpm,
            params.duration_sec
        );
        return Chart::empty(params.song_id.clone());
    }

    let sr = audio.sample_rate;
    let hop = hop_size(sr);
    if hop == 0 {
        log::warn!("Sample rate {}Hz gives a zero hop, emitting empty chart", sr);
        return Chart::empty(params.song_id.clone());
    }

    let env = rms_envelope(audio, hop);
    let peaks = detect_peaks(&env, MOVING_AVERAGE_WINDOW, SENSITIVITY);
    let onsets = peak_times(&peaks, hop, sr);

    let quantized = quantize_to_grid(&onsets, params.bpm);
    let spaced = filter_min_gap(&quantized, DEFAULT_MIN_GAP_MS);
    let target_nps = params.target_nps();
    let capped = limit_density(&spaced, target_nps, params.duration_sec);

    let notes = assign(&capped, params.bpm, params.scratch_ratio());
    let chart = Chart::new(params.song_id.clone(), notes);

    log::info!(
        "Chart for '{}': {} hops, {} onsets, {} after gap filter, {} notes ({} scratch) at {:.1} nps",
        params.song_id,
        env.len(),
        peaks.len(),
        spaced.len(),
        chart.len(),
        chart.scratch_count(),
        target_nps
    );

    chart
}

/// Chart for a session: from audio when decoding succeeded, otherwise the
/// seeded fallback grid. A decode failure never reaches the caller.
pub fn build_chart<E: std::fmt::Display>(
    audio: Result<&AudioSamples, E>,
    params: &GenerateParams,
) -> (Chart, ChartSource) {
    match audio {
        Ok(samples) => (generate_from_audio(samples, params), ChartSource::Audio),
        Err(err) => {
            log::warn!("Audio unavailable for '{}' ({}), using fallback grid", params.song_id, err);
            (generate_fallback(params), ChartSource::Fallback)
        }
    }
}
