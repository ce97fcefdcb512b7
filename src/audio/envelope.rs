use rayon::prelude::*;

use super::decode::AudioSamples;

/// Length of one envelope hop in seconds (~23ms).
pub const HOP_SECONDS: f64 = 0.023;

const NORMALIZE_FLOOR: f32 = 1e-6;

/// Hop size in samples for the given sample rate. Zero for degenerate rates.
pub fn hop_size(sample_rate: u32) -> usize {
    (sample_rate as f64 * HOP_SECONDS).floor() as usize
}

/// RMS loudness curve of the channel-averaged signal, one value per hop,
/// scaled so the loudest hop is 1.0.
///
/// A trailing partial hop is dropped. Returns an empty envelope when the
/// input is shorter than one hop or `hop` is zero.
pub fn rms_envelope(audio: &AudioSamples, hop: usize) -> Vec<f32> {
    if hop == 0 || audio.channels.is_empty() {
        return Vec::new();
    }
    let total = audio.len();
    let len = total / hop;
    if len == 0 {
        return Vec::new();
    }

    let channels = &audio.channels;
    let channel_count = channels.len() as f32;

    // Hops are independent and collect() keeps index order, so the result
    // matches a serial pass bit for bit.
    let mut env: Vec<f32> = (0..len)
        .into_par_iter()
        .map(|i| {
            let start = i * hop;
            let end = (start + hop).min(total);
            let mut sum = 0.0f32;
            for j in start..end {
                let mixed = channels.iter().map(|ch| ch[j]).sum::<f32>() / channel_count;
                sum += mixed * mixed;
            }
            (sum / (end - start).max(1) as f32).sqrt()
        })
        .collect();

    let peak = env.iter().copied().fold(NORMALIZE_FLOOR, f32::max);
    for v in env.iter_mut() {
        *v /= peak;
    }

    log::debug!("Envelope: {} hops of {} samples, peak rms {:.4}", len, hop, peak);
    env
}
