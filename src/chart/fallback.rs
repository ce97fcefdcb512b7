use super::assign::{assign_lanes, mark_scratches};
use super::generate::GenerateParams;
use super::quantize::grid_seconds;
use super::rng::Mulberry32;
use super::Chart;

/// Upper bound on grid slots walked for one chart. A day of audio at
/// 1000 BPM stays below it.
pub const MAX_GRID_SLOTS: f64 = 10_000_000.0;

/// Synthetic chart for when no audio is available.
///
/// Every eighth-note slot gets a tap with probability `nps * grid`, drawn
/// from a generator seeded by the song id, so a song always gets the same
/// chart for the same parameters.
pub fn generate_fallback(params: &GenerateParams) -> Chart {
    let mut rng = Mulberry32::from_song_id(&params.song_id);
    generate_fallback_with(params, &mut rng)
}

pub fn generate_fallback_with(params: &GenerateParams, rng: &mut Mulberry32) -> Chart {
    if !params.is_valid() {
        log::warn!(
            "Degenerate fallback input (bpm={}, duration={}s), emitting empty chart",
            params.bpm,
            params.duration_sec
        );
        return Chart::empty(params.song_id.clone());
    }
    let Some(grid) = grid_seconds(params.bpm) else {
        return Chart::empty(params.song_id.clone());
    };

    let target_nps = params.target_nps();
    let probability = target_nps * grid;
    let slots = (params.duration_sec / grid).floor();
    if slots.is_nan() || slots > MAX_GRID_SLOTS {
        log::warn!(
            "Fallback grid for '{}' has {} slots (bpm={}, duration={}s), emitting empty chart",
            params.song_id,
            slots,
            params.bpm,
            params.duration_sec
        );
        return Chart::empty(params.song_id.clone());
    }
    let total_slots = slots as usize;

    let times: Vec<i64> = (0..total_slots)
        .filter(|_| rng.next_f64() < probability)
        .map(|slot| (slot as f64 * grid * 1000.0).round() as i64)
        .collect();

    let mut notes = assign_lanes(&times);
    let scratches = mark_scratches(&mut notes, params.bpm, params.scratch_ratio());

    log::info!(
        "Fallback chart for '{}': {} slots, {} notes ({} scratch)",
        params.song_id,
        total_slots,
        notes.len(),
        scratches
    );

    Chart::new(params.song_id.clone(), notes)
}
