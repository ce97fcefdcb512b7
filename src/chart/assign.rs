use super::quantize::beat_seconds;
use super::{Note, NoteType, LANES};

pub const DEFAULT_SCRATCH_RATIO: f64 = 0.06;
/// Max distance, in beats, for a note to count as landing on the beat.
pub const NEAR_BEAT_TOLERANCE: f64 = 0.12;

pub fn clamp_scratch_ratio(ratio: Option<f64>) -> f64 {
    ratio
        .filter(|r| r.is_finite())
        .unwrap_or(DEFAULT_SCRATCH_RATIO)
        .clamp(0.0, 1.0)
}

pub fn is_near_beat(time_ms: i64, beat_sec: f64) -> bool {
    let pos = time_ms as f64 / 1000.0 / beat_sec;
    (pos - pos.round()).abs() < NEAR_BEAT_TOLERANCE
}

/// Round-robin tap lanes in chronological order.
pub fn assign_lanes(times_ms: &[i64]) -> Vec<Note> {
    times_ms
        .iter()
        .enumerate()
        .map(|(i, &t)| Note::tap(t, (i % LANES as usize) as u8))
        .collect()
}

/// Turn `floor(len * ratio)` notes into scratches, on-beat notes first.
///
/// Candidates are ordered by a stable partition: notes near a beat in time
/// order, then the rest in time order. If there are fewer on-beat notes than
/// scratches requested, the remainder comes from the off-beat notes.
pub fn mark_scratches(notes: &mut [Note], bpm: f64, scratch_ratio: f64) -> usize {
    let Some(beat_sec) = beat_seconds(bpm) else {
        return 0;
    };
    let count = (notes.len() as f64 * scratch_ratio.clamp(0.0, 1.0)).floor() as usize;
    if count == 0 {
        return 0;
    }

    let (mut order, off_beat): (Vec<usize>, Vec<usize>) =
        (0..notes.len()).partition(|&i| is_near_beat(notes[i].time_ms, beat_sec));
    if order.len() < count {
        log::debug!(
            "Only {} on-beat scratch candidates for {} scratches, filling in time order",
            order.len(),
            count
        );
    }
    order.extend(off_beat);

    for &i in order.iter().take(count) {
        notes[i].kind = NoteType::Scratch;
    }
    count
}

/// Lanes, scratches and the final stable time sort.
pub fn assign(times_ms: &[i64], bpm: f64, scratch_ratio: f64) -> Vec<Note> {
    let mut notes = assign_lanes(times_ms);
    mark_scratches(&mut notes, bpm, scratch_ratio);
    notes.sort_by_key(|n| n.time_ms);
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_rotate() {
        let notes = assign_lanes(&[0, 100, 200, 300, 400, 500, 600, 700]);
        let lanes: Vec<u8> = notes.iter().map(|n| n.lane).collect();
        assert_eq!(lanes, vec![0, 1, 2, 3, 4, 5, 0, 1]);
    }

    #[test]
    fn near_beat_window() {
        // 120 bpm: beat = 500ms, tolerance = 60ms
        assert!(is_near_beat(0, 0.5));
        assert!(is_near_beat(1000, 0.5));
        assert!(is_near_beat(1055, 0.5));
        assert!(!is_near_beat(1060, 0.5));
        assert!(!is_near_beat(1250, 0.5));
        assert!(is_near_beat(1450, 0.5));
    }

    #[test]
    fn scratch_count_is_floor_of_ratio() {
        let times: Vec<i64> = (0..50).map(|i| i * 250).collect();
        let notes = assign(&times, 120.0, 0.06);
        assert_eq!(notes.iter().filter(|n| n.is_scratch()).count(), 3);
        let notes = assign(&times, 120.0, 0.0);
        assert_eq!(notes.iter().filter(|n| n.is_scratch()).count(), 0);
    }

    #[test]
    fn on_beat_notes_preferred_in_time_order() {
        // 250 and 750 are off-beat at 120 bpm
        let times = [250, 500, 750, 1000, 1250, 1500];
        let notes = assign(&times, 120.0, 0.5);
        let scratched: Vec<i64> = notes
            .iter()
            .filter(|n| n.is_scratch())
            .map(|n| n.time_ms)
            .collect();
        assert_eq!(scratched, vec![500, 1000, 1500]);
    }

    #[test]
    fn shortfall_falls_back_to_time_order() {
        let times = [250, 500, 750, 1250];
        let notes = assign(&times, 120.0, 0.75);
        let scratched: Vec<i64> = notes
            .iter()
            .filter(|n| n.is_scratch())
            .map(|n| n.time_ms)
            .collect();
        assert_eq!(scratched, vec![250, 500, 750]);
    }

    #[test]
    fn scratches_keep_their_lane_and_time() {
        let times = [0, 250, 500];
        let notes = assign(&times, 120.0, 1.0);
        assert!(notes.iter().all(|n| n.is_scratch()));
        let pairs: Vec<(i64, u8)> = notes.iter().map(|n| (n.time_ms, n.lane)).collect();
        assert_eq!(pairs, vec![(0, 0), (250, 1), (500, 2)]);
    }

    #[test]
    fn ratio_is_clamped() {
        assert_eq!(clamp_scratch_ratio(None), DEFAULT_SCRATCH_RATIO);
        assert_eq!(clamp_scratch_ratio(Some(2.0)), 1.0);
        assert_eq!(clamp_scratch_ratio(Some(-0.5)), 0.0);
    }
}
