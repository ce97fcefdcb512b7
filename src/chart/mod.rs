pub mod assign;
pub mod fallback;
pub mod generate;
pub mod quantize;
pub mod rng;

use serde::{Deserialize, Serialize};

/// Number of tap lanes.
pub const LANES: u8 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    Tap,
    Scratch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub time_ms: i64,
    /// 0..LANES. Kept on scratch notes but not used to judge them.
    pub lane: u8,
    #[serde(rename = "type")]
    pub kind: NoteType,
}

impl Note {
    pub fn tap(time_ms: i64, lane: u8) -> Self {
        Self { time_ms, lane, kind: NoteType::Tap }
    }

    pub fn scratch(time_ms: i64, lane: u8) -> Self {
        Self { time_ms, lane, kind: NoteType::Scratch }
    }

    pub fn is_scratch(&self) -> bool {
        self.kind == NoteType::Scratch
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub song_id: String,
    pub notes: Vec<Note>,
}

impl Chart {
    pub fn new(song_id: impl Into<String>, mut notes: Vec<Note>) -> Self {
        // stable: equal timestamps keep their lane order
        notes.sort_by_key(|n| n.time_ms);
        Self { song_id: song_id.into(), notes }
    }

    pub fn empty(song_id: impl Into<String>) -> Self {
        Self { song_id: song_id.into(), notes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn scratch_count(&self) -> usize {
        self.notes.iter().filter(|n| n.is_scratch()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_wire_shape() {
        let chart = Chart::new("pop-spark", vec![Note::tap(250, 1), Note::scratch(500, 2)]);
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "songId": "pop-spark",
                "notes": [
                    { "timeMs": 250, "lane": 1, "type": "tap" },
                    { "timeMs": 500, "lane": 2, "type": "scratch" },
                ]
            })
        );
    }

    #[test]
    fn new_sorts_stably() {
        let chart = Chart::new(
            "s",
            vec![Note::tap(500, 0), Note::tap(100, 1), Note::tap(100, 2)],
        );
        let order: Vec<(i64, u8)> = chart.notes.iter().map(|n| (n.time_ms, n.lane)).collect();
        assert_eq!(order, vec![(100, 1), (100, 2), (500, 0)]);
    }
}
