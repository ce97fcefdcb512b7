use serde::{Deserialize, Serialize};

/// Timing windows (absolute delta, ms).
pub const PERFECT_WINDOW_MS: f64 = 35.0;
pub const GOOD_WINDOW_MS: f64 = 80.0;
/// How far from a note an input may land and still be matched to it, and how
/// late a note may go unhit before the sweep misses it.
pub const MATCH_WINDOW_MS: f64 = 120.0;

pub const PERFECT_SCORE: u32 = 100;
pub const GOOD_SCORE: u32 = 70;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Judgment {
    Perfect,
    Good,
    Miss,
}

impl Judgment {
    pub fn score(self) -> u32 {
        match self {
            Self::Perfect => PERFECT_SCORE,
            Self::Good => GOOD_SCORE,
            Self::Miss => 0,
        }
    }

    pub fn keeps_combo(self) -> bool {
        !matches!(self, Self::Miss)
    }
}

/// Classify a signed timing delta (input time minus note time).
pub fn judge(delta_ms: f64) -> Judgment {
    let abs = delta_ms.abs();
    if abs <= PERFECT_WINDOW_MS {
        Judgment::Perfect
    } else if abs <= GOOD_WINDOW_MS {
        Judgment::Good
    } else {
        Judgment::Miss
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub perfect: u32,
    pub good: u32,
    pub miss: u32,
}

impl Counts {
    pub fn total(&self) -> u32 {
        self.perfect + self.good + self.miss
    }
}

/// Running tallies for one play session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitStat {
    pub perfect: u32,
    pub good: u32,
    pub miss: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub score: u32,
}

impl HitStat {
    pub fn record(&mut self, judgment: Judgment) {
        match judgment {
            Judgment::Perfect => self.perfect += 1,
            Judgment::Good => self.good += 1,
            Judgment::Miss => self.miss += 1,
        }
        self.score += judgment.score();
        if judgment.keeps_combo() {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        } else {
            self.combo = 0;
        }
    }

    /// Count `n` misses at once.
    pub fn record_misses(&mut self, n: u32) {
        if n > 0 {
            self.miss += n;
            self.combo = 0;
        }
    }

    pub fn counts(&self) -> Counts {
        Counts {
            perfect: self.perfect,
            good: self.good,
            miss: self.miss,
        }
    }
}

/// Final result of a session, handed to whoever stores scores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub song_id: String,
    pub total_notes: u32,
    pub score: u32,
    pub max_combo: u32,
    pub counts: Counts,
}
