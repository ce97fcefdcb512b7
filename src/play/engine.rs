use serde::{Deserialize, Serialize};

use super::clock::PlayClock;
use super::judge::{judge, HitStat, Judgment, Summary, MATCH_WINDOW_MS};
use crate::chart::{Chart, Note, LANES};

/// Time past the end of the song before the session closes.
pub const END_GRACE_MS: f64 = 500.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Playing,
    Paused,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Down,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputTarget {
    Lane(u8),
    Scratch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: InputKind,
    pub target: InputTarget,
}

impl InputEvent {
    pub fn down(target: InputTarget) -> Self {
        Self { kind: InputKind::Down, target }
    }

    pub fn up(target: InputTarget) -> Self {
        Self { kind: InputKind::Up, target }
    }
}

/// A note leaving the chart together with its verdict.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JudgedNote {
    pub note: Note,
    pub judgment: Judgment,
    /// Input minus note time. `None` for notes missed without input.
    pub delta_ms: Option<f64>,
}

/// Receives session events as they happen.
pub trait SessionObserver {
    fn note_judged(&mut self, _judged: &JudgedNote) {}

    fn session_finished(&mut self, _summary: &Summary) {}
}

impl SessionObserver for () {}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionTiming {
    /// Player calibration, added to every clock reading.
    pub calibration_offset_ms: f64,
    /// Per-song offset, added to every clock reading.
    pub song_offset_ms: f64,
    pub song_duration_ms: f64,
}

/// Judges input against a chart for one play session.
///
/// All mutation goes through `&mut self`, so input matching, the miss sweep
/// and the end-of-song flush can never interleave.
pub struct JudgmentEngine<C: PlayClock, O: SessionObserver = ()> {
    song_id: String,
    notes: Vec<Note>,
    total_notes: u32,
    clock: C,
    observer: O,
    timing: SessionTiming,
    state: SessionState,
    stat: HitStat,
    held_lanes: [bool; LANES as usize],
    scratch_held: bool,
    summary: Option<Summary>,
}

impl<C: PlayClock> JudgmentEngine<C, ()> {
    pub fn new(chart: Chart, clock: C, timing: SessionTiming) -> Self {
        Self::with_observer(chart, clock, timing, ())
    }
}

impl<C: PlayClock, O: SessionObserver> JudgmentEngine<C, O> {
    pub fn with_observer(chart: Chart, clock: C, timing: SessionTiming, observer: O) -> Self {
        let Chart { song_id, mut notes } = chart;
        notes.sort_by_key(|n| n.time_ms);
        Self {
            song_id,
            total_notes: notes.len() as u32,
            notes,
            clock,
            observer,
            timing,
            state: SessionState::Idle,
            stat: HitStat::default(),
            held_lanes: [false; LANES as usize],
            scratch_held: false,
            summary: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stat(&self) -> HitStat {
        self.stat
    }

    pub fn remaining(&self) -> &[Note] {
        &self.notes
    }

    pub fn total_notes(&self) -> u32 {
        self.total_notes
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Chart time: clock reading plus calibration and song offsets.
    pub fn now_ms(&self) -> f64 {
        self.clock.elapsed_ms() + self.timing.calibration_offset_ms + self.timing.song_offset_ms
    }

    /// Idle → Playing. Returns false if the session was already started.
    pub fn start(&mut self) -> bool {
        if self.state != SessionState::Idle {
            return false;
        }
        self.state = SessionState::Playing;
        log::info!(
            "Session '{}' started: {} notes, {:.0}ms",
            self.song_id,
            self.total_notes,
            self.timing.song_duration_ms
        );
        true
    }

    /// Playing ⇄ Paused. Input and the sweep are suspended while paused;
    /// freezing the clock is left to whoever owns it.
    pub fn toggle_pause(&mut self) -> SessionState {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            other => other,
        };
        self.state
    }

    /// Apply one input event. Returns the judged note when a down event hit.
    ///
    /// Unmatched input changes nothing. A direct hit is only ever Perfect or
    /// Good; misses come from the sweep and the end-of-song flush.
    pub fn handle(&mut self, event: InputEvent) -> Option<JudgedNote> {
        if let InputTarget::Lane(lane) = event.target {
            if lane >= LANES {
                log::debug!("Ignoring input on unknown lane {}", lane);
                return None;
            }
        }

        let held = match event.target {
            InputTarget::Lane(lane) => &mut self.held_lanes[lane as usize],
            InputTarget::Scratch => &mut self.scratch_held,
        };
        match event.kind {
            InputKind::Up => {
                *held = false;
                return None;
            }
            InputKind::Down if *held => return None,
            InputKind::Down => *held = true,
        }

        if self.state != SessionState::Playing {
            return None;
        }
        self.try_hit(event.target)
    }

    /// Hits the earliest note on the target that judges Perfect or Good.
    /// Notes in the match window but outside the Good window are passed over
    /// and left for the sweep.
    fn try_hit(&mut self, target: InputTarget) -> Option<JudgedNote> {
        let t = self.now_ms();
        let Some((idx, delta, judgment)) = self
            .notes
            .iter()
            .enumerate()
            .filter(|(_, n)| match target {
                InputTarget::Lane(lane) => !n.is_scratch() && n.lane == lane,
                InputTarget::Scratch => n.is_scratch(),
            })
            .map(|(idx, n)| {
                let delta = t - n.time_ms as f64;
                (idx, delta, judge(delta))
            })
            .take_while(|&(_, delta, _)| delta >= -MATCH_WINDOW_MS)
            .find(|&(_, _, judgment)| judgment != Judgment::Miss)
        else {
            log::debug!("{:?} at {:.1}ms matched no note inside the hit windows", target, t);
            return None;
        };

        let note = self.notes.remove(idx);
        self.stat.record(judgment);
        let judged = JudgedNote { note, judgment, delta_ms: Some(delta) };
        log::debug!("{:?} {:?} ({:+.1}ms), combo {}", target, judgment, delta, self.stat.combo);
        self.observer.note_judged(&judged);
        Some(judged)
    }

    /// Per-frame update: miss overdue notes, then close the session once the
    /// song is over. Returns the summary on the tick that finishes.
    pub fn tick(&mut self) -> Option<Summary> {
        if self.state != SessionState::Playing {
            return None;
        }
        let t = self.now_ms();
        self.sweep(t);
        if t > self.timing.song_duration_ms + END_GRACE_MS {
            return Some(self.finish());
        }
        None
    }

    fn sweep(&mut self, t: f64) {
        while let Some(head) = self.notes.first() {
            if head.time_ms as f64 >= t - MATCH_WINDOW_MS {
                break;
            }
            let note = self.notes.remove(0);
            self.stat.record(Judgment::Miss);
            let judged = JudgedNote { note, judgment: Judgment::Miss, delta_ms: None };
            self.observer.note_judged(&judged);
        }
    }

    fn finish(&mut self) -> Summary {
        let leftover = self.notes.len() as u32;
        self.stat.record_misses(leftover);
        self.notes.clear();
        self.state = SessionState::Finished;

        let summary = Summary {
            song_id: self.song_id.clone(),
            total_notes: self.total_notes,
            score: self.stat.score,
            max_combo: self.stat.max_combo,
            counts: self.stat.counts(),
        };
        log::info!(
            "Session '{}' finished: score {}, max combo {}, P{} G{} M{} ({} unplayed)",
            summary.song_id,
            summary.score,
            summary.max_combo,
            summary.counts.perfect,
            summary.counts.good,
            summary.counts.miss,
            leftover
        );
        self.observer.session_finished(&summary);
        self.summary = Some(summary.clone());
        summary
    }
}
