use indicatif::ProgressBar;
use serde::Deserialize;
use std::path::Path;

use super::clock::ManualClock;
use super::engine::{InputEvent, InputKind, InputTarget, JudgmentEngine, SessionObserver, SessionTiming, END_GRACE_MS};
use super::judge::Summary;
use crate::chart::Chart;
use crate::error::{Error, Result};

/// An input event stamped with the clock time it arrived at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedInput {
    pub at_ms: f64,
    pub event: InputEvent,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInput {
    at_ms: f64,
    kind: InputKind,
    target: RawTarget,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTarget {
    Lane(u8),
    Named(String),
}

/// Parse a JSON list of `{ "atMs", "kind": "down"|"up", "target": <lane>|"scratch" }`.
pub fn parse_inputs(json: &str) -> Result<Vec<TimedInput>> {
    let raw: Vec<RawInput> = serde_json::from_str(json).map_err(|e| Error::Parse {
        path: "input events".into(),
        message: e.to_string(),
    })?;

    raw.into_iter()
        .enumerate()
        .map(|(index, r)| {
            if !r.at_ms.is_finite() {
                return Err(Error::InvalidEvent {
                    index,
                    message: format!("time {} is not finite", r.at_ms),
                });
            }
            let target = match r.target {
                RawTarget::Lane(lane) => InputTarget::Lane(lane),
                RawTarget::Named(name) if name.eq_ignore_ascii_case("scratch") => InputTarget::Scratch,
                RawTarget::Named(name) => {
                    return Err(Error::InvalidEvent {
                        index,
                        message: format!("unknown target '{}'", name),
                    })
                }
            };
            Ok(TimedInput {
                at_ms: r.at_ms,
                event: InputEvent { kind: r.kind, target },
            })
        })
        .collect()
}

pub fn load_inputs(path: &Path) -> Result<Vec<TimedInput>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_inputs(&content).map_err(|e| match e {
        Error::Parse { message, .. } => Error::Parse {
            path: path.display().to_string(),
            message,
        },
        other => other,
    })
}

/// Drive a whole session from recorded input.
///
/// The clock advances in `tick_ms` steps. Events due since the previous tick
/// are applied first, at their own timestamps and in arrival order, then the
/// engine ticks.
pub fn run_replay<O: SessionObserver>(
    chart: Chart,
    timing: SessionTiming,
    inputs: &[TimedInput],
    tick_ms: f64,
    observer: O,
    progress: Option<&ProgressBar>,
) -> Result<Summary> {
    if !timing.song_duration_ms.is_finite() || timing.song_duration_ms < 0.0 {
        return Err(Error::InvalidTiming(format!(
            "song duration {}ms",
            timing.song_duration_ms
        )));
    }
    for (name, offset) in [
        ("calibration offset", timing.calibration_offset_ms),
        ("song offset", timing.song_offset_ms),
    ] {
        if !offset.is_finite() {
            return Err(Error::InvalidTiming(format!("{} {}ms", name, offset)));
        }
    }
    let tick_ms = if tick_ms.is_finite() { tick_ms.max(1.0) } else { 16.0 };

    let mut pending = inputs.to_vec();
    // stable: simultaneous events keep arrival order
    pending.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
    let mut pending = pending.into_iter().peekable();

    let clock = ManualClock::new();
    let mut engine = JudgmentEngine::with_observer(chart, &clock, timing, observer);
    engine.start();

    let end_ms = timing.song_duration_ms + END_GRACE_MS;
    if let Some(pb) = progress {
        pb.set_length(end_ms.ceil() as u64 + 1);
    }

    let mut now = 0.0f64;
    loop {
        while let Some(input) = pending.next_if(|i| i.at_ms <= now) {
            clock.set_ms(input.at_ms.max(0.0));
            engine.handle(input.event);
        }
        clock.set_ms(now);
        if let Some(summary) = engine.tick() {
            if let Some(pb) = progress {
                pb.finish_with_message("Session complete");
            }
            return Ok(summary);
        }
        if let Some(pb) = progress {
            pb.set_position(now.min(end_ms) as u64);
        }
        now += tick_ms;
    }
}
