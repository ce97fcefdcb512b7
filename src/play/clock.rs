use std::cell::Cell;
use std::time::{Duration, Instant};

/// Source of elapsed playback time in milliseconds.
///
/// The session only reads it. Whatever drives playback owns the clock and
/// pauses or advances it.
pub trait PlayClock {
    fn elapsed_ms(&self) -> f64;
}

impl<T: PlayClock + ?Sized> PlayClock for &T {
    fn elapsed_ms(&self) -> f64 {
        (**self).elapsed_ms()
    }
}

/// Wall-clock playback time backed by `Instant`.
pub struct SystemClock {
    start: Instant,
    paused_at: Cell<Option<Instant>>,
    paused_total: Cell<Duration>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            paused_at: Cell::new(None),
            paused_total: Cell::new(Duration::ZERO),
        }
    }

    /// Freeze or resume the reading. Paused time is not counted.
    pub fn set_paused(&self, paused: bool) {
        match (paused, self.paused_at.get()) {
            (true, None) => self.paused_at.set(Some(Instant::now())),
            (false, Some(at)) => {
                self.paused_total.set(self.paused_total.get() + at.elapsed());
                self.paused_at.set(None);
            }
            _ => {}
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayClock for SystemClock {
    fn elapsed_ms(&self) -> f64 {
        let now = self.paused_at.get().unwrap_or_else(Instant::now);
        let running = now.saturating_duration_since(self.start);
        running.saturating_sub(self.paused_total.get()).as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for replays and tests.
#[derive(Default)]
pub struct ManualClock {
    now_ms: Cell<f64>,
    paused: Cell<bool>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ms(&self, ms: f64) {
        if !self.paused.get() {
            self.now_ms.set(ms);
        }
    }

    pub fn advance(&self, delta_ms: f64) {
        self.set_ms(self.now_ms.get() + delta_ms);
    }

    /// While paused, `set_ms` and `advance` are ignored.
    pub fn set_paused(&self, paused: bool) {
        self.paused.set(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }
}

impl PlayClock for ManualClock {
    fn elapsed_ms(&self) -> f64 {
        self.now_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advance() {
        let clock = ManualClock::new();
        assert_eq!(clock.elapsed_ms(), 0.0);
        clock.advance(16.0);
        clock.advance(16.0);
        assert_eq!(clock.elapsed_ms(), 32.0);
        clock.set_ms(1000.0);
        assert_eq!(clock.elapsed_ms(), 1000.0);
    }

    #[test]
    fn manual_clock_freezes_while_paused() {
        let clock = ManualClock::new();
        clock.set_ms(500.0);
        clock.set_paused(true);
        clock.advance(100.0);
        assert_eq!(clock.elapsed_ms(), 500.0);
        clock.set_paused(false);
        clock.advance(100.0);
        assert_eq!(clock.elapsed_ms(), 600.0);
    }

    #[test]
    fn system_clock_freezes_while_paused() {
        let clock = SystemClock::new();
        clock.set_paused(true);
        let frozen = clock.elapsed_ms();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.elapsed_ms(), frozen);
        clock.set_paused(false);
        assert!(clock.elapsed_ms() >= frozen);
    }

    #[test]
    fn reference_is_a_clock() {
        let clock = ManualClock::new();
        clock.set_ms(42.0);
        let by_ref: &dyn PlayClock = &&clock;
        assert_eq!(by_ref.elapsed_ms(), 42.0);
    }
}
