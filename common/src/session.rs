//! Session and lap bookkeeping.
//!
//! Works out how many laps are left, what lap the driver is on, when the lap
//! counter last moved and whether the best-lap highlight should be showing.

use crate::telemetry::Telemetry;
use crate::thresholds::{BLINK_PERIOD_MS, BLINK_VISIBLE_MS, BLINK_WINDOW_MS, TIME_LIMITED_MAX_SECS, UNLIMITED};

// =============================================================================
// Remaining Laps
// =============================================================================

/// Laps left in the session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RemainingLaps {
    /// Not reported and not estimable.
    Unknown,
    /// Estimated from the remaining clock of a time-limited session.
    Estimated(i32),
    /// Reported directly by the simulator.
    Reported(i32),
}

impl RemainingLaps {
    /// Lap count, if known.
    #[inline]
    pub const fn count(self) -> Option<i32> {
        match self {
            Self::Unknown => None,
            Self::Estimated(n) | Self::Reported(n) => Some(n),
        }
    }
}

/// Whether a session is limited by time rather than laps.
///
/// Lap count unlimited plus a remaining clock below 48 hours is the most
/// reliable signal available; the session info string is often misleading.
#[inline]
pub fn is_time_limited(
    laps_total: i32,
    time_remain: f64,
) -> bool {
    laps_total == UNLIMITED && time_remain < TIME_LIMITED_MAX_SECS
}

/// Resolve the laps-to-go figure.
pub fn remaining_laps(
    laps_total: i32,
    time_remain: f64,
    laps_remain: i32,
    est_lap_time: f32,
) -> RemainingLaps {
    if is_time_limited(laps_total, time_remain) {
        // Negated so NaN also counts as unknown
        if !(est_lap_time > 0.0) {
            return RemainingLaps::Unknown;
        }
        let laps = (0.5 + time_remain / f64::from(est_lap_time)) as i32;
        if laps < 0 {
            RemainingLaps::Unknown
        } else {
            RemainingLaps::Estimated(laps)
        }
    } else if laps_remain == UNLIMITED || laps_remain < 0 {
        RemainingLaps::Unknown
    } else {
        RemainingLaps::Reported(laps_remain)
    }
}

/// Current lap for display: never negative, and zero before the start.
#[inline]
pub fn current_lap(
    car_lap: i32,
    pre_start: bool,
) -> i32 {
    if pre_start { 0 } else { car_lap.max(0) }
}

/// Seconds for the session clock: time remaining in a time-limited session,
/// elapsed time otherwise or once the clock has run past zero.
#[inline]
pub fn clock_seconds(
    time_limited: bool,
    time_remain: f64,
    elapsed: f64,
) -> f64 {
    if time_limited && time_remain >= 0.0 { time_remain } else { elapsed }
}

/// Per-frame session summary derived from telemetry.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SessionSnapshot {
    pub time_limited: bool,
    pub remaining: RemainingLaps,
    pub current_lap: i32,
    pub laps_total: i32,
    /// Seconds shown on the session clock: remaining time when time-limited,
    /// elapsed time otherwise.
    pub clock_secs: f64,
}

impl SessionSnapshot {
    pub fn read<T: Telemetry + ?Sized>(t: &T) -> Self {
        let laps_total = t.session_laps_total();
        let time_remain = t.session_time_remain();
        let time_limited = is_time_limited(laps_total, time_remain);
        let remaining = remaining_laps(laps_total, time_remain, t.session_laps_remain(), t.estimated_lap_time());
        let idx = t.driver_car_idx();

        Self {
            time_limited,
            remaining,
            current_lap: current_lap(t.car_lap(idx), t.is_pre_start()),
            laps_total,
            clock_secs: clock_seconds(time_limited, time_remain, t.session_time()),
        }
    }
}

// =============================================================================
// Fastest Lap
// =============================================================================

/// Car index holding the fastest positive best lap among real competitors.
pub fn fastest_lap_car<T: Telemetry + ?Sized>(t: &T) -> Option<usize> {
    let mut fastest: Option<(usize, f32)> = None;
    for idx in 0..t.car_count() {
        let Some(car) = t.car(idx) else { continue };
        if !car.is_competitor() {
            continue;
        }
        let best = t.car_best_lap_time(idx);
        if best > 0.0 && fastest.is_none_or(|(_, f)| best < f) {
            fastest = Some((idx, best));
        }
    }
    fastest.map(|(idx, _)| idx)
}

// =============================================================================
// Lap Tracker
// =============================================================================

/// Lap-change edge detector and best-lap blink state.
#[derive(Clone, Copy, Debug, Default)]
pub struct LapTracker {
    prev_lap: i32,
    last_change_ms: u32,
    prev_best: f32,
}

impl LapTracker {
    pub const fn new() -> Self {
        Self {
            prev_lap: 0,
            last_change_ms: 0,
            prev_best: 0.0,
        }
    }

    /// Feed this frame's lap. Returns `true` when the lap changed.
    pub fn update(
        &mut self,
        lap: i32,
        now_ms: u32,
    ) -> bool {
        let changed = lap != self.prev_lap;
        self.prev_lap = lap;
        if changed {
            self.last_change_ms = now_ms;
        }
        changed
    }

    /// Whether the best-lap highlight is showing this frame.
    ///
    /// A new best blinks for a few seconds after the lap changes; after that,
    /// or when the best did not improve, it is remembered and shown steady.
    pub fn best_lap_visible(
        &mut self,
        best: f32,
        now_ms: u32,
    ) -> bool {
        let improved = best < self.prev_best;
        if improved && now_ms.wrapping_sub(self.last_change_ms) < BLINK_WINDOW_MS {
            now_ms % BLINK_PERIOD_MS < BLINK_VISIBLE_MS
        } else {
            self.prev_best = best;
            true
        }
    }

    #[inline]
    pub const fn prev_lap(&self) -> i32 { self.prev_lap }

    #[inline]
    pub const fn prev_best(&self) -> f32 { self.prev_best }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_limited_detection() {
        assert!(is_time_limited(UNLIMITED, 1200.0));
        assert!(!is_time_limited(UNLIMITED, TIME_LIMITED_MAX_SECS));
        assert!(!is_time_limited(UNLIMITED, 604_800.0));
        assert!(!is_time_limited(20, 1200.0));
    }

    #[test]
    fn test_remaining_laps_estimated_from_clock() {
        // 1200 s / 92 s = 13.04
        assert_eq!(remaining_laps(UNLIMITED, 1200.0, UNLIMITED, 92.0), RemainingLaps::Estimated(13));
        // 1250 / 100 = 12.5 rounds up
        assert_eq!(remaining_laps(UNLIMITED, 1250.0, 3, 100.0), RemainingLaps::Estimated(13));
    }

    #[test]
    fn test_remaining_laps_without_lap_time_is_unknown() {
        assert_eq!(remaining_laps(UNLIMITED, 1200.0, 5, 0.0), RemainingLaps::Unknown);
        assert_eq!(remaining_laps(UNLIMITED, 1200.0, 5, -3.0), RemainingLaps::Unknown);
    }

    #[test]
    fn test_remaining_laps_reported() {
        assert_eq!(remaining_laps(20, 604_800.0, 7, 90.0), RemainingLaps::Reported(7));
        // Long clock: not time-limited, falls through to the reported value
        assert_eq!(remaining_laps(UNLIMITED, 200_000.0, 4, 90.0), RemainingLaps::Reported(4));
    }

    #[test]
    fn test_remaining_laps_unknown() {
        assert_eq!(remaining_laps(UNLIMITED, 200_000.0, UNLIMITED, 90.0), RemainingLaps::Unknown);
        assert_eq!(remaining_laps(20, 604_800.0, -1, 90.0), RemainingLaps::Unknown);
        assert_eq!(RemainingLaps::Unknown.count(), None);
        assert_eq!(RemainingLaps::Estimated(3).count(), Some(3));
    }

    #[test]
    fn test_current_lap_clamped() {
        assert_eq!(current_lap(-1, false), 0);
        assert_eq!(current_lap(5, false), 5);
        assert_eq!(current_lap(5, true), 0);
    }

    #[test]
    fn test_clock_counts_down_then_shows_elapsed() {
        assert!((clock_seconds(true, 1200.0, 60.0) - 1200.0).abs() < 1e-9);
        assert!((clock_seconds(true, 0.0, 1800.0) - 0.0).abs() < 1e-9);
        // Overtime: remaining went negative
        assert!(is_time_limited(UNLIMITED, -4.0));
        assert!((clock_seconds(true, -4.0, 1804.0) - 1804.0).abs() < 1e-9);
        assert!((clock_seconds(false, 604_800.0, 95.0) - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_lap_change_edges() {
        let mut lt = LapTracker::new();
        assert!(!lt.update(0, 100));
        assert!(lt.update(1, 200));
        assert!(!lt.update(1, 300));
        assert_eq!(lt.prev_lap(), 1);
        assert!(lt.update(2, 400));
    }

    #[test]
    fn test_first_best_lap_is_steady() {
        let mut lt = LapTracker::new();
        lt.update(1, 1000);
        assert!(lt.best_lap_visible(90.0, 1100));
        assert!((lt.prev_best() - 90.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_improved_best_blinks_then_settles() {
        let mut lt = LapTracker::new();
        lt.update(1, 0);
        assert!(lt.best_lap_visible(90.0, 0));

        // Lap 2 set a new best at t=8000
        lt.update(2, 8000);
        // 8000 % 800 = 0 -> visible
        assert!(lt.best_lap_visible(89.0, 8000));
        // 8500 % 800 = 500 -> hidden
        assert!(!lt.best_lap_visible(89.0, 8500));
        // 8799 % 800 = 799 -> hidden
        assert!(!lt.best_lap_visible(89.0, 8799));
        // 8800 % 800 = 0 -> visible
        assert!(lt.best_lap_visible(89.0, 8800));
        // Still remembering the old best while blinking
        assert!((lt.prev_best() - 90.0).abs() < f32::EPSILON);

        // Window over: steady and remembered
        assert!(lt.best_lap_visible(89.0, 13_000));
        assert!((lt.prev_best() - 89.0).abs() < f32::EPSILON);
        assert!(lt.best_lap_visible(89.0, 13_300));
    }

    #[test]
    fn test_blink_survives_tick_wrap() {
        let mut lt = LapTracker::new();
        lt.best_lap_visible(90.0, 0);
        let start = u32::MAX - 100;
        lt.update(1, start);
        // 200 ms after the change, across the wrap
        let now = start.wrapping_add(200);
        assert_eq!(lt.best_lap_visible(89.0, now), now % BLINK_PERIOD_MS < BLINK_VISIBLE_MS);
        assert!((lt.prev_best() - 90.0).abs() < f32::EPSILON);
    }
}
