//! Rolling fuel consumption tracking.
//!
//! One sample is taken per completed lap: the fuel burned between two lap
//! counter changes. Laps touched by a caution-type flag or by a visit to pit
//! road do not represent racing consumption, so they are measured but not
//! kept. The average of the kept samples, scaled by a safety factor, drives
//! the laps-of-fuel and fuel-to-finish figures.

use heapless::Deque;

use crate::session::RemainingLaps;
use crate::telemetry::SessionFlags;
use crate::thresholds::FUEL_HISTORY_CAPACITY;

/// What happened to the lap that just finished.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LapSample {
    /// Counted toward the average.
    Accepted(f32),
    /// Measured but discarded because the lap was not run under green.
    Rejected(f32),
}

/// Fuel-to-finish status, which picks the `Fin+` colour.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FinishStatus {
    /// Enough fuel on board or queued for the next stop.
    Covered,
    /// More fuel is needed than will be added.
    Short,
}

/// Per-lap fuel history and lap validity.
#[derive(Clone, Debug, Default)]
pub struct FuelTracker {
    history: Deque<f32, FUEL_HISTORY_CAPACITY>,
    lap_start_fuel: f32,
    lap_valid: bool,
}

impl FuelTracker {
    pub const fn new() -> Self {
        Self {
            history: Deque::new(),
            lap_start_fuel: 0.0,
            lap_valid: false,
        }
    }

    /// Close the current lap at `fuel_now` and open the next.
    ///
    /// The baseline always moves to `fuel_now`; the sample is only kept if
    /// the lap was valid. History is trimmed to the newest `window` samples.
    pub fn on_lap_change(
        &mut self,
        fuel_now: f32,
        window: usize,
    ) -> LapSample {
        let used = (self.lap_start_fuel - fuel_now).max(0.0);
        self.lap_start_fuel = fuel_now;

        let sample = if self.lap_valid {
            if self.history.is_full() {
                self.history.pop_front();
            }
            self.history.push_back(used).ok();
            LapSample::Accepted(used)
        } else {
            LapSample::Rejected(used)
        };

        let window = window.min(FUEL_HISTORY_CAPACITY);
        while self.history.len() > window {
            self.history.pop_front();
        }

        self.lap_valid = true;
        sample
    }

    /// Per-frame validity check. Returns `true` if this call invalidated a
    /// lap that was valid until now.
    pub fn update_validity(
        &mut self,
        flags: SessionFlags,
        on_pit_road: bool,
    ) -> bool {
        if self.lap_valid && (flags.invalidates_fuel_lap() || on_pit_road) {
            self.lap_valid = false;
            return true;
        }
        false
    }

    /// Drop the current lap from averaging. Used when the session changes.
    #[inline]
    pub fn invalidate(&mut self) { self.lap_valid = false; }

    #[inline]
    pub const fn is_lap_valid(&self) -> bool { self.lap_valid }

    #[inline]
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ { self.history.iter().copied() }

    #[inline]
    pub fn len(&self) -> usize { self.history.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.history.is_empty() }

    /// Mean of kept samples, `0` if there are none.
    pub fn average(&self) -> f32 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.iter().sum::<f32>() / self.history.len() as f32
    }

    /// Conservative per-lap consumption used for projections.
    #[inline]
    pub fn per_lap_estimate(
        &self,
        factor: f32,
    ) -> f32 {
        self.average() * factor
    }
}

// =============================================================================
// Projections
// =============================================================================

/// Laps the fuel on board lasts at `per_lap`. `None` without an estimate.
pub fn estimated_laps(
    fuel_now: f32,
    per_lap: f32,
) -> Option<f32> {
    (per_lap > 0.0).then(|| fuel_now / per_lap)
}

/// Extra fuel needed to reach the finish, never negative.
///
/// `None` when the remaining laps or the per-lap estimate are unknown.
pub fn fuel_to_finish(
    remaining: RemainingLaps,
    per_lap: f32,
    fuel_now: f32,
) -> Option<f32> {
    let laps = remaining.count()?;
    if per_lap > 0.0 {
        Some((laps as f32 * per_lap - fuel_now).max(0.0))
    } else {
        None
    }
}

/// Whether the next stop covers `to_finish`.
///
/// Short if more is needed than the pit crew will add, or if anything is
/// needed at all while no fill is requested.
pub fn finish_status(
    to_finish: f32,
    pit_fuel: f32,
    fill_requested: bool,
) -> FinishStatus {
    if to_finish > pit_fuel || (to_finish > 0.0 && !fill_requested) {
        FinishStatus::Short
    } else {
        FinishStatus::Covered
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
