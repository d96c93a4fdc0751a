//! Simulated telemetry feed for the desktop host.
//!
//! Runs a single-car race against a small field: lap times wander on a slow
//! sine, fuel burns in proportion to lap progress, tires wear a little every
//! lap, and the host can throw a caution or queue a pit stop from the keyboard.
//! Everything is deterministic so a run can be reproduced exactly.

use ray_common::thresholds::UNLIMITED;
use ray_common::{CarEntry, DisplayUnits, SessionFlags, Telemetry, TireCorner, TireWear};

// =============================================================================
// Simulation Constants
// =============================================================================

/// Seconds on the grid before the race starts.
pub const PRE_START_SECS: f64 = 5.0;

/// Reference lap time of the local car.
pub const BASE_LAP_SECS: f32 = 90.0;

/// Peak deviation from the reference lap.
const LAP_JITTER_SECS: f32 = 1.5;

/// Lap time multiplier under caution.
const CAUTION_LAP_FACTOR: f32 = 1.4;

/// Fuel burned over a green lap at reference pace, litres.
pub const FUEL_PER_LAP: f32 = 2.6;

/// Fuel burn multiplier under caution.
const CAUTION_FUEL_FACTOR: f32 = 0.5;

pub const TANK_CAPACITY: f32 = 60.0;
pub const START_FUEL: f32 = 40.0;

/// Time spent on pit road for a stop.
pub const PIT_STOP_SECS: f32 = 25.0;

/// Tread lost per lap at the most worn point.
const TIRE_WEAR_PER_LAP: f32 = 0.012;

/// Remaining time the simulator reports for lap-limited sessions.
const UNLIMITED_TIME_SECS: f64 = 604_800.0;

const BRAKE_BIAS: f32 = 0.5;

/// Car slot of the local driver. Slot 0 is the pace car.
pub const DRIVER_CAR_IDX: usize = 1;

const PACE_CAR_NAME: &str = "Pace Car";
const DRIVER_NAME: &str = "Local Driver";

/// Rival names and their reference lap times.
const RIVALS: [(&str, f32); 4] = [
    ("A. Senna", 89.6),
    ("J. Clark", 90.4),
    ("N. Lauda", 90.9),
    ("G. Villeneuve", 91.3),
];

// =============================================================================
// Race Setup
// =============================================================================

/// How the race ends.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RaceLength {
    Laps(i32),
    Minutes(u32),
}

impl Default for RaceLength {
    fn default() -> Self { Self::Minutes(20) }
}

/// Deterministic lap-time wander, in `-1.0..=1.0`.
fn wander(
    lap: i32,
    freq: f32,
) -> f32 {
    (lap as f32 * freq).sin()
}

#[derive(Clone, Copy, Debug)]
struct Rival {
    name: &'static str,
    pace: f32,
    best: f32,
}

// =============================================================================
// Simulated Feed
// =============================================================================

/// A scripted race that implements [`Telemetry`].
#[derive(Clone, Debug)]
pub struct SimTelemetry {
    length: RaceLength,
    units: DisplayUnits,
    session_time: f64,
    lap: i32,
    lap_elapsed: f32,
    lap_target: f32,
    best: f32,
    last: f32,
    fuel: f32,
    tires: [TireWear; 4],
    caution: bool,
    pit_requested: bool,
    pit_timer: f32,
    incidents: i32,
    rivals: [Rival; RIVALS.len()],
}

impl SimTelemetry {
    pub fn new(
        length: RaceLength,
        units: DisplayUnits,
    ) -> Self {
        Self {
            length,
            units,
            session_time: 0.0,
            lap: 0,
            lap_elapsed: 0.0,
            lap_target: BASE_LAP_SECS,
            best: 0.0,
            last: 0.0,
            fuel: START_FUEL,
            tires: [TireWear::NEW; 4],
            caution: false,
            pit_requested: false,
            pit_timer: 0.0,
            incidents: 0,
            rivals: RIVALS.map(|(name, pace)| Rival { name, pace, best: 0.0 }),
        }
    }

    /// Restart with the same race length and units.
    pub fn new_session(&mut self) { *self = Self::new(self.length, self.units); }

    /// Advance the race by `dt` seconds.
    pub fn advance(
        &mut self,
        dt: f32,
    ) {
        self.session_time += f64::from(dt);
        if self.is_pre_start() {
            return;
        }

        if self.pit_timer > 0.0 {
            self.pit_timer = (self.pit_timer - dt).max(0.0);
        } else {
            let burn = if self.caution { CAUTION_FUEL_FACTOR } else { 1.0 };
            let rate = FUEL_PER_LAP / BASE_LAP_SECS * burn;
            self.fuel = (self.fuel - rate * dt).max(0.0);
        }

        self.lap_elapsed += dt;
        while self.lap_elapsed >= self.lap_target {
            self.lap_elapsed -= self.lap_target;
            self.complete_lap();
        }
    }

    fn complete_lap(&mut self) {
        self.last = self.lap_target;
        if self.best <= 0.0 || self.last < self.best {
            self.best = self.last;
        }
        self.lap += 1;

        for (i, rival) in self.rivals.iter_mut().enumerate() {
            let time = rival.pace + LAP_JITTER_SECS * wander(self.lap, 0.9 + i as f32 * 0.4);
            if rival.best <= 0.0 || time < rival.best {
                rival.best = time;
            }
        }

        for (i, tire) in self.tires.iter_mut().enumerate() {
            // Outside edges of the front tires go first
            let front = if i < 2 { 1.0 } else { 0.7 };
            tire.left -= TIRE_WEAR_PER_LAP * front * 0.8;
            tire.middle -= TIRE_WEAR_PER_LAP * front * 0.6;
            tire.right -= TIRE_WEAR_PER_LAP * front;
        }

        if self.pit_requested {
            self.pit_requested = false;
            self.pit_timer = PIT_STOP_SECS;
            self.fuel = TANK_CAPACITY;
            self.tires = [TireWear::NEW; 4];
        }

        let pace = BASE_LAP_SECS + LAP_JITTER_SECS * wander(self.lap, 1.7);
        self.lap_target = if self.caution { pace * CAUTION_LAP_FACTOR } else { pace };
    }

    /// Toggle a full-course caution. Returns the new state.
    pub fn toggle_caution(&mut self) -> bool {
        self.caution = !self.caution;
        if self.caution {
            // Cautions here always start with contact involving the local car
            self.incidents += 1;
        }
        self.caution
    }

    /// Toggle a pit request (fuel fill plus four tires). Returns the new state.
    pub fn toggle_pit_request(&mut self) -> bool {
        self.pit_requested = !self.pit_requested;
        self.pit_requested
    }

    #[cfg(test)]
    pub const fn lap(&self) -> i32 { self.lap }

    pub fn is_on_pit_road(&self) -> bool { self.pit_timer > 0.0 }

    fn is_finished(&self) -> bool {
        match self.length {
            RaceLength::Laps(n) => self.lap >= n,
            RaceLength::Minutes(_) => self.session_time_remain() <= 0.0,
        }
    }

    fn driver_best_rank(&self) -> i32 {
        if self.best <= 0.0 {
            return 0;
        }
        let faster = self.rivals.iter().filter(|r| r.best > 0.0 && r.best < self.best).count();
        faster as i32 + 1
    }
}

impl Telemetry for SimTelemetry {
    fn driver_car_idx(&self) -> usize { DRIVER_CAR_IDX }

    fn car_count(&self) -> usize { 2 + self.rivals.len() }

    fn car(
        &self,
        idx: usize,
    ) -> Option<CarEntry<'_>> {
        let (user_name, is_pace_car) = match idx {
            0 => (PACE_CAR_NAME, true),
            DRIVER_CAR_IDX => (DRIVER_NAME, false),
            _ => (self.rivals.get(idx - 2)?.name, false),
        };
        Some(CarEntry {
            user_name,
            is_pace_car,
            is_spectator: false,
        })
    }

    fn car_lap(
        &self,
        idx: usize,
    ) -> i32 {
        if idx == 0 || self.is_pre_start() { 0 } else { self.lap }
    }

    fn car_best_lap_time(
        &self,
        idx: usize,
    ) -> f32 {
        match idx {
            0 => 0.0,
            DRIVER_CAR_IDX => self.best,
            _ => self.rivals.get(idx - 2).map_or(0.0, |r| r.best),
        }
    }

    fn car_on_pit_road(
        &self,
        idx: usize,
    ) -> bool {
        idx == DRIVER_CAR_IDX && self.is_on_pit_road()
    }

    fn position(
        &self,
        idx: usize,
    ) -> i32 {
        if idx == DRIVER_CAR_IDX { self.driver_best_rank() } else { 0 }
    }

    fn best_lap_time(&self) -> f32 { self.best }

    fn last_lap_time(&self) -> f32 { self.last }

    fn fuel_level(&self) -> f32 { self.fuel }

    fn fuel_level_pct(&self) -> f32 { self.fuel / TANK_CAPACITY }

    fn tire_wear(
        &self,
        corner: TireCorner,
    ) -> TireWear {
        let i = match corner {
            TireCorner::LeftFront => 0,
            TireCorner::RightFront => 1,
            TireCorner::LeftRear => 2,
            TireCorner::RightRear => 3,
        };
        self.tires[i]
    }

    fn session_flags(&self) -> SessionFlags {
        if self.caution {
            SessionFlags(SessionFlags::YELLOW | SessionFlags::CAUTION_WAVING)
        } else if self.is_finished() {
            SessionFlags(SessionFlags::CHECKERED)
        } else {
            SessionFlags(SessionFlags::GREEN)
        }
    }

    fn session_time(&self) -> f64 { self.session_time }

    fn session_time_remain(&self) -> f64 {
        match self.length {
            RaceLength::Laps(_) => UNLIMITED_TIME_SECS,
            RaceLength::Minutes(m) => (f64::from(m) * 60.0 - self.session_time).max(0.0),
        }
    }

    fn session_laps_total(&self) -> i32 {
        match self.length {
            RaceLength::Laps(n) => n,
            RaceLength::Minutes(_) => UNLIMITED,
        }
    }

    fn session_laps_remain(&self) -> i32 {
        match self.length {
            RaceLength::Laps(n) => (n - self.lap).max(0),
            RaceLength::Minutes(_) => UNLIMITED,
        }
    }

    fn is_pre_start(&self) -> bool { self.session_time < PRE_START_SECS }

    fn incident_count(&self) -> i32 { self.incidents }

    fn brake_bias(&self) -> f32 { BRAKE_BIAS }

    fn pit_service_fuel(&self) -> f32 { (TANK_CAPACITY - self.fuel).max(0.0) }

    fn fuel_fill_requested(&self) -> bool { self.pit_requested }

    fn left_tire_change_requested(&self) -> bool { self.pit_requested }

    fn right_tire_change_requested(&self) -> bool { self.pit_requested }

    fn display_units(&self) -> DisplayUnits { self.units }

    fn estimated_lap_time(&self) -> f32 { BASE_LAP_SECS }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use ray_common::session::fastest_lap_car;

    use super::*;

    const STEP: f32 = 0.05;

    fn run(
        sim: &mut SimTelemetry,
        secs: f32,
    ) {
        let steps = (secs / STEP).round() as u32;
        for _ in 0..steps {
            sim.advance(STEP);
        }
    }

    fn timed() -> SimTelemetry { SimTelemetry::new(RaceLength::Minutes(20), DisplayUnits::Metric) }

    #[test]
    fn test_pre_start_holds_lap_zero() {
        let mut sim = timed();
        run(&mut sim, 2.0);
        assert!(sim.is_pre_start());
        assert_eq!(sim.car_lap(DRIVER_CAR_IDX), 0);
        assert!((sim.fuel_level() - START_FUEL).abs() < f32::EPSILON);
    }

    #[test]
    fn test_first_lap_completes_at_reference_pace() {
        let mut sim = timed();
        run(&mut sim, PRE_START_SECS as f32 + BASE_LAP_SECS + 0.5);
        assert_eq!(sim.lap(), 1);
        assert!((sim.last_lap_time() - BASE_LAP_SECS).abs() < 0.01);
        assert!((sim.best_lap_time() - sim.last_lap_time()).abs() < f32::EPSILON);
        assert!(sim.position(DRIVER_CAR_IDX) > 0);
    }

    #[test]
    fn test_fuel_burns_one_lap_worth() {
        let mut sim = timed();
        run(&mut sim, PRE_START_SECS as f32 + BASE_LAP_SECS);
        let used = START_FUEL - sim.fuel_level();
        assert!((used - FUEL_PER_LAP).abs() < 0.05, "used {used}");
    }

    #[test]
    fn test_timed_race_reports_unlimited_laps() {
        let mut sim = timed();
        run(&mut sim, 60.0);
        assert_eq!(sim.session_laps_total(), UNLIMITED);
        assert_eq!(sim.session_laps_remain(), UNLIMITED);
        assert!((sim.session_time_remain() - 1140.0).abs() < 0.1);
    }

    #[test]
    fn test_lap_race_counts_down() {
        let mut sim = SimTelemetry::new(RaceLength::Laps(10), DisplayUnits::Metric);
        assert_eq!(sim.session_laps_total(), 10);
        assert!(sim.session_time_remain() > 172_800.0);
        run(&mut sim, PRE_START_SECS as f32 + BASE_LAP_SECS + 0.5);
        assert_eq!(sim.session_laps_remain(), 9);
    }

    #[test]
    fn test_pit_stop_refuels_and_changes_tires() {
        let mut sim = timed();
        run(&mut sim, PRE_START_SECS as f32 + 10.0);
        assert!(sim.toggle_pit_request());
        assert!(sim.fuel_fill_requested());
        assert!(sim.left_tire_change_requested() && sim.right_tire_change_requested());

        run(&mut sim, BASE_LAP_SECS);
        assert_eq!(sim.lap(), 1);
        assert!(sim.car_on_pit_road(DRIVER_CAR_IDX));
        assert!((sim.fuel_level() - TANK_CAPACITY).abs() < f32::EPSILON);
        assert_eq!(sim.tire_wear(TireCorner::LeftFront), TireWear::NEW);
        assert!(!sim.fuel_fill_requested());

        run(&mut sim, PIT_STOP_SECS + 1.0);
        assert!(!sim.car_on_pit_road(DRIVER_CAR_IDX));
    }

    #[test]
    fn test_caution_flags_invalidate_fuel() {
        let mut sim = timed();
        assert!(!sim.session_flags().invalidates_fuel_lap());
        assert!(sim.toggle_caution());
        assert!(sim.session_flags().invalidates_fuel_lap());
        assert_eq!(sim.incident_count(), 1);
        assert!(!sim.toggle_caution());
    }

    #[test]
    fn test_tires_wear_per_lap() {
        let mut sim = timed();
        run(&mut sim, PRE_START_SECS as f32 + BASE_LAP_SECS + 0.5);
        let lf = sim.tire_wear(TireCorner::LeftFront).percent_remaining();
        let lr = sim.tire_wear(TireCorner::LeftRear).percent_remaining();
        assert!(lf < 100.0);
        assert!(lr > lf);
    }

    #[test]
    fn test_roster_excludes_pace_car_from_fastest() {
        let mut sim = timed();
        assert!(sim.car(0).is_some_and(|c| c.is_pace_car));
        assert!(sim.car(DRIVER_CAR_IDX).is_some_and(|c| c.is_competitor()));
        assert!(sim.car(sim.car_count()).is_none());

        run(&mut sim, PRE_START_SECS as f32 + BASE_LAP_SECS + 0.5);
        let fastest = fastest_lap_car(&sim);
        assert!(fastest.is_some_and(|idx| idx != 0));
    }

    #[test]
    fn test_new_session_resets_race() {
        let mut sim = SimTelemetry::new(RaceLength::Laps(5), DisplayUnits::Imperial);
        run(&mut sim, PRE_START_SECS as f32 + BASE_LAP_SECS + 0.5);
        sim.toggle_pit_request();
        sim.new_session();
        assert_eq!(sim.lap(), 0);
        assert!(!sim.fuel_fill_requested());
        assert!((sim.fuel_level() - START_FUEL).abs() < f32::EPSILON);
        assert_eq!(sim.session_laps_total(), 5);
        assert_eq!(sim.display_units(), DisplayUnits::Imperial);
    }
}
