//! Telemetry provider seam.
//!
//! The panel never acquires telemetry itself. A host implements [`Telemetry`]
//! over whatever the simulator exposes (shared memory, a replay file, a fake
//! signal generator) and the panel polls it once per frame.

/// Driver units preference as reported by the simulator.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum DisplayUnits {
    #[default]
    Metric,
    Imperial,
}

impl DisplayUnits {
    /// Decode the raw telemetry value, where `0` means imperial.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        if raw == 0 { Self::Imperial } else { Self::Metric }
    }

    #[inline]
    pub const fn is_imperial(self) -> bool { matches!(self, Self::Imperial) }
}

/// One of the four tire positions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TireCorner {
    LeftFront,
    RightFront,
    LeftRear,
    RightRear,
}

impl TireCorner {
    pub const ALL: [Self; 4] = [Self::LeftFront, Self::RightFront, Self::LeftRear, Self::RightRear];
}

/// Remaining tread at three points across one tire, as fractions of new.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TireWear {
    pub left: f32,
    pub middle: f32,
    pub right: f32,
}

impl TireWear {
    pub const NEW: Self = Self {
        left: 1.0,
        middle: 1.0,
        right: 1.0,
    };

    /// Worst point across the tread, as a percentage.
    #[inline]
    pub fn percent_remaining(self) -> f32 { 100.0 * self.left.min(self.middle).min(self.right) }
}

/// Roster entry for one car slot.
#[derive(Clone, Copy, Debug)]
pub struct CarEntry<'a> {
    pub user_name: &'a str,
    pub is_pace_car: bool,
    pub is_spectator: bool,
}

impl CarEntry<'_> {
    /// Whether this slot holds a real competitor.
    #[inline]
    pub fn is_competitor(&self) -> bool { !self.is_pace_car && !self.is_spectator && !self.user_name.is_empty() }
}

// =============================================================================
// Session Flags
// =============================================================================

/// Session flag bitmask, using the simulator SDK's bit values.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct SessionFlags(pub u32);

impl SessionFlags {
    pub const CHECKERED: u32 = 0x0000_0001;
    pub const WHITE: u32 = 0x0000_0002;
    pub const GREEN: u32 = 0x0000_0004;
    pub const YELLOW: u32 = 0x0000_0008;
    pub const RED: u32 = 0x0000_0010;
    pub const BLUE: u32 = 0x0000_0020;
    pub const DEBRIS: u32 = 0x0000_0040;
    pub const CROSSED: u32 = 0x0000_0080;
    pub const YELLOW_WAVING: u32 = 0x0000_0100;
    pub const ONE_LAP_TO_GREEN: u32 = 0x0000_0200;
    pub const GREEN_HELD: u32 = 0x0000_0400;
    pub const TEN_TO_GO: u32 = 0x0000_0800;
    pub const FIVE_TO_GO: u32 = 0x0000_1000;
    pub const RANDOM_WAVING: u32 = 0x0000_2000;
    pub const CAUTION: u32 = 0x0000_4000;
    pub const CAUTION_WAVING: u32 = 0x0000_8000;
    pub const BLACK: u32 = 0x0001_0000;
    pub const DISQUALIFY: u32 = 0x0002_0000;
    pub const SERVICIBLE: u32 = 0x0004_0000;
    pub const FURLED: u32 = 0x0008_0000;
    pub const REPAIR: u32 = 0x0010_0000;

    /// Flags under which a lap does not count toward the fuel average.
    pub const FUEL_INVALIDATING: u32 = Self::YELLOW
        | Self::YELLOW_WAVING
        | Self::RED
        | Self::CHECKERED
        | Self::CROSSED
        | Self::ONE_LAP_TO_GREEN
        | Self::CAUTION
        | Self::CAUTION_WAVING
        | Self::DISQUALIFY
        | Self::REPAIR;

    #[inline]
    pub const fn contains_any(
        self,
        mask: u32,
    ) -> bool {
        self.0 & mask != 0
    }

    /// Whether the current lap must be excluded from fuel averaging.
    #[inline]
    pub const fn invalidates_fuel_lap(self) -> bool { self.contains_any(Self::FUEL_INVALIDATING) }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// Read-only telemetry and session data, polled every frame.
///
/// Values follow the simulator's conventions: times are seconds, fuel is
/// litres, `UNLIMITED` (32767) marks unknown lap counts, and non-positive lap
/// times mean "no time set".
pub trait Telemetry {
    /// Car index of the local driver.
    fn driver_car_idx(&self) -> usize;

    /// Number of car slots in the roster.
    fn car_count(&self) -> usize;

    /// Roster entry for a car slot, `None` if the slot is empty.
    fn car(
        &self,
        idx: usize,
    ) -> Option<CarEntry<'_>>;

    /// Lap counter for a car. May be negative before the car takes the track.
    fn car_lap(
        &self,
        idx: usize,
    ) -> i32;

    fn car_best_lap_time(
        &self,
        idx: usize,
    ) -> f32;

    fn car_on_pit_road(
        &self,
        idx: usize,
    ) -> bool;

    /// Race position, `0` when unknown.
    fn position(
        &self,
        idx: usize,
    ) -> i32;

    fn best_lap_time(&self) -> f32;
    fn last_lap_time(&self) -> f32;

    fn fuel_level(&self) -> f32;

    /// Fuel level as a fraction of tank capacity.
    fn fuel_level_pct(&self) -> f32;

    fn tire_wear(
        &self,
        corner: TireCorner,
    ) -> TireWear;

    fn session_flags(&self) -> SessionFlags;

    /// Elapsed session time in seconds.
    fn session_time(&self) -> f64;
    fn session_time_remain(&self) -> f64;
    fn session_laps_total(&self) -> i32;
    fn session_laps_remain(&self) -> i32;

    /// Whether the session has not truly started yet (grid, formation).
    fn is_pre_start(&self) -> bool;

    fn incident_count(&self) -> i32;
    fn brake_bias(&self) -> f32;

    /// Fuel the pit crew will add at the next stop.
    fn pit_service_fuel(&self) -> f32;
    fn fuel_fill_requested(&self) -> bool;
    fn left_tire_change_requested(&self) -> bool;
    fn right_tire_change_requested(&self) -> bool;

    fn display_units(&self) -> DisplayUnits;

    /// Estimated lap time for the local car, in seconds.
    fn estimated_lap_time(&self) -> f32;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_units_decode() {
        assert_eq!(DisplayUnits::from_raw(0), DisplayUnits::Imperial);
        assert_eq!(DisplayUnits::from_raw(1), DisplayUnits::Metric);
        assert!(DisplayUnits::Imperial.is_imperial());
        assert!(!DisplayUnits::default().is_imperial());
    }

    #[test]
    fn test_tire_wear_uses_worst_point() {
        let wear = TireWear {
            left: 0.93,
            middle: 0.874,
            right: 0.91,
        };
        assert!((wear.percent_remaining() - 87.4).abs() < 0.01);
        assert!((TireWear::NEW.percent_remaining() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fuel_invalidating_flags() {
        for bit in [
            SessionFlags::YELLOW,
            SessionFlags::YELLOW_WAVING,
            SessionFlags::RED,
            SessionFlags::CHECKERED,
            SessionFlags::CROSSED,
            SessionFlags::ONE_LAP_TO_GREEN,
            SessionFlags::CAUTION,
            SessionFlags::CAUTION_WAVING,
            SessionFlags::DISQUALIFY,
            SessionFlags::REPAIR,
        ] {
            assert!(SessionFlags(bit).invalidates_fuel_lap(), "bit {bit:#x} should invalidate");
        }
    }

    #[test]
    fn test_green_running_flags_do_not_invalidate() {
        let flags = SessionFlags(SessionFlags::GREEN | SessionFlags::BLUE | SessionFlags::SERVICIBLE);
        assert!(!flags.invalidates_fuel_lap());
        assert!(!SessionFlags::default().invalidates_fuel_lap());
    }

    #[test]
    fn test_car_entry_competitor() {
        let driver = CarEntry {
            user_name: "A. Driver",
            is_pace_car: false,
            is_spectator: false,
        };
        assert!(driver.is_competitor());

        let pace = CarEntry { is_pace_car: true, ..driver };
        assert!(!pace.is_competitor());

        let spectator = CarEntry { is_spectator: true, ..driver };
        assert!(!spectator.is_competitor());

        let unnamed = CarEntry { user_name: "", ..driver };
        assert!(!unnamed.is_competitor());
    }
}
