//! Text formatting for every value the panel shows.
//!
//! All helpers return a fixed-capacity [`Text`]; nothing here allocates.
//! Missing values degrade to a placeholder (`-` or `--`) instead of an error.

use core::fmt::Write;

use heapless::String;

use crate::session::RemainingLaps;
use crate::telemetry::DisplayUnits;
use crate::thresholds::{LITERS_TO_GALLONS, UNLIMITED};

/// Formatted text fragment. Long enough for any value the panel renders.
pub type Text = String<24>;

/// Placeholder for a single missing value.
pub const MISSING: &str = "-";

/// Placeholder for an unknown count.
pub const UNKNOWN: &str = "--";

fn text(s: &str) -> Text {
    let mut t = Text::new();
    let _ = t.push_str(s);
    t
}

/// Round to the nearest integer, ties away from zero.
#[inline]
pub fn round_half_away(v: f32) -> i32 {
    if v >= 0.0 { (v + 0.5) as i32 } else { (v - 0.5) as i32 }
}

// =============================================================================
// Clocks
// =============================================================================

/// Session clock: `H:MM:SS` from one hour up, `MM:SS` below.
///
/// Fractional seconds are truncated; negative input shows as zero.
pub fn clock(secs: f64) -> Text {
    let total = if secs > 0.0 { secs as u64 } else { 0 };
    let hours = total / 3600;
    let mins = (total / 60) % 60;
    let s = total % 60;

    let mut t = Text::new();
    if hours > 0 {
        let _ = write!(t, "{hours}:{mins:02}:{s:02}");
    } else {
        let _ = write!(t, "{mins:02}:{s:02}");
    }
    t
}

/// Lap time in the session clock layout, e.g. `01:32` or `1:02:03`.
///
/// Non-positive times mean no lap was set and render as `-`.
pub fn lap_time(secs: f32) -> Text {
    // Negated so NaN also counts as unset
    if !(secs > 0.0) {
        return text(MISSING);
    }
    clock(f64::from(secs))
}

// =============================================================================
// Fuel
// =============================================================================

/// Convert litres for display in the driver's preferred units.
#[inline]
pub fn fuel_in_units(
    litres: f32,
    units: DisplayUnits,
) -> f32 {
    if units.is_imperial() { litres * LITERS_TO_GALLONS } else { litres }
}

/// Fuel quantity with unit suffix: `12.34 lt` or `3.26 gl`.
pub fn fuel_quantity(
    litres: f32,
    units: DisplayUnits,
    decimals: usize,
) -> Text {
    let value = fuel_in_units(litres, units);
    let unit = if units.is_imperial() { "gl" } else { "lt" };
    let mut t = Text::new();
    let _ = write!(t, "{value:.decimals$} {unit}");
    t
}

/// Laps of fuel left: one decimal under 10 laps, whole laps otherwise.
pub fn estimated_laps(laps: f32) -> Text {
    let mut t = Text::new();
    if laps < 10.0 {
        let _ = write!(t, "{laps:.1}");
    } else {
        let _ = write!(t, "{laps:.0}");
    }
    t
}

// =============================================================================
// Counters
// =============================================================================

/// Lap counter line, `"{current} / {total}"`, with `--` for an unlimited total.
pub fn lap_counter(
    current: i32,
    total: i32,
) -> Text {
    let mut t = Text::new();
    if total == UNLIMITED {
        let _ = write!(t, "{current} / {UNKNOWN}");
    } else {
        let _ = write!(t, "{current} / {total}");
    }
    t
}

/// Laps to go: `~N` when estimated from the clock, `N` when reported.
pub fn remaining_laps(laps: RemainingLaps) -> Text {
    let mut t = Text::new();
    match laps {
        RemainingLaps::Unknown => {
            let _ = t.push_str(UNKNOWN);
        }
        RemainingLaps::Estimated(n) => {
            let _ = write!(t, "~{n}");
        }
        RemainingLaps::Reported(n) => {
            let _ = write!(t, "{n}");
        }
    }
    t
}

/// Race position, `P{n}`, or `-` when unknown.
pub fn position(pos: i32) -> Text {
    if pos == 0 {
        return text(MISSING);
    }
    let mut t = Text::new();
    let _ = write!(t, "P{pos}");
    t
}

/// Incident count, `{n}x`.
pub fn incidents(count: i32) -> Text {
    let mut t = Text::new();
    let _ = write!(t, "{count}x");
    t
}

/// Tire tread remaining as a whole percentage.
pub fn tire_percent(pct: f32) -> Text {
    let mut t = Text::new();
    let _ = write!(t, "{}", round_half_away(pct));
    t
}

/// Brake bias with a forced sign and one decimal, e.g. `+0.4`.
pub fn brake_bias(bias: f32) -> Text {
    let tenths = round_half_away(bias * 10.0);
    let mut t = Text::new();
    let _ = write!(t, "{:+.1}", tenths as f32 / 10.0);
    t
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_under_an_hour() {
        assert_eq!(clock(0.0).as_str(), "00:00");
        assert_eq!(clock(59.9).as_str(), "00:59");
        assert_eq!(clock(754.2).as_str(), "12:34");
    }

    #[test]
    fn test_clock_with_hours() {
        assert_eq!(clock(3600.0).as_str(), "1:00:00");
        assert_eq!(clock(3723.0).as_str(), "1:02:03");
        assert_eq!(clock(36_000.0).as_str(), "10:00:00");
    }

    #[test]
    fn test_clock_negative_is_zero() {
        assert_eq!(clock(-5.0).as_str(), "00:00");
    }

    #[test]
    fn test_lap_time() {
        assert_eq!(lap_time(92.456).as_str(), "01:32");
        assert_eq!(lap_time(59.0).as_str(), "00:59");
        assert_eq!(lap_time(3723.456).as_str(), "1:02:03");
        assert_eq!(lap_time(92.456).as_str(), clock(92.456).as_str());
    }

    #[test]
    fn test_lap_time_unset() {
        assert_eq!(lap_time(0.0).as_str(), "-");
        assert_eq!(lap_time(-1.0).as_str(), "-");
        assert_eq!(lap_time(f32::NAN).as_str(), "-");
    }

    #[test]
    fn test_fuel_quantity_metric() {
        assert_eq!(fuel_quantity(12.345, DisplayUnits::Metric, 2).as_str(), "12.35 lt");
        assert_eq!(fuel_quantity(3.0, DisplayUnits::Metric, 1).as_str(), "3.0 lt");
    }

    #[test]
    fn test_fuel_quantity_imperial() {
        assert_eq!(fuel_quantity(10.0, DisplayUnits::Imperial, 2).as_str(), "2.64 gl");
        assert_eq!(fuel_quantity(10.0, DisplayUnits::Imperial, 1).as_str(), "2.6 gl");
    }

    #[test]
    fn test_estimated_laps_precision() {
        assert_eq!(estimated_laps(4.56).as_str(), "4.6");
        assert_eq!(estimated_laps(9.94).as_str(), "9.9");
        assert_eq!(estimated_laps(12.4).as_str(), "12");
    }

    #[test]
    fn test_lap_counter() {
        assert_eq!(lap_counter(3, 20).as_str(), "3 / 20");
        assert_eq!(lap_counter(0, UNLIMITED).as_str(), "0 / --");
    }

    #[test]
    fn test_remaining_laps() {
        assert_eq!(remaining_laps(RemainingLaps::Estimated(12)).as_str(), "~12");
        assert_eq!(remaining_laps(RemainingLaps::Reported(7)).as_str(), "7");
        assert_eq!(remaining_laps(RemainingLaps::Unknown).as_str(), "--");
    }

    #[test]
    fn test_position_and_incidents() {
        assert_eq!(position(3).as_str(), "P3");
        assert_eq!(position(0).as_str(), "-");
        assert_eq!(incidents(0).as_str(), "0x");
        assert_eq!(incidents(17).as_str(), "17x");
    }

    #[test]
    fn test_tire_percent_rounds() {
        assert_eq!(tire_percent(87.4).as_str(), "87");
        assert_eq!(tire_percent(87.5).as_str(), "88");
        assert_eq!(tire_percent(100.0).as_str(), "100");
    }

    #[test]
    fn test_brake_bias_rounds_half_away_from_zero() {
        assert_eq!(brake_bias(0.35).as_str(), "+0.4");
        assert_eq!(brake_bias(56.3).as_str(), "+56.3");
        assert_eq!(brake_bias(-1.25).as_str(), "-1.3");
        assert_eq!(brake_bias(0.0).as_str(), "+0.0");
    }

    #[test]
    fn test_round_half_away() {
        assert_eq!(round_half_away(2.5), 3);
        assert_eq!(round_half_away(-2.5), -3);
        assert_eq!(round_half_away(2.4), 2);
    }
}
