//! Centralized constants for sentinels, timing windows and unit factors.
//!
//! All values are compile-time constants with validation assertions, so a
//! mis-ordered window fails the build instead of blinking wrongly on track.

// =============================================================================
// Telemetry Sentinels
// =============================================================================

/// Telemetry's reserved "unlimited/unknown" value for lap and time counts.
pub const UNLIMITED: i32 = 32767;

/// Remaining session time below which a lap-unlimited session counts as
/// time-limited (48 hours, in seconds).
pub const TIME_LIMITED_MAX_SECS: f64 = 48.0 * 3600.0;

// =============================================================================
// Best-Lap Blink
// =============================================================================

/// How long after a lap change an improved best lap keeps blinking.
pub const BLINK_WINDOW_MS: u32 = 5000;

/// Full blink cycle length.
pub const BLINK_PERIOD_MS: u32 = 800;

/// Portion of each blink cycle during which the highlight is visible.
pub const BLINK_VISIBLE_MS: u32 = 500;

const _: () = assert!(BLINK_VISIBLE_MS < BLINK_PERIOD_MS);
const _: () = assert!(BLINK_PERIOD_MS < BLINK_WINDOW_MS);

// =============================================================================
// Fuel
// =============================================================================

/// Hard capacity of the rolling fuel history. The configured averaging
/// window is clamped to this.
pub const FUEL_HISTORY_CAPACITY: usize = 32;

/// Default number of green laps averaged for fuel use.
pub const DEFAULT_FUEL_AVG_LAPS: usize = 4;

/// Default safety factor applied to the average per-lap consumption.
pub const DEFAULT_FUEL_ESTIMATE_FACTOR: f32 = 1.1;

/// Fuel level fraction below which the fuel bar turns to the warning colour.
pub const FUEL_LOW_PCT: f32 = 0.1;

/// Litres to US gallons.
pub const LITERS_TO_GALLONS: f32 = 0.264_172;

const _: () = assert!(DEFAULT_FUEL_AVG_LAPS <= FUEL_HISTORY_CAPACITY);

// =============================================================================
// Panel Geometry
// =============================================================================

/// Default panel size in logical units.
pub const DEFAULT_PANEL_WIDTH: u32 = 600;
pub const DEFAULT_PANEL_HEIGHT: u32 = 150;

/// Default border between boxes and around the panel edge.
pub const DEFAULT_BORDER_SIZE: i32 = 20;

/// Horizontal text inset inside the fuel box.
pub const FUEL_TEXT_INSET: f32 = 7.0;

/// Horizontal gap either side of the tire box centre line.
pub const TIRE_COLUMN_GAP: f32 = 20.0;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::assertions_on_constants)] // Mirrors the compile-time checks above
mod tests {
    use super::*;

    #[test]
    fn test_blink_timing_ordering() {
        assert!(BLINK_VISIBLE_MS < BLINK_PERIOD_MS);
        assert!(BLINK_PERIOD_MS < BLINK_WINDOW_MS);
        assert_eq!(BLINK_PERIOD_MS - BLINK_VISIBLE_MS, 300);
    }

    #[test]
    fn test_time_limited_bound_is_48_hours() {
        assert!((TIME_LIMITED_MAX_SECS - 172_800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gallon_conversion() {
        let gallons = 10.0 * LITERS_TO_GALLONS;
        assert!((gallons - 2.641_72).abs() < 1e-4);
    }

    #[test]
    fn test_fuel_window_fits_capacity() {
        assert!(DEFAULT_FUEL_AVG_LAPS <= FUEL_HISTORY_CAPACITY);
        assert!(DEFAULT_FUEL_ESTIMATE_FACTOR >= 1.0);
    }
}
