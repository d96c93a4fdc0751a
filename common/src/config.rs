//! Panel configuration.
//!
//! The host owns configuration storage. The panel only needs typed lookups
//! keyed by panel name and option name, each with a hardcoded default, so the
//! store is abstracted behind [`ConfigSource`]. Options are resolved into a
//! [`RayConfig`] fresh on every layout pass and every frame; nothing is cached
//! between calls, so the last value written to the store always wins.

use crate::colors::Rgba;
use crate::styles::FontFamily;
use crate::thresholds::{
    DEFAULT_BORDER_SIZE,
    DEFAULT_FUEL_AVG_LAPS,
    DEFAULT_FUEL_ESTIMATE_FACTOR,
    FUEL_HISTORY_CAPACITY,
};

/// Configuration section name for this panel.
pub const PANEL_NAME: &str = "OverlayRay";

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_FONT: &str = "ProFont";
pub const DEFAULT_FONT_SIZE: f32 = 17.0;
pub const DEFAULT_FONT_WEIGHT: i32 = 500;

pub const DEFAULT_OUTLINE_COL: Rgba = Rgba::new(0.7, 0.7, 0.7, 0.9);
pub const DEFAULT_TEXT_COL: Rgba = Rgba::new(1.0, 1.0, 1.0, 0.9);
pub const DEFAULT_GOOD_COL: Rgba = Rgba::new(0.0, 0.8, 0.0, 0.6);
pub const DEFAULT_BAD_COL: Rgba = Rgba::new(0.8, 0.1, 0.1, 0.6);
pub const DEFAULT_FASTEST_COL: Rgba = Rgba::new(0.8, 0.0, 0.8, 0.6);
pub const DEFAULT_SERVICE_COL: Rgba = Rgba::new(0.36, 0.61, 0.84, 1.0);
pub const DEFAULT_WARN_COL: Rgba = Rgba::new(1.0, 0.6, 0.0, 1.0);
pub const DEFAULT_NORMAL_COL: Rgba = Rgba::new(0.125, 0.125, 0.125, 1.0);
pub const DEFAULT_BACKGROUND_COL: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.9);

// =============================================================================
// Lookup Trait
// =============================================================================

/// Typed configuration lookups keyed by `panel` + `key`.
///
/// Implementations return `default` for missing or wrongly typed entries.
pub trait ConfigSource {
    fn get_string<'a>(
        &'a self,
        panel: &str,
        key: &str,
        default: &'a str,
    ) -> &'a str;

    fn get_float(
        &self,
        panel: &str,
        key: &str,
        default: f32,
    ) -> f32;

    fn get_int(
        &self,
        panel: &str,
        key: &str,
        default: i32,
    ) -> i32;

    fn get_color(
        &self,
        panel: &str,
        key: &str,
        default: Rgba,
    ) -> Rgba;
}

/// A store with nothing in it: every lookup yields its default.
#[derive(Clone, Copy, Default, Debug)]
pub struct DefaultConfig;

impl ConfigSource for DefaultConfig {
    fn get_string<'a>(
        &'a self,
        _panel: &str,
        _key: &str,
        default: &'a str,
    ) -> &'a str {
        default
    }

    fn get_float(
        &self,
        _panel: &str,
        _key: &str,
        default: f32,
    ) -> f32 {
        default
    }

    fn get_int(
        &self,
        _panel: &str,
        _key: &str,
        default: i32,
    ) -> i32 {
        default
    }

    fn get_color(
        &self,
        _panel: &str,
        _key: &str,
        default: Rgba,
    ) -> Rgba {
        default
    }
}

// =============================================================================
// Resolved Options
// =============================================================================

/// Named colours used by the panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub outline: Rgba,
    pub text: Rgba,
    pub good: Rgba,
    pub bad: Rgba,
    pub fastest: Rgba,
    pub service: Rgba,
    pub warn: Rgba,
    pub normal: Rgba,
    pub background: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            outline: DEFAULT_OUTLINE_COL,
            text: DEFAULT_TEXT_COL,
            good: DEFAULT_GOOD_COL,
            bad: DEFAULT_BAD_COL,
            fastest: DEFAULT_FASTEST_COL,
            service: DEFAULT_SERVICE_COL,
            warn: DEFAULT_WARN_COL,
            normal: DEFAULT_NORMAL_COL,
            background: DEFAULT_BACKGROUND_COL,
        }
    }
}

/// Every option the panel reads, resolved against a [`ConfigSource`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayConfig {
    pub font: FontFamily,
    pub font_size: f32,
    pub font_weight: i32,
    pub border_size: i32,
    pub palette: Palette,
    /// Safety margin applied to the average per-lap fuel use.
    pub fuel_estimate_factor: f32,
    /// Green laps kept in the rolling fuel average, `0..=FUEL_HISTORY_CAPACITY`.
    /// Zero keeps no history, so no fuel estimates are shown.
    pub fuel_avg_laps: usize,
}

impl Default for RayConfig {
    fn default() -> Self { Self::load(&DefaultConfig) }
}

impl RayConfig {
    /// Resolve all options for the Ray panel.
    pub fn load<C: ConfigSource + ?Sized>(cfg: &C) -> Self {
        let p = PANEL_NAME;
        let palette = Palette {
            outline: cfg.get_color(p, "outline_col", DEFAULT_OUTLINE_COL),
            text: cfg.get_color(p, "text_col", DEFAULT_TEXT_COL),
            good: cfg.get_color(p, "good_col", DEFAULT_GOOD_COL),
            bad: cfg.get_color(p, "bad_col", DEFAULT_BAD_COL),
            fastest: cfg.get_color(p, "fastest_col", DEFAULT_FASTEST_COL),
            service: cfg.get_color(p, "service_col", DEFAULT_SERVICE_COL),
            warn: cfg.get_color(p, "warn_col", DEFAULT_WARN_COL),
            normal: cfg.get_color(p, "normal_col", DEFAULT_NORMAL_COL),
            background: cfg.get_color(p, "background_col", DEFAULT_BACKGROUND_COL),
        };

        let avg_laps = cfg.get_int(p, "fuel_estimate_avg_green_laps", DEFAULT_FUEL_AVG_LAPS as i32);

        Self {
            font: FontFamily::from_name(cfg.get_string(p, "font", DEFAULT_FONT)),
            font_size: cfg.get_float(p, "font_size", DEFAULT_FONT_SIZE),
            font_weight: cfg.get_int(p, "font_weight", DEFAULT_FONT_WEIGHT),
            border_size: cfg.get_int(p, "border_size", DEFAULT_BORDER_SIZE),
            palette,
            fuel_estimate_factor: cfg.get_float(p, "fuel_estimate_factor", DEFAULT_FUEL_ESTIMATE_FACTOR),
            fuel_avg_laps: avg_laps.clamp(0, FUEL_HISTORY_CAPACITY as i32) as usize,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Store that overrides a handful of keys and checks the panel name.
    struct Overrides;

    impl ConfigSource for Overrides {
        fn get_string<'a>(
            &'a self,
            panel: &str,
            key: &str,
            default: &'a str,
        ) -> &'a str {
            assert_eq!(panel, PANEL_NAME);
            if key == "font" { "mono" } else { default }
        }

        fn get_float(
            &self,
            _panel: &str,
            key: &str,
            default: f32,
        ) -> f32 {
            if key == "fuel_estimate_factor" { 1.25 } else { default }
        }

        fn get_int(
            &self,
            _panel: &str,
            key: &str,
            default: i32,
        ) -> i32 {
            match key {
                "border_size" => 8,
                "fuel_estimate_avg_green_laps" => 500,
                _ => default,
            }
        }

        fn get_color(
            &self,
            _panel: &str,
            key: &str,
            default: Rgba,
        ) -> Rgba {
            if key == "warn_col" { Rgba::opaque(1.0, 0.0, 0.0) } else { default }
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = RayConfig::default();
        assert_eq!(cfg.font, FontFamily::ProFont);
        assert!((cfg.font_size - 17.0).abs() < f32::EPSILON);
        assert_eq!(cfg.font_weight, 500);
        assert_eq!(cfg.border_size, 20);
        assert!((cfg.fuel_estimate_factor - 1.1).abs() < f32::EPSILON);
        assert_eq!(cfg.fuel_avg_laps, 4);
        assert_eq!(cfg.palette, Palette::default());
    }

    #[test]
    fn test_overrides_are_applied() {
        let cfg = RayConfig::load(&Overrides);
        assert_eq!(cfg.font, FontFamily::Mono);
        assert_eq!(cfg.border_size, 8);
        assert!((cfg.fuel_estimate_factor - 1.25).abs() < f32::EPSILON);
        assert_eq!(cfg.palette.warn, Rgba::opaque(1.0, 0.0, 0.0));
        assert_eq!(cfg.palette.good, DEFAULT_GOOD_COL);
    }

    #[test]
    fn test_avg_laps_clamped_to_capacity() {
        let cfg = RayConfig::load(&Overrides);
        assert_eq!(cfg.fuel_avg_laps, FUEL_HISTORY_CAPACITY);
    }

    /// Store that only sets the fuel averaging window.
    struct AvgLaps(i32);

    impl ConfigSource for AvgLaps {
        fn get_string<'a>(
            &'a self,
            _panel: &str,
            _key: &str,
            default: &'a str,
        ) -> &'a str {
            default
        }

        fn get_float(
            &self,
            _panel: &str,
            _key: &str,
            default: f32,
        ) -> f32 {
            default
        }

        fn get_int(
            &self,
            _panel: &str,
            key: &str,
            default: i32,
        ) -> i32 {
            if key == "fuel_estimate_avg_green_laps" { self.0 } else { default }
        }

        fn get_color(
            &self,
            _panel: &str,
            _key: &str,
            default: Rgba,
        ) -> Rgba {
            default
        }
    }

    #[test]
    fn test_avg_laps_zero_is_kept() {
        assert_eq!(RayConfig::load(&AvgLaps(0)).fuel_avg_laps, 0);
        assert_eq!(RayConfig::load(&AvgLaps(-3)).fuel_avg_laps, 0);
        assert_eq!(RayConfig::load(&AvgLaps(7)).fuel_avg_laps, 7);
    }
}
