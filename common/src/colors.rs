//! Colour handling for the Ray panel.
//!
//! # RGBA Configuration Colours
//!
//! Panel colours are configured as RGBA floats in `0.0..=1.0`, the same shape a
//! desktop overlay framework would hand to its brush. The drawing surface is
//! `Rgb565`, which has no alpha channel, so every colour is composited over
//! black before use. That matches how the overlay looks on the host: the panel
//! background is near-black, and every box sits on top of it.
//!
//! ## Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! - Red: 0-31 (5 bits)
//! - Green: 0-63 (6 bits)
//! - Blue: 0-31 (5 bits)

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Pure black (0, 0, 0). Clear colour behind the panel background.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white (31, 63, 31).
pub const WHITE: Rgb565 = Rgb565::WHITE;

// =============================================================================
// RGBA Colour
// =============================================================================

/// Straight (non-premultiplied) RGBA colour with float channels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Create a colour from four channels in `0.0..=1.0`.
    pub const fn new(
        r: f32,
        g: f32,
        b: f32,
        a: f32,
    ) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour.
    pub const fn opaque(
        r: f32,
        g: f32,
        b: f32,
    ) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Composite over black and quantise to RGB565.
    pub fn to_rgb565(self) -> Rgb565 {
        let a = clamp_unit(self.a);
        Rgb565::new(
            quantise(self.r * a, 31),
            quantise(self.g * a, 63),
            quantise(self.b * a, 31),
        )
    }
}

impl From<Rgba> for Rgb565 {
    fn from(c: Rgba) -> Self { c.to_rgb565() }
}

#[inline]
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[inline]
fn quantise(
    v: f32,
    max: u8,
) -> u8 {
    (clamp_unit(v) * f32::from(max) + 0.5) as u8
}

// =============================================================================
// Fixed Colours
// =============================================================================

/// Track behind the fuel-level bar: 50% grey at 50% opacity.
pub const FUEL_BAR_TRACK: Rgba = Rgba::new(0.5, 0.5, 0.5, 0.5);

// =============================================================================
// Tests
// =============================================================================
