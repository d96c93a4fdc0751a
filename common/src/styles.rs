//! Font selection and pre-computed text alignment styles.
//!
//! # Font Roles
//!
//! The panel draws text in six roles, each a fixed multiple of the configured
//! `font_size`:
//!
//! | Role         | Scale | Weight  | Used for                               |
//! |--------------|-------|---------|----------------------------------------|
//! | `text`       | 1.0   | regular | lap counter, session clock, fuel "Laps" |
//! | `bold`       | 1.0   | bold    | lap times, incidents, brake bias       |
//! | `large`      | 1.2   | bold    | position, laps to go, fuel laps        |
//! | `small`      | 0.7   | light   | box labels, tire wear                  |
//! | `small2`     | 0.8   | bold    | fuel quantities                        |
//! | `very_small` | 0.6   | light   | "TO GO"                                |
//!
//! Mono fonts come in fixed pixel sizes, so each role picks the font of the
//! configured family whose glyph height is closest to the requested size.
//! `ProFont` has no bold cut; bold roles fall back to the regular face.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::ascii::{
    FONT_5X8,
    FONT_6X10,
    FONT_6X13,
    FONT_6X13_BOLD,
    FONT_7X14,
    FONT_7X14_BOLD,
    FONT_8X13,
    FONT_9X15,
    FONT_9X15_BOLD,
    FONT_9X18,
    FONT_9X18_BOLD,
    FONT_10X20,
};
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::{
    PROFONT_7_POINT,
    PROFONT_9_POINT,
    PROFONT_10_POINT,
    PROFONT_12_POINT,
    PROFONT_14_POINT,
    PROFONT_18_POINT,
    PROFONT_24_POINT,
};

// =============================================================================
// Text Alignment Styles (const - zero runtime cost)
// =============================================================================

/// Centred horizontally, vertically centred on the anchor line.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

/// Starts at the anchor, vertically centred on the anchor line.
pub const LEADING: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Middle)
    .build();

/// Ends at the anchor, vertically centred on the anchor line.
pub const TRAILING: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Middle)
    .build();

// =============================================================================
// Font Families
// =============================================================================

const PROFONT_FACES: [&MonoFont<'static>; 7] = [
    &PROFONT_7_POINT,
    &PROFONT_9_POINT,
    &PROFONT_10_POINT,
    &PROFONT_12_POINT,
    &PROFONT_14_POINT,
    &PROFONT_18_POINT,
    &PROFONT_24_POINT,
];

const MONO_FACES: [&MonoFont<'static>; 8] = [
    &FONT_5X8,
    &FONT_6X10,
    &FONT_6X13,
    &FONT_7X14,
    &FONT_8X13,
    &FONT_9X15,
    &FONT_9X18,
    &FONT_10X20,
];

const MONO_BOLD_FACES: [&MonoFont<'static>; 4] = [&FONT_6X13_BOLD, &FONT_7X14_BOLD, &FONT_9X15_BOLD, &FONT_9X18_BOLD];

/// Weight at or above which every role uses a bold face where one exists.
const HEAVY_WEIGHT: i32 = 600;

/// Configured font family.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum FontFamily {
    #[default]
    ProFont,
    /// The `embedded-graphics` built-in ASCII fonts.
    Mono,
}

impl FontFamily {
    /// Map a configured family name. Unknown names fall back to `ProFont`.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("mono") || name.eq_ignore_ascii_case("ascii") {
            Self::Mono
        } else {
            Self::ProFont
        }
    }

    const fn faces(
        self,
        bold: bool,
    ) -> &'static [&'static MonoFont<'static>] {
        match (self, bold) {
            (Self::ProFont, _) => &PROFONT_FACES,
            (Self::Mono, false) => &MONO_FACES,
            (Self::Mono, true) => &MONO_BOLD_FACES,
        }
    }

    /// Face whose glyph height is closest to `px`.
    pub fn nearest(
        self,
        px: f32,
        bold: bool,
    ) -> &'static MonoFont<'static> {
        let faces = self.faces(bold);
        let mut best = faces[0];
        let mut best_diff = f32::MAX;
        for &face in faces {
            let diff = (face.character_size.height as f32 - px).abs();
            if diff < best_diff {
                best = face;
                best_diff = diff;
            }
        }
        best
    }
}

// =============================================================================
// Font Set
// =============================================================================

/// One face per text role, resolved from family, size and weight.
#[derive(Clone, Copy, Debug)]
pub struct FontSet {
    pub text: &'static MonoFont<'static>,
    pub bold: &'static MonoFont<'static>,
    pub large: &'static MonoFont<'static>,
    pub small: &'static MonoFont<'static>,
    pub small2: &'static MonoFont<'static>,
    pub very_small: &'static MonoFont<'static>,
}

impl FontSet {
    pub fn new(
        family: FontFamily,
        size: f32,
        weight: i32,
    ) -> Self {
        let heavy = weight >= HEAVY_WEIGHT;
        Self {
            text: family.nearest(size, heavy),
            bold: family.nearest(size, true),
            large: family.nearest(size * 1.2, true),
            small: family.nearest(size * 0.7, heavy),
            small2: family.nearest(size * 0.8, true),
            very_small: family.nearest(size * 0.6, heavy),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
