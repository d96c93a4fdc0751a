//! Drawing helpers for the panel.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb565>` for platform independence.

mod primitives;

pub use primitives::{Align, draw_box_background, draw_level_bar, draw_outlines, draw_text, fill_rect};
