//! Low-level drawing primitives shared by the panel's boxes.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::layout::{PanelBox, rect_from_edges};
use crate::styles::{CENTERED, LEADING, TRAILING};

/// Horizontal placement of a text fragment between two x bounds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Align {
    Center,
    /// Starts at the left bound.
    Leading,
    /// Ends at the right bound.
    Trailing,
}

/// Fill a rectangle. Empty rectangles draw nothing.
pub fn fill_rect<D>(
    display: &mut D,
    rect: Rectangle,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if rect.is_zero_sized() {
        return;
    }
    rect.into_styled(PrimitiveStyle::with_fill(color)).draw(display).ok();
}

/// Fill a box's background.
pub fn draw_box_background<D>(
    display: &mut D,
    b: &PanelBox,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    fill_rect(display, b.to_rectangle(), color);
}

/// Stroke a set of box outlines with a 1px line.
pub fn draw_outlines<D>(
    display: &mut D,
    outlines: &[Rectangle],
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyle::with_stroke(color, 1);
    for rect in outlines.iter().copied() {
        rect.into_styled(style).draw(display).ok();
    }
}

/// Horizontal level bar: a track across the full width and a fill over
/// `fraction` of it, from the left.
#[allow(clippy::too_many_arguments)]
pub fn draw_level_bar<D>(
    display: &mut D,
    x0: f32,
    x1: f32,
    y0: f32,
    y1: f32,
    fraction: f32,
    track: Rgb565,
    fill: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    fill_rect(display, rect_from_edges(x0, y0, x1, y1), track);
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    fill_rect(display, rect_from_edges(x0, y0, x0 + fraction * (x1 - x0), y1), fill);
}

/// Draw one text fragment vertically centred on `y`, placed between `x0`
/// and `x1` according to `align`.
#[allow(clippy::too_many_arguments)]
pub fn draw_text<D>(
    display: &mut D,
    text: &str,
    font: &MonoFont<'_>,
    color: Rgb565,
    x0: f32,
    x1: f32,
    y: f32,
    align: Align,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let (x, text_style) = match align {
        Align::Center => ((x0 + x1) / 2.0, CENTERED),
        Align::Leading => (x0, LEADING),
        Align::Trailing => (x1, TRAILING),
    };
    let pos = Point::new(x as i32, y as i32);
    Text::with_text_style(text, pos, MonoTextStyle::new(font, color), text_style)
        .draw(display)
        .ok();
}
