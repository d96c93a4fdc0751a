//! Box grid geometry for the Ray panel.
//!
//! The panel is divided into four columns. Widths come from the content width
//! split into sevenths, heights from the content height split into thirds,
//! with the border size subtracted at every gap:
//!
//! ```text
//! +--------+--------+---------+-----+
//! |        | Best   | Session | Pos |
//! |        +--------+---------+-----+
//! |  Fuel  | Last   |         | Bias|
//! |        +--------+   Lap   +-----+
//! |        | Tires  |         | Inc |
//! +--------+--------+---------+-----+
//! ```
//!
//! Geometry is kept in `f32` pixels, exactly as computed, and only rounded to
//! integer rectangles at draw time.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

use crate::format::round_half_away;

/// Number of boxes in the grid.
pub const BOX_COUNT: usize = 9;

// =============================================================================
// Box
// =============================================================================

/// Axis-aligned screen rectangle with a label.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct PanelBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub w: f32,
    pub h: f32,
    pub title: &'static str,
}

impl PanelBox {
    /// The degenerate box. Renders nothing.
    pub const ZERO: Self = Self {
        x0: 0.0,
        y0: 0.0,
        x1: 0.0,
        y1: 0.0,
        w: 0.0,
        h: 0.0,
        title: "",
    };

    /// Build a box from an origin and a size in pixels.
    ///
    /// A non-positive width or height yields [`PanelBox::ZERO`].
    pub fn from_pixels(
        x0: f32,
        w: f32,
        y0: f32,
        h: f32,
        title: &'static str,
    ) -> Self {
        // Negated comparison so NaN also degenerates
        if !(w > 0.0 && h > 0.0) {
            return Self::ZERO;
        }
        let x1 = x0 + w;
        let y1 = y0 + h;
        Self {
            x0,
            y0,
            x1,
            y1,
            w: x1 - x0,
            h: y1 - y0,
            title,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool { self.w <= 0.0 || self.h <= 0.0 }

    /// Absolute y of a line at fraction `f` of the box height.
    #[inline]
    pub fn line_y(
        &self,
        f: f32,
    ) -> f32 {
        self.y0 + self.h * f
    }

    /// Integer pixel rectangle, rounded to the nearest pixel.
    pub fn to_rectangle(&self) -> Rectangle {
        if self.is_empty() {
            return Rectangle::zero();
        }
        rect_from_edges(self.x0, self.y0, self.x1, self.y1)
    }
}

/// Integer rectangle spanning the rounded edges `(x0, y0)-(x1, y1)`.
pub fn rect_from_edges(
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
) -> Rectangle {
    let left = round_half_away(x0);
    let top = round_half_away(y0);
    let right = round_half_away(x1);
    let bottom = round_half_away(y1);
    if right <= left || bottom <= top {
        return Rectangle::zero();
    }
    Rectangle::new(
        Point::new(left, top),
        Size::new((right - left) as u32, (bottom - top) as u32),
    )
}

// =============================================================================
// Layout
// =============================================================================

/// The full box grid plus the two paths built alongside it.
#[derive(Clone, Debug, PartialEq)]
pub struct RayLayout {
    pub width: u32,
    pub height: u32,
    pub fuel: PanelBox,
    pub best: PanelBox,
    pub last: PanelBox,
    pub tires: PanelBox,
    pub session: PanelBox,
    pub laps: PanelBox,
    pub pos: PanelBox,
    pub bias: PanelBox,
    pub inc: PanelBox,
    /// Closed rectangle covering the whole panel.
    pub background: Rectangle,
    /// One closed rectangle per non-degenerate box.
    pub outlines: Vec<Rectangle, BOX_COUNT>,
}

impl RayLayout {
    /// Compute the grid for a panel of `width` x `height` with `border_size`
    /// pixels between boxes.
    pub fn compute(
        width: u32,
        height: u32,
        border_size: i32,
    ) -> Self {
        let border = border_size as f32;
        let box_w = width as f32;
        let box_h = height as f32;
        let content_h = box_h - 2.0 * border;
        let content_w = box_w - 2.0 * border;

        let w1 = content_w / 7.0;
        let w2 = 2.0 * w1 - border;
        let h1 = (content_h - 2.0 * border) / 3.0;
        let h2 = h1 * 2.0 + border;
        let h3 = h1 * 3.0 + 2.0 * border;

        let col1 = box_w / 2.0 - content_w / 2.0;
        let col2 = col1 + w2 + border;
        let col3 = col2 + w2 + border;
        let col4 = col3 + w2 + border;
        let row1 = box_h / 2.0 - content_h / 2.0;
        let row2 = row1 + h1 + border;
        let row3 = row2 + h1 + border;

        let mut layout = Self {
            width,
            height,
            fuel: PanelBox::from_pixels(col1, w2, row1, h3, "Fuel"),
            best: PanelBox::from_pixels(col2, w2, row1, h1, "Best"),
            last: PanelBox::from_pixels(col2, w2, row2, h1, "Last"),
            tires: PanelBox::from_pixels(col2, w2, row3, h1, "Tires"),
            session: PanelBox::from_pixels(col3, w2, row1, h1, "Session"),
            laps: PanelBox::from_pixels(col3, w2, row2, h2, "Lap"),
            pos: PanelBox::from_pixels(col4, w1, row1, h1, "Pos"),
            bias: PanelBox::from_pixels(col4, w1, row2, h1, "Bias"),
            inc: PanelBox::from_pixels(col4, w1, row3, h1, "Inc"),
            background: Rectangle::new(Point::zero(), Size::new(width, height)),
            outlines: Vec::new(),
        };

        for b in layout.boxes() {
            if !b.is_empty() {
                // Capacity equals BOX_COUNT, so this never fails
                let _ = layout.outlines.push(b.to_rectangle());
            }
        }

        layout
    }

    /// All boxes in drawing order.
    pub const fn boxes(&self) -> [PanelBox; BOX_COUNT] {
        [
            self.fuel,
            self.best,
            self.last,
            self.tires,
            self.session,
            self.laps,
            self.pos,
            self.bias,
            self.inc,
        ]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(
        a: f32,
        b: f32,
    ) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_default_panel_geometry() {
        let l = RayLayout::compute(600, 150, 20);

        assert!(approx(l.fuel.x0, 20.0));
        assert!(approx(l.fuel.w, 140.0));
        assert!(approx(l.fuel.y0, 20.0));
        assert!(approx(l.fuel.h, 110.0));

        assert!(approx(l.best.x0, 180.0));
        assert!(approx(l.best.h, 70.0 / 3.0));
        assert!(approx(l.last.y0, 20.0 + 70.0 / 3.0 + 20.0));
        assert!(approx(l.tires.y1, 130.0));

        assert!(approx(l.session.x0, 340.0));
        assert!(approx(l.laps.h, 2.0 * 70.0 / 3.0 + 20.0));
        assert!(approx(l.laps.y1, 130.0));

        assert!(approx(l.pos.x0, 500.0));
        assert!(approx(l.pos.w, 80.0));
        assert!(approx(l.inc.x1, 580.0));
        assert!(approx(l.inc.y1, 130.0));
    }

    #[test]
    fn test_titles() {
        let l = RayLayout::compute(600, 150, 20);
        let titles = l.boxes().map(|b| b.title);
        assert_eq!(
            titles,
            ["Fuel", "Best", "Last", "Tires", "Session", "Lap", "Pos", "Bias", "Inc"]
        );
    }

    #[test]
    fn test_paths_cover_panel_and_boxes() {
        let l = RayLayout::compute(600, 150, 20);
        assert_eq!(l.background, Rectangle::new(Point::zero(), Size::new(600, 150)));
        assert_eq!(l.outlines.len(), BOX_COUNT);
        assert_eq!(l.outlines[0], Rectangle::new(Point::new(20, 20), Size::new(140, 110)));
    }

    #[test]
    fn test_boxes_do_not_overlap_columns() {
        let l = RayLayout::compute(600, 150, 20);
        assert!(l.fuel.x1 <= l.best.x0);
        assert!(l.best.x1 <= l.session.x0);
        assert!(l.session.x1 <= l.pos.x0);
        assert!(l.best.y1 <= l.last.y0);
        assert!(l.last.y1 <= l.tires.y0);
        assert!(l.session.y1 <= l.laps.y0);
    }

    #[test]
    fn test_non_positive_content_degenerates() {
        // Content height 150 - 2*80 < 0
        let l = RayLayout::compute(600, 150, 80);
        for b in l.boxes() {
            assert_eq!(b, PanelBox::ZERO);
            assert_eq!(b.to_rectangle(), Rectangle::zero());
        }
        assert!(l.outlines.is_empty());
    }

    #[test]
    fn test_degenerate_sweep_never_panics() {
        for border in [-10, 0, 1, 20, 37, 75, 150, 400, i32::MAX / 4] {
            for (w, h) in [(0, 0), (1, 1), (600, 150), (10, 600), (600, 10), (7, 3)] {
                let l = RayLayout::compute(w, h, border);
                for b in l.boxes() {
                    if b.is_empty() {
                        assert_eq!(b, PanelBox::ZERO);
                    } else {
                        assert!(b.w > 0.0 && b.h > 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_narrow_panel_keeps_only_rows_that_fit() {
        // Height fits, but 2*w1 - border <= 0 collapses the wide columns
        let l = RayLayout::compute(100, 150, 20);
        assert!(l.fuel.is_empty());
        assert!(l.best.is_empty());
        assert!(!l.pos.is_empty());
        assert_eq!(l.outlines.len(), 3);
    }

    #[test]
    fn test_from_pixels_rejects_nan() {
        assert_eq!(PanelBox::from_pixels(0.0, f32::NAN, 0.0, 10.0, "x"), PanelBox::ZERO);
    }

    #[test]
    fn test_line_y() {
        let b = PanelBox::from_pixels(10.0, 100.0, 20.0, 40.0, "t");
        assert!(approx(b.line_y(0.0), 20.0));
        assert!(approx(b.line_y(0.5), 40.0));
        assert!(approx(b.line_y(1.0), 60.0));
    }
}
