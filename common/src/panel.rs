//! The Ray panel and its lifecycle hooks.
//!
//! # Frame Sequence
//!
//! Every [`RayPanel::on_update`] call:
//!
//! 1. Resolves configuration, colours and fonts fresh from the store.
//! 2. Reads the session snapshot and detects lap changes.
//! 3. Runs fuel bookkeeping (sample on lap change, validity every frame).
//! 4. Fills the panel background.
//! 5. Draws each box: Laps, Pos, Best, Last, Fuel, Tires, Session, Inc, Bias.
//! 6. Strokes the combined box outlines.
//!
//! Nothing is drawn while the panel is disabled or before the first layout.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::colors::FUEL_BAR_TRACK;
use crate::config::{ConfigSource, RayConfig};
use crate::format;
use crate::fuel::{self, FinishStatus, FuelTracker, LapSample};
use crate::layout::{PanelBox, RayLayout};
use crate::session::{self, LapTracker, SessionSnapshot};
use crate::styles::FontSet;
use crate::telemetry::{DisplayUnits, Telemetry, TireCorner};
use crate::thresholds::{DEFAULT_PANEL_HEIGHT, DEFAULT_PANEL_WIDTH, FUEL_LOW_PCT, FUEL_TEXT_INSET, TIRE_COLUMN_GAP};
use crate::trace::DebugLog;
use crate::widgets::{Align, draw_box_background, draw_level_bar, draw_outlines, draw_text, fill_rect};

// =============================================================================
// Resolved Pens
// =============================================================================

/// Palette converted to display colours for one frame.
#[derive(Clone, Copy, Debug)]
struct Pens {
    outline: Rgb565,
    text: Rgb565,
    good: Rgb565,
    fastest: Rgb565,
    service: Rgb565,
    warn: Rgb565,
    normal: Rgb565,
    background: Rgb565,
    bar_track: Rgb565,
}

impl Pens {
    fn new(cfg: &RayConfig) -> Self {
        let p = &cfg.palette;
        Self {
            outline: p.outline.to_rgb565(),
            text: p.text.to_rgb565(),
            good: p.good.to_rgb565(),
            fastest: p.fastest.to_rgb565(),
            service: p.service.to_rgb565(),
            warn: p.warn.to_rgb565(),
            normal: p.normal.to_rgb565(),
            background: p.background.to_rgb565(),
            bar_track: FUEL_BAR_TRACK.to_rgb565(),
        }
    }
}

// =============================================================================
// Frame Values
// =============================================================================

/// Best-lap box state after blink and fastest-lap resolution.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BestLapHighlight {
    /// No best lap, or hidden by the blink.
    Off,
    /// Personal best on display.
    Good,
    /// Personal best that is also the fastest lap of the session.
    Fastest,
}

/// Everything one frame draws, read from telemetry after bookkeeping.
#[derive(Clone, Copy, Debug)]
struct FrameValues {
    session: SessionSnapshot,
    position: i32,
    best_lap: f32,
    best_highlight: BestLapHighlight,
    last_lap: f32,
    fuel_now: f32,
    fuel_pct: f32,
    fuel_avg: f32,
    fuel_per_lap: f32,
    pit_fuel: f32,
    fill_requested: bool,
    units: DisplayUnits,
    tires: [f32; 4],
    left_change: bool,
    right_change: bool,
    incidents: i32,
    brake_bias: f32,
}

// =============================================================================
// Panel
// =============================================================================

/// Heads-up panel showing laps, position, lap times, fuel, tires, session
/// clock, incidents and brake bias.
#[derive(Clone, Debug)]
pub struct RayPanel {
    enabled: bool,
    size: Size,
    layout: Option<RayLayout>,
    laps: LapTracker,
    fuel: FuelTracker,
    log: DebugLog,
}

impl Default for RayPanel {
    fn default() -> Self { Self::new() }
}

impl RayPanel {
    pub const fn new() -> Self {
        Self {
            enabled: false,
            size: Self::default_size(),
            layout: None,
            laps: LapTracker::new(),
            fuel: FuelTracker::new(),
            log: DebugLog::new(),
        }
    }

    /// Size the host should give the panel when none is configured.
    pub const fn default_size() -> Size { Size::new(DEFAULT_PANEL_WIDTH, DEFAULT_PANEL_HEIGHT) }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    pub fn on_enable<C: ConfigSource + ?Sized>(
        &mut self,
        config: &C,
        size: Size,
    ) {
        self.enabled = true;
        self.log.push("enabled");
        self.on_config_changed(config, size);
    }

    /// Stop drawing and release the layout. Lap and fuel history survive.
    pub fn on_disable(&mut self) {
        self.enabled = false;
        self.layout = None;
        self.log.push("disabled");
    }

    /// Rebuild the layout for `size` and the configured border.
    ///
    /// The size is always remembered; the layout itself only exists while
    /// the panel is enabled.
    pub fn on_config_changed<C: ConfigSource + ?Sized>(
        &mut self,
        config: &C,
        size: Size,
    ) {
        self.size = size;
        if !self.enabled {
            return;
        }
        let cfg = RayConfig::load(config);
        self.layout = Some(RayLayout::compute(size.width, size.height, cfg.border_size));
        self.log.push_fmt(format_args!(
            "layout {}x{} border {}",
            size.width, size.height, cfg.border_size
        ));
    }

    /// A new session started. Only the running fuel lap is discarded.
    pub fn on_session_changed(&mut self) {
        self.fuel.invalidate();
        self.log.push("session changed, fuel lap invalidated");
    }

    /// Run per-frame bookkeeping and draw one frame.
    pub fn on_update<D, T, C>(
        &mut self,
        display: &mut D,
        telemetry: &T,
        config: &C,
        now_ms: u32,
    ) where
        D: DrawTarget<Color = Rgb565>,
        T: Telemetry + ?Sized,
        C: ConfigSource + ?Sized,
    {
        if !self.enabled {
            return;
        }
        let Some(layout) = self.layout.as_ref() else {
            return;
        };

        let cfg = RayConfig::load(config);
        let pens = Pens::new(&cfg);
        let fonts = FontSet::new(cfg.font, cfg.font_size, cfg.font_weight);

        let values = track_frame(
            &mut self.laps,
            &mut self.fuel,
            &mut self.log,
            telemetry,
            &cfg,
            now_ms,
        );

        fill_rect(display, layout.background, pens.background);
        draw_laps(display, &layout.laps, &pens, &fonts, &values);
        draw_position(display, &layout.pos, &pens, &fonts, &values);
        draw_best(display, &layout.best, &pens, &fonts, &values);
        draw_last(display, &layout.last, &pens, &fonts, &values);
        draw_fuel(display, &layout.fuel, &pens, &fonts, &values);
        draw_tires(display, &layout.tires, &pens, &fonts, &values);
        draw_session(display, &layout.session, &pens, &fonts, &values);
        draw_incidents(display, &layout.inc, &pens, &fonts, &values);
        draw_bias(display, &layout.bias, &pens, &fonts, &values);
        draw_outlines(display, &layout.outlines, pens.outline);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub const fn is_enabled(&self) -> bool { self.enabled }

    #[inline]
    pub const fn size(&self) -> Size { self.size }

    #[inline]
    pub const fn layout(&self) -> Option<&RayLayout> { self.layout.as_ref() }

    #[inline]
    pub const fn fuel(&self) -> &FuelTracker { &self.fuel }

    #[inline]
    pub const fn laps(&self) -> &LapTracker { &self.laps }

    /// Trace lines queued since the last drain.
    #[inline]
    pub fn log_mut(&mut self) -> &mut DebugLog { &mut self.log }
}

// =============================================================================
// Bookkeeping
// =============================================================================

/// Advance lap and fuel state for this frame and collect the values to draw.
fn track_frame<T: Telemetry + ?Sized>(
    laps: &mut LapTracker,
    fuel_tracker: &mut FuelTracker,
    log: &mut DebugLog,
    t: &T,
    cfg: &RayConfig,
    now_ms: u32,
) -> FrameValues {
    let idx = t.driver_car_idx();
    let snapshot = SessionSnapshot::read(t);
    let fuel_now = t.fuel_level();

    if laps.update(snapshot.current_lap, now_ms) {
        log.push_fmt(format_args!("lap {}", snapshot.current_lap));
        match fuel_tracker.on_lap_change(fuel_now, cfg.fuel_avg_laps) {
            LapSample::Accepted(used) => log.push_fmt(format_args!(
                "fuel sample {used:.2} kept, avg {:.2} over {}",
                fuel_tracker.average(),
                fuel_tracker.len()
            )),
            LapSample::Rejected(used) => log.push_fmt(format_args!("fuel sample {used:.2} skipped")),
        }
    }

    if fuel_tracker.update_validity(t.session_flags(), t.car_on_pit_road(idx)) {
        log.push_fmt(format_args!(
            "fuel lap {} invalidated, flags {:#x}",
            snapshot.current_lap,
            t.session_flags().0
        ));
    }

    let best_lap = t.best_lap_time();
    let best_highlight = if best_lap > 0.0 {
        if laps.best_lap_visible(best_lap, now_ms) {
            if session::fastest_lap_car(t) == Some(idx) {
                BestLapHighlight::Fastest
            } else {
                BestLapHighlight::Good
            }
        } else {
            BestLapHighlight::Off
        }
    } else {
        BestLapHighlight::Off
    };

    let fuel_avg = fuel_tracker.average();

    FrameValues {
        session: snapshot,
        position: t.position(idx),
        best_lap,
        best_highlight,
        last_lap: t.last_lap_time(),
        fuel_now,
        fuel_pct: t.fuel_level_pct(),
        fuel_avg,
        fuel_per_lap: fuel_avg * cfg.fuel_estimate_factor,
        pit_fuel: t.pit_service_fuel(),
        fill_requested: t.fuel_fill_requested(),
        units: t.display_units(),
        tires: TireCorner::ALL.map(|c| t.tire_wear(c).percent_remaining()),
        left_change: t.left_tire_change_requested(),
        right_change: t.right_tire_change_requested(),
        incidents: t.incident_count(),
        brake_bias: t.brake_bias(),
    }
}

// =============================================================================
// Boxes
// =============================================================================

fn draw_laps<D>(
    display: &mut D,
    b: &PanelBox,
    pens: &Pens,
    fonts: &FontSet,
    v: &FrameValues,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if b.is_empty() {
        return;
    }
    draw_box_background(display, b, pens.normal);

    let counter = format::lap_counter(v.session.current_lap, v.session.laps_total);
    draw_text(display, &counter, fonts.text, pens.text, b.x0, b.x1, b.line_y(0.275), Align::Center);

    let to_go = format::remaining_laps(v.session.remaining);
    draw_text(display, &to_go, fonts.large, pens.text, b.x0, b.x1, b.line_y(0.6), Align::Center);
    draw_text(display, "TO GO", fonts.very_small, pens.text, b.x0, b.x1, b.line_y(0.8), Align::Center);
}

fn draw_position<D>(
    display: &mut D,
    b: &PanelBox,
    pens: &Pens,
    fonts: &FontSet,
    v: &FrameValues,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if b.is_empty() {
        return;
    }
    draw_box_background(display, b, pens.normal);
    let pos = format::position(v.position);
    draw_text(display, &pos, fonts.large, pens.text, b.x0, b.x1, b.line_y(0.5), Align::Center);
}

fn draw_best<D>(
    display: &mut D,
    b: &PanelBox,
    pens: &Pens,
    fonts: &FontSet,
    v: &FrameValues,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if b.is_empty() {
        return;
    }
    let bg = match v.best_highlight {
        BestLapHighlight::Off => pens.normal,
        BestLapHighlight::Good => pens.good,
        BestLapHighlight::Fastest => pens.fastest,
    };
    draw_lap_time_box(display, b, "Best", v.best_lap, bg, pens, fonts);
}

fn draw_last<D>(
    display: &mut D,
    b: &PanelBox,
    pens: &Pens,
    fonts: &FontSet,
    v: &FrameValues,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if b.is_empty() {
        return;
    }
    draw_lap_time_box(display, b, "Last", v.last_lap, pens.normal, pens, fonts);
}

fn draw_lap_time_box<D>(
    display: &mut D,
    b: &PanelBox,
    label: &str,
    secs: f32,
    bg: Rgb565,
    pens: &Pens,
    fonts: &FontSet,
) where
    D: DrawTarget<Color = Rgb565>,
{
    draw_box_background(display, b, bg);
    draw_text(display, label, fonts.small, pens.text, b.x0, b.x1, b.line_y(0.25), Align::Center);
    let time = format::lap_time(secs);
    draw_text(display, &time, fonts.bold, pens.text, b.x0, b.x1, b.line_y(0.7), Align::Center);
}

fn draw_fuel<D>(
    display: &mut D,
    b: &PanelBox,
    pens: &Pens,
    fonts: &FontSet,
    v: &FrameValues,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if b.is_empty() {
        return;
    }
    draw_box_background(display, b, pens.normal);

    let left = b.x0 + FUEL_TEXT_INSET;
    let right = b.x1 - FUEL_TEXT_INSET;

    let bar_fill = if v.fuel_pct < FUEL_LOW_PCT { pens.warn } else { pens.good };
    draw_level_bar(
        display,
        left,
        right,
        b.y0 + 12.0,
        b.line_y(0.125),
        v.fuel_pct,
        pens.bar_track,
        bar_fill,
    );

    let laps_y = b.line_y(3.0 / 12.0);
    let rem_y = b.line_y(5.5 / 12.0);
    let per_y = b.line_y(7.25 / 12.0);
    let fin_y = b.line_y(9.0 / 12.0);
    let add_y = b.line_y(10.75 / 12.0);

    draw_text(display, "Laps", fonts.text, pens.text, left, b.x1, laps_y, Align::Leading);
    for (label, y) in [("Rem", rem_y), ("Per", per_y), ("Fin+", fin_y), ("Add", add_y)] {
        draw_text(display, label, fonts.small, pens.text, left, b.x1, y, Align::Leading);
    }

    if let Some(laps) = fuel::estimated_laps(v.fuel_now, v.fuel_per_lap) {
        let s = format::estimated_laps(laps);
        draw_text(display, &s, fonts.large, pens.text, b.x0, right, laps_y, Align::Trailing);
    }

    if v.fuel_now >= 0.0 {
        let s = format::fuel_quantity(v.fuel_now, v.units, 2);
        draw_text(display, &s, fonts.small2, pens.text, b.x0, right, rem_y, Align::Trailing);
    }

    if v.fuel_avg > 0.0 {
        let s = format::fuel_quantity(v.fuel_avg, v.units, 2);
        draw_text(display, &s, fonts.small2, pens.text, b.x0, right, per_y, Align::Trailing);
    }

    if let Some(to_finish) = fuel::fuel_to_finish(v.session.remaining, v.fuel_per_lap, v.fuel_now) {
        let color = match fuel::finish_status(to_finish, v.pit_fuel, v.fill_requested) {
            FinishStatus::Short => pens.warn,
            FinishStatus::Covered => pens.good,
        };
        let s = format::fuel_quantity(to_finish, v.units, 1);
        draw_text(display, &s, fonts.small2, color, b.x0, right, fin_y, Align::Trailing);
    }

    if v.pit_fuel >= 0.0 {
        let color = if v.fill_requested { pens.service } else { pens.text };
        let s = format::fuel_quantity(v.pit_fuel, v.units, 1);
        draw_text(display, &s, fonts.small2, color, b.x0, right, add_y, Align::Trailing);
    }
}

fn draw_tires<D>(
    display: &mut D,
    b: &PanelBox,
    pens: &Pens,
    fonts: &FontSet,
    v: &FrameValues,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if b.is_empty() {
        return;
    }
    draw_box_background(display, b, pens.normal);

    let [lf, rf, lr, rr] = v.tires;
    let mid = b.x0 + b.w / 2.0;
    let top = b.line_y(0.3);
    let bottom = b.line_y(0.7);

    let left_pen = if v.left_change { pens.service } else { pens.text };
    let left_x1 = mid - TIRE_COLUMN_GAP;
    draw_text(display, &format::tire_percent(lf), fonts.small, left_pen, b.x0, left_x1, top, Align::Center);
    draw_text(display, &format::tire_percent(lr), fonts.small, left_pen, b.x0, left_x1, bottom, Align::Center);

    let right_pen = if v.right_change { pens.service } else { pens.text };
    let right_x0 = mid + TIRE_COLUMN_GAP;
    draw_text(display, &format::tire_percent(rf), fonts.small, right_pen, right_x0, b.x1, top, Align::Center);
    draw_text(display, &format::tire_percent(rr), fonts.small, right_pen, right_x0, b.x1, bottom, Align::Center);

    draw_text(display, "Tires", fonts.small, pens.text, b.x0, b.x1, b.line_y(0.45), Align::Center);
}

fn draw_session<D>(
    display: &mut D,
    b: &PanelBox,
    pens: &Pens,
    fonts: &FontSet,
    v: &FrameValues,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if b.is_empty() {
        return;
    }
    draw_box_background(display, b, pens.normal);
    draw_text(display, "Session", fonts.small, pens.text, b.x0, b.x1, b.line_y(0.25), Align::Center);
    let clock = format::clock(v.session.clock_secs);
    draw_text(display, &clock, fonts.text, pens.text, b.x0, b.x1, b.line_y(0.7), Align::Center);
}

fn draw_incidents<D>(
    display: &mut D,
    b: &PanelBox,
    pens: &Pens,
    fonts: &FontSet,
    v: &FrameValues,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if b.is_empty() {
        return;
    }
    draw_box_background(display, b, pens.normal);
    let s = format::incidents(v.incidents);
    draw_text(display, &s, fonts.bold, pens.text, b.x0, b.x1, b.line_y(0.5), Align::Center);
}

fn draw_bias<D>(
    display: &mut D,
    b: &PanelBox,
    pens: &Pens,
    fonts: &FontSet,
    v: &FrameValues,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if b.is_empty() {
        return;
    }
    draw_box_background(display, b, pens.normal);
    let s = format::brake_bias(v.brake_bias);
    draw_text(display, &s, fonts.bold, pens.text, b.x0, b.x1, b.line_y(0.5), Align::Center);
}

// =============================================================================
// Unit Tests
// =============================================================================
