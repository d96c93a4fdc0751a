//! Desktop host for the Ray overlay panel.
//!
//! Opens a simulator window, feeds the panel from a scripted race and a TOML
//! configuration file, and forwards the panel's trace lines to `tracing`.
//!
//! # Keys
//!
//! - `R` reload the configuration file
//! - `S` start a new session
//! - `P` toggle a pit request (fuel fill plus four tires)
//! - `Y` toggle a full-course caution
//! - `E` enable or disable the panel

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

mod config;
mod telemetry;
mod timing;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use color_eyre::Result;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use ray_common::colors::{BLACK, WHITE};
use ray_common::styles::CENTERED;
use ray_common::{DisplayUnits, RayPanel};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::TomlConfig;
use crate::telemetry::{RaceLength, SimTelemetry};
use crate::timing::{FRAME_TIME, pace_frame};

#[derive(Parser, Debug)]
#[command(name = "ray-overlay")]
#[command(about = "Ray overlay panel on a simulated race", long_about = None)]
struct Args {
    /// Configuration file, reloaded with R
    #[arg(short, long, default_value = "ray-overlay.toml")]
    config: PathBuf,

    /// Panel width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Panel height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Window pixel scale
    #[arg(long, default_value_t = 2)]
    scale: u32,

    /// Lap-limited race of this many laps
    #[arg(long, conflicts_with = "minutes")]
    laps: Option<i32>,

    /// Time-limited race of this many minutes
    #[arg(long)]
    minutes: Option<u32>,

    /// Report imperial units
    #[arg(long)]
    imperial: bool,
}

impl Args {
    fn race_length(&self) -> RaceLength {
        match (self.laps, self.minutes) {
            (Some(laps), _) => RaceLength::Laps(laps),
            (None, Some(minutes)) => RaceLength::Minutes(minutes),
            (None, None) => RaceLength::default(),
        }
    }

    fn units(&self) -> DisplayUnits {
        if self.imperial { DisplayUnits::Imperial } else { DisplayUnits::Metric }
    }

    fn panel_size(&self) -> Size {
        let default = RayPanel::default_size();
        Size::new(
            self.width.unwrap_or(default.width),
            self.height.unwrap_or(default.height),
        )
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let size = args.panel_size();
    let mut store = TomlConfig::load(args.config.clone())?;
    let mut sim = SimTelemetry::new(args.race_length(), args.units());
    info!(?size, race = ?args.race_length(), units = ?args.units(), "starting");

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(size);
    let output_settings = OutputSettingsBuilder::new().scale(args.scale.max(1)).build();
    let mut window = Window::new("Ray Overlay", &output_settings);

    display.clear(BLACK).ok();
    window.update(&display);

    let mut panel = RayPanel::new();
    panel.on_enable(&store, size);

    let start = Instant::now();
    let mut last_frame = start;

    loop {
        let frame_start = Instant::now();

        // Handle events
        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return Ok(()),
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::R => match store.reload() {
                            Ok(()) => {
                                info!(path = %store.path().display(), "config reloaded");
                                panel.on_config_changed(&store, size);
                            }
                            Err(e) => warn!(error = %e, "config reload failed, keeping previous values"),
                        },
                        Keycode::S => {
                            sim.new_session();
                            panel.on_session_changed();
                            info!("new session");
                        }
                        Keycode::P => {
                            let requested = sim.toggle_pit_request();
                            info!(requested, "pit request");
                        }
                        Keycode::Y => {
                            let caution = sim.toggle_caution();
                            info!(caution, "caution");
                        }
                        Keycode::E => {
                            if panel.is_enabled() {
                                panel.on_disable();
                            } else {
                                panel.on_enable(&store, size);
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let dt = frame_start.duration_since(last_frame).min(FRAME_TIME * 5);
        last_frame = frame_start;
        sim.advance(dt.as_secs_f32());

        display.clear(BLACK).ok();
        let now_ms = start.elapsed().as_millis() as u32;
        panel.on_update(&mut display, &sim, &store, now_ms);
        if !panel.is_enabled() {
            draw_disabled_hint(&mut display, size);
        }

        while let Some(line) = panel.log_mut().pop() {
            debug!(target: "ray", "{line}");
        }

        window.update(&display);
        pace_frame(frame_start);
    }
}

fn draw_disabled_hint<D>(
    display: &mut D,
    size: Size,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let style = MonoTextStyle::new(&profont::PROFONT_12_POINT, WHITE);
    let center = Point::new((size.width / 2) as i32, (size.height / 2) as i32);
    Text::with_text_style("panel disabled (E)", center, style, CENTERED).draw(display).ok();
}
