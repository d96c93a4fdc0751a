//! Ray overlay panel for a racing-simulation telemetry dashboard.
//!
//! This crate contains the platform-agnostic panel renderer and the logic that
//! feeds it. A host supplies the drawing surface, the telemetry feed and the
//! configuration store; the panel supplies layout, bookkeeping and pixels:
//!
//! - [`colors`]: RGBA configuration colours and their RGB565 conversion
//! - [`config`]: Configuration lookup trait and the panel's resolved options
//! - [`layout`]: Box grid geometry and background/outline paths
//! - [`session`]: Lap counting, remaining-laps estimation, best-lap blink
//! - [`fuel`]: Rolling per-lap fuel consumption and fuel-to-finish math
//! - [`format`]: Clock, lap time, fuel and bias text formatting
//! - [`styles`]: Font selection and text alignment styles
//! - [`telemetry`]: Telemetry provider trait and session flag bits
//! - [`thresholds`]: Sentinels, timing windows and unit factors
//! - [`trace`]: Debug trace ring buffer drained by the host
//! - [`panel`]: The panel itself and its lifecycle hooks
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` outside of tests and never allocates. Text goes
//! through `heapless::String`, history through `heapless::Deque`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod config;
pub mod format;
pub mod fuel;
pub mod layout;
pub mod panel;
pub mod session;
pub mod styles;
pub mod telemetry;
pub mod thresholds;
pub mod trace;
pub mod widgets;

// Re-export commonly used items
pub use colors::Rgba;
pub use config::{ConfigSource, DefaultConfig, PANEL_NAME, RayConfig};
pub use layout::{PanelBox, RayLayout};
pub use panel::RayPanel;
pub use telemetry::{CarEntry, DisplayUnits, SessionFlags, Telemetry, TireCorner, TireWear};
