//! Frame pacing for the desktop host.

use std::time::Duration;

/// Target frame time (~50 FPS). The main loop sleeps if the frame completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// Sleep out the rest of the frame that started at `frame_start`.
pub fn pace_frame(frame_start: std::time::Instant) {
    if let Some(rest) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
        std::thread::sleep(rest);
    }
}
