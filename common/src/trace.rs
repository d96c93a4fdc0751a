//! Debug trace ring buffer.
//!
//! The panel runs without `std`, so it cannot log directly. Trace lines are
//! queued here and the host drains them into its own logger once per frame.
//!
//! # Usage
//!
//! ```ignore
//! let mut log = DebugLog::new();
//! log.push("fuel lap invalidated");
//! log.push_fmt(format_args!("lap {} -> {}", 3, 4));
//!
//! while let Some(line) = log.pop() {
//!     tracing::debug!("{line}");
//! }
//! ```

use core::fmt::{self, Write};

use heapless::{Deque, String};

// =============================================================================
// Debug Log Configuration
// =============================================================================

/// Maximum number of lines kept between drains.
pub const LOG_BUFFER_SIZE: usize = 16;

/// Maximum characters per line.
pub const LOG_LINE_LENGTH: usize = 64;

/// One trace line.
pub type LogLine = String<LOG_LINE_LENGTH>;

// =============================================================================
// Debug Log Ring Buffer
// =============================================================================

/// Ring buffer for trace lines.
///
/// Holds the last `LOG_BUFFER_SIZE` lines. When full, the oldest line is
/// dropped to make room.
#[derive(Clone, Debug, Default)]
pub struct DebugLog {
    buffer: Deque<LogLine, LOG_BUFFER_SIZE>,
}

impl DebugLog {
    pub const fn new() -> Self { Self { buffer: Deque::new() } }

    /// Push a line. Text past the line capacity is cut off.
    pub fn push(
        &mut self,
        msg: &str,
    ) {
        self.push_fmt(format_args!("{msg}"));
    }

    /// Push a formatted line. Output past the line capacity is cut off.
    pub fn push_fmt(
        &mut self,
        args: fmt::Arguments<'_>,
    ) {
        let mut line = Truncating(LogLine::new());
        let _ = line.write_fmt(args);
        self.push_line(line.0);
    }

    fn push_line(
        &mut self,
        line: LogLine,
    ) {
        if self.buffer.is_full() {
            let _ = self.buffer.pop_front();
        }
        let _ = self.buffer.push_back(line);
    }

    /// Take the oldest line.
    #[inline]
    pub fn pop(&mut self) -> Option<LogLine> { self.buffer.pop_front() }

    /// Iterate over lines (oldest first) without draining.
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.buffer.iter().map(LogLine::as_str) }

    #[inline]
    pub fn len(&self) -> usize { self.buffer.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    pub fn clear(&mut self) { self.buffer.clear(); }
}

/// Writer that keeps what fits and silently drops the rest.
struct Truncating(LogLine);

impl Write for Truncating {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_log_push_and_pop() {
        let mut log = DebugLog::new();
        assert!(log.is_empty());

        log.push("first");
        log.push("second");
        assert_eq!(log.len(), 2);

        assert_eq!(log.pop().as_deref(), Some("first"));
        assert_eq!(log.pop().as_deref(), Some("second"));
        assert!(log.pop().is_none());
    }

    #[test]
    fn test_debug_log_ring_buffer() {
        let mut log = DebugLog::new();
        for i in 0..LOG_BUFFER_SIZE {
            log.push_fmt(format_args!("{i}"));
        }
        assert_eq!(log.len(), LOG_BUFFER_SIZE);

        // One more drops the oldest
        log.push("new");
        assert_eq!(log.len(), LOG_BUFFER_SIZE);
        assert_eq!(log.iter().next(), Some("1"));
        assert_eq!(log.iter().last(), Some("new"));
    }

    #[test]
    fn test_debug_log_truncation() {
        let mut log = DebugLog::new();
        let long_msg = "x".repeat(LOG_LINE_LENGTH * 2);
        log.push(&long_msg);
        log.push_fmt(format_args!("{long_msg}"));

        for line in log.iter() {
            assert!(line.len() <= LOG_LINE_LENGTH);
            assert!(!line.is_empty());
        }
    }

    #[test]
    fn test_push_fmt() {
        let mut log = DebugLog::new();
        log.push_fmt(format_args!("lap {} used {:.2}", 4, 2.345_f32));
        assert_eq!(log.iter().next(), Some("lap 4 used 2.35"));
    }

    #[test]
    fn test_clear() {
        let mut log = DebugLog::new();
        log.push("a");
        log.clear();
        assert!(log.is_empty());
    }
}
