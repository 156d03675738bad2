//! Time calculation utilities for scroll animations
//!
//! Timestamps are frame times in milliseconds from an arbitrary origin,
//! the way `performance.now()` reports them, so the math stays independent
//! of any real clock.

/// Calculate animation progress (0.0 to 1.0)
///
/// # Arguments
/// * `start` - Animation start timestamp (ms)
/// * `now` - Current frame timestamp (ms)
/// * `duration` - Total animation duration (ms)
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(start: f64, now: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    ((now - start) / duration).clamp(0.0, 1.0)
}

/// Check if animation is complete
#[inline]
pub fn is_complete(start: f64, now: f64, duration: f64) -> bool {
    progress(start, now, duration) >= 1.0
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
