//! Scroll configuration helpers
//!
//! Re-exports the scroll section of the crate configuration and adds
//! conversions used by the animator.

pub use crate::config::ScrollConfig;

/// Extension trait for ScrollConfig with utility methods
pub trait ScrollConfigExt {
    /// Anchor navigation duration in milliseconds as a float
    fn anchor_duration(&self) -> f64;

    /// Fallback duration in milliseconds as a float
    fn default_duration(&self) -> f64;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn anchor_duration(&self) -> f64 {
        self.anchor_duration_ms as f64
    }

    #[inline]
    fn default_duration(&self) -> f64 {
        self.default_duration_ms as f64
    }
}
