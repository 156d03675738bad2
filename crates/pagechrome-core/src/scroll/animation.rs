//! Scroll animation controller
//!
//! Combines the timing utilities into a per-frame driver for the viewport
//! scroll offset. The host calls [`ScrollAnimator::step`] once per display
//! refresh while [`ScrollAnimator::is_animating`] holds.

use tracing::debug;

use super::config::ScrollConfig;
use super::timing::{is_complete, lerp, progress};
use crate::dom::Viewport;

/// One linear scroll from a start offset to a target offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    /// Scroll offset when the animation was requested
    pub from: f64,
    /// Target scroll offset
    pub to: f64,
    /// Frame timestamp when the animation was requested (ms)
    pub start: f64,
    /// Animation duration (ms)
    pub duration: f64,
}

impl ScrollAnimation {
    /// Progress fraction at `now`, clamped to [0, 1]
    #[inline]
    pub fn progress(&self, now: f64) -> f64 {
        progress(self.start, now, self.duration)
    }

    /// Scroll offset the animation prescribes at `now`
    #[inline]
    pub fn sample(&self, now: f64) -> f64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        lerp(self.from, self.to, t)
    }

    #[inline]
    pub fn is_finished(&self, now: f64) -> bool {
        is_complete(self.start, now, self.duration)
    }
}

/// How a scroll request was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStart {
    /// The offset was written immediately, no frames will follow
    Jumped,
    /// An animation was started and needs frames
    Animating,
}

/// Scroll animation controller
///
/// Holds at most one in-flight animation. A new request replaces the
/// running one, so two navigations never fight over the scroll offset.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    /// Current active animation (if any)
    animation: Option<ScrollAnimation>,
    /// Honor the platform reduced-motion preference
    respect_reduced_motion: bool,
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(&ScrollConfig::default())
    }
}

impl ScrollAnimator {
    /// Create a new scroll animator with configuration
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            animation: None,
            respect_reduced_motion: config.respect_reduced_motion,
        }
    }

    /// Check if an animation is currently active
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// The in-flight animation, if any
    pub fn animation(&self) -> Option<&ScrollAnimation> {
        self.animation.as_ref()
    }

    /// Final offset of the in-flight animation
    pub fn target_scroll(&self) -> Option<f64> {
        self.animation.as_ref().map(|a| a.to)
    }

    /// Scroll the viewport to `target` over `duration` milliseconds
    ///
    /// Jumps immediately when the viewport prefers reduced motion or when
    /// `duration` is not positive. Otherwise records the start offset and
    /// timestamp; the first write happens on the next [`step`](Self::step).
    pub fn animate_scroll_to<V: Viewport + ?Sized>(
        &mut self,
        viewport: &mut V,
        target: f64,
        duration: f64,
        now: f64,
    ) -> ScrollStart {
        let reduced = self.respect_reduced_motion && viewport.prefers_reduced_motion();

        if reduced || duration <= 0.0 {
            // A jump supersedes whatever was running
            self.animation = None;
            viewport.scroll_to(target);
            debug!(target, reduced, "Scroll jumped");
            return ScrollStart::Jumped;
        }

        if let Some(previous) = self.animation.take() {
            debug!(
                previous_target = previous.to,
                new_target = target,
                "Replacing in-flight scroll animation"
            );
        }

        let from = viewport.scroll_y();
        self.animation = Some(ScrollAnimation {
            from,
            to: target,
            start: now,
            duration,
        });
        debug!(from, target, duration, "Scroll animation started");
        ScrollStart::Animating
    }

    /// Advance the animation to frame time `now`
    ///
    /// Writes the interpolated offset and returns true while another frame
    /// is needed.
    pub fn step<V: Viewport + ?Sized>(&mut self, viewport: &mut V, now: f64) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };

        viewport.scroll_to(anim.sample(now));

        if anim.is_finished(now) {
            self.animation = None;
            debug!(target = anim.to, "Scroll animation finished");
            false
        } else {
            true
        }
    }
}
