//! Nav release: pinned nav over the hero, released once the hero is scrolled past
//!
//! Scroll events only arm a [`FrameThrottle`]; the actual evaluation runs on
//! the next display refresh, so a burst of scroll events costs one update.

use tracing::debug;

use crate::config::SelectorConfig;
use crate::dom::{Document, Page, Viewport};
use crate::geometry::Geometry;

/// Root style property kept in sync with the nav's overlay height
pub const SCROLL_PADDING_PROPERTY: &str = "scroll-padding-top";

/// At most one pending update per display refresh
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameThrottle {
    pending: bool,
}

impl FrameThrottle {
    /// Arm the gate; returns false if an update is already pending
    #[inline]
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Disarm the gate, returning whether it was armed
    #[inline]
    pub fn take(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }
}

#[derive(Debug, Clone)]
pub struct NavRelease {
    released: bool,
    released_class: String,
    nav_off_class: String,
    throttle: FrameThrottle,
}

impl NavRelease {
    pub fn new(selectors: &SelectorConfig) -> Self {
        Self {
            released: false,
            released_class: selectors.released_class.clone(),
            nav_off_class: selectors.nav_off_class.clone(),
            throttle: FrameThrottle::default(),
        }
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// An evaluation is waiting for the next frame
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.throttle.is_pending()
    }

    /// `scrollY >= threshold`
    pub fn should_release<V: Viewport + ?Sized>(&self, viewport: &V, geometry: &Geometry) -> bool {
        viewport.scroll_y() >= geometry.release_threshold()
    }

    /// Reflect `is_released` on the body, the nav and the root scroll padding
    pub fn apply_released_state<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        geometry: &Geometry,
        is_released: bool,
    ) {
        if self.released != is_released {
            debug!(released = is_released, "Nav release state changed");
        }
        self.released = is_released;

        let body = doc.body();
        doc.set_class(body, &self.released_class, is_released);

        if let Some(nav) = geometry.nav(&*doc) {
            doc.set_class(nav, &self.nav_off_class, is_released);
        }

        // Keeps native fragment jumps clear of the pinned nav too
        let padding = if is_released {
            "0px".to_string()
        } else {
            format!("{}px", geometry.nav_height(&*doc))
        };
        let root = doc.root();
        doc.set_style(root, SCROLL_PADDING_PROPERTY, &padding);
    }

    /// Evaluate and apply immediately, returning the new state
    pub fn update<P: Page + ?Sized>(&mut self, page: &mut P, geometry: &Geometry) -> bool {
        let released = self.should_release(&*page, geometry);
        self.apply_released_state(page, geometry, released);
        released
    }

    /// Throttled entry point for scroll-like events
    ///
    /// Returns true when this call armed the throttle, i.e. a frame is now needed.
    pub fn schedule(&mut self) -> bool {
        self.throttle.request()
    }

    /// Run the pending evaluation, if any, for this frame
    pub fn on_frame<P: Page + ?Sized>(&mut self, page: &mut P, geometry: &Geometry) -> Option<bool> {
        if !self.throttle.take() {
            return None;
        }
        Some(self.update(page, geometry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;

    /// Hero covering document rows 0..=600, nav 80px tall
    fn setup() -> (MemoryPage, Geometry, NavRelease) {
        let selectors = SelectorConfig::default();
        let mut page = MemoryPage::new(1280.0, 720.0);
        let body = page.body();
        let nav = page.append(body, "header");
        page.set_attribute(nav, "id", "siteNav");
        page.set_fixed(nav, 0.0, 80.0);
        let hero = page.append(body, "section");
        page.set_attribute(hero, "id", "home");
        page.set_height(hero, 601.0);
        let rest = page.append(body, "section");
        page.set_height(rest, 4000.0);

        let mut geometry = Geometry::new(&selectors);
        geometry.compute_hero_release(&page);
        (page, geometry, NavRelease::new(&selectors))
    }

    #[test]
    fn test_release_scenario_at_hero_edge() {
        let (mut page, geometry, mut release) = setup();
        let nav = page.element_by_id("siteNav").unwrap();

        page.scroll_to(599.0);
        assert!(!release.update(&mut page, &geometry));
        assert!(!page.has_class(page.body(), "released"));
        assert!(!page.has_class(nav, "nav--off"));
        assert_eq!(
            page.style(page.root(), SCROLL_PADDING_PROPERTY).as_deref(),
            Some("80px")
        );

        page.scroll_to(600.0);
        assert!(release.update(&mut page, &geometry));
        assert!(release.is_released());
        assert!(page.has_class(page.body(), "released"));
        assert!(page.has_class(nav, "nav--off"));
        assert_eq!(
            page.style(page.root(), SCROLL_PADDING_PROPERTY).as_deref(),
            Some("0px")
        );
    }

    #[test]
    fn test_release_matches_threshold_for_all_offsets() {
        let (mut page, geometry, mut release) = setup();
        let threshold = geometry.release_threshold();

        let mut previous = false;
        for y in (0..=1200).step_by(7) {
            page.scroll_to(y as f64);
            let released = release.update(&mut page, &geometry);
            assert_eq!(released, page.scroll_y() >= threshold, "y = {}", y);
            // Monotonic while scrolling down
            assert!(released || !previous, "unreleased again at y = {}", y);
            previous = released;
        }
    }

    #[test]
    fn test_scrolling_back_up_restores_pinned_nav() {
        let (mut page, geometry, mut release) = setup();
        page.scroll_to(900.0);
        release.update(&mut page, &geometry);
        assert!(release.is_released());

        page.scroll_to(10.0);
        assert!(!release.update(&mut page, &geometry));
        assert!(!page.has_class(page.body(), "released"));
    }

    #[test]
    fn test_no_hero_never_releases() {
        let selectors = SelectorConfig::default();
        let mut page = MemoryPage::new(1280.0, 720.0);
        let body = page.body();
        let content = page.append(body, "section");
        page.set_height(content, 5000.0);

        let mut geometry = Geometry::new(&selectors);
        geometry.compute_hero_release(&page);
        let mut release = NavRelease::new(&selectors);

        page.scroll_to(4000.0);
        assert!(!release.update(&mut page, &geometry));
        // Missing nav still yields a padding value
        assert_eq!(
            page.style(page.root(), SCROLL_PADDING_PROPERTY).as_deref(),
            Some("0px")
        );
    }

    #[test]
    fn test_throttle_collapses_bursts() {
        let (mut page, geometry, mut release) = setup();

        assert!(release.schedule());
        for _ in 0..20 {
            assert!(!release.schedule());
        }
        assert!(release.is_pending());

        page.scroll_to(700.0);
        assert_eq!(release.on_frame(&mut page, &geometry), Some(true));
        assert!(!release.is_pending());
        assert_eq!(release.on_frame(&mut page, &geometry), None);

        // The gate re-arms after the frame ran
        assert!(release.schedule());
    }

    #[test]
    fn test_frame_throttle_gate() {
        let mut gate = FrameThrottle::default();
        assert!(!gate.take());
        assert!(gate.request());
        assert!(!gate.request());
        assert!(gate.take());
        assert!(!gate.is_pending());
    }
}
