//! Page chrome controller
//!
//! One [`PageChrome`] per page session owns the release threshold, the
//! nav release state, the scroll animation and the markup conventions, and
//! exposes the page lifecycle as methods. The host forwards platform
//! notifications and drives frames:
//!
//! ```ignore
//! let mut chrome = PageChrome::new(&config);
//! chrome.on_ready(&mut page);
//!
//! // event loop
//! chrome.on_scroll();                          // user scrolled
//! let outcome = chrome.on_click(&mut page, target, now);
//! if !outcome.default_prevented { /* follow the link natively */ }
//! while chrome.needs_frame() {
//!     chrome.on_frame(&mut page, next_refresh_timestamp());
//! }
//! ```
//!
//! Clicks go through a single ordered dispatcher: anchor navigation first,
//! then toggle activation, then outside interaction. A click on a toggle is
//! never also an outside interaction.

use serde::Serialize;
use tracing::debug;

use crate::anchor::{AnchorJump, AnchorNavigator};
use crate::config::AppConfig;
use crate::dom::{Document, NodeId, Page};
use crate::dropdown::{DropdownController, DropdownTransition};
use crate::geometry::Geometry;
use crate::release::{NavRelease, SCROLL_PADDING_PROPERTY};
use crate::scroll::{ScrollAnimator, ScrollConfigExt, ScrollStart};

/// Root style property forced to `auto` so CSS smooth scrolling cannot
/// compete with the animator
pub const SCROLL_BEHAVIOR_PROPERTY: &str = "scroll-behavior";

/// Keys the chrome reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Platform notifications, for hosts that prefer a single entry point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// Document structure is ready
    Ready,
    /// Viewport changed size
    Resize,
    /// Scroll offset changed
    Scroll,
    /// The hero image finished loading
    HeroLoaded,
    /// Primary activation (click, tap, Enter) on an element
    Click(NodeId),
    KeyDown(Key),
    /// Display refresh at the given timestamp
    Frame,
}

/// What the ordered dispatcher decided for one click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickIntent {
    /// Activation on a toggle that belongs to a dropdown container
    Toggle(NodeId),
    /// Activation outside every dropdown container
    Outside,
    /// Activation inside a dropdown container that is not its toggle
    Inside,
}

/// Result of dispatching a click
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClickOutcome {
    /// Anchor navigation that was taken over, if any
    pub anchor: Option<AnchorJump>,
    /// Dropdown change caused by toggle activation
    pub dropdown: Option<DropdownTransition>,
    /// Dropdowns closed by an outside interaction
    pub closed: usize,
    /// The host must suppress the default action
    pub default_prevented: bool,
}

/// Result of one display refresh
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// Release state evaluated this frame, if an evaluation was pending
    pub released: Option<bool>,
    /// The scroll animation wrote a new offset
    pub scrolled: bool,
}

/// Serializable view of the chrome state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChromeSnapshot {
    pub scroll_y: f64,
    pub released: bool,
    /// `None` while the threshold is unreachable
    pub release_threshold: Option<f64>,
    pub nav_height: f64,
    pub scroll_padding: Option<String>,
    /// Ids (or node indices) of open dropdown containers
    pub open_dropdowns: Vec<String>,
    pub animating: bool,
    pub animation_target: Option<f64>,
    pub frame_pending: bool,
}

#[derive(Debug, Clone)]
pub struct PageChrome {
    geometry: Geometry,
    release: NavRelease,
    animator: ScrollAnimator,
    dropdowns: DropdownController,
    anchors: AnchorNavigator,
    /// Hero image load completion still outstanding
    awaiting_hero: bool,
    /// Fallback duration for [`PageChrome::scroll_to`]
    default_duration: f64,
}

impl PageChrome {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            geometry: Geometry::new(&config.selectors),
            release: NavRelease::new(&config.selectors),
            animator: ScrollAnimator::new(&config.scroll),
            dropdowns: DropdownController::new(&config.selectors),
            anchors: AnchorNavigator::new(&config.selectors, &config.scroll),
            awaiting_hero: false,
            default_duration: config.scroll.default_duration(),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn dropdowns(&self) -> &DropdownController {
        &self.dropdowns
    }

    pub fn animator(&self) -> &ScrollAnimator {
        &self.animator
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.release.is_released()
    }

    #[inline]
    pub fn release_threshold(&self) -> f64 {
        self.geometry.release_threshold()
    }

    /// The hero image load has not been observed yet
    #[inline]
    pub fn awaiting_hero(&self) -> bool {
        self.awaiting_hero
    }

    /// An animation step or a throttled evaluation wants the next refresh
    #[inline]
    pub fn needs_frame(&self) -> bool {
        self.animator.is_animating() || self.release.is_pending()
    }

    /// Single entry point mapping platform notifications onto the methods below
    pub fn handle<P: Page + ?Sized>(&mut self, page: &mut P, event: PageEvent, now: f64) -> ClickOutcome {
        match event {
            PageEvent::Ready => {
                self.on_ready(page);
            }
            PageEvent::Resize => self.on_resize(page),
            PageEvent::Scroll => self.on_scroll(),
            PageEvent::HeroLoaded => {
                self.on_hero_loaded(page);
            }
            PageEvent::Click(target) => return self.on_click(page, target, now),
            PageEvent::KeyDown(key) => {
                self.on_key(page, key);
            }
            PageEvent::Frame => {
                self.on_frame(page, now);
            }
        }
        ClickOutcome::default()
    }

    /// Structure ready: take over scroll behavior, measure, and apply the
    /// release state right away (the page may load already scrolled)
    pub fn on_ready<P: Page + ?Sized>(&mut self, page: &mut P) -> bool {
        let root = page.root();
        page.set_style(root, SCROLL_BEHAVIOR_PROPERTY, "auto");

        self.geometry.compute_hero_release(&*page);
        let released = self.release.update(page, &self.geometry);

        self.awaiting_hero = self
            .geometry
            .hero(&*page)
            .is_some_and(|hero| page.is_pending_image(hero));
        debug!(released, awaiting_hero = self.awaiting_hero, "Page chrome initialized");
        released
    }

    /// Hero image finished loading; acts once per page session
    pub fn on_hero_loaded<P: Page + ?Sized>(&mut self, page: &mut P) -> bool {
        if !self.awaiting_hero {
            return false;
        }
        self.awaiting_hero = false;
        self.geometry.compute_hero_release(&*page);
        self.release.schedule();
        true
    }

    /// Viewport resized: hero position and height may have changed
    pub fn on_resize<P: Page + ?Sized>(&mut self, page: &mut P) {
        self.geometry.compute_hero_release(&*page);
        self.release.schedule();
    }

    /// Scroll offset changed; evaluation waits for the next frame
    pub fn on_scroll(&mut self) {
        self.release.schedule();
    }

    /// Classify a click by the fixed priority toggle > outside
    pub fn classify<D: Document + ?Sized>(&self, doc: &D, target: NodeId) -> ClickIntent {
        if let Some(toggle) = self.dropdowns.toggle_for(doc, target) {
            if self.dropdowns.contains(doc, toggle) {
                return ClickIntent::Toggle(toggle);
            }
        }
        if self.dropdowns.contains(doc, target) {
            ClickIntent::Inside
        } else {
            ClickIntent::Outside
        }
    }

    /// Dispatch a primary activation on `target`
    pub fn on_click<P: Page + ?Sized>(&mut self, page: &mut P, target: NodeId, now: f64) -> ClickOutcome {
        let mut outcome = ClickOutcome::default();

        let before = page.scroll_y();
        outcome.anchor = self.anchors.navigate(
            page,
            &self.geometry,
            &mut self.animator,
            &self.dropdowns,
            target,
            now,
        );
        if let Some(jump) = outcome.anchor {
            outcome.default_prevented = true;
            if jump.start == ScrollStart::Jumped && page.scroll_y() != before {
                self.on_scroll();
            }
        }

        match self.classify(&*page, target) {
            ClickIntent::Toggle(toggle) => {
                outcome.dropdown = Some(self.dropdowns.activate(page, toggle));
            }
            ClickIntent::Outside => {
                outcome.closed = self.dropdowns.close_all(page, None);
            }
            ClickIntent::Inside => {}
        }

        outcome
    }

    /// Key press; Escape closes every dropdown. Returns how many closed.
    pub fn on_key<P: Page + ?Sized>(&mut self, page: &mut P, key: Key) -> usize {
        match key {
            Key::Escape => self.dropdowns.close_all(page, None),
            Key::Other => 0,
        }
    }

    /// Programmatic scroll with the configured default duration
    pub fn scroll_to<P: Page + ?Sized>(&mut self, page: &mut P, target: f64, now: f64) -> ScrollStart {
        self.scroll_to_with(page, target, self.default_duration, now)
    }

    /// Programmatic scroll with an explicit duration in milliseconds
    pub fn scroll_to_with<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        target: f64,
        duration: f64,
        now: f64,
    ) -> ScrollStart {
        let before = page.scroll_y();
        let start = self.animator.animate_scroll_to(page, target, duration, now);
        if start == ScrollStart::Jumped && page.scroll_y() != before {
            self.on_scroll();
        }
        start
    }

    /// One display refresh at timestamp `now`
    ///
    /// Runs the evaluation armed before this frame, then advances the
    /// animation. Offsets written by the animation arm the next frame's
    /// evaluation, the way a programmatic scroll event would.
    pub fn on_frame<P: Page + ?Sized>(&mut self, page: &mut P, now: f64) -> FrameReport {
        let released = self.release.on_frame(page, &self.geometry);

        let mut scrolled = false;
        if self.animator.is_animating() {
            let before = page.scroll_y();
            self.animator.step(page, now);
            scrolled = page.scroll_y() != before;
            if scrolled {
                self.on_scroll();
            }
        }

        FrameReport { released, scrolled }
    }

    pub fn snapshot<P: Page + ?Sized>(&self, page: &P) -> ChromeSnapshot {
        let threshold = self.geometry.release_threshold();
        ChromeSnapshot {
            scroll_y: page.scroll_y(),
            released: self.release.is_released(),
            release_threshold: threshold.is_finite().then_some(threshold),
            nav_height: self.geometry.nav_height(page),
            scroll_padding: page.style(page.root(), SCROLL_PADDING_PROPERTY),
            open_dropdowns: self
                .dropdowns
                .open_containers(page)
                .into_iter()
                .map(|c| page.attribute(c, "id").unwrap_or_else(|| format!("#{}", c.0)))
                .collect(),
            animating: self.animator.is_animating(),
            animation_target: self.animator.target_scroll(),
            frame_pending: self.release.is_pending(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Viewport;
    use crate::page::{MemoryPage, PageLayout};

    fn demo() -> (MemoryPage, PageChrome, AppConfig) {
        let config = AppConfig::default();
        let page = MemoryPage::from_layout(&PageLayout::default(), &config.selectors);
        let chrome = PageChrome::new(&config);
        (page, chrome, config)
    }

    fn toggle_of(page: &MemoryPage, config: &AppConfig, id: &str) -> NodeId {
        let container = page.element_by_id(id).unwrap();
        page.first_descendant_with_class(container, &config.selectors.toggle_class)
            .unwrap()
    }

    fn link_to(page: &MemoryPage, href: &str) -> NodeId {
        page.clickables()
            .into_iter()
            .find(|&n| page.attribute(n, "href").as_deref() == Some(href))
            .unwrap()
    }

    /// Run frames 16ms apart until the chrome is idle
    fn settle(chrome: &mut PageChrome, page: &mut MemoryPage, mut now: f64) -> f64 {
        let mut guard = 0;
        while chrome.needs_frame() {
            now += 16.0;
            chrome.on_frame(page, now);
            guard += 1;
            assert!(guard < 1000, "chrome never settled");
        }
        now
    }

    #[test]
    fn test_ready_takes_over_scroll_behavior_and_waits_for_hero() {
        let (mut page, mut chrome, _) = demo();

        // A hero image still loading has no height, so its last row is -1
        assert!(chrome.on_ready(&mut page));
        assert_eq!(chrome.release_threshold(), -1.0);
        assert!(chrome.awaiting_hero());
        assert_eq!(
            page.style(page.root(), SCROLL_BEHAVIOR_PROPERTY).as_deref(),
            Some("auto")
        );
        assert_eq!(
            page.style(page.root(), SCROLL_PADDING_PROPERTY).as_deref(),
            Some("0px")
        );
    }

    #[test]
    fn test_ready_with_loaded_hero_keeps_nav_pinned() {
        let (mut page, mut chrome, _) = demo();
        page.complete_hero_image();

        assert!(!chrome.on_ready(&mut page));
        assert!(!chrome.awaiting_hero());
        assert_eq!(
            page.style(page.root(), SCROLL_PADDING_PROPERTY).as_deref(),
            Some("80px")
        );
    }

    #[test]
    fn test_ready_on_page_restored_past_hero_releases_immediately() {
        let (mut page, mut chrome, _) = demo();
        page.complete_hero_image();
        page.scroll_to(2000.0);

        assert!(chrome.on_ready(&mut page));
        assert!(!chrome.awaiting_hero());
        assert!(page.has_class(page.body(), "released"));
    }

    #[test]
    fn test_hero_load_recomputes_once() {
        let (mut page, mut chrome, _) = demo();
        chrome.on_ready(&mut page);
        assert!(chrome.is_released());

        page.complete_hero_image();
        assert!(chrome.on_hero_loaded(&mut page));
        assert_eq!(chrome.release_threshold(), 719.0);
        assert!(chrome.needs_frame());

        // The hero now covers the viewport top again
        assert_eq!(chrome.on_frame(&mut page, 16.0).released, Some(false));
        assert!(!chrome.is_released());

        // Later load notifications are ignored
        assert!(!chrome.on_hero_loaded(&mut page));
    }

    #[test]
    fn test_scroll_is_throttled_to_one_evaluation_per_frame() {
        let (mut page, mut chrome, _) = demo();
        page.complete_hero_image();
        chrome.on_ready(&mut page);

        for y in [100.0, 400.0, 900.0] {
            page.scroll_to(y);
            chrome.on_scroll();
        }
        // Nothing applied until the frame
        assert!(!chrome.is_released());

        let report = chrome.on_frame(&mut page, 16.0);
        assert_eq!(report.released, Some(true));
        assert!(!chrome.needs_frame());
        assert_eq!(chrome.on_frame(&mut page, 32.0).released, None);
    }

    #[test]
    fn test_resize_moves_threshold() {
        let (mut page, mut chrome, _) = demo();
        page.complete_hero_image();
        chrome.on_ready(&mut page);
        page.scroll_to(500.0);

        page.resize(640.0, 720.0);
        chrome.on_resize(&mut page);
        assert_eq!(chrome.release_threshold(), 359.0);

        assert_eq!(chrome.on_frame(&mut page, 16.0).released, Some(true));
    }

    #[test]
    fn test_anchor_click_animates_then_releases() {
        let (mut page, mut chrome, _) = demo();
        page.complete_hero_image();
        chrome.on_ready(&mut page);

        let pricing = link_to(&page, "#pricing");
        let outcome = chrome.on_click(&mut page, pricing, 0.0);

        assert!(outcome.default_prevented);
        let jump = outcome.anchor.unwrap();
        // 720 + 900 - 80 + 1
        assert_eq!(jump.destination, 1541.0);
        assert_eq!(outcome.dropdown, None);

        settle(&mut chrome, &mut page, 0.0);
        assert_eq!(page.scroll_y(), 1541.0);
        assert!(chrome.is_released());
        assert_eq!(
            page.style(page.root(), SCROLL_PADDING_PROPERTY).as_deref(),
            Some("0px")
        );
    }

    #[test]
    fn test_anchor_offset_uses_released_state() {
        let (mut page, mut chrome, _) = demo();
        page.complete_hero_image();
        page.scroll_to(3000.0);
        chrome.on_ready(&mut page);
        assert!(chrome.is_released());

        let features = link_to(&page, "#features");
        let jump = chrome.on_click(&mut page, features, 0.0).anchor.unwrap();
        assert_eq!(jump.destination, 721.0);
    }

    #[test]
    fn test_unresolved_anchor_keeps_default() {
        let (mut page, mut chrome, _) = demo();
        chrome.on_ready(&mut page);

        let careers = link_to(&page, "#careers");
        let outcome = chrome.on_click(&mut page, careers, 0.0);
        assert!(!outcome.default_prevented);
        assert!(outcome.anchor.is_none());
        assert!(!chrome.animator().is_animating());
    }

    #[test]
    fn test_second_navigation_replaces_first() {
        let (mut page, mut chrome, _) = demo();
        page.complete_hero_image();
        chrome.on_ready(&mut page);

        let contact = link_to(&page, "#contact");
        let features = link_to(&page, "#features");
        chrome.on_click(&mut page, contact, 0.0);
        chrome.on_frame(&mut page, 350.0);
        chrome.on_click(&mut page, features, 350.0);

        let target = chrome.animator().target_scroll().unwrap();
        settle(&mut chrome, &mut page, 350.0);
        assert_eq!(page.scroll_y(), target);
    }

    #[test]
    fn test_reduced_motion_navigation_jumps_and_schedules_release() {
        let (mut page, mut chrome, _) = demo();
        page.complete_hero_image();
        page.set_reduced_motion(true);
        chrome.on_ready(&mut page);

        let faq = link_to(&page, "#faq");
        let outcome = chrome.on_click(&mut page, faq, 0.0);
        assert_eq!(outcome.anchor.unwrap().start, ScrollStart::Jumped);
        assert_eq!(page.scroll_y(), outcome.anchor.unwrap().destination);
        assert!(!chrome.animator().is_animating());
        assert!(chrome.needs_frame());

        assert_eq!(chrome.on_frame(&mut page, 16.0).released, Some(true));
    }

    #[test]
    fn test_toggle_click_is_not_an_outside_click() {
        let (mut page, mut chrome, config) = demo();
        chrome.on_ready(&mut page);
        let product = toggle_of(&page, &config, "product");

        assert_eq!(chrome.classify(&page, product), ClickIntent::Toggle(product));
        let outcome = chrome.on_click(&mut page, product, 0.0);
        assert!(matches!(outcome.dropdown, Some(DropdownTransition::Opened(_))));
        assert_eq!(outcome.closed, 0);
        assert!(!outcome.default_prevented);
        assert_eq!(chrome.snapshot(&page).open_dropdowns, vec!["product".to_string()]);
    }

    #[test]
    fn test_outside_click_and_escape_close_everything() {
        let (mut page, mut chrome, config) = demo();
        chrome.on_ready(&mut page);
        let company = toggle_of(&page, &config, "company");

        chrome.on_click(&mut page, company, 0.0);
        let hero = page.element_by_id("home").unwrap();
        assert_eq!(chrome.classify(&page, hero), ClickIntent::Outside);
        assert_eq!(chrome.on_click(&mut page, hero, 0.0).closed, 1);
        assert!(chrome.snapshot(&page).open_dropdowns.is_empty());

        // Idempotent
        assert_eq!(chrome.on_click(&mut page, hero, 0.0).closed, 0);

        chrome.on_click(&mut page, company, 0.0);
        assert_eq!(chrome.on_key(&mut page, Key::Escape), 1);
        assert_eq!(chrome.on_key(&mut page, Key::Escape), 0);
        assert_eq!(chrome.on_key(&mut page, Key::Other), 0);
        assert!(chrome.snapshot(&page).open_dropdowns.is_empty());
    }

    #[test]
    fn test_click_inside_open_menu_keeps_it_open() {
        let (mut page, mut chrome, config) = demo();
        chrome.on_ready(&mut page);
        let product = toggle_of(&page, &config, "product");
        chrome.on_click(&mut page, product, 0.0);

        let menu = page.element_by_id("product-menu").unwrap();
        assert_eq!(chrome.classify(&page, menu), ClickIntent::Inside);
        chrome.on_click(&mut page, menu, 0.0);
        assert_eq!(chrome.snapshot(&page).open_dropdowns, vec!["product".to_string()]);
    }

    #[test]
    fn test_exclusivity_over_action_sequences() {
        let (mut page, mut chrome, config) = demo();
        chrome.on_ready(&mut page);
        let product = toggle_of(&page, &config, "product");
        let company = toggle_of(&page, &config, "company");
        let hero = page.element_by_id("home").unwrap();
        let menu = page.element_by_id("company-menu").unwrap();
        let faq = link_to(&page, "#faq");

        // Small LCG so the sequence is long but deterministic
        let mut seed: u32 = 0x2545_f491;
        for step in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let now = step as f64 * 16.0;
            match (seed >> 16) % 6 {
                0 => {
                    chrome.on_click(&mut page, product, now);
                }
                1 => {
                    chrome.on_click(&mut page, company, now);
                }
                2 => {
                    chrome.on_click(&mut page, hero, now);
                    assert!(chrome.dropdowns().open_containers(&page).is_empty());
                }
                3 => {
                    chrome.on_key(&mut page, Key::Escape);
                    assert!(chrome.dropdowns().open_containers(&page).is_empty());
                }
                4 => {
                    chrome.on_click(&mut page, menu, now);
                }
                _ => {
                    chrome.on_click(&mut page, faq, now);
                    assert!(chrome.dropdowns().open_containers(&page).is_empty());
                }
            }
            chrome.on_frame(&mut page, now + 8.0);
            assert!(chrome.dropdowns().open_containers(&page).len() <= 1, "step {}", step);
        }
    }

    #[test]
    fn test_handle_routes_events() {
        let (mut page, mut chrome, config) = demo();
        chrome.handle(&mut page, PageEvent::Ready, 0.0);
        assert!(chrome.awaiting_hero());

        page.complete_hero_image();
        chrome.handle(&mut page, PageEvent::HeroLoaded, 0.0);
        assert_eq!(chrome.release_threshold(), 719.0);

        let product = toggle_of(&page, &config, "product");
        let outcome = chrome.handle(&mut page, PageEvent::Click(product), 0.0);
        assert!(outcome.dropdown.is_some());

        chrome.handle(&mut page, PageEvent::KeyDown(Key::from_dom("Escape")), 0.0);
        assert!(chrome.snapshot(&page).open_dropdowns.is_empty());

        page.scroll_to(800.0);
        chrome.handle(&mut page, PageEvent::Scroll, 0.0);
        chrome.handle(&mut page, PageEvent::Frame, 16.0);
        assert!(chrome.is_released());
    }

    #[test]
    fn test_snapshot_serializes_unreachable_threshold_as_null() {
        let config = AppConfig::default();
        let mut page = MemoryPage::from_layout(
            &PageLayout {
                hero: None,
                ..PageLayout::default()
            },
            &config.selectors,
        );
        let mut chrome = PageChrome::new(&config);
        chrome.on_ready(&mut page);

        let json = serde_json::to_value(chrome.snapshot(&page)).unwrap();
        assert!(json["release_threshold"].is_null());
        assert_eq!(json["released"], false);
        assert_eq!(json["scroll_padding"], "80px");
    }
}
