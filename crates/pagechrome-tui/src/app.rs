use std::time::{Duration, Instant};

use pagechrome_core::chrome::{ClickOutcome, Key};
use pagechrome_core::release::SCROLL_PADDING_PROPERTY;
use pagechrome_core::{AppConfig, Document, MemoryPage, NodeId, Page, PageChrome, PageLayout, Viewport};
use tracing::debug;

use crate::input::Action;

/// Width change per widen/narrow step, in CSS pixels
const RESIZE_STEP_PX: f64 = 80.0;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal browsing mode
    Normal,
    /// Help overlay
    Help,
}

/// Application state
pub struct App {
    pub config: AppConfig,
    pub layout: PageLayout,
    /// The simulated page
    pub page: MemoryPage,
    pub chrome: PageChrome,
    pub mode: Mode,
    /// Element under the simulated pointer
    pub pointer: Option<NodeId>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    started: Instant,
}

impl App {
    pub fn new(layout: PageLayout, config: AppConfig) -> Self {
        let mut page = MemoryPage::from_layout(&layout, &config.selectors);
        let mut chrome = PageChrome::new(&config);
        chrome.on_ready(&mut page);

        Self {
            config,
            layout,
            page,
            chrome,
            mode: Mode::Normal,
            pointer: None,
            should_quit: false,
            status_message: None,
            started: Instant::now(),
        }
    }

    /// Milliseconds since the preview started, used as frame timestamps
    pub fn clock_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Delay before the simulated hero image arrives, if it is still loading
    pub fn hero_load_delay(&self) -> Option<Duration> {
        if !self.chrome.awaiting_hero() {
            return None;
        }
        self.layout
            .hero
            .as_ref()
            .map(|hero| Duration::from_millis(hero.load_delay_ms))
    }

    /// Links and buttons a user could click right now
    ///
    /// Items of a closed dropdown menu are hidden and skipped.
    pub fn targets(&self) -> Vec<NodeId> {
        let selectors = &self.config.selectors;
        self.page
            .clickables()
            .into_iter()
            .filter(|&node| match self.page.closest_with_class(node, &selectors.menu_class) {
                Some(menu) => self
                    .page
                    .closest_with_class(menu, &selectors.dropdown_class)
                    .is_some_and(|c| self.page.has_class(c, &selectors.open_class)),
                None => true,
            })
            .collect()
    }

    /// Human readable name of an element
    pub fn describe(&self, node: NodeId) -> String {
        let text = self.page.text(node);
        match self.page.attribute(node, "href") {
            Some(href) => format!("{} ({})", text, href),
            None => text.to_string(),
        }
    }

    /// Single entry point for keyboard actions
    pub fn apply(&mut self, action: Action, now: f64) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroll_by(self.config.ui.scroll_step_px),
            Action::ScrollUp => self.scroll_by(-self.config.ui.scroll_step_px),
            Action::HalfPageDown => self.scroll_by(self.page.viewport_height() / 2.0),
            Action::HalfPageUp => self.scroll_by(-self.page.viewport_height() / 2.0),
            Action::JumpToTop => {
                self.chrome.scroll_to(&mut self.page, 0.0, now);
            }
            Action::NextTarget => self.move_pointer(1),
            Action::PrevTarget => self.move_pointer(-1),
            Action::Activate => self.activate(now),
            Action::ClickOutside => self.click_outside(now),
            Action::Escape => {
                let closed = self.chrome.on_key(&mut self.page, Key::Escape);
                if closed > 0 {
                    self.set_status(format!("Escape closed {} menu", closed));
                }
            }
            Action::ToggleReducedMotion => {
                let reduced = !self.page.prefers_reduced_motion();
                self.page.set_reduced_motion(reduced);
                self.set_status(if reduced {
                    "Reduced motion on"
                } else {
                    "Reduced motion off"
                });
            }
            Action::Widen => self.resize_width(RESIZE_STEP_PX),
            Action::Narrow => self.resize_width(-RESIZE_STEP_PX),
            Action::ToggleHelp => {
                self.mode = match self.mode {
                    Mode::Normal => Mode::Help,
                    Mode::Help => Mode::Normal,
                };
            }
            Action::ExitMode => self.mode = Mode::Normal,
            Action::None => {}
        }
    }

    /// User scroll by `delta` pixels
    pub fn scroll_by(&mut self, delta: f64) {
        let y = self.page.scroll_y() + delta;
        self.page.scroll_to(y);
        self.chrome.on_scroll();
    }

    fn move_pointer(&mut self, step: isize) {
        let targets = self.targets();
        if targets.is_empty() {
            self.pointer = None;
            return;
        }
        let len = targets.len() as isize;
        let next = match self.pointer.and_then(|p| targets.iter().position(|&t| t == p)) {
            Some(index) => (index as isize + step).rem_euclid(len),
            None if step >= 0 => 0,
            None => len - 1,
        };
        self.pointer = Some(targets[next as usize]);
    }

    /// Click the element under the pointer
    pub fn activate(&mut self, now: f64) {
        let Some(target) = self.pointer else {
            self.set_status("Nothing under the pointer (Tab to pick a link)");
            return;
        };
        let outcome = self.chrome.on_click(&mut self.page, target, now);
        self.report_click(target, outcome);

        // Pointer may now sit on an item of a menu that just closed
        if !self.targets().contains(&target) {
            self.pointer = None;
        }
    }

    /// Click on the page background
    pub fn click_outside(&mut self, now: f64) {
        let body = self.page.body();
        let outcome = self.chrome.on_click(&mut self.page, body, now);
        if outcome.closed > 0 {
            self.set_status(format!("Outside click closed {} menu", outcome.closed));
        }
        if self.pointer.is_some_and(|p| !self.targets().contains(&p)) {
            self.pointer = None;
        }
    }

    fn report_click(&mut self, target: NodeId, outcome: ClickOutcome) {
        if let Some(jump) = outcome.anchor {
            self.set_status(format!("Scrolling to y={:.0}", jump.destination));
        } else if !outcome.default_prevented {
            self.follow_native(target);
        }
        if let Some(transition) = outcome.dropdown {
            debug!(?transition, "Dropdown toggled");
        }
    }

    /// Default action of an unhandled link: a native fragment jump honoring
    /// the root scroll padding
    fn follow_native(&mut self, link: NodeId) {
        let Some(href) = self.page.attribute(link, "href") else {
            return;
        };
        let Some(target) = href
            .strip_prefix('#')
            .filter(|f| !f.is_empty())
            .and_then(|f| self.page.element_by_id(f))
        else {
            self.set_status(format!("No element for {}, nothing happens", href));
            return;
        };

        let padding = self
            .page
            .style(self.page.root(), SCROLL_PADDING_PROPERTY)
            .and_then(|v| v.trim_end_matches("px").parse::<f64>().ok())
            .unwrap_or(0.0);
        let y = self.page.document_top(target) - padding;
        self.page.scroll_to(y);
        self.chrome.on_scroll();
        self.set_status(format!("Native jump to {}", href));
    }

    fn resize_width(&mut self, delta: f64) {
        let width = (self.page.viewport_width() + delta).max(RESIZE_STEP_PX);
        let height = self.page.viewport_height();
        self.page.resize(width, height);
        self.chrome.on_resize(&mut self.page);
        self.set_status(format!("Viewport {:.0}x{:.0}", width, height));
    }

    /// Terminal resized: the viewport height follows the content rows
    pub fn on_terminal_resize(&mut self, rows: u16) {
        let content_rows = rows.saturating_sub(1).max(1) as f64;
        let height = content_rows * self.config.ui.px_per_row;
        if height != self.page.viewport_height() {
            let width = self.page.viewport_width();
            self.page.resize(width, height);
            self.chrome.on_resize(&mut self.page);
        }
    }

    pub fn on_hero_loaded(&mut self) {
        self.page.complete_hero_image();
        if self.chrome.on_hero_loaded(&mut self.page) {
            self.set_status("Hero image loaded");
        }
    }

    #[inline]
    pub fn needs_frame(&self) -> bool {
        self.chrome.needs_frame()
    }

    /// Run one display refresh if the chrome asked for it
    pub fn frame(&mut self, now: f64) -> bool {
        if !self.chrome.needs_frame() {
            return false;
        }
        self.chrome.on_frame(&mut self.page, now);
        true
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
