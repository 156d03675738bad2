//! Measurements shared by the nav release logic and anchor navigation
//!
//! Nothing here fails: a missing nav measures 0 and a missing hero puts
//! the release threshold out of reach.

use tracing::debug;

use crate::config::SelectorConfig;
use crate::dom::{Document, NodeId, Page};

#[derive(Debug, Clone)]
pub struct Geometry {
    nav_id: String,
    hero_id: String,
    released_class: String,
    /// Document y at which the nav releases
    release_at: f64,
}

impl Geometry {
    pub fn new(selectors: &SelectorConfig) -> Self {
        Self {
            nav_id: selectors.nav_id.clone(),
            hero_id: selectors.hero_id.clone(),
            released_class: selectors.released_class.clone(),
            release_at: f64::INFINITY,
        }
    }

    pub fn nav<D: Document + ?Sized>(&self, doc: &D) -> Option<NodeId> {
        doc.element_by_id(&self.nav_id)
    }

    pub fn hero<D: Document + ?Sized>(&self, doc: &D) -> Option<NodeId> {
        doc.element_by_id(&self.hero_id)
    }

    /// Rendered nav height, 0 without a nav
    pub fn nav_height<D: Document + ?Sized>(&self, doc: &D) -> f64 {
        self.nav(doc).map(|nav| doc.offset_height(nav)).unwrap_or(0.0)
    }

    /// Amount subtracted from anchor targets so they land below the nav
    ///
    /// A released nav no longer overlays content, so it contributes nothing.
    pub fn current_offset<D: Document + ?Sized>(&self, doc: &D) -> f64 {
        if doc.has_class(doc.body(), &self.released_class) {
            0.0
        } else {
            self.nav_height(doc)
        }
    }

    /// Recompute the release threshold from the hero's current box
    ///
    /// The threshold is the hero's last document row:
    /// `top + height - 1`. Returns the new threshold.
    pub fn compute_hero_release<P: Page + ?Sized>(&mut self, page: &P) -> f64 {
        self.release_at = match self.hero(page) {
            Some(hero) => page.document_top(hero) + page.offset_height(hero) - 1.0,
            None => f64::INFINITY,
        };
        debug!(release_at = self.release_at, "Hero release threshold computed");
        self.release_at
    }

    /// Current release threshold (infinite until a hero has been measured)
    #[inline]
    pub fn release_threshold(&self) -> f64 {
        self.release_at
    }
}
