//! In-page anchor navigation with nav compensation
//!
//! Links carrying the scroll marker attribute and a `#fragment` href are
//! taken over: the default jump is suppressed and the viewport animates to
//! the target, offset by whatever the pinned nav currently covers.

use tracing::debug;

use crate::config::{ScrollConfig, SelectorConfig};
use crate::dom::{Document, NodeId, Page};
use crate::dropdown::DropdownController;
use crate::geometry::Geometry;
use crate::scroll::{ScrollAnimator, ScrollConfigExt, ScrollStart};

/// A navigation the handler took over
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorJump {
    /// The activated link
    pub link: NodeId,
    /// Element the fragment resolved to
    pub target: NodeId,
    /// Corrected scroll destination
    pub destination: f64,
    pub start: ScrollStart,
}

#[derive(Debug, Clone)]
pub struct AnchorNavigator {
    marker: String,
    nudge: f64,
    duration: f64,
}

impl AnchorNavigator {
    pub fn new(selectors: &SelectorConfig, scroll: &ScrollConfig) -> Self {
        Self {
            marker: selectors.scroll_marker.clone(),
            nudge: scroll.anchor_nudge_px,
            duration: scroll.anchor_duration(),
        }
    }

    /// Marked link enclosing an interaction target
    pub fn link_for<D: Document + ?Sized>(&self, doc: &D, target: NodeId) -> Option<NodeId> {
        doc.closest_with_attribute(target, &self.marker)
    }

    /// Element a link's `#fragment` points at
    ///
    /// Hrefs that are not fragments, or fragments naming no element, do not
    /// resolve.
    pub fn resolve<D: Document + ?Sized>(&self, doc: &D, link: NodeId) -> Option<NodeId> {
        let href = doc.attribute(link, "href")?;
        let fragment = href.strip_prefix('#')?;
        if fragment.is_empty() {
            return None;
        }
        doc.element_by_id(fragment)
    }

    /// Scroll offset that puts `target` just below the pinned nav
    pub fn destination<P: Page + ?Sized>(&self, page: &P, geometry: &Geometry, target: NodeId) -> f64 {
        page.document_top(target) - geometry.current_offset(page) + self.nudge
    }

    /// Handle an activation on `clicked`
    ///
    /// Returns `None` when the activation is not ours to take over: no
    /// marked link, a non-fragment href, or a fragment with no element. The
    /// caller must leave the default action alone in that case.
    pub fn navigate<P: Page + ?Sized>(
        &self,
        page: &mut P,
        geometry: &Geometry,
        animator: &mut ScrollAnimator,
        dropdowns: &DropdownController,
        clicked: NodeId,
        now: f64,
    ) -> Option<AnchorJump> {
        let link = self.link_for(&*page, clicked)?;
        let target = match self.resolve(&*page, link) {
            Some(target) => target,
            None => {
                debug!(
                    href = %page.attribute(link, "href").unwrap_or_default(),
                    "Anchor target not found, leaving default navigation"
                );
                return None;
            }
        };

        let destination = self.destination(&*page, geometry, target);
        let start = animator.animate_scroll_to(page, destination, self.duration, now);

        // The link may sit inside an open menu
        dropdowns.close_all(page, None);

        debug!(target = target.0, destination, "Anchor navigation");
        Some(AnchorJump {
            link,
            target,
            destination,
            start,
        })
    }
}
