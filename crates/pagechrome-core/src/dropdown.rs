//! Exclusive-open dropdown menus
//!
//! Open state lives in the document itself (the open class on each
//! container plus `aria-expanded` on its toggle), so the controller only
//! carries the markup conventions. Every transition keeps at most one
//! container open.

use tracing::debug;

use crate::config::SelectorConfig;
use crate::dom::{Document, NodeId};

/// Result of activating a dropdown toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownTransition {
    Opened(NodeId),
    Closed(NodeId),
    /// The toggle's container or panel could not be resolved
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct DropdownController {
    dropdown_class: String,
    open_class: String,
    toggle_class: String,
    menu_class: String,
}

impl DropdownController {
    pub fn new(selectors: &SelectorConfig) -> Self {
        Self {
            dropdown_class: selectors.dropdown_class.clone(),
            open_class: selectors.open_class.clone(),
            toggle_class: selectors.toggle_class.clone(),
            menu_class: selectors.menu_class.clone(),
        }
    }

    /// Container and panel belonging to a toggle
    ///
    /// The panel named by `aria-controls` wins; without that attribute the
    /// first menu inside the container is used.
    pub fn parts<D: Document + ?Sized>(&self, doc: &D, toggle: NodeId) -> Option<(NodeId, NodeId)> {
        let container = doc.closest_with_class(toggle, &self.dropdown_class)?;
        let menu = match doc.attribute(toggle, "aria-controls").filter(|id| !id.is_empty()) {
            Some(menu_id) => doc.element_by_id(&menu_id),
            None => doc.first_descendant_with_class(container, &self.menu_class),
        }?;
        Some((container, menu))
    }

    /// Toggle control enclosing an interaction target, if any
    pub fn toggle_for<D: Document + ?Sized>(&self, doc: &D, target: NodeId) -> Option<NodeId> {
        doc.closest_with_class(target, &self.toggle_class)
    }

    /// True if `target` sits inside any dropdown container
    pub fn contains<D: Document + ?Sized>(&self, doc: &D, target: NodeId) -> bool {
        doc.closest_with_class(target, &self.dropdown_class).is_some()
    }

    pub fn is_open<D: Document + ?Sized>(&self, doc: &D, container: NodeId) -> bool {
        doc.has_class(container, &self.open_class)
    }

    /// Containers currently open, in document order
    pub fn open_containers<D: Document + ?Sized>(&self, doc: &D) -> Vec<NodeId> {
        doc.elements_with_class(&self.dropdown_class)
            .into_iter()
            .filter(|&c| self.is_open(doc, c))
            .collect()
    }

    /// Open the dropdown owning `toggle`, closing every other one first
    ///
    /// Returns the opened container, or `None` when the container or panel
    /// is missing (nothing changes then).
    pub fn open<D: Document + ?Sized>(&self, doc: &mut D, toggle: NodeId) -> Option<NodeId> {
        let (container, _menu) = self.parts(&*doc, toggle)?;
        self.close_all(doc, Some(container));
        doc.set_class(container, &self.open_class, true);
        doc.set_attribute(toggle, "aria-expanded", "true");
        debug!(container = container.0, "Dropdown opened");
        Some(container)
    }

    /// Close one container; `None` is a no-op
    pub fn close<D: Document + ?Sized>(&self, doc: &mut D, container: Option<NodeId>) {
        let Some(container) = container else {
            return;
        };
        doc.set_class(container, &self.open_class, false);
        if let Some(toggle) = doc.first_descendant_with_class(container, &self.toggle_class) {
            doc.set_attribute(toggle, "aria-expanded", "false");
        }
        debug!(container = container.0, "Dropdown closed");
    }

    /// Close every open container except `except`, returning how many closed
    pub fn close_all<D: Document + ?Sized>(&self, doc: &mut D, except: Option<NodeId>) -> usize {
        let to_close: Vec<NodeId> = self
            .open_containers(&*doc)
            .into_iter()
            .filter(|&c| Some(c) != except)
            .collect();
        for &container in &to_close {
            self.close(doc, Some(container));
        }
        to_close.len()
    }

    /// Activation on a toggle: open if closed, close if open
    pub fn activate<D: Document + ?Sized>(&self, doc: &mut D, toggle: NodeId) -> DropdownTransition {
        let Some(container) = doc.closest_with_class(toggle, &self.dropdown_class) else {
            return DropdownTransition::Unchanged;
        };

        if self.is_open(&*doc, container) {
            self.close(doc, Some(container));
            DropdownTransition::Closed(container)
        } else {
            match self.open(doc, toggle) {
                Some(opened) => DropdownTransition::Opened(opened),
                None => DropdownTransition::Unchanged,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{MemoryPage, PageLayout};

    struct Fixture {
        page: MemoryPage,
        dropdowns: DropdownController,
        product: NodeId,
        product_toggle: NodeId,
        company: NodeId,
        company_toggle: NodeId,
    }

    fn fixture() -> Fixture {
        let selectors = SelectorConfig::default();
        let page = MemoryPage::from_layout(&PageLayout::default(), &selectors);
        let dropdowns = DropdownController::new(&selectors);
        let product = page.element_by_id("product").unwrap();
        let company = page.element_by_id("company").unwrap();
        let product_toggle = page
            .first_descendant_with_class(product, &selectors.toggle_class)
            .unwrap();
        let company_toggle = page
            .first_descendant_with_class(company, &selectors.toggle_class)
            .unwrap();
        Fixture {
            page,
            dropdowns,
            product,
            product_toggle,
            company,
            company_toggle,
        }
    }

    fn expanded(page: &MemoryPage, toggle: NodeId) -> Option<String> {
        page.attribute(toggle, "aria-expanded")
    }

    #[test]
    fn test_open_resolves_by_aria_controls_and_fallback() {
        let f = fixture();
        let (container, menu) = f.dropdowns.parts(&f.page, f.product_toggle).unwrap();
        assert_eq!(container, f.product);
        assert_eq!(Some(menu), f.page.element_by_id("product-menu"));

        // Company toggle has no aria-controls; the first menu inside is used
        let (container, menu) = f.dropdowns.parts(&f.page, f.company_toggle).unwrap();
        assert_eq!(container, f.company);
        assert_eq!(Some(menu), f.page.element_by_id("company-menu"));
    }

    #[test]
    fn test_activate_toggles_open_and_closed() {
        let mut f = fixture();

        let t = f.dropdowns.activate(&mut f.page, f.product_toggle);
        assert_eq!(t, DropdownTransition::Opened(f.product));
        assert!(f.dropdowns.is_open(&f.page, f.product));
        assert_eq!(expanded(&f.page, f.product_toggle).as_deref(), Some("true"));

        let t = f.dropdowns.activate(&mut f.page, f.product_toggle);
        assert_eq!(t, DropdownTransition::Closed(f.product));
        assert!(f.dropdowns.open_containers(&f.page).is_empty());
        assert_eq!(expanded(&f.page, f.product_toggle).as_deref(), Some("false"));
    }

    #[test]
    fn test_opening_b_closes_a() {
        let mut f = fixture();
        f.dropdowns.activate(&mut f.page, f.product_toggle);

        let t = f.dropdowns.activate(&mut f.page, f.company_toggle);

        assert_eq!(t, DropdownTransition::Opened(f.company));
        assert_eq!(f.dropdowns.open_containers(&f.page), vec![f.company]);
        assert_eq!(expanded(&f.page, f.product_toggle).as_deref(), Some("false"));
        assert_eq!(expanded(&f.page, f.company_toggle).as_deref(), Some("true"));
    }

    #[test]
    fn test_close_all_with_exception() {
        let mut f = fixture();
        // Force both open to check close_all, bypassing exclusivity
        f.page.set_class(f.product, "open", true);
        f.page.set_class(f.company, "open", true);

        assert_eq!(f.dropdowns.close_all(&mut f.page, Some(f.company)), 1);
        assert_eq!(f.dropdowns.open_containers(&f.page), vec![f.company]);

        assert_eq!(f.dropdowns.close_all(&mut f.page, None), 1);
        assert!(f.dropdowns.open_containers(&f.page).is_empty());
        assert_eq!(f.dropdowns.close_all(&mut f.page, None), 0);
    }

    #[test]
    fn test_close_none_is_noop() {
        let mut f = fixture();
        f.dropdowns.activate(&mut f.page, f.product_toggle);
        f.dropdowns.close(&mut f.page, None);
        assert!(f.dropdowns.is_open(&f.page, f.product));
    }

    #[test]
    fn test_missing_panel_is_noop() {
        let mut f = fixture();
        f.page.set_attribute(f.product_toggle, "aria-controls", "nowhere");

        assert_eq!(
            f.dropdowns.activate(&mut f.page, f.product_toggle),
            DropdownTransition::Unchanged
        );
        assert!(!f.dropdowns.is_open(&f.page, f.product));
        assert_eq!(expanded(&f.page, f.product_toggle).as_deref(), Some("false"));
    }

    #[test]
    fn test_toggle_without_container_is_unchanged() {
        let mut f = fixture();
        let body = f.page.body();
        let stray = f.page.append(body, "button");
        f.page.set_class(stray, "dropdown__toggle", true);

        assert_eq!(f.dropdowns.toggle_for(&f.page, stray), Some(stray));
        assert!(!f.dropdowns.contains(&f.page, stray));
        assert_eq!(
            f.dropdowns.activate(&mut f.page, stray),
            DropdownTransition::Unchanged
        );
    }
}
