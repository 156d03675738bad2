//! Document and viewport access
//!
//! Every behavioral component talks to the page through these two traits.
//! [`Document`] covers tree queries and the presentation state we mutate
//! (classes, attributes, inline styles); [`Viewport`] covers the scroll
//! offset and platform preferences. A browser binding and the in-memory
//! [`MemoryPage`](crate::page::MemoryPage) both implement them.

/// Handle to an element in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Tree queries and presentation mutations on a page
pub trait Document {
    /// The `<body>` element
    fn body(&self) -> NodeId;

    /// The document root (`<html>`)
    fn root(&self) -> NodeId;

    /// Look up an element by its `id` attribute
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Direct children in document order
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Add or remove a class
    fn set_class(&mut self, node: NodeId, class: &str, on: bool);

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Set an inline style property (CSS property name, e.g. `scroll-padding-top`)
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Rendered height of an element in CSS pixels
    fn offset_height(&self, node: NodeId) -> f64;

    /// Top edge of an element relative to the top of the viewport
    fn viewport_top(&self, node: NodeId) -> f64;

    /// True for an image element that has not finished loading
    fn is_pending_image(&self, node: NodeId) -> bool {
        let _ = node;
        false
    }

    /// Nearest inclusive ancestor carrying `class`
    fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.has_class(n, class) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// Nearest inclusive ancestor carrying attribute `name`
    fn closest_with_attribute(&self, node: NodeId, name: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.attribute(n, name).is_some() {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// First descendant (excluding `node`) carrying `class`, depth first in document order
    fn first_descendant_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();
        while let Some(n) = stack.pop() {
            if self.has_class(n, class) {
                return Some(n);
            }
            stack.extend(self.children(n).into_iter().rev());
        }
        None
    }

    /// Every element carrying `class`, in document order
    fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(n) = stack.pop() {
            if self.has_class(n, class) {
                found.push(n);
            }
            stack.extend(self.children(n).into_iter().rev());
        }
        found
    }
}

/// Scroll offset and platform preferences of the window showing a [`Document`]
pub trait Viewport {
    /// Current vertical scroll offset (`window.scrollY`)
    fn scroll_y(&self) -> f64;

    /// Write the vertical scroll offset; implementations clamp to the scrollable range
    fn scroll_to(&mut self, y: f64);

    /// User asked for reduced motion (`prefers-reduced-motion: reduce`)
    fn prefers_reduced_motion(&self) -> bool;
}

/// A page is anything that is both a document and the viewport showing it
pub trait Page: Document + Viewport {
    /// Document-relative top of an element
    fn document_top(&self, node: NodeId) -> f64 {
        self.viewport_top(node) + self.scroll_y()
    }
}

impl<T: Document + Viewport + ?Sized> Page for T {}
