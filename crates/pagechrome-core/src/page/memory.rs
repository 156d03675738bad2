//! In-memory page used by tests, the headless simulator and the preview
//!
//! Elements live in an arena indexed by [`NodeId`]. Body children flow top
//! to bottom in document order; elements marked fixed (the nav) sit outside
//! the flow and keep their viewport position while the page scrolls.
//! Descendants share the top edge of their flow ancestor, which is all the
//! chrome controllers ever measure.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::SelectorConfig;
use crate::dom::{Document, NodeId, Viewport};

use super::layout::{HeroLayout, LinkLayout, PageLayout};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    text: String,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Document top for flow content, viewport top for fixed content
    top: f64,
    height: f64,
    fixed: bool,
    pending_image: bool,
}

impl Node {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_string(),
            text: String::new(),
            classes: BTreeSet::new(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            parent,
            children: Vec::new(),
            top: 0.0,
            height: 0.0,
            fixed: false,
            pending_image: false,
        }
    }
}

/// Hero whose height depends on viewport width or image load state
#[derive(Debug, Clone)]
struct HeroSizing {
    node: NodeId,
    layout: HeroLayout,
}

#[derive(Debug, Clone)]
pub struct MemoryPage {
    nodes: Vec<Node>,
    viewport_width: f64,
    viewport_height: f64,
    scroll_y: f64,
    reduced_motion: bool,
    hero: Option<HeroSizing>,
}

const ROOT: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

impl MemoryPage {
    /// Empty `<html><body></body></html>` page
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        let mut root = Node::new("html", None);
        root.children.push(BODY);
        Self {
            nodes: vec![root, Node::new("body", Some(ROOT))],
            viewport_width,
            viewport_height,
            scroll_y: 0.0,
            reduced_motion: false,
            hero: None,
        }
    }

    /// Build the landing page described by `layout`, using the markup
    /// conventions in `selectors`
    pub fn from_layout(layout: &PageLayout, selectors: &SelectorConfig) -> Self {
        let mut page = Self::new(layout.viewport.width, layout.viewport.height);
        page.reduced_motion = layout.viewport.reduced_motion;

        if let Some(nav_layout) = &layout.nav {
            let nav = page.append(BODY, "header");
            page.set_attribute(nav, "id", &nav_layout.id);
            page.node_mut(nav).fixed = true;
            page.node_mut(nav).height = nav_layout.height;

            for link in &layout.links {
                page.append_link(nav, link, selectors);
            }

            for dropdown in &layout.dropdowns {
                let container = page.append(nav, "div");
                page.set_attribute(container, "id", &dropdown.id);
                page.set_class(container, &selectors.dropdown_class, true);

                let menu_id = dropdown.menu_id();
                let toggle = page.append(container, "button");
                page.set_text(toggle, &dropdown.label);
                page.set_class(toggle, &selectors.toggle_class, true);
                page.set_attribute(toggle, "aria-expanded", "false");
                if dropdown.controls_attribute {
                    page.set_attribute(toggle, "aria-controls", &menu_id);
                }

                let menu = page.append(container, "ul");
                page.set_attribute(menu, "id", &menu_id);
                page.set_class(menu, &selectors.menu_class, true);
                for item in &dropdown.items {
                    let li = page.append(menu, "li");
                    page.append_link(li, item, selectors);
                }
            }
        }

        if let Some(hero_layout) = &layout.hero {
            let tag = if hero_layout.image { "img" } else { "section" };
            let hero = page.append(BODY, tag);
            page.set_attribute(hero, "id", &hero_layout.id);
            page.set_text(hero, &hero_layout.title);
            page.node_mut(hero).pending_image = hero_layout.starts_pending();
            page.hero = Some(HeroSizing {
                node: hero,
                layout: hero_layout.clone(),
            });
        }

        for section_layout in &layout.sections {
            let section = page.append(BODY, "section");
            page.set_attribute(section, "id", &section_layout.id);
            page.set_text(section, &section_layout.title);
            page.node_mut(section).height = section_layout.height;
            let heading = page.append(section, "h2");
            page.set_text(heading, &section_layout.title);
        }

        page.relayout();
        page
    }

    fn append_link(&mut self, parent: NodeId, link: &LinkLayout, selectors: &SelectorConfig) -> NodeId {
        let a = self.append(parent, "a");
        self.set_attribute(a, "href", &link.href);
        if link.smooth {
            self.set_attribute(a, &selectors.scroll_marker, "");
        }
        self.set_text(a, &link.label);
        a
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Append a new element as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(tag, Some(parent)));
        self.node_mut(parent).children.push(id);
        id
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.node_mut(node).text = text.to_string();
    }

    pub fn text(&self, node: NodeId) -> &str {
        &self.node(node).text
    }

    /// Pin an element to the viewport at `top` with `height`
    pub fn set_fixed(&mut self, node: NodeId, top: f64, height: f64) {
        let n = self.node_mut(node);
        n.fixed = true;
        n.top = top;
        n.height = height;
    }

    /// Set the height of a flow element and lay the page out again
    pub fn set_height(&mut self, node: NodeId, height: f64) {
        self.node_mut(node).height = height;
        self.relayout();
    }

    /// Mark an image element as still loading (it then has no height)
    pub fn set_pending_image(&mut self, node: NodeId, pending: bool) {
        self.node_mut(node).pending_image = pending;
        self.relayout();
    }

    /// Finish loading an image; returns true if it was pending
    pub fn complete_image(&mut self, node: NodeId) -> bool {
        let was_pending = self.node(node).pending_image;
        self.set_pending_image(node, false);
        was_pending
    }

    /// Finish loading the hero image, if there is one
    pub fn complete_hero_image(&mut self) -> bool {
        match self.hero.as_ref().map(|h| h.node) {
            Some(node) => self.complete_image(node),
            None => false,
        }
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Resize the viewport; an aspect-ratio hero follows the new width
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport_width = width.max(1.0);
        self.viewport_height = height.max(1.0);
        self.relayout();
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Total height of the flow content
    pub fn document_height(&self) -> f64 {
        self.flow_children()
            .iter()
            .map(|&n| self.node(n).height)
            .sum()
    }

    /// Largest reachable scroll offset
    pub fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height).max(0.0)
    }

    /// Body children taking part in vertical flow
    pub fn flow_children(&self) -> Vec<NodeId> {
        self.node(BODY)
            .children
            .iter()
            .copied()
            .filter(|&n| !self.node(n).fixed)
            .collect()
    }

    /// Document top of a flow element
    pub fn flow_top(&self, node: NodeId) -> f64 {
        self.node(node).top
    }

    /// Links and buttons in document order
    pub fn clickables(&self) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(n) = stack.pop() {
            if matches!(self.node(n).tag.as_str(), "a" | "button") {
                found.push(n);
            }
            stack.extend(self.node(n).children.iter().rev().copied());
        }
        found
    }

    /// True if `node` or one of its ancestors is pinned to the viewport
    fn in_fixed_layer(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.node(n).fixed {
                return true;
            }
            current = self.node(n).parent;
        }
        false
    }

    fn relayout(&mut self) {
        if let Some(hero) = &self.hero {
            let height = if self.node(hero.node).pending_image {
                0.0
            } else {
                hero.layout.height_at(self.viewport_width)
            };
            let node = hero.node;
            self.node_mut(node).height = height;
        }

        let mut y = 0.0;
        for child in self.flow_children() {
            self.node_mut(child).top = y;
            y += self.node(child).height;
            self.place_descendants(child);
        }
    }

    fn place_descendants(&mut self, node: NodeId) {
        let top = self.node(node).top;
        let mut stack = self.node(node).children.clone();
        while let Some(n) = stack.pop() {
            if self.node(n).fixed {
                continue;
            }
            self.node_mut(n).top = top;
            stack.extend(self.node(n).children.iter().copied());
        }
    }
}

impl Document for MemoryPage {
    fn body(&self) -> NodeId {
        BODY
    }

    fn root(&self) -> NodeId {
        ROOT
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.attributes.get("id").map(String::as_str) == Some(id))
            .map(NodeId)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).children.clone()
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).classes.contains(class)
    }

    fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        let classes = &mut self.node_mut(node).classes;
        if on {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node).attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.node_mut(node)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        self.node_mut(node)
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node).styles.get(property).cloned()
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.node(node).height
    }

    fn viewport_top(&self, node: NodeId) -> f64 {
        if self.in_fixed_layer(node) {
            self.node(node).top
        } else {
            self.node(node).top - self.scroll_y
        }
    }

    fn is_pending_image(&self, node: NodeId) -> bool {
        let n = self.node(node);
        n.tag == "img" && n.pending_image
    }
}

impl Viewport for MemoryPage {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}
