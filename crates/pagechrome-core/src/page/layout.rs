//! Declarative description of a simulated landing page

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page title shown by the preview
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub viewport: ViewportLayout,
    /// Nav chrome; omit to simulate a page without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav: Option<NavLayout>,
    /// Hero region; omit to simulate a page that never releases the nav
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<HeroLayout>,
    /// Content sections below the hero, in document order
    #[serde(default)]
    pub sections: Vec<SectionLayout>,
    /// Plain nav links (outside any dropdown)
    #[serde(default)]
    pub links: Vec<LinkLayout>,
    /// Dropdown menus inside the nav
    #[serde(default)]
    pub dropdowns: Vec<DropdownLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportLayout {
    #[serde(default = "default_viewport_width")]
    pub width: f64,
    #[serde(default = "default_viewport_height")]
    pub height: f64,
    /// Simulated `prefers-reduced-motion: reduce`
    #[serde(default)]
    pub reduced_motion: bool,
}

impl Default for ViewportLayout {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
            reduced_motion: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavLayout {
    #[serde(default = "default_nav_id")]
    pub id: String,
    #[serde(default = "default_nav_height")]
    pub height: f64,
}

impl Default for NavLayout {
    fn default() -> Self {
        Self {
            id: default_nav_id(),
            height: default_nav_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroLayout {
    #[serde(default = "default_hero_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Fixed height in pixels, used when no aspect ratio is given
    #[serde(default = "default_hero_height")]
    pub height: f64,
    /// Width / height ratio; the hero then scales with the viewport width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    /// Render the hero as an image element
    #[serde(default)]
    pub image: bool,
    /// Milliseconds until the hero image finishes loading; 0 means already loaded
    #[serde(default)]
    pub load_delay_ms: u64,
}

impl HeroLayout {
    /// Rendered height at a given viewport width
    pub fn height_at(&self, viewport_width: f64) -> f64 {
        match self.aspect_ratio {
            Some(ratio) if ratio > 0.0 => (viewport_width / ratio).round(),
            _ => self.height,
        }
    }

    /// Whether the hero starts out as an image that is still loading
    pub fn starts_pending(&self) -> bool {
        self.image && self.load_delay_ms > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionLayout {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_section_height")]
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkLayout {
    pub label: String,
    pub href: String,
    /// Carry the smooth-scroll marker attribute
    #[serde(default = "default_true")]
    pub smooth: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropdownLayout {
    pub id: String,
    pub label: String,
    /// Point the toggle at its menu with `aria-controls`
    #[serde(default = "default_true")]
    pub controls_attribute: bool,
    #[serde(default)]
    pub items: Vec<LinkLayout>,
}

impl DropdownLayout {
    /// Id of the generated menu panel
    pub fn menu_id(&self) -> String {
        format!("{}-menu", self.id)
    }
}

impl PageLayout {
    /// Parse a layout from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let layout: Self = toml::from_str(content)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Load a layout file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Layout(e.to_string()))
    }

    /// Reject layouts the simulated page cannot lay out
    pub fn validate(&self) -> crate::Result<()> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(crate::Error::Layout(
                "viewport width and height must be positive".to_string(),
            ));
        }

        let mut ids: Vec<String> = Vec::new();
        ids.extend(self.nav.iter().map(|n| n.id.clone()));
        ids.extend(self.hero.iter().map(|h| h.id.clone()));
        ids.extend(self.sections.iter().map(|s| s.id.clone()));
        ids.extend(self.dropdowns.iter().map(|d| d.id.clone()));
        // Menus get generated ids that share the namespace
        ids.extend(self.dropdowns.iter().map(|d| d.menu_id()));

        let mut seen = std::collections::HashSet::new();
        for id in &ids {
            if id.is_empty() {
                return Err(crate::Error::Layout("element id must not be empty".to_string()));
            }
            if !seen.insert(id.as_str()) {
                return Err(crate::Error::Layout(format!("duplicate element id '{}'", id)));
            }
        }

        if let Some(hero) = &self.hero {
            if !(hero.height.is_finite() && hero.height >= 0.0) {
                return Err(crate::Error::Layout(format!(
                    "hero '{}' needs a non-negative height",
                    hero.id
                )));
            }
        }

        if let Some(section) = self
            .sections
            .iter()
            .find(|s| !(s.height.is_finite() && s.height >= 0.0))
        {
            return Err(crate::Error::Layout(format!(
                "section '{}' needs a non-negative height",
                section.id
            )));
        }

        Ok(())
    }
}

impl Default for PageLayout {
    /// A five-section landing page with two dropdown menus
    fn default() -> Self {
        let section = |id: &str, title: &str, height: f64| SectionLayout {
            id: id.to_string(),
            title: title.to_string(),
            height,
        };
        let link = |label: &str, href: &str| LinkLayout {
            label: label.to_string(),
            href: href.to_string(),
            smooth: true,
        };

        Self {
            title: default_title(),
            viewport: ViewportLayout::default(),
            nav: Some(NavLayout::default()),
            hero: Some(HeroLayout {
                id: default_hero_id(),
                title: "Ship calmer launches".to_string(),
                height: default_hero_height(),
                aspect_ratio: Some(16.0 / 9.0),
                image: true,
                load_delay_ms: 600,
            }),
            sections: vec![
                section("features", "Features", 900.0),
                section("pricing", "Pricing", 700.0),
                section("customers", "Customers", 800.0),
                section("faq", "FAQ", 600.0),
                section("contact", "Contact", 500.0),
            ],
            links: vec![link("Home", "#home"), link("Contact", "#contact")],
            dropdowns: vec![
                DropdownLayout {
                    id: "product".to_string(),
                    label: "Product".to_string(),
                    controls_attribute: true,
                    items: vec![link("Features", "#features"), link("Pricing", "#pricing")],
                },
                DropdownLayout {
                    id: "company".to_string(),
                    label: "Company".to_string(),
                    controls_attribute: false,
                    items: vec![
                        link("Customers", "#customers"),
                        link("FAQ", "#faq"),
                        link("Careers", "#careers"),
                    ],
                },
            ],
        }
    }
}

fn default_title() -> String {
    "Landing".to_string()
}

fn default_viewport_width() -> f64 {
    1280.0
}

fn default_viewport_height() -> f64 {
    720.0
}

fn default_nav_id() -> String {
    "siteNav".to_string()
}

fn default_nav_height() -> f64 {
    80.0
}

fn default_hero_id() -> String {
    "home".to_string()
}

fn default_hero_height() -> f64 {
    600.0
}

fn default_section_height() -> f64 {
    800.0
}

fn default_true() -> bool {
    true
}
