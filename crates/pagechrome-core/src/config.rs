use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Markup conventions the chrome controllers look for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Id of the nav container
    #[serde(default = "default_nav_id")]
    pub nav_id: String,
    /// Id of the hero region whose bottom edge releases the nav
    #[serde(default = "default_hero_id")]
    pub hero_id: String,
    /// Body class set while the nav is released
    #[serde(default = "default_released_class")]
    pub released_class: String,
    /// Nav class set while the nav is released
    #[serde(default = "default_nav_off_class")]
    pub nav_off_class: String,
    /// Class of a dropdown container
    #[serde(default = "default_dropdown_class")]
    pub dropdown_class: String,
    /// Class marking an open dropdown container
    #[serde(default = "default_open_class")]
    pub open_class: String,
    /// Class of the button that toggles a dropdown
    #[serde(default = "default_toggle_class")]
    pub toggle_class: String,
    /// Class of a dropdown panel
    #[serde(default = "default_menu_class")]
    pub menu_class: String,
    /// Attribute marking links handled by the anchor navigator
    #[serde(default = "default_scroll_marker")]
    pub scroll_marker: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            nav_id: default_nav_id(),
            hero_id: default_hero_id(),
            released_class: default_released_class(),
            nav_off_class: default_nav_off_class(),
            dropdown_class: default_dropdown_class(),
            open_class: default_open_class(),
            toggle_class: default_toggle_class(),
            menu_class: default_menu_class(),
            scroll_marker: default_scroll_marker(),
        }
    }
}

/// Programmatic scroll settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Duration of anchor navigation scrolls in milliseconds
    #[serde(default = "default_anchor_duration")]
    pub anchor_duration_ms: u64,
    /// Duration used when a caller does not pick one
    #[serde(default = "default_scroll_duration")]
    pub default_duration_ms: u64,
    /// Extra pixels added to anchor targets so the section edge sits just under the nav
    #[serde(default = "default_anchor_nudge")]
    pub anchor_nudge_px: f64,
    /// Jump instead of animating when the platform asks for reduced motion
    #[serde(default = "default_true")]
    pub respect_reduced_motion: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            anchor_duration_ms: default_anchor_duration(),
            default_duration_ms: default_scroll_duration(),
            anchor_nudge_px: default_anchor_nudge(),
            respect_reduced_motion: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while an animation or a throttled update is pending
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Pixels scrolled per line step in the preview
    #[serde(default = "default_scroll_step")]
    pub scroll_step_px: f64,
    /// Pixels represented by one terminal row in the preview
    #[serde(default = "default_px_per_row")]
    pub px_per_row: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            scroll_step_px: default_scroll_step(),
            px_per_row: default_px_per_row(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-d>" (Ctrl+d), "<S-Tab>" (Shift+Tab), "<CR>" (Enter), "<Esc>", "<Tab>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the preview
    #[serde(default = "default_key_quit")]
    pub quit: String,

    // Manual scrolling
    /// Scroll down one step
    #[serde(default = "default_key_scroll_down")]
    pub scroll_down: String,
    /// Scroll up one step
    #[serde(default = "default_key_scroll_up")]
    pub scroll_up: String,
    /// Scroll half a viewport down
    #[serde(default = "default_key_half_page_down")]
    pub half_page_down: String,
    /// Scroll half a viewport up
    #[serde(default = "default_key_half_page_up")]
    pub half_page_up: String,
    /// Jump to the top of the page
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,

    // Pointer simulation
    /// Move the pointer to the next clickable element
    #[serde(default = "default_key_next_target")]
    pub next_target: String,
    /// Move the pointer to the previous clickable element
    #[serde(default = "default_key_prev_target")]
    pub prev_target: String,
    /// Click the element under the pointer
    #[serde(default = "default_key_activate")]
    pub activate: String,
    /// Click on the page background
    #[serde(default = "default_key_click_outside")]
    pub click_outside: String,
    /// Send the cancel key to the page
    #[serde(default = "default_key_escape")]
    pub escape: String,

    // Platform simulation
    /// Flip the reduced-motion preference
    #[serde(default = "default_key_toggle_reduced_motion")]
    pub toggle_reduced_motion: String,
    /// Grow the simulated viewport width
    #[serde(default = "default_key_widen")]
    pub widen: String,
    /// Shrink the simulated viewport width
    #[serde(default = "default_key_narrow")]
    pub narrow: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            scroll_down: default_key_scroll_down(),
            scroll_up: default_key_scroll_up(),
            half_page_down: default_key_half_page_down(),
            half_page_up: default_key_half_page_up(),
            jump_to_top: default_key_jump_to_top(),
            next_target: default_key_next_target(),
            prev_target: default_key_prev_target(),
            activate: default_key_activate(),
            click_outside: default_key_click_outside(),
            escape: default_key_escape(),
            toggle_reduced_motion: default_key_toggle_reduced_motion(),
            widen: default_key_widen(),
            narrow: default_key_narrow(),
        }
    }
}

// Default keymap values (Vim-style notation)
fn default_key_quit() -> String { "q".to_string() }
fn default_key_scroll_down() -> String { "j".to_string() }
fn default_key_scroll_up() -> String { "k".to_string() }
fn default_key_half_page_down() -> String { "<C-d>".to_string() }
fn default_key_half_page_up() -> String { "<C-u>".to_string() }
fn default_key_jump_to_top() -> String { "g".to_string() }
fn default_key_next_target() -> String { "<Tab>".to_string() }
fn default_key_prev_target() -> String { "<S-Tab>".to_string() }
fn default_key_activate() -> String { "<CR>".to_string() }
fn default_key_click_outside() -> String { "o".to_string() }
fn default_key_escape() -> String { "<Esc>".to_string() }
fn default_key_toggle_reduced_motion() -> String { "m".to_string() }
fn default_key_widen() -> String { "+".to_string() }
fn default_key_narrow() -> String { "-".to_string() }

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_nav_id() -> String {
    "siteNav".to_string()
}

fn default_hero_id() -> String {
    "home".to_string()
}

fn default_released_class() -> String {
    "released".to_string()
}

fn default_nav_off_class() -> String {
    "nav--off".to_string()
}

fn default_dropdown_class() -> String {
    "dropdown".to_string()
}

fn default_open_class() -> String {
    "open".to_string()
}

fn default_toggle_class() -> String {
    "dropdown__toggle".to_string()
}

fn default_menu_class() -> String {
    "dropdown__menu".to_string()
}

fn default_scroll_marker() -> String {
    "data-scroll".to_string()
}

fn default_anchor_duration() -> u64 {
    700
}

fn default_scroll_duration() -> u64 {
    1700
}

fn default_anchor_nudge() -> f64 {
    1.0
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_scroll_step() -> f64 {
    40.0
}

fn default_px_per_row() -> f64 {
    20.0
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file, which must exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Err(crate::Error::Config(format!(
                "config file {} not found",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pagechrome/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pagechrome")
            .join("config.toml")
    }

    /// Directory for preview log files
    pub fn log_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pagechrome")
    }
}
