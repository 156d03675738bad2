//! Headless replay of a scripted page session
//!
//! The clock is virtual: every step happens at the current simulated time
//! and only `advance`/`frames` steps move it forward, running display
//! refreshes at the configured animation rate while the chrome asks for them.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use pagechrome_core::{
    AppConfig, Document, Key, MemoryPage, NodeId, PageChrome, PageLayout, Viewport,
};

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// User scroll to an absolute offset
    Scroll { to: f64 },
    /// User scroll by a relative amount
    ScrollBy { by: f64 },
    /// Programmatic smooth scroll
    ScrollTo {
        to: f64,
        #[serde(default)]
        duration_ms: Option<f64>,
    },
    /// Click `#id`, `body`, or the link/button whose text matches
    Click { target: String },
    /// Key press by DOM key name (`Escape`, ...)
    Key { key: String },
    Resize {
        width: f64,
        #[serde(default)]
        height: Option<f64>,
    },
    HeroLoaded,
    ReducedMotion { on: bool },
    /// Let `ms` of simulated time pass, refreshing while frames are needed
    Advance { ms: f64 },
    /// Run exactly `count` display refreshes
    Frames { count: u32 },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Scroll { .. } => "scroll",
            Step::ScrollBy { .. } => "scroll_by",
            Step::ScrollTo { .. } => "scroll_to",
            Step::Click { .. } => "click",
            Step::Key { .. } => "key",
            Step::Resize { .. } => "resize",
            Step::HeroLoaded => "hero_loaded",
            Step::ReducedMotion { .. } => "reduced_motion",
            Step::Advance { .. } => "advance",
            Step::Frames { .. } => "frames",
        }
    }
}

impl Script {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

pub fn run(config: &AppConfig, layout: PageLayout, script_path: &Path, pretty: bool) -> Result<()> {
    let content = std::fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let script = Script::from_toml(&content)
        .with_context(|| format!("Failed to parse script {}", script_path.display()))?;

    for record in simulate(config, &layout, &script)? {
        let line = if pretty {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };
        println!("{}", line);
    }
    Ok(())
}

/// Simulated page session
struct Session {
    page: MemoryPage,
    chrome: PageChrome,
    now: f64,
    frame_ms: f64,
}

impl Session {
    fn new(config: &AppConfig, layout: &PageLayout) -> Self {
        let mut page = MemoryPage::from_layout(layout, &config.selectors);
        let mut chrome = PageChrome::new(config);
        chrome.on_ready(&mut page);
        Self {
            page,
            chrome,
            now: 0.0,
            frame_ms: 1000.0 / config.ui.animation_fps.max(1) as f64,
        }
    }

    fn frame(&mut self) {
        self.now += self.frame_ms;
        self.chrome.on_frame(&mut self.page, self.now);
    }

    fn resolve(&self, target: &str) -> Result<NodeId> {
        if target == "body" {
            return Ok(self.page.body());
        }
        if let Some(id) = target.strip_prefix('#') {
            return self
                .page
                .element_by_id(id)
                .ok_or_else(|| anyhow!("No element with id '{}'", id));
        }
        self.page
            .clickables()
            .into_iter()
            .find(|&n| self.page.text(n) == target)
            .ok_or_else(|| anyhow!("No link or button labelled '{}'", target))
    }

    fn apply(&mut self, step: &Step) -> Result<Option<Value>> {
        match step {
            Step::Scroll { to } => {
                self.page.scroll_to(*to);
                self.chrome.on_scroll();
            }
            Step::ScrollBy { by } => {
                let y = self.page.scroll_y() + by;
                self.page.scroll_to(y);
                self.chrome.on_scroll();
            }
            Step::ScrollTo { to, duration_ms } => {
                let start = match duration_ms {
                    Some(ms) => self.chrome.scroll_to_with(&mut self.page, *to, *ms, self.now),
                    None => self.chrome.scroll_to(&mut self.page, *to, self.now),
                };
                return Ok(Some(json!({ "start": format!("{:?}", start) })));
            }
            Step::Click { target } => {
                let node = self.resolve(target)?;
                let outcome = self.chrome.on_click(&mut self.page, node, self.now);
                return Ok(Some(json!({
                    "default_prevented": outcome.default_prevented,
                    "destination": outcome.anchor.map(|jump| jump.destination),
                    "dropdown": outcome.dropdown.map(|t| format!("{:?}", t)),
                    "closed": outcome.closed,
                })));
            }
            Step::Key { key } => {
                let closed = self.chrome.on_key(&mut self.page, Key::from_dom(key));
                return Ok(Some(json!({ "closed": closed })));
            }
            Step::Resize { width, height } => {
                if *width <= 0.0 || height.is_some_and(|h| h <= 0.0) {
                    bail!("Viewport size must be positive");
                }
                let height = height.unwrap_or_else(|| self.page.viewport_height());
                self.page.resize(*width, height);
                self.chrome.on_resize(&mut self.page);
            }
            Step::HeroLoaded => {
                self.page.complete_hero_image();
                let recomputed = self.chrome.on_hero_loaded(&mut self.page);
                return Ok(Some(json!({ "recomputed": recomputed })));
            }
            Step::ReducedMotion { on } => self.page.set_reduced_motion(*on),
            Step::Advance { ms } => {
                let until = self.now + ms.max(0.0);
                let mut frames = 0u32;
                while self.chrome.needs_frame() && self.now + self.frame_ms <= until {
                    self.frame();
                    frames += 1;
                }
                self.now = until;
                return Ok(Some(json!({ "frames": frames })));
            }
            Step::Frames { count } => {
                for _ in 0..*count {
                    self.frame();
                }
            }
        }
        Ok(None)
    }
}

/// Run every step and collect one record per step, plus the initial state
pub fn simulate(config: &AppConfig, layout: &PageLayout, script: &Script) -> Result<Vec<Value>> {
    let mut session = Session::new(config, layout);
    let mut records = vec![json!({
        "step": 0,
        "action": "ready",
        "now": session.now,
        "snapshot": session.chrome.snapshot(&session.page),
    })];

    for (index, step) in script.steps.iter().enumerate() {
        let result = session
            .apply(step)
            .with_context(|| format!("Step {} ({}) failed", index + 1, step.name()))?;
        debug!(step = index + 1, action = step.name(), now = session.now, "Step applied");

        let mut record = json!({
            "step": index + 1,
            "action": step.name(),
            "now": session.now,
            "snapshot": session.chrome.snapshot(&session.page),
        });
        if let Some(result) = result {
            record["result"] = result;
        }
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(text: &str) -> Vec<Value> {
        let script = Script::from_toml(text).unwrap();
        simulate(&AppConfig::default(), &PageLayout::default(), &script).unwrap()
    }

    #[test]
    fn test_initial_record_reflects_pending_hero() {
        let records = run_script("");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["action"], "ready");
        assert_eq!(records[0]["snapshot"]["release_threshold"], -1.0);
    }

    #[test]
    fn test_scroll_applies_on_next_frame() {
        let records = run_script(
            r#"
            [[steps]]
            action = "hero_loaded"

            [[steps]]
            action = "frames"
            count = 1

            [[steps]]
            action = "scroll"
            to = 800

            [[steps]]
            action = "frames"
            count = 1
            "#,
        );

        assert_eq!(records[1]["result"]["recomputed"], true);
        assert_eq!(records[2]["snapshot"]["released"], false);
        assert_eq!(records[3]["snapshot"]["released"], false);
        assert_eq!(records[3]["snapshot"]["frame_pending"], true);
        assert_eq!(records[4]["snapshot"]["released"], true);
        assert_eq!(records[4]["snapshot"]["scroll_padding"], "0px");
    }

    #[test]
    fn test_menu_navigation_session() {
        let records = run_script(
            r#"
            [[steps]]
            action = "hero_loaded"

            [[steps]]
            action = "advance"
            ms = 50

            [[steps]]
            action = "click"
            target = "Product"

            [[steps]]
            action = "click"
            target = "Company"

            [[steps]]
            action = "click"
            target = "FAQ"

            [[steps]]
            action = "advance"
            ms = 1000
            "#,
        );

        assert_eq!(records[3]["snapshot"]["open_dropdowns"], json!(["product"]));
        assert_eq!(records[4]["snapshot"]["open_dropdowns"], json!(["company"]));

        let click = &records[5];
        assert_eq!(click["result"]["default_prevented"], true);
        // 720 + 900 + 700 + 800 - 80 + 1
        assert_eq!(click["result"]["destination"], 3041.0);
        assert_eq!(click["snapshot"]["open_dropdowns"], json!([]));
        assert_eq!(click["snapshot"]["animating"], true);

        let done = &records[6];
        assert_eq!(done["snapshot"]["scroll_y"], 3041.0);
        assert_eq!(done["snapshot"]["animating"], false);
        assert_eq!(done["snapshot"]["released"], true);
    }

    #[test]
    fn test_escape_and_unknown_target() {
        let script = Script::from_toml(
            r##"
            [[steps]]
            action = "click"
            target = "Company"

            [[steps]]
            action = "key"
            key = "Escape"

            [[steps]]
            action = "click"
            target = "#nowhere"
            "##,
        )
        .unwrap();

        let err = simulate(&AppConfig::default(), &PageLayout::default(), &script).unwrap_err();
        assert!(format!("{:#}", err).contains("nowhere"));

        let records = run_script(
            r#"
            [[steps]]
            action = "click"
            target = "Company"

            [[steps]]
            action = "key"
            key = "Escape"
            "#,
        );
        assert_eq!(records[2]["result"]["closed"], 1);
    }

    #[test]
    fn test_reduced_motion_jump() {
        let records = run_script(
            r##"
            [[steps]]
            action = "reduced_motion"
            on = true

            [[steps]]
            action = "click"
            target = "#features"
            "##,
        );
        // Clicking a section is an outside click, not a navigation
        assert_eq!(records[2]["result"]["default_prevented"], false);

        let records = run_script(
            r#"
            [[steps]]
            action = "hero_loaded"

            [[steps]]
            action = "reduced_motion"
            on = true

            [[steps]]
            action = "scroll_to"
            to = 1200
            "#,
        );
        assert_eq!(records[3]["result"]["start"], "Jumped");
        assert_eq!(records[3]["snapshot"]["scroll_y"], 1200.0);
    }

    #[test]
    fn test_demo_script_runs_against_demo_layout() {
        let layout = PageLayout::from_toml(include_str!("../../../../demos/landing.toml")).unwrap();
        let script = Script::from_toml(include_str!("../../../../demos/script.toml")).unwrap();
        let records = simulate(&AppConfig::default(), &layout, &script).unwrap();

        assert_eq!(records.len(), script.steps.len() + 1);
        // Outside click after two toggles leaves nothing open
        assert_eq!(records[5]["snapshot"]["open_dropdowns"], json!([]));
        // Contact replaced the pricing scroll; the 3440px page bottoms out at 2720
        let settled = &records[10]["snapshot"];
        assert_eq!(settled["animating"], false);
        assert_eq!(settled["scroll_y"], 2720.0);
    }
}
