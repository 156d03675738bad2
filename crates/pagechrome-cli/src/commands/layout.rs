use anyhow::Result;

use pagechrome_core::{AppConfig, Document, MemoryPage, Page, PageChrome, PageLayout};

pub fn run(config: &AppConfig, layout: &PageLayout, measure: bool) -> Result<()> {
    if !measure {
        print!("{}", layout.to_toml()?);
        return Ok(());
    }

    for line in measure_lines(config, layout) {
        println!("{}", line);
    }
    Ok(())
}

/// Element positions once every image has loaded
fn measure_lines(config: &AppConfig, layout: &PageLayout) -> Vec<String> {
    let mut page = MemoryPage::from_layout(layout, &config.selectors);
    page.complete_hero_image();
    let mut chrome = PageChrome::new(config);
    chrome.on_ready(&mut page);

    let mut lines = vec![format!(
        "viewport {:.0}x{:.0}, document height {:.0}",
        page.viewport_width(),
        page.viewport_height(),
        page.document_height()
    )];

    let nav_height = chrome.geometry().nav_height(&page);
    if nav_height > 0.0 {
        lines.push(format!("nav (fixed) height {:.0}", nav_height));
    }

    for node in page.flow_children() {
        let id = page.attribute(node, "id").unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "#{:<12} top {:>6.0} height {:>6.0}",
            id,
            page.document_top(node),
            page.offset_height(node)
        ));
    }

    let threshold = chrome.release_threshold();
    lines.push(if threshold.is_finite() {
        format!("nav releases at y >= {:.0}", threshold)
    } else {
        "no hero: nav never releases".to_string()
    });
    lines
}
