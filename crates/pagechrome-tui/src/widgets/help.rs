use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use pagechrome_core::config::KeymapConfig;

use crate::theme::GruvboxMaterial;

pub struct HelpWidget;

impl HelpWidget {
    /// Render the key reference for the configured keymap
    pub fn render(frame: &mut Frame, keymap: &KeymapConfig) {
        let entries: [(&str, &str); 14] = [
            (keymap.scroll_down.as_str(), "scroll down"),
            (keymap.scroll_up.as_str(), "scroll up"),
            (keymap.half_page_down.as_str(), "half page down"),
            (keymap.half_page_up.as_str(), "half page up"),
            (keymap.jump_to_top.as_str(), "smooth scroll to top"),
            (keymap.next_target.as_str(), "pointer to next link"),
            (keymap.prev_target.as_str(), "pointer to previous link"),
            (keymap.activate.as_str(), "click under pointer"),
            (keymap.click_outside.as_str(), "click page background"),
            (keymap.escape.as_str(), "press Escape"),
            (keymap.toggle_reduced_motion.as_str(), "toggle reduced motion"),
            (keymap.widen.as_str(), "widen viewport"),
            (keymap.narrow.as_str(), "narrow viewport"),
            (keymap.quit.as_str(), "quit"),
        ];

        let lines: Vec<Line> = entries
            .iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:>8}  ", key),
                        Style::default()
                            .fg(GruvboxMaterial::YELLOW)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(what.to_string(), Style::default().fg(GruvboxMaterial::FG0)),
                ])
            })
            .collect();

        let area = frame.area();
        let popup_width = 44u16.min(area.width.saturating_sub(4));
        let popup_height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        let block = Block::default()
            .title(" Keys ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(GruvboxMaterial::ACCENT))
            .style(Style::default().bg(GruvboxMaterial::BG1));

        frame.render_widget(Clear, popup_area);
        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
