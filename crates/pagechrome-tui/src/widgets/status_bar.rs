use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use pagechrome_core::Viewport;

use crate::app::App;
use crate::theme::GruvboxMaterial;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let (state, state_color) = if app.chrome.is_released() {
            ("RELEASED", GruvboxMaterial::ORANGE)
        } else {
            ("PINNED", GruvboxMaterial::GREEN)
        };

        let threshold = app.chrome.release_threshold();
        let threshold_str = if threshold.is_finite() {
            format!("{:.0}", threshold)
        } else {
            "-".to_string()
        };

        let mut details = format!(
            " y={:.0}/{} | {:.0}x{:.0}",
            app.page.scroll_y(),
            threshold_str,
            app.page.viewport_width(),
            app.page.viewport_height()
        );
        if let Some(target) = app.chrome.animator().target_scroll() {
            details.push_str(&format!(" | → {:.0}", target));
        }
        if app.page.prefers_reduced_motion() {
            details.push_str(" | reduced motion");
        }
        if app.chrome.awaiting_hero() {
            details.push_str(" | hero loading");
        }
        if let Some(node) = app.pointer {
            details.push_str(&format!(" | ➤ {}", app.describe(node)));
        }
        if let Some(msg) = &app.status_message {
            details.push_str(&format!(" | {}", msg));
        }

        let help_hint = " Tab:target Enter:click o:outside Esc ?:help ";
        let used = state.len() + 2 + details.chars().count() + help_hint.len();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", state),
                Style::default()
                    .fg(GruvboxMaterial::BG0)
                    .bg(state_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                details,
                Style::default()
                    .fg(GruvboxMaterial::FG0)
                    .bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                " ".repeat(padding_len),
                Style::default().bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                help_hint,
                Style::default()
                    .fg(GruvboxMaterial::GREY2)
                    .bg(GruvboxMaterial::BG2),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
