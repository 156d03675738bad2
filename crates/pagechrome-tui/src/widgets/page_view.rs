use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use pagechrome_core::{Document, NodeId, Viewport};

use crate::app::App;
use crate::theme::{section_bg, GruvboxMaterial};

/// Renders the visible slice of the simulated page, one terminal row per
/// `px_per_row` CSS pixels, with the nav overlay and any open menu on top
pub struct PageViewWidget;

impl PageViewWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        frame.render_widget(Paragraph::new(content_lines(app, area.height)), area);

        if app.chrome.is_released() {
            return;
        }
        let Some(nav) = app.chrome.geometry().nav(&app.page) else {
            return;
        };

        let px = px_per_row(app);
        let nav_rows = ((app.page.offset_height(nav) / px).ceil() as u16).clamp(1, area.height);
        let nav_area = Rect::new(area.x, area.y, area.width, nav_rows);

        let (line, toggle_columns) = nav_line(app, nav);
        frame.render_widget(Clear, nav_area);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(GruvboxMaterial::NAV)),
            nav_area,
        );

        for (container, column) in toggle_columns {
            if app.chrome.dropdowns().is_open(&app.page, container) {
                render_menu(frame, area, app, container, area.x + column, area.y + nav_rows);
            }
        }
    }
}

fn px_per_row(app: &App) -> f64 {
    app.config.ui.px_per_row.max(1.0)
}

/// Rows of page content under the overlay
fn content_lines(app: &App, rows: u16) -> Vec<Line<'static>> {
    let px = px_per_row(app);
    let scroll = app.page.scroll_y();
    let threshold = app.chrome.release_threshold();
    let hero = app.chrome.geometry().hero(&app.page);
    let flow = app.page.flow_children();

    (0..rows)
        .map(|row| {
            let y0 = scroll + row as f64 * px;
            let y1 = y0 + px;

            let hit = flow.iter().enumerate().find(|&(_, &node)| {
                let top = app.page.flow_top(node);
                y0 < top + app.page.offset_height(node) && y1 > top
            });

            let mut spans = Vec::new();
            let bg = match hit {
                Some((_, &node)) if Some(node) == hero => GruvboxMaterial::HERO,
                Some((index, _)) => section_bg(index),
                None => GruvboxMaterial::BG0,
            };

            if let Some((_, &node)) = hit {
                let top = app.page.flow_top(node);
                if top >= y0 && top < y1 {
                    spans.push(Span::styled(
                        format!(" ▌ {} ", heading(app, node)),
                        Style::default()
                            .fg(GruvboxMaterial::YELLOW)
                            .add_modifier(Modifier::BOLD),
                    ));
                    spans.push(Span::styled(
                        format!("y={:.0} h={:.0}", top, app.page.offset_height(node)),
                        Style::default().fg(GruvboxMaterial::GREY1),
                    ));
                }
            }

            if threshold >= y0 && threshold < y1 {
                spans.push(Span::styled(
                    format!("  ┄┄ release at y={:.0}", threshold),
                    Style::default().fg(GruvboxMaterial::THRESHOLD),
                ));
            }

            Line::from(spans).style(Style::default().fg(GruvboxMaterial::FG0).bg(bg))
        })
        .collect()
}

fn heading(app: &App, node: NodeId) -> String {
    let title = app.page.text(node);
    match app.page.attribute(node, "id") {
        Some(id) if title.is_empty() => format!("#{}", id),
        Some(id) => format!("{} #{}", title, id),
        None => title.to_string(),
    }
}

fn target_style(app: &App, node: NodeId) -> Style {
    if app.pointer == Some(node) {
        Style::default()
            .fg(GruvboxMaterial::BG0)
            .bg(GruvboxMaterial::ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(GruvboxMaterial::FG0)
    }
}

/// Nav bar contents plus the column where each dropdown toggle starts
fn nav_line(app: &App, nav: NodeId) -> (Line<'static>, Vec<(NodeId, u16)>) {
    let selectors = &app.config.selectors;
    let mut spans = vec![Span::styled(
        format!(" {} ", app.layout.title),
        Style::default()
            .fg(GruvboxMaterial::GREEN)
            .add_modifier(Modifier::BOLD),
    )];
    let mut column = spans[0].width() as u16;
    let mut toggles = Vec::new();

    for child in app.page.children(nav) {
        let (node, label) = if app.page.has_class(child, &selectors.dropdown_class) {
            let Some(toggle) = app
                .page
                .first_descendant_with_class(child, &selectors.toggle_class)
            else {
                continue;
            };
            let arrow = if app.chrome.dropdowns().is_open(&app.page, child) {
                "▴"
            } else {
                "▾"
            };
            toggles.push((child, column));
            (toggle, format!(" {} {} ", app.page.text(toggle), arrow))
        } else {
            (child, format!(" {} ", app.page.text(child)))
        };

        let span = Span::styled(label, target_style(app, node));
        column += span.width() as u16 + 1;
        spans.push(span);
        spans.push(Span::raw(" "));
    }

    (Line::from(spans), toggles)
}

fn render_menu(frame: &mut Frame, area: Rect, app: &App, container: NodeId, x: u16, y: u16) {
    let menu_class = &app.config.selectors.menu_class;
    let items: Vec<NodeId> = app
        .targets()
        .into_iter()
        .filter(|&n| {
            app.page
                .closest_with_class(n, menu_class)
                .and_then(|menu| app.page.parent(menu))
                == Some(container)
        })
        .collect();

    let width = items
        .iter()
        .map(|&n| app.page.text(n).chars().count() as u16 + 4)
        .max()
        .unwrap_or(8)
        .max(8);
    let menu_area = Rect::new(x, y, width, items.len() as u16 + 2).intersection(area);
    if menu_area.is_empty() {
        return;
    }

    let lines: Vec<Line> = items
        .iter()
        .map(|&n| Line::from(Span::styled(format!(" {} ", app.page.text(n)), target_style(app, n))))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GruvboxMaterial::ACCENT))
        .style(Style::default().bg(GruvboxMaterial::BG2));

    frame.render_widget(Clear, menu_area);
    frame.render_widget(Paragraph::new(lines).block(block), menu_area);
}
