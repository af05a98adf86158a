use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{hours, progress_bar, status_color, truncate};
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .skills
        .items
        .iter()
        .map(|skill| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<30}", truncate(&skill.name, 28)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:<14}", truncate(&skill.category, 12)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:<13}", skill.status.label()),
                    Style::default().fg(status_color(skill.status)),
                ),
                Span::styled(progress_bar(skill.progress, 10), Style::default().fg(Color::Green)),
                Span::styled(
                    format!(" {:>3}%  ", skill.progress),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("{} / {}", hours(skill.learned_hours), hours(skill.target_hours)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Skills ({}) ", app.skills.items.len()))
        .title_style(Style::default().fg(Color::Cyan));

    let header_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);
    let header = Line::from(vec![
        Span::styled(format!("  {:<30}", "Name"), header_style),
        Span::styled(format!("{:<14}", "Category"), header_style),
        Span::styled(format!("{:<13}", "Status"), header_style),
        Span::styled("Progress         Hours", header_style),
    ]);

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.skills.selected);

    let header_area = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: 1,
    };
    f.render_widget(Paragraph::new(header), header_area);

    let list_area = Rect {
        x: area.x,
        y: area.y + 1,
        width: area.width,
        height: area.height.saturating_sub(1),
    };

    f.render_stateful_widget(list, list_area, &mut state);
}
