use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{format_date, hours, progress_bar, status_color, truncate};
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Stats + categories row
            Constraint::Min(0),    // Per-skill progress
            Constraint::Length(7), // Recent activity
        ])
        .split(area);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    draw_stats(f, app, top_chunks[0]);
    draw_categories(f, app, top_chunks[1]);
    draw_progress(f, app, chunks[1]);
    draw_recent_activity(f, app, chunks[2]);
}

fn draw_stats(f: &mut Frame, app: &App, area: Rect) {
    let stats = &app.dashboard.stats;

    let text = vec![
        Line::from(vec![
            Span::styled("Skills: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", stats.total_skills),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Completed: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", stats.completed_skills),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled("Hours learned: ", Style::default().fg(Color::Gray)),
            Span::styled(
                hours(stats.total_learning_hours),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::styled("Completion rate: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}%", stats.completion_rate),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Stats ")
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_categories(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .dashboard
        .category_breakdown
        .iter()
        .map(|(category, count)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<22}", truncate(category, 20)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(format!("{}", count), Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Categories ")
        .title_style(Style::default().fg(Color::Yellow));

    f.render_widget(List::new(items).block(block), area);
}

fn draw_progress(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Progress ")
        .title_style(Style::default().fg(Color::Green));

    if app.dashboard.skills_progress.is_empty() {
        let paragraph = Paragraph::new("No skills yet. Add one with `skilltrack skill add`.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .dashboard
        .skills_progress
        .iter()
        .map(|row| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<28}", truncate(&row.name, 26)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    progress_bar(row.progress, 20),
                    Style::default().fg(status_color(row.status)),
                ),
                Span::styled(
                    format!(" {:>3}% ", row.progress),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!(
                        "{}/{}  {} of {}",
                        row.completed_count,
                        row.total_count,
                        hours(row.learned_hours),
                        hours(row.target_hours)
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn draw_recent_activity(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .dashboard
        .recent_activities
        .iter()
        .map(|a| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<10}", format_date(&a.session_date)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:>6} min  ", a.duration_minutes),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:<22}", truncate(&a.skill_name, 20)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(truncate(&a.subtopic_title, 30), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Recent Activity ")
        .title_style(Style::default().fg(Color::Magenta));

    f.render_widget(List::new(items).block(block), area);
}
