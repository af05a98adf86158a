use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::{format_date, hours, progress_bar, status_color, status_marker, truncate};
use crate::models::Skill;
use crate::state_machine::is_eligible;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(skill) = &app.selected_skill else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Skill Detail ");
        let paragraph = Paragraph::new("No skill selected").block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header info
            Constraint::Length(4), // Progress
            Constraint::Min(0),    // Subtopics
            Constraint::Length(7), // Sessions of the selected subtopic
        ])
        .split(area);

    draw_header(f, skill, chunks[0]);
    draw_progress(f, skill, chunks[1]);
    draw_subtopics(f, app, chunks[2]);
    draw_sessions(f, app, chunks[3]);
}

fn draw_header(f: &mut Frame, skill: &Skill, area: Rect) {
    let description = skill.description.as_deref().unwrap_or("No description");
    let source = match &skill.platform {
        Some(p) => format!("{} on {}", skill.resource_type.label(), p),
        None => skill.resource_type.label().to_string(),
    };

    let text = vec![
        Line::from(vec![
            Span::styled("Category: ", Style::default().fg(Color::Gray)),
            Span::styled(&skill.category, Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled("Source: ", Style::default().fg(Color::Gray)),
            Span::styled(source, Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Description: ", Style::default().fg(Color::Gray)),
            Span::styled(description, Style::default().fg(Color::White)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", skill.name))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_progress(f: &mut Frame, skill: &Skill, area: Rect) {
    let mut first = vec![
        Span::styled(
            skill.status.label(),
            Style::default().fg(status_color(skill.status)),
        ),
        Span::raw("  "),
        Span::styled(progress_bar(skill.progress, 20), Style::default().fg(Color::Green)),
        Span::styled(
            format!(
                " {}% ({}/{})",
                skill.progress,
                skill.completed_count(),
                skill.subtopics.len()
            ),
            Style::default().fg(Color::Yellow),
        ),
    ];
    if skill.rating.is_some() {
        first.push(Span::raw("  "));
        first.push(Span::styled(
            skill.rating_stars(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let text = vec![
        Line::from(first),
        Line::from(vec![
            Span::styled("Hours: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!(
                    "{} of {} target",
                    hours(skill.learned_hours),
                    hours(skill.target_hours)
                ),
                Style::default().fg(Color::White),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Progress ")
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_subtopics(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .subtopics
        .items
        .iter()
        .map(|sub| {
            // Dim the hours when completion would still be rejected
            let hours_color = if is_eligible(sub) {
                Color::White
            } else {
                Color::DarkGray
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", status_marker(sub.status)),
                    Style::default().fg(status_color(sub.status)),
                ),
                Span::styled(
                    format!("{:<36}", truncate(&sub.title, 34)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:>6} / {:<6}", hours(sub.hours_spent), hours(sub.expected_hours)),
                    Style::default().fg(hours_color),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Subtopics ({}) ", app.subtopics.items.len()))
        .title_style(Style::default().fg(Color::Green));

    if items.is_empty() {
        let paragraph = Paragraph::new("This skill has no subtopics.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.subtopics.selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_sessions(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .sessions
        .iter()
        .take(5)
        .map(|session| {
            let notes = session
                .notes
                .as_deref()
                .map(|n| format!("\"{}\"", truncate(n, 40)))
                .unwrap_or_default();

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<10}", format_date(&session.session_date)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:>6} min  ", session.duration_minutes),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(notes, Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let title = if app.sessions.is_empty() {
        " Sessions (none) ".to_string()
    } else {
        format!(" Sessions ({}) ", app.sessions.len())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().fg(Color::Magenta));

    if items.is_empty() {
        let paragraph = Paragraph::new("No time logged yet. Press a to log a session.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
    } else {
        f.render_widget(List::new(items).block(block), area);
    }
}
