use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{dashboard, skill_detail, skills};
use super::{App, InputMode, View};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_status_line(f, app, chunks[2]);
    draw_help_bar(f, app, chunks[3]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let tab_titles = vec!["Dashboard", "Skills"];
    let selected = match app.view {
        View::Dashboard => 0,
        View::Skills | View::SkillDetail => 1,
    };

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(" Skilltrack "))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Dashboard => dashboard::draw(f, app, area),
        View::Skills => skills::draw(f, app, area),
        View::SkillDetail => skill_detail::draw(f, app, area),
    }
}

fn draw_status_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.input_mode != InputMode::Normal {
        Line::from(vec![
            Span::styled(app.input_mode.prompt(), Style::default().fg(Color::Yellow)),
            Span::raw(&app.input),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ])
    } else if let Some(msg) = &app.message {
        let color = if msg.is_error { Color::Red } else { Color::Green };
        Line::from(Span::styled(msg.text.as_str(), Style::default().fg(color)))
    } else {
        Line::from("")
    };

    f.render_widget(Paragraph::new(line), area);
}

fn key(k: &str) -> Span<'_> {
    Span::styled(k, Style::default().fg(Color::Cyan))
}

fn draw_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.input_mode != InputMode::Normal {
        let mut spans = vec![key("<CR>"), Span::raw(" Submit  "), key("<Esc>")];
        if matches!(
            app.input_mode,
            InputMode::ReviewRating | InputMode::ReviewNotes
        ) {
            spans.push(Span::raw(" Skip review"));
        } else {
            spans.push(Span::raw(" Cancel"));
        }
        if let Some(msg) = app.message.as_ref().filter(|m| m.is_error) {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                msg.text.as_str(),
                Style::default().fg(Color::Red),
            ));
        }
        spans
    } else {
        let mut spans = vec![key("h/l"), Span::raw(" Views  ")];

        match app.view {
            View::Dashboard => {
                spans.extend(vec![key("^r"), Span::raw(" Refresh  ")]);
            }
            View::Skills => {
                spans.extend(vec![
                    key("j/k"),
                    Span::raw(" Nav  "),
                    key("g/G"),
                    Span::raw(" Top/Bot  "),
                    key("l/<CR>"),
                    Span::raw(" Open  "),
                ]);
            }
            View::SkillDetail => {
                spans.extend(vec![
                    key("j/k"),
                    Span::raw(" Nav  "),
                    key("s"),
                    Span::raw(" Start  "),
                    key("c"),
                    Span::raw(" Complete  "),
                    key("r"),
                    Span::raw(" Reset  "),
                    key("a"),
                    Span::raw(" Log  "),
                    key("p"),
                    Span::raw(" Plan  "),
                    key("R"),
                    Span::raw(" Review  "),
                    key("h/<Esc>"),
                    Span::raw(" Back  "),
                ]);
            }
        }

        spans.extend(vec![key("q"), Span::raw(" Quit")]);
        spans
    };

    let help = Paragraph::new(Line::from(help_text)).style(Style::default().bg(Color::DarkGray));

    f.render_widget(help, area);
}
