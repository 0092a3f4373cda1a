//! Main client UI renderer.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::api::QuizApi;
use crate::client::state::{ClientApp, NoticeLevel};
use crate::session::{Screen, Session};

use super::{grid, quiz};

/// Render the whole client screen.
pub fn render<A: QuizApi>(frame: &mut Frame, app: &ClientApp, session: &Session<A>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Fill(1),   // Question + grid
        Constraint::Length(1), // Status
        Constraint::Length(1), // Controls
    ])
    .margin(1)
    .split(area);

    let body = Layout::horizontal([Constraint::Fill(1), Constraint::Length(grid::WIDTH)])
        .spacing(1)
        .split(chunks[1]);

    render_header(frame, chunks[0], session);

    match session.screen() {
        Screen::Empty => render_message(frame, body[0], "This list has no questions.", Color::Yellow),
        Screen::Completed => render_message(frame, body[0], "All questions completed!", Color::Green),
        Screen::NotLoaded => render_message(
            frame,
            body[0],
            "Question could not be loaded. Press n or p to retry.",
            Color::Yellow,
        ),
        Screen::Question(view) => quiz::render(frame, body[0], app, &view),
    }
    grid::render(frame, body[1], &session.grid());

    render_status(frame, chunks[2], app);
    render_controls(frame, chunks[3], app);
}

fn render_header<A: QuizApi>(frame: &mut Frame, area: Rect, session: &Session<A>) {
    let total = session.list().len();
    let position = if total == 0 {
        "0/0".to_string()
    } else {
        format!("{}/{}", (session.position() + 1).min(total), total)
    };
    let explanations = if session.flags().show_explanations {
        "explanations on"
    } else {
        "explanations off"
    };

    let line = Line::from(vec![
        Span::styled(session.mode().label(), Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("  ·  {}", session.key().unwrap_or("no list")),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(format!("  ·  {explanations}"), Style::default().fg(Color::DarkGray)),
    ]);

    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).split(area);
    frame.render_widget(Paragraph::new(line), chunks[0]);
    frame.render_widget(
        Paragraph::new(position)
            .alignment(Alignment::Right)
            .fg(Color::DarkGray),
        chunks[1],
    );
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(3),
        Constraint::Percentage(40),
    ])
    .split(area);

    let content = vec![
        Line::from(Span::styled("QUIZ", Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(color).bold())),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}

fn render_status(frame: &mut Frame, area: Rect, app: &ClientApp) {
    if let Some(prompt) = app.jump_prompt() {
        let widget = Paragraph::new(format!("Go to question: {prompt}_")).fg(Color::Yellow);
        frame.render_widget(widget, area);
        return;
    }

    let Some(notice) = &app.notice else {
        return;
    };
    let color = match notice.level {
        NoticeLevel::Info => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    };
    frame.render_widget(Paragraph::new(notice.text.as_str()).fg(color), area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let text = if app.jump_prompt().is_some() {
        "digits number  ·  enter go  ·  esc cancel"
    } else {
        "j/k move  ·  enter answer  ·  s submit  ·  n/p next/prev  ·  g jump  ·  * star  ·  e explanations  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
