//! Question screen.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::client::state::ClientApp;
use crate::models::QuestionKind;
use crate::session::{OptionLayout, OptionMarks, OptionView, QuestionView};

/// Render one question from its view-model.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp, view: &QuestionView) {
    let footer_height = footer_height(view);
    let chunks = Layout::vertical([
        Constraint::Length(1),             // Kind + star
        Constraint::Length(4),             // Question text
        Constraint::Fill(1),               // Options
        Constraint::Length(footer_height), // Feedback + explanation
    ])
    .split(area);

    render_kind(frame, chunks[0], view);
    render_question_text(frame, chunks[1], view);
    render_options(frame, chunks[2], app, view);
    render_footer(frame, chunks[3], view);
}

fn footer_height(view: &QuestionView) -> u16 {
    match (&view.feedback, &view.explanation) {
        (None, None) => 0,
        (Some(_), None) => 1,
        (_, Some(_)) => 6,
    }
}

fn kind_name(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::SingleChoice => "single choice",
        QuestionKind::TrueFalse => "true / false",
        QuestionKind::MultiChoice => "multiple choice",
    }
}

fn render_kind(frame: &mut Frame, area: Rect, view: &QuestionView) {
    let mut spans = vec![Span::styled(
        format!("[{}]", kind_name(view.kind)),
        Style::default().fg(Color::Magenta),
    )];
    if view.starred {
        spans.push(Span::styled("  ★ starred", Style::default().fg(Color::Yellow)));
    }
    if !view.interactive {
        spans.push(Span::styled("  read-only", Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_question_text(frame: &mut Frame, area: Rect, view: &QuestionView) {
    let widget = Paragraph::new(view.title())
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn option_style(marks: OptionMarks, highlighted: bool) -> Style {
    let base = if marks.correct {
        Style::default().fg(Color::Green)
    } else if marks.wrong {
        Style::default().fg(Color::Red)
    } else if marks.selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    if highlighted || marks.selected {
        base.bold()
    } else {
        base
    }
}

fn option_badge(view: &QuestionView, option: &OptionView) -> &'static str {
    let marks = option.marks;
    match view.layout {
        OptionLayout::ToggleThenSubmit if marks.selected => "[x] ",
        OptionLayout::ToggleThenSubmit => "[ ] ",
        OptionLayout::SubmitOnChoose if marks.selected => "(•) ",
        OptionLayout::SubmitOnChoose => "( ) ",
    }
}

fn render_options(frame: &mut Frame, area: Rect, app: &ClientApp, view: &QuestionView) {
    let mut lines: Vec<Line> = Vec::with_capacity(view.options.len() * 2 + 1);

    for (index, option) in view.options.iter().enumerate() {
        let highlighted = view.interactive && index == app.cursor;
        let style = option_style(option.marks, highlighted);
        let marker = if highlighted { ">" } else { " " };
        let verdict = if option.marks.correct {
            " ✓"
        } else if option.marks.wrong {
            " ✗"
        } else {
            ""
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(option_badge(view, option), style),
            Span::styled(format!("{}. ", option.key), style),
            Span::styled(option.text.as_str(), style),
            Span::styled(verdict, style),
        ]));
        lines.push(Line::from(""));
    }

    if view.shows_submit() {
        lines.push(Line::from(Span::styled(
            "   press s to submit your selection",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

fn render_footer(frame: &mut Frame, area: Rect, view: &QuestionView) {
    if area.height == 0 {
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    if let Some(feedback) = &view.feedback {
        let color = if feedback.correct { Color::Green } else { Color::Red };
        lines.push(Line::from(Span::styled(
            feedback.line(),
            Style::default().fg(color).bold(),
        )));
    }

    let Some(explanation) = &view.explanation else {
        frame.render_widget(Paragraph::new(lines), area);
        return;
    };

    lines.push(Line::from(Span::styled(
        explanation.as_str(),
        Style::default().fg(Color::Yellow),
    )));
    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .title(" Explanation ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
