//! Navigation grid beside the question.

use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::session::{GridCell, GridMark};

const PER_ROW: usize = 5;

/// Columns the grid needs, borders included.
pub const WIDTH: u16 = (PER_ROW as u16) * 5 + 2;

pub fn render(frame: &mut Frame, area: Rect, cells: &[GridCell]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Questions ")
        .title_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows: Vec<&[GridCell]> = cells.chunks(PER_ROW).collect();
    let active_row = cells.iter().position(|c| c.active).unwrap_or(0) / PER_ROW;
    let window = visible_rows(rows.len(), active_row, inner.height as usize);

    let lines: Vec<Line> = rows[window]
        .iter()
        .map(|row| Line::from(row.iter().map(cell_span).collect::<Vec<_>>()))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn cell_span(cell: &GridCell) -> Span<'static> {
    let star = if cell.starred { "*" } else { " " };
    Span::styled(format!("{:>3}{star} ", cell.index + 1), cell_style(cell))
}

fn cell_style(cell: &GridCell) -> Style {
    let style = match cell.mark {
        Some(GridMark::Correct) => Style::default().fg(Color::Green),
        Some(GridMark::Incorrect) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::Gray),
    };
    if cell.active {
        style.reversed().bold()
    } else {
        style
    }
}

/// Rows to draw so the active row stays on screen.
fn visible_rows(total: usize, active: usize, height: usize) -> Range<usize> {
    if height == 0 {
        return 0..0;
    }
    if total <= height {
        return 0..total;
    }
    let start = active.saturating_sub(height - 1).min(total - height);
    start..start + height
}
