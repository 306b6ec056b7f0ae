use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::{
    dialog::DialogOptions,
    form::{FieldView, Validity},
};

use super::input::Focus;

const MAX_DIALOG_WIDTH: u16 = 64;

pub struct DialogFrame<'a> {
    pub options: &'a DialogOptions,
    pub fields: Vec<FieldView<'a>>,
    pub focus: Focus,
    pub confirm_enabled: bool,
    pub help: Option<&'a str>,
}

pub fn draw(frame: &mut Frame<'_>, view: &DialogFrame<'_>) {
    let screen = frame.area();
    let width = MAX_DIALOG_WIDTH.min(screen.width);
    let content_width = width.saturating_sub(4).max(1) as usize;

    let mut lines = Vec::new();
    let mut cursor_line = None;
    for (index, field) in view.fields.iter().enumerate() {
        let focused = view.focus == Focus::Field(index);
        if focused {
            cursor_line = Some(lines.len());
        }
        lines.extend(field_lines(field, focused, content_width));
    }
    if !view.fields.is_empty() {
        lines.push(Line::raw(""));
    }
    lines.push(button_line(view));

    let help_height = if view.help.is_some() { 2 } else { 0 };
    let height = u16::try_from(lines.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2 + help_height)
        .min(screen.height);
    let area = centered_rect(screen, width, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", view.options.title))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(help_height)])
        .split(inner);

    let body = Paragraph::new(lines);
    frame.render_widget(body, rows[0]);

    if let Some(help) = view.help {
        let help_widget = Paragraph::new(help)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(help_widget, rows[1]);
    }

    if let (Some(line), Focus::Field(index)) = (cursor_line, view.focus)
        && let Some(field) = view.fields.get(index)
    {
        let body = rows[0];
        let offset = format!("{}: ", field.label)
            .width()
            .saturating_add(field.display_value().width());
        let x = u16::try_from(offset)
            .ok()
            .and_then(|offset| body.x.checked_add(offset));
        let y = u16::try_from(line)
            .ok()
            .and_then(|line| body.y.checked_add(line));
        // Values wider than the box leave the cursor hidden.
        if let (Some(x), Some(y)) = (x, y)
            && x < body.right()
            && y < body.bottom()
        {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

/// Label/value line for a field, followed by its wrapped rejection reason.
pub fn field_lines<'a>(field: &FieldView<'_>, focused: bool, width: usize) -> Vec<Line<'a>> {
    let label_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let value_style = match field.validity {
        Validity::Valid => Style::default(),
        Validity::Invalid => Style::default().fg(Color::Red),
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{}: ", field.label), label_style),
        Span::styled(field.display_value(), value_style),
    ])];
    if let Some(reason) = field.reason {
        let indent = "  ";
        for chunk in wrap(reason, width.saturating_sub(indent.len()).max(1)) {
            lines.push(Line::from(Span::styled(
                format!("{indent}{chunk}"),
                Style::default().fg(Color::Red),
            )));
        }
    }
    lines
}

fn button_line<'a>(view: &DialogFrame<'_>) -> Line<'a> {
    let confirm_style = if !view.confirm_enabled {
        Style::default().fg(Color::DarkGray)
    } else if view.focus == Focus::ConfirmButton {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    let dismiss_style = if view.focus == Focus::DismissButton {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("[ {} ]", view.options.confirm_label), confirm_style),
        Span::raw("  "),
        Span::styled(format!("[ {} ]", view.options.dismiss_label), dismiss_style),
    ])
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let inner = vertical[1];
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(inner.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(inner);
    horizontal[1]
}
