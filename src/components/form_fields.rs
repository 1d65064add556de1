// ABOUTME: Shared renderer for labelled input fields, per-field errors and the form notice

use super::layout::{CORNFLOWER_BLUE, ERROR_RED, GOLD, MUTED_GRAY, PANEL_BG, SELECTION_GREEN, SOFT_WHITE, SUBDUED_BORDER};
use crate::app::form::Notice;
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

/// One input row as the form wants it drawn
pub struct FieldRow<'a> {
    pub label: &'a str,
    pub value: String,
    pub focused: bool,
    pub error: Option<&'a str>,
}

impl<'a> FieldRow<'a> {
    pub fn new(label: &'a str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            focused: false,
            error: None,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

/// Replace every character with a bullet
pub fn mask(value: &str) -> String {
    "•".repeat(value.chars().count())
}

pub struct FormFrame<'a> {
    pub title: &'a str,
    pub rows: Vec<FieldRow<'a>>,
    pub notice: Option<&'a Notice>,
    pub submitting: bool,
    pub hint: &'a str,
}

impl FormFrame<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .style(Style::default().bg(PANEL_BG))
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut constraints = vec![Constraint::Length(2)];
        constraints.extend(self.rows.iter().map(|_| Constraint::Length(4)));
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(constraints)
            .split(inner);

        self.render_notice(frame, chunks[0]);

        for (row, chunk) in self.rows.iter().zip(chunks.iter().skip(1)) {
            render_row(frame, *chunk, row, self.submitting);
        }

        let hint = if self.submitting {
            Line::from(Span::styled("Submitting…", Style::default().fg(GOLD)))
        } else {
            Line::from(Span::styled(self.hint, Style::default().fg(MUTED_GRAY)))
        };
        if let Some(last) = chunks.last() {
            frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), *last);
        }
    }

    fn render_notice(&self, frame: &mut Frame, area: Rect) {
        let Some(notice) = self.notice else {
            return;
        };
        let (icon, color) = if notice.is_error() {
            ("✗", ERROR_RED)
        } else {
            ("✓", SELECTION_GREEN)
        };
        let line = Line::from(vec![
            Span::styled(format!("{icon} "), Style::default().fg(color)),
            Span::styled(notice.text(), Style::default().fg(color)),
        ]);
        frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
    }
}

fn render_row(frame: &mut Frame, area: Rect, row: &FieldRow<'_>, submitting: bool) {
    let border_color = if row.error.is_some() {
        ERROR_RED
    } else if row.focused && !submitting {
        GOLD
    } else {
        SUBDUED_BORDER
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let cursor = if row.focused && !submitting { "▏" } else { "" };
    let input = Paragraph::new(Line::from(vec![
        Span::styled(row.value.clone(), Style::default().fg(SOFT_WHITE)),
        Span::styled(cursor, Style::default().fg(GOLD)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                format!(" {} ", row.label),
                Style::default().fg(if row.focused { GOLD } else { MUTED_GRAY }),
            )),
    );
    frame.render_widget(input, chunks[0]);

    if let Some(error) = row.error {
        frame.render_widget(
            Paragraph::new(Span::styled(error, Style::default().fg(ERROR_RED))),
            chunks[1],
        );
    }
}
