// ABOUTME: Task board listing open tasks with budget, deadline and the selected task's details

use super::layout::{
    render_message, render_view_state, CORNFLOWER_BLUE, ERROR_RED, GOLD, MUTED_GRAY, PANEL_BG,
    SELECTION_GREEN, SOFT_WHITE, SUBDUED_BORDER, WARNING_ORANGE,
};
use crate::app::resource_view::ViewState;
use crate::models::Task;
use chrono::{Local, NaiveDate};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

/// Human form of the time left before a deadline
pub fn deadline_label(days_left: i64) -> String {
    match days_left {
        d if d < 0 => "overdue".to_string(),
        0 => "due today".to_string(),
        1 => "1 day left".to_string(),
        d => format!("{d} days left"),
    }
}

fn deadline_color(days_left: i64) -> Color {
    match days_left {
        d if d < 0 => ERROR_RED,
        0..=3 => WARNING_ORANGE,
        _ => SELECTION_GREEN,
    }
}

pub struct TaskListComponent;

impl TaskListComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, view: &ViewState<Vec<Task>>, selected: usize) {
        self.render_at(frame, area, view, selected, Local::now().date_naive());
    }

    pub fn render_at(
        &self,
        frame: &mut Frame,
        area: Rect,
        view: &ViewState<Vec<Task>>,
        selected: usize,
        today: NaiveDate,
    ) {
        render_view_state(frame, area, "Tasks", view, |frame, area, tasks| {
            if tasks.is_empty() {
                render_message(
                    frame,
                    area,
                    "Tasks",
                    "No tasks yet. Press n to post one.",
                    MUTED_GRAY,
                );
                return;
            }

            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);

            self.render_list(frame, chunks[0], tasks, selected, today);
            if let Some(task) = tasks.get(selected) {
                self.render_details(frame, chunks[1], task, today);
            }
        });
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, tasks: &[Task], selected: usize, today: NaiveDate) {
        let items: Vec<ListItem> = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let is_selected = i == selected;
                let days_left = task.days_left(today);
                let marker = if is_selected { "▶ " } else { "  " };
                let title_style = if is_selected {
                    Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(SOFT_WHITE)
                };

                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(marker, Style::default().fg(GOLD)),
                        Span::styled(task.title.clone(), title_style),
                    ]),
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(format!("{} ", task.budget), Style::default().fg(SELECTION_GREEN)),
                        Span::styled("• ", Style::default().fg(SUBDUED_BORDER)),
                        Span::styled(
                            deadline_label(days_left),
                            Style::default().fg(deadline_color(days_left)),
                        ),
                        Span::styled(format!(" • @{}", task.author()), Style::default().fg(MUTED_GRAY)),
                    ]),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(CORNFLOWER_BLUE))
                    .style(Style::default().bg(PANEL_BG))
                    .title(Span::styled(
                        format!(" Tasks ({}) ", tasks.len()),
                        Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
                    )),
            )
            .highlight_style(Style::default().bg(SUBDUED_BORDER));

        let mut list_state = ListState::default();
        list_state.select(Some(selected.min(tasks.len().saturating_sub(1))));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_details(&self, frame: &mut Frame, area: Rect, task: &Task, today: NaiveDate) {
        let label = |text: &'static str| Span::styled(format!("{text:<10}"), Style::default().fg(MUTED_GRAY));
        let mut lines = vec![
            Line::from(Span::styled(
                task.title.clone(),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(vec![label("Budget"), Span::styled(task.budget.to_string(), Style::default().fg(SELECTION_GREEN))]),
            Line::from(vec![
                label("Deadline"),
                Span::styled(task.deadline_display(), Style::default().fg(SOFT_WHITE)),
                Span::styled(
                    format!(" ({})", deadline_label(task.days_left(today))),
                    Style::default().fg(deadline_color(task.days_left(today))),
                ),
            ]),
            Line::from(vec![label("Author"), Span::styled(format!("@{}", task.author()), Style::default().fg(CORNFLOWER_BLUE))]),
        ];
        if !task.skills.is_empty() {
            lines.push(Line::from(vec![
                label("Skills"),
                Span::styled(task.skills.join(", "), Style::default().fg(SOFT_WHITE)),
            ]));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(task.description.clone(), Style::default().fg(SOFT_WHITE))));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Enter: view author", Style::default().fg(MUTED_GRAY))));

        let details = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(SUBDUED_BORDER))
                    .style(Style::default().bg(PANEL_BG))
                    .title(Span::styled(" Details ", Style::default().fg(GOLD))),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(details, area);
    }
}

impl Default for TaskListComponent {
    fn default() -> Self {
        Self::new()
    }
}
