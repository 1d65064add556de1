// ABOUTME: Main layout component: header, the active screen, key hints and overlays

use super::{
    AuthFormComponent, HelpComponent, ProfileEditComponent, ProfileViewComponent,
    TaskFormComponent, TaskListComponent,
};
use crate::app::resource_view::ViewState;
use crate::app::state::{AppState, NotificationType, View};
use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

// Premium color palette
pub const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
pub const GOLD: Color = Color::Rgb(255, 215, 0);
pub const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
pub const WARNING_ORANGE: Color = Color::Rgb(255, 165, 0);
pub const ERROR_RED: Color = Color::Rgb(230, 100, 100);
pub const DARK_BG: Color = Color::Rgb(25, 25, 35);
pub const PANEL_BG: Color = Color::Rgb(30, 30, 40);
pub const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
pub const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
pub const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);

pub struct LayoutComponent {
    auth_form: AuthFormComponent,
    profile_view: ProfileViewComponent,
    task_list: TaskListComponent,
    task_form: TaskFormComponent,
    profile_edit: ProfileEditComponent,
    help: HelpComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            auth_form: AuthFormComponent::new(),
            profile_view: ProfileViewComponent::new(),
            task_list: TaskListComponent::new(),
            task_form: TaskFormComponent::new(),
            profile_edit: ProfileEditComponent::new(),
            help: HelpComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let area = frame.size();
        frame.render_widget(Block::default().style(Style::default().bg(DARK_BG)), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(8),    // Active screen
                Constraint::Length(3), // Key hints
            ])
            .split(area);

        self.render_header(frame, chunks[0], state);
        self.render_body(frame, chunks[1], state);
        self.render_key_hints(frame, chunks[2], state);

        if let Some(prompt) = &state.lookup {
            render_lookup_prompt(frame, area, &prompt.input);
        }

        if state.help_visible {
            self.help.render(frame, area);
        }

        // Notifications stay on top of everything else
        self.render_notifications(frame, area, state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let (session_icon, session_text, session_color) = if state.session.is_authenticated() {
            ("●", "signed in", SELECTION_GREEN)
        } else {
            ("○", "signed out", MUTED_GRAY)
        };

        let mut spans = vec![
            Span::styled(" 💼 ", Style::default().fg(GOLD)),
            Span::styled("gigboard", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
            Span::styled("  │  ", Style::default().fg(SUBDUED_BORDER)),
            Span::styled(
                state.current_view.title(),
                Style::default().fg(SOFT_WHITE).add_modifier(Modifier::BOLD),
            ),
        ];
        if state.current_view == View::PublicProfile {
            if let Some(username) = state.public_profile.key() {
                spans.push(Span::styled(format!(" @{username}"), Style::default().fg(CORNFLOWER_BLUE)));
            }
        }
        spans.push(Span::styled("  │  ", Style::default().fg(SUBDUED_BORDER)));
        spans.push(Span::styled(format!("{session_icon} "), Style::default().fg(session_color)));
        spans.push(Span::styled(session_text, Style::default().fg(session_color)));

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(CORNFLOWER_BLUE))
                .style(Style::default().bg(DARK_BG)),
        );
        frame.render_widget(header, area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        match state.current_view {
            View::Login => {
                self.auth_form.render(frame, area, &state.auth_form, state.mask_passwords);
            }
            View::Profile => self.profile_view.render_own(frame, area, state.profile.state()),
            View::PublicProfile => {
                self.profile_view.render_public(frame, area, state.public_profile.state());
            }
            View::Tasks => {
                self.task_list.render(frame, area, state.tasks.state(), state.selected_task);
            }
            View::PostTask => self.task_form.render(frame, area, &state.task_form),
            View::EditProfile => match &state.profile_form {
                Some(form) => self.profile_edit.render(frame, area, form),
                None => render_message(frame, area, "Edit profile", "Profile not loaded yet.", MUTED_GRAY),
            },
        }
    }

    fn render_key_hints(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let hints: &[(&str, &str)] = match state.current_view {
            View::Login => &[("Enter", "submit"), ("F2", "switch mode"), ("F1", "help"), ("Esc", "quit")],
            View::PostTask | View::EditProfile => {
                &[("Enter", "save"), ("Tab", "next field"), ("F1", "help"), ("Esc", "back")]
            }
            View::Profile => &[
                ("e", "edit"),
                ("t", "tasks"),
                ("n", "new task"),
                ("u", "look up user"),
                ("r", "refresh"),
                ("l", "log out"),
                ("?", "help"),
                ("q", "quit"),
            ],
            View::Tasks => &[
                ("j/k", "select"),
                ("Enter", "author"),
                ("n", "new task"),
                ("p", "profile"),
                ("r", "refresh"),
                ("?", "help"),
                ("q", "quit"),
            ],
            View::PublicProfile => &[
                ("Esc", "back"),
                ("u", "look up user"),
                ("r", "refresh"),
                ("?", "help"),
                ("q", "quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, action)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(SUBDUED_BORDER)));
            }
            spans.push(Span::styled(*key, Style::default().fg(GOLD).add_modifier(Modifier::BOLD)));
            spans.push(Span::styled(format!(" {action}"), Style::default().fg(MUTED_GRAY)));
        }

        let bar = Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(SUBDUED_BORDER))
                    .style(Style::default().bg(PANEL_BG)),
            )
            .alignment(Alignment::Center);
        frame.render_widget(bar, area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let notifications = state.get_current_notifications();
        if notifications.is_empty() {
            return;
        }

        let width = 50.min(area.width.saturating_sub(4));
        let x = area.width.saturating_sub(width + 2);
        let mut y = 1;

        for notification in notifications {
            if y + 3 > area.height {
                break;
            }
            let notification_area = Rect {
                x,
                y,
                width,
                height: 3,
            };

            let (icon, color) = match notification.notification_type {
                NotificationType::Success => ("✓", SELECTION_GREEN),
                NotificationType::Error => ("✗", ERROR_RED),
                NotificationType::Warning => ("⚠", WARNING_ORANGE),
                NotificationType::Info => ("ℹ", CORNFLOWER_BLUE),
            };

            let widget = Paragraph::new(Line::from(vec![
                Span::styled(format!("{icon} "), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(notification.message.as_str(), Style::default().fg(SOFT_WHITE)),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color))
                    .style(Style::default().bg(PANEL_BG)),
            )
            .wrap(Wrap { trim: true });

            frame.render_widget(Clear, notification_area);
            frame.render_widget(widget, notification_area);
            y += 3;
        }
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}

fn render_lookup_prompt(frame: &mut Frame, area: Rect, input: &str) {
    let popup = centered_rect(50, 20, area);
    let popup = Rect {
        height: popup.height.clamp(3, 5),
        ..popup
    };
    frame.render_widget(Clear, popup);

    let prompt = Paragraph::new(Line::from(vec![
        Span::styled("@", Style::default().fg(MUTED_GRAY)),
        Span::styled(input, Style::default().fg(SOFT_WHITE)),
        Span::styled("▏", Style::default().fg(GOLD)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(GOLD))
            .style(Style::default().bg(PANEL_BG))
            .title(Span::styled(
                " Look up user (Enter: open, Esc: cancel) ",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )),
    );
    frame.render_widget(prompt, popup);
}

/// Single message in a titled panel
pub fn render_message(frame: &mut Frame, area: Rect, title: &str, message: &str, color: Color) {
    let panel = Paragraph::new(Text::styled(message.to_string(), Style::default().fg(color)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(SUBDUED_BORDER))
                .style(Style::default().bg(PANEL_BG))
                .title(Span::styled(format!(" {title} "), Style::default().fg(GOLD))),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(panel, area);
}

/// Draw a fetch-backed screen: spinner text while loading, the error kind on
/// failure, otherwise the data through `ready`
pub fn render_view_state<T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    view: &ViewState<T>,
    ready: impl FnOnce(&mut Frame, Rect, &T),
) {
    match view {
        ViewState::Loading => render_message(frame, area, title, "Loading…", MUTED_GRAY),
        ViewState::Failed(error) => {
            let message = format!("{error}\n\nPress r to retry.");
            render_message(frame, area, title, &message, ERROR_RED);
        }
        ViewState::Ready(data) => ready(frame, area, data),
    }
}

/// Helper function to create a centered rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
