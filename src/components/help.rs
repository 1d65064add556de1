// ABOUTME: Help overlay listing the keyboard shortcuts for every screen

use super::layout::centered_rect;
use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem},
};

pub struct HelpComponent;

impl HelpComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 80, area);

        frame.render_widget(Clear, popup_area);

        let section = |title: &'static str| {
            ListItem::new(title).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        };

        let help_items = vec![
            section("Screens:"),
            ListItem::new("  p          My profile"),
            ListItem::new("  t          Task board"),
            ListItem::new("  n          Post a task"),
            ListItem::new("  e          Edit profile (from my profile)"),
            ListItem::new("  u          Look up a user by name"),
            ListItem::new("  r          Refresh the current screen"),
            ListItem::new(""),
            section("Task board:"),
            ListItem::new("  j/↓        Next task"),
            ListItem::new("  k/↑        Previous task"),
            ListItem::new("  Enter      Open the author's profile"),
            ListItem::new(""),
            section("Forms:"),
            ListItem::new("  Tab/↓      Next field"),
            ListItem::new("  S-Tab/↑    Previous field"),
            ListItem::new("  Enter      Submit"),
            ListItem::new("  F2         Switch between log in and register"),
            ListItem::new("  Space      Toggle availability (edit profile)"),
            ListItem::new("  Esc        Back"),
            ListItem::new(""),
            section("General:"),
            ListItem::new("  l          Log out"),
            ListItem::new("  ?/F1       Toggle this help"),
            ListItem::new("  q          Quit application"),
            ListItem::new("  Ctrl+C     Force quit"),
        ];

        let help_list = List::new(help_items).block(
            Block::default()
                .title("Keyboard shortcuts - Press ? or Esc to close")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        frame.render_widget(help_list, popup_area);
    }
}

impl Default for HelpComponent {
    fn default() -> Self {
        Self::new()
    }
}
