// ABOUTME: Profile screen for the signed-in user and for public lookups
// Both profile shapes are flattened into a ProfileCard before drawing

use super::layout::{render_view_state, CORNFLOWER_BLUE, GOLD, MUTED_GRAY, PANEL_BG, SELECTION_GREEN, SOFT_WHITE};
use crate::app::resource_view::ViewState;
use crate::models::{PublicProfile, UserProfile};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

/// Display-ready profile fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCard {
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub balance: Option<String>,
    pub rating: Option<String>,
    pub hourly_rate: Option<String>,
    pub specialization: Option<String>,
    pub experience_level: Option<String>,
    pub completed_projects: Option<u32>,
    pub available_for_hire: bool,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub skills: Vec<String>,
    pub links: Vec<(&'static str, String)>,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

impl From<&UserProfile> for ProfileCard {
    fn from(profile: &UserProfile) -> Self {
        Self {
            username: profile.username.clone(),
            full_name: non_blank(profile.full_name.as_ref()),
            email: Some(profile.email.clone()).filter(|e| !e.is_empty()),
            balance: Some(profile.balance.to_string()),
            rating: profile.rating.map(|r| r.to_string()),
            hourly_rate: profile.hourly_rate.map(|r| format!("{r}/h")),
            specialization: non_blank(profile.specialization.as_ref()),
            experience_level: non_blank(profile.experience_level.as_ref()),
            completed_projects: profile.completed_projects,
            available_for_hire: profile.available_for_hire,
            bio: non_blank(profile.bio.as_ref()),
            avatar: non_blank(profile.avatar.as_ref()),
            skills: profile.skill_tags().to_vec(),
            links: owned_links(&profile.links.entries()),
        }
    }
}

impl From<&PublicProfile> for ProfileCard {
    fn from(profile: &PublicProfile) -> Self {
        Self {
            username: profile.username.clone(),
            full_name: non_blank(profile.full_name.as_ref()),
            email: None,
            balance: None,
            rating: profile.rating.map(|r| r.to_string()),
            hourly_rate: None,
            specialization: non_blank(profile.specialization.as_ref()),
            experience_level: non_blank(profile.experience_level.as_ref()),
            completed_projects: profile.completed_projects,
            available_for_hire: profile.available_for_hire,
            bio: non_blank(profile.bio.as_ref()),
            avatar: non_blank(profile.avatar.as_ref()),
            skills: profile.skill_tags().to_vec(),
            links: owned_links(&profile.links.entries()),
        }
    }
}

fn owned_links(entries: &[(&'static str, &str)]) -> Vec<(&'static str, String)> {
    entries
        .iter()
        .map(|(label, url)| (*label, (*url).to_string()))
        .collect()
}

impl ProfileCard {
    /// Label/value pairs for the detail table
    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        if let Some(name) = &self.full_name {
            rows.push(("Name", name.clone()));
        }
        if let Some(email) = &self.email {
            rows.push(("Email", email.clone()));
        }
        if let Some(balance) = &self.balance {
            rows.push(("Balance", balance.clone()));
        }
        if let Some(rating) = &self.rating {
            rows.push(("Rating", format!("★ {rating}")));
        }
        if let Some(rate) = &self.hourly_rate {
            rows.push(("Hourly rate", rate.clone()));
        }
        if let Some(specialization) = &self.specialization {
            rows.push(("Specialization", specialization.clone()));
        }
        if let Some(level) = &self.experience_level {
            rows.push(("Experience", level.clone()));
        }
        if let Some(count) = self.completed_projects {
            rows.push(("Completed projects", count.to_string()));
        }
        rows.push((
            "Available for hire",
            if self.available_for_hire { "yes" } else { "no" }.to_string(),
        ));
        if let Some(avatar) = &self.avatar {
            rows.push(("Avatar", avatar.clone()));
        }
        rows
    }
}

pub struct ProfileViewComponent;

impl ProfileViewComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render_own(&self, frame: &mut Frame, area: Rect, view: &ViewState<UserProfile>) {
        render_view_state(frame, area, "My profile", view, |frame, area, profile| {
            self.render_card(frame, area, &ProfileCard::from(profile), "e: edit profile");
        });
    }

    pub fn render_public(&self, frame: &mut Frame, area: Rect, view: &ViewState<PublicProfile>) {
        render_view_state(frame, area, "Profile", view, |frame, area, profile| {
            self.render_card(frame, area, &ProfileCard::from(profile), "Esc: back");
        });
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, card: &ProfileCard, action_hint: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .style(Style::default().bg(PANEL_BG))
            .title(Line::from(vec![
                Span::styled(" 👤 ", Style::default().fg(GOLD)),
                Span::styled(
                    format!("{} ", card.username),
                    Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
                ),
            ]));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = card
            .detail_rows()
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label:<20}"), Style::default().fg(MUTED_GRAY)),
                    Span::styled(value, Style::default().fg(SOFT_WHITE)),
                ])
            })
            .collect();

        if !card.skills.is_empty() {
            lines.push(Line::default());
            let mut spans = vec![Span::styled(
                format!("{:<20}", "Skills"),
                Style::default().fg(MUTED_GRAY),
            )];
            for skill in &card.skills {
                spans.push(Span::styled(
                    format!(" {skill} "),
                    Style::default().fg(PANEL_BG).bg(SELECTION_GREEN),
                ));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        if !card.links.is_empty() {
            lines.push(Line::default());
            for (label, url) in &card.links {
                lines.push(Line::from(vec![
                    Span::styled(format!("{label:<20}"), Style::default().fg(MUTED_GRAY)),
                    Span::styled(
                        url.clone(),
                        Style::default().fg(CORNFLOWER_BLUE).add_modifier(Modifier::UNDERLINED),
                    ),
                ]));
            }
        }

        if let Some(bio) = &card.bio {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "About",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(bio.clone(), Style::default().fg(SOFT_WHITE))));
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(action_hint.to_string(), Style::default().fg(MUTED_GRAY))));

        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            inner.inner(&Margin::new(2, 1)),
        );
    }
}

impl Default for ProfileViewComponent {
    fn default() -> Self {
        Self::new()
    }
}
