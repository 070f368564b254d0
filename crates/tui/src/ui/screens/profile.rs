use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::AppState,
    ui::{
        components::{card::Card, centered_box},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(session) = &state.session else {
        return;
    };
    let claims = &session.claims;

    let card_area = centered_box(56, 14, area);
    let card = Card::new("Profile", theme);
    let inner = card.inner(card_area);
    card.render_frame(frame, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let avatar = Line::from(vec![
        Span::styled(
            format!(" {} ", claims.initial()),
            Style::default()
                .fg(theme.background)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            claims.display_name().to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(avatar).alignment(Alignment::Center), rows[0]);

    let joined = claims
        .joined_on()
        .map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let expires = claims
        .expires_at()
        .map(|dt| dt.with_timezone(&state.timezone).format("%d %b %Y %H:%M").to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let details = [
        ("Email", claims.email.clone().unwrap_or_else(|| "-".to_string())),
        ("User ID", claims.id.clone().unwrap_or_else(|| "-".to_string())),
        ("Role", claims.role_label().to_string()),
        ("Joined", joined),
        ("Session until", expires),
    ];
    let lines: Vec<Line> = details
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<15}"), Style::default().fg(theme.text_muted)),
                Span::styled(value, Style::default().fg(theme.text)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), rows[2]);
}
