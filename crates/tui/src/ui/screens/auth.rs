use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use engine::form::AuthMode;

use crate::{
    app::AppState,
    ui::{
        components::{card::Card, centered_box, input::Input},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let auth = &state.auth;
    let fields = auth.mode.fields();

    let box_height = fields.len() as u16 * Input::HEIGHT + 6;
    let card_area = centered_box(64, box_height, area);
    frame.render_widget(Clear, card_area);

    let card = Card::new(auth.mode.title(), theme).focused(true);
    let inner = card.inner(card_area);
    card.render_frame(frame, card_area);

    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(Input::HEIGHT)));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(inner);

    let subtitle = match auth.mode {
        AuthMode::Login => "Welcome back. Log in to your account.",
        AuthMode::Signup => "Create an account to start tracking.",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(subtitle, Style::default().fg(theme.dim))),
        rows[0],
    );

    for (idx, field) in fields.iter().enumerate() {
        Input {
            label: field.label(),
            value: auth.form.field(*field),
            focused: auth.focus == idx,
            secret: field.is_secret() && !auth.show_password,
            error: auth.errors.get(*field),
        }
        .render(frame, rows[idx + 1], theme);
    }

    let mut footer = Vec::new();
    if let Some(banner) = &auth.banner {
        footer.push(Line::from(Span::styled(
            banner.as_str(),
            Style::default().fg(theme.error),
        )));
    }
    if let Some(notice) = &auth.notice {
        footer.push(Line::from(Span::styled(
            notice.as_str(),
            Style::default().fg(theme.positive),
        )));
    }
    let switch = match auth.mode {
        AuthMode::Login => "No account yet? Ctrl+N to sign up.",
        AuthMode::Signup => "Already registered? Ctrl+N to log in.",
    };
    footer.push(Line::from(Span::styled(
        switch,
        Style::default().fg(theme.text_muted).add_modifier(Modifier::ITALIC),
    )));
    frame.render_widget(
        Paragraph::new(footer).alignment(Alignment::Center),
        rows[rows.len() - 1],
    );
}
