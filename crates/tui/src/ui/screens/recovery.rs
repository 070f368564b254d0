//! Forgot-password (email, then OTP) and reset-password screens.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{
    app::{AppState, ForgotStep, ResetField},
    ui::{
        components::{card::Card, centered_box, input::Input},
        theme::Theme,
    },
};

pub fn render_forgot(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let forgot = &state.forgot;
    let (subtitle, field) = match forgot.step {
        ForgotStep::Email => (
            "Enter your account email. We will send you a one-time code.",
            Input {
                label: "Email",
                value: &forgot.email,
                focused: true,
                secret: false,
                error: None,
            },
        ),
        ForgotStep::Otp => (
            "Enter the code sent to your email.",
            Input {
                label: "OTP",
                value: &forgot.otp,
                focused: true,
                secret: false,
                error: None,
            },
        ),
    };

    let rows = panel(frame, area, "Forgot Password", 1, theme);
    frame.render_widget(
        Paragraph::new(Span::styled(subtitle, Style::default().fg(theme.dim))),
        rows[0],
    );
    if forgot.step == ForgotStep::Otp {
        let email = Line::from(vec![
            Span::styled(format!("{:<18}", "Email"), Style::default().fg(theme.text_muted)),
            Span::raw(forgot.email.trim()),
        ]);
        frame.render_widget(Paragraph::new(email), rows[1]);
    }
    field.render(frame, rows[2], theme);
    render_feedback(frame, rows[3], forgot.error.as_deref(), forgot.notice.as_deref(), theme);
}

pub fn render_reset(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let reset = &state.reset;
    let rows = panel(frame, area, "Reset Password", 2, theme);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Choose a new password.",
            Style::default().fg(theme.dim),
        )),
        rows[0],
    );
    Input {
        label: "New Password",
        value: &reset.password,
        focused: reset.focus == ResetField::Password,
        secret: !reset.show_password,
        error: None,
    }
    .render(frame, rows[1], theme);
    Input {
        label: "Confirm Password",
        value: &reset.confirm,
        focused: reset.focus == ResetField::Confirm,
        secret: !reset.show_password,
        error: None,
    }
    .render(frame, rows[2], theme);
    render_feedback(frame, rows[3], reset.error.as_deref(), None, theme);
}

/// Draws the centered card and returns its rows: subtitle, two input slots,
/// feedback.
fn panel(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    inputs: u16,
    theme: &Theme,
) -> std::rc::Rc<[Rect]> {
    let card_area = centered_box(64, inputs * Input::HEIGHT + 8, area);
    frame.render_widget(Clear, card_area);
    let card = Card::new(title, theme).focused(true);
    let inner = card.inner(card_area);
    card.render_frame(frame, card_area);

    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(Input::HEIGHT),
            Constraint::Length(Input::HEIGHT),
            Constraint::Min(0),
        ])
        .horizontal_margin(1)
        .split(inner)
}

fn render_feedback(
    frame: &mut Frame<'_>,
    area: Rect,
    error: Option<&str>,
    notice: Option<&str>,
    theme: &Theme,
) {
    let mut lines = Vec::new();
    if let Some(notice) = notice {
        lines.push(Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(theme.positive),
        )));
    }
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(theme.error),
        )));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
