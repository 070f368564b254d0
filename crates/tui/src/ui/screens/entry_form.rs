use engine::form::EntryField;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{
    app::EntryFormState,
    ui::{
        components::{card::Card, centered_box, input::Input},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, modal: &EntryFormState, theme: &Theme) {
    let height = EntryField::ALL.len() as u16 * Input::HEIGHT + 4;
    let popup = centered_box(72, height, area);
    frame.render_widget(Clear, popup);

    let card = Card::new(modal.title(), theme).focused(true);
    let inner = card.inner(popup);
    card.render_frame(frame, popup);

    let mut constraints: Vec<Constraint> = EntryField::ALL
        .iter()
        .map(|_| Constraint::Length(Input::HEIGHT))
        .collect();
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(inner);

    for (idx, field) in EntryField::ALL.iter().enumerate() {
        let focused = modal.focus == *field;
        let error = modal.errors.get(*field);
        if field.is_choice() {
            render_choice(frame, rows[idx], modal, *field, focused, error, theme);
        } else {
            let value = match field {
                EntryField::Title => modal.form.title.as_str(),
                EntryField::Amount => modal.form.amount.as_str(),
                EntryField::Date => modal.form.date.as_str(),
                _ => modal.form.notes.as_str(),
            };
            Input {
                label: field.label(),
                value,
                focused,
                secret: false,
                error,
            }
            .render(frame, rows[idx], theme);
        }
    }

    if let Some(banner) = &modal.banner {
        frame.render_widget(
            Paragraph::new(Span::styled(banner.as_str(), Style::default().fg(theme.error))),
            rows[rows.len() - 1],
        );
    }
}

fn render_choice(
    frame: &mut Frame<'_>,
    area: Rect,
    modal: &EntryFormState,
    field: EntryField,
    focused: bool,
    error: Option<&str>,
    theme: &Theme,
) {
    let current = match field {
        EntryField::Kind => Some(modal.form.kind.label()),
        EntryField::Category => modal.form.category.map(|c| c.as_str()),
        _ => modal.form.paid_via.map(|p| p.as_str()),
    };

    let label_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let (value, value_style) = match current {
        Some(value) => (value, Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
        None => ("select", Style::default().fg(theme.dim)),
    };
    let arrows = Style::default().fg(if focused { theme.accent } else { theme.border });

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{:<18}", field.label()), label_style),
        Span::styled("‹ ", arrows),
        Span::styled(value, value_style),
        Span::styled(" ›", arrows),
    ])];
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            format!("{:<18}{error}", ""),
            Style::default().fg(theme.error),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}
