use engine::aggregate::{self, EntryFilter};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        components::{card::Card, money::styled_entry_amount, truncate},
        screens::home::render_totals,
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

    render_totals(
        frame,
        layout[0],
        &aggregate::compute_totals(&state.entries),
        state.currency,
        theme,
    );
    render_controls(frame, layout[1], state, theme);
    render_list(frame, layout[2], state, theme);
}

fn render_controls(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let ui = &state.entries_ui;
    let mut spans = vec![Span::raw(" ")];
    for filter in [EntryFilter::All, EntryFilter::Income, EntryFilter::Expense] {
        let style = if filter == ui.filter {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(theme.text_muted)
        };
        spans.push(Span::styled(format!(" {} ", filter.label()), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    spans.push(Span::styled(ui.order.label(), Style::default().fg(theme.text)));

    if let Some(err) = &state.load_error {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let ui = &state.entries_ui;
    let visible = ui.visible(&state.entries);
    let card = Card::new(format!("Entries ({})", visible.len()), theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    if visible.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No entries. Press a to add one.",
                Style::default().fg(theme.dim),
            ))
            .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let title_width = (inner.width as usize).saturating_sub(60).max(10);
    let items: Vec<ListItem> = visible
        .iter()
        .map(|entry| {
            let kind_color = match entry.kind {
                api_types::entry::EntryKind::Income => theme.positive,
                api_types::entry::EntryKind::Expense => theme.negative,
            };
            let paid_via = entry.paid_via.map(|p| p.as_str()).unwrap_or("-");
            let category = if entry.category.is_empty() {
                "-"
            } else {
                entry.category.as_str()
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    entry.date.format("%Y-%m-%d").to_string(),
                    Style::default().fg(theme.dim),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("{:<8}", entry.kind.label()),
                    Style::default().fg(kind_color),
                ),
                Span::styled(
                    format!("{:<title_width$}", truncate(&entry.title, title_width)),
                    Style::default().fg(theme.text),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{:<10}", truncate(category, 10)),
                    Style::default().fg(theme.accent),
                ),
                Span::styled(
                    format!("{:<14}", paid_via),
                    Style::default().fg(theme.text_muted),
                ),
                styled_entry_amount(aggregate::entry_amount(entry), entry.kind, state.currency, theme),
            ]))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(ui.selected.min(visible.len() - 1)));

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, inner, &mut list_state);

    if ui.confirm_delete {
        if let Some(entry) = ui.selected_entry(&state.entries) {
            let prompt = Line::from(vec![
                Span::styled(
                    format!("Delete \"{}\"? ", truncate(&entry.title, 30)),
                    Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
                ),
                Span::styled("y", Style::default().fg(theme.accent)),
                Span::raw(" to confirm"),
            ]);
            let bottom = Rect {
                y: inner.y + inner.height.saturating_sub(1),
                height: 1,
                ..inner
            };
            frame.render_widget(Paragraph::new(prompt).alignment(Alignment::Center), bottom);
        }
    }
}
