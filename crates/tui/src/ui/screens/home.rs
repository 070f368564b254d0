use api_types::entry::{Entry, EntryKind};
use engine::{
    Currency,
    aggregate::{self, RECENT_LIMIT, Totals},
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            money::{styled_balance, styled_entry_amount, styled_kind_total},
            truncate,
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let totals = aggregate::compute_totals(&state.entries);
    render_totals(frame, layout[0], &totals, state.currency, theme);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);
    render_recent(frame, cols[0], state, EntryKind::Income, theme);
    render_recent(frame, cols[1], state, EntryKind::Expense, theme);
}

/// Total Income / Total Expenses / Available Balance, also used on Entries.
pub fn render_totals(
    frame: &mut Frame<'_>,
    area: Rect,
    totals: &Totals,
    currency: Currency,
    theme: &Theme,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    StatCard::new(
        "Total Income",
        styled_kind_total(totals.income, EntryKind::Income, currency, theme),
        theme,
    )
    .render(frame, cols[0]);
    StatCard::new(
        "Total Expenses",
        styled_kind_total(totals.expense, EntryKind::Expense, currency, theme),
        theme,
    )
    .render(frame, cols[1]);
    StatCard::new(
        "Available Balance",
        styled_balance(totals.balance, currency, theme),
        theme,
    )
    .render(frame, cols[2]);
}

fn render_recent(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    kind: EntryKind,
    theme: &Theme,
) {
    let total = aggregate::type_total(&state.entries, kind);
    let title = format!("{} · {}", kind.label(), total.format(state.currency));
    let card = Card::new(title, theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let recent = aggregate::recent_by_type(&state.entries, kind, RECENT_LIMIT);
    if recent.is_empty() {
        let empty = match kind {
            EntryKind::Income => "No income yet",
            EntryKind::Expense => "No expenses yet",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(empty, Style::default().fg(theme.dim))),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = recent
        .into_iter()
        .map(|entry| entry_line(entry, state.currency, theme, inner.width))
        .map(ListItem::new)
        .collect();
    frame.render_widget(List::new(items), inner);
}

/// `06 Jan  Groceries         -₹120.00`
pub fn entry_line(entry: &Entry, currency: Currency, theme: &Theme, width: u16) -> Line<'static> {
    let title_width = (width as usize).saturating_sub(22).max(8);
    Line::from(vec![
        Span::styled(
            entry.date.format("%d %b").to_string(),
            Style::default().fg(theme.dim),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{:<title_width$}", truncate(&entry.title, title_width)),
            Style::default().fg(theme.text),
        ),
        Span::raw(" "),
        styled_entry_amount(aggregate::entry_amount(entry), entry.kind, currency, theme),
    ])
}
