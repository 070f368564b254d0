use api_types::entry::EntryKind;
use engine::aggregate;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::{
    app::AppState,
    ui::{components::charts::Breakdown, screens::home::render_totals, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(area);

    let totals = aggregate::compute_totals(&state.entries);
    render_totals(frame, layout[0], &totals, state.currency, theme);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);

    for (kind, title, area) in [
        (EntryKind::Expense, "Expense Breakdown", cols[0]),
        (EntryKind::Income, "Income Breakdown", cols[1]),
    ] {
        let buckets = aggregate::category_buckets(&state.entries, kind);
        let focused = state.summary.focus.kind() == kind;
        Breakdown {
            title,
            buckets: &buckets,
            total: totals.for_kind(kind),
            selected: Some(state.summary.selected(kind)),
            focused,
            currency: state.currency,
        }
        .render(frame, area, theme);
    }
}
