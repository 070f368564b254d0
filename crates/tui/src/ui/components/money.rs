use api_types::entry::EntryKind;
use engine::{Currency, MoneyCents};
use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// Amount colored by sign: positive green, negative red, zero plain.
#[must_use]
pub fn styled_balance(amount: MoneyCents, currency: Currency, theme: &Theme) -> Span<'static> {
    let color = if amount.is_negative() {
        theme.negative
    } else if amount.is_zero() {
        theme.text
    } else {
        theme.positive
    };
    Span::styled(amount.format(currency), Style::default().fg(color))
}

/// Amount colored by entry kind, with `+` for income and `-` for expense.
#[must_use]
pub fn styled_entry_amount(
    amount: MoneyCents,
    kind: EntryKind,
    currency: Currency,
    theme: &Theme,
) -> Span<'static> {
    let (sign, color) = match kind {
        EntryKind::Income => ("+", theme.positive),
        EntryKind::Expense => ("-", theme.negative),
    };
    Span::styled(
        format!("{sign}{}", amount.abs().format(currency)),
        Style::default().fg(color),
    )
}

/// Total for one kind, colored like its entries but without a sign.
#[must_use]
pub fn styled_kind_total(
    amount: MoneyCents,
    kind: EntryKind,
    currency: Currency,
    theme: &Theme,
) -> Span<'static> {
    let color = match kind {
        EntryKind::Income => theme.positive,
        EntryKind::Expense => theme.negative,
    };
    Span::styled(amount.format(currency), Style::default().fg(color))
}
