use engine::{Currency, MoneyCents, aggregate::CategoryBucket};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::{
    components::{card::Card, truncate},
    theme::Theme,
};

const LABEL_WIDTH: usize = 14;
const BAR_WIDTH: usize = 20;

/// Bar of `width` cells, `percentage` of them filled.
#[must_use]
pub fn share_bar(percentage: u16, width: usize) -> String {
    let filled = ((percentage as usize * width) / 100).min(width);
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// One category breakdown: a row per bucket with a colored share bar.
pub struct Breakdown<'a> {
    pub title: &'a str,
    pub buckets: &'a [CategoryBucket],
    pub total: MoneyCents,
    pub selected: Option<usize>,
    pub focused: bool,
    pub currency: Currency,
}

impl Breakdown<'_> {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let card = Card::new(self.title, theme).focused(self.focused);
        let inner = card.inner(area);
        card.render_frame(frame, area);

        if self.buckets.is_empty() || self.total.is_zero() {
            frame.render_widget(
                Paragraph::new(Span::styled("No data", Style::default().fg(theme.dim)))
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let mut rows: Vec<Line> = self
            .buckets
            .iter()
            .enumerate()
            .take(inner.height.saturating_sub(2) as usize)
            .map(|(idx, bucket)| self.row(idx, bucket, theme))
            .collect();

        if let Some(bucket) = self.selected.and_then(|idx| self.buckets.get(idx)) {
            rows.push(Line::default());
            rows.push(Line::from(vec![
                Span::styled(bucket_name(bucket), Style::default().fg(theme.text)),
                Span::raw(": "),
                Span::styled(
                    bucket.value.format(self.currency),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" ({}%)", bucket.share_of(self.total)),
                    Style::default().fg(theme.dim),
                ),
            ]));
        }

        frame.render_widget(Paragraph::new(rows), inner);
    }

    fn row(&self, idx: usize, bucket: &CategoryBucket, theme: &Theme) -> Line<'static> {
        let pct = bucket.share_of(self.total);
        let color = theme.slice_color(idx);
        let is_selected = self.focused && self.selected == Some(idx);
        let marker = if is_selected { "» " } else { "  " };
        let label_style = if is_selected {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };

        Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.accent)),
            Span::styled(
                format!(
                    "{:<width$}",
                    truncate(&bucket_name(bucket), LABEL_WIDTH - 1),
                    width = LABEL_WIDTH
                ),
                label_style,
            ),
            Span::styled(share_bar(pct, BAR_WIDTH), Style::default().fg(color)),
            Span::styled(format!(" {pct:>3}%"), Style::default().fg(theme.dim)),
        ])
    }
}

/// Display name of a bucket; the empty-category bucket shows as `Uncategorized`.
fn bucket_name(bucket: &CategoryBucket) -> String {
    if bucket.name.is_empty() {
        "Uncategorized".to_string()
    } else {
        bucket.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_bar_fills_proportionally() {
        assert_eq!(share_bar(0, 4), "░░░░");
        assert_eq!(share_bar(50, 4), "██░░");
        assert_eq!(share_bar(100, 4), "████");
        assert_eq!(share_bar(250, 4), "████");
    }

    #[test]
    fn empty_category_gets_a_name() {
        let bucket = CategoryBucket {
            name: String::new(),
            value: MoneyCents::new(100),
        };
        assert_eq!(bucket_name(&bucket), "Uncategorized");
    }
}
