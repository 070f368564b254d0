pub mod card;
pub mod charts;
pub mod hints;
pub mod input;
pub mod money;
pub mod tabs;
pub mod toast;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rect of `width` x `height` cells centered in `area`, clipped to it.
pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Cuts `s` to `max` characters, ending with `…` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_box_fits_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_box(40, 10, area);
        assert_eq!((rect.width, rect.height), (40, 10));
        assert_eq!((rect.x, rect.y), (30, 15));

        let small = centered_box(200, 100, area);
        assert_eq!((small.width, small.height), (100, 40));
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("Groceries", 20), "Groceries");
        assert_eq!(truncate("Groceries", 5), "Groc…");
        assert_eq!(truncate("₹₹₹₹", 3), "₹₹…");
    }
}
