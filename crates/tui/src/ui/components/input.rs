use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

/// One labelled input row with an optional error line under it.
pub struct Input<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub focused: bool,
    pub secret: bool,
    pub error: Option<&'a str>,
}

impl Input<'_> {
    /// Rows needed: label+value, plus one for the error.
    pub const HEIGHT: u16 = 2;

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let cursor = if self.focused { "│" } else { "" };
        let shown = if self.secret {
            mask(self.value)
        } else {
            self.value.to_string()
        };

        let label_style = if self.focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };

        let mut lines = vec![Line::from(vec![
            Span::styled(format!("{:<18}", self.label), label_style),
            Span::styled(format!("{shown}{cursor}"), Style::default().fg(theme.text)),
        ])];
        if let Some(error) = self.error {
            lines.push(Line::from(Span::styled(
                format!("{:<18}{error}", ""),
                Style::default().fg(theme.error),
            )));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }
}

/// One bullet per character.
pub fn mask(value: &str) -> String {
    "•".repeat(value.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_counts_chars() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("pä$"), "•••");
    }
}
