use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub mod common {
    use super::KeyHint;

    pub const AUTH: &[KeyHint] = &[
        KeyHint::new("Tab", "next"),
        KeyHint::new("Enter", "submit"),
        KeyHint::new("Ctrl+N", "login/signup"),
        KeyHint::new("Ctrl+F", "forgot password"),
        KeyHint::new("Ctrl+T", "show password"),
        KeyHint::new("Ctrl+C", "quit"),
    ];

    pub const RECOVERY: &[KeyHint] = &[
        KeyHint::new("Enter", "submit"),
        KeyHint::new("Esc", "back to login"),
        KeyHint::new("Ctrl+C", "quit"),
    ];

    pub const HOME: &[KeyHint] = &[KeyHint::new("r", "refresh")];

    pub const ENTRIES: &[KeyHint] = &[
        KeyHint::new("↑↓", "select"),
        KeyHint::new("a", "add"),
        KeyHint::new("e", "edit"),
        KeyHint::new("d", "delete"),
        KeyHint::new("f", "filter"),
        KeyHint::new("o", "sort"),
    ];

    pub const CONFIRM_DELETE: &[KeyHint] = &[
        KeyHint::new("y", "delete"),
        KeyHint::new("any", "cancel"),
    ];

    pub const SUMMARY: &[KeyHint] = &[
        KeyHint::new("←→", "breakdown"),
        KeyHint::new("↑↓", "slice"),
    ];

    pub const PROFILE: &[KeyHint] = &[];

    pub const FORM: &[KeyHint] = &[
        KeyHint::new("Tab", "next"),
        KeyHint::new("←→/Space", "choose"),
        KeyHint::new("Enter", "save"),
        KeyHint::new("Esc", "cancel"),
    ];

    pub const GLOBAL: &[KeyHint] = &[KeyHint::new("x", "logout"), KeyHint::new("q", "quit")];
}
