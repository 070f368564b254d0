pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, Screen, Section};
use components::hints::{KeyHint, common, hint_separator, hints_to_spans};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    match state.screen {
        Screen::Auth => render_standalone(frame, area, state, &theme, common::AUTH),
        Screen::ForgotPassword | Screen::ResetPassword => {
            render_standalone(frame, area, state, &theme, common::RECOVERY)
        }
        Screen::Shell => render_shell(frame, area, state, &theme),
    }

    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

/// Screens shown before sign-in: centered content plus a hint line.
fn render_standalone(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    theme: &Theme,
    hints: &[KeyHint],
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    match state.screen {
        Screen::ForgotPassword => screens::recovery::render_forgot(frame, layout[0], state, theme),
        Screen::ResetPassword => screens::recovery::render_reset(frame, layout[0], state, theme),
        _ => screens::auth::render(frame, layout[0], state, theme),
    }
    frame.render_widget(
        Paragraph::new(Line::from(hints_to_spans(hints, theme))),
        layout[1],
    );
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, theme);
    components::tabs::render_tabs(frame, layout[1], state.section, theme);

    let content = layout[2];
    match state.section {
        Section::Home => screens::home::render(frame, content, state, theme),
        Section::Entries => screens::entries::render(frame, content, state, theme),
        Section::Summary => screens::summary::render(frame, content, state, theme),
        Section::Profile => screens::profile::render(frame, content, state, theme),
    }

    if let Some(modal) = &state.form {
        screens::entry_form::render(frame, content, modal, theme);
    }

    render_bottom_bar(frame, layout[3], state, theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state
        .session
        .as_ref()
        .map(|s| s.claims.display_name().to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut spans = vec![
        Span::styled("Tally", Style::default().fg(theme.accent)),
        Span::raw("  "),
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Currency", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.currency)),
        Span::styled("Entries", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}", state.entries.len())),
    ];
    if state.load_error.is_some() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("offline", Style::default().fg(theme.error)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let modal = state.form.is_some() || state.entries_ui.confirm_delete;
    let mut groups: Vec<Vec<Span<'static>>> = Vec::new();

    if !modal {
        groups.push(components::tabs::tab_shortcuts(theme));
    }
    let context = context_hints(state);
    if !context.is_empty() {
        groups.push(hints_to_spans(context, theme));
    }
    if !modal {
        groups.push(hints_to_spans(common::GLOBAL, theme));
    }

    let mut parts = Vec::new();
    for (i, group) in groups.into_iter().enumerate() {
        if i > 0 {
            parts.push(hint_separator(theme));
        }
        parts.extend(group);
    }
    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn context_hints(state: &AppState) -> &'static [KeyHint] {
    if state.form.is_some() {
        return common::FORM;
    }
    if state.entries_ui.confirm_delete {
        return common::CONFIRM_DELETE;
    }
    match state.section {
        Section::Home => common::HOME,
        Section::Entries => common::ENTRIES,
        Section::Summary => common::SUMMARY,
        Section::Profile => common::PROFILE,
    }
}
