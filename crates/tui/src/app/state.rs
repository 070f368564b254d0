use std::time::{Duration, Instant};

use api_types::entry::{Entry, EntryKind};
use chrono::NaiveDate;
use chrono_tz::Tz;
use engine::{
    Currency,
    aggregate::{self, EntryFilter, SortOrder},
    form::{AuthField, AuthForm, AuthMode, EntryField, EntryForm, FormErrors},
};

use crate::session::Session;

const TOAST_TTL: Duration = Duration::from_secs(4);
pub const UNSAVED_ENTRY: &str = "This entry has no id yet. Refresh and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    ForgotPassword,
    ResetPassword,
    Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Entries,
    Summary,
    Profile,
}

impl Section {
    pub const ALL: [Section; 4] = [Self::Home, Self::Entries, Self::Summary, Self::Profile];

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Entries => "Entries",
            Self::Summary => "Summary",
            Self::Profile => "Profile",
        }
    }

    /// Key that jumps to this section from anywhere in the shell.
    pub fn shortcut(self) -> char {
        match self {
            Self::Home => 'h',
            Self::Entries => 'v',
            Self::Summary => 's',
            Self::Profile => 'p',
        }
    }

    pub fn from_shortcut(ch: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.shortcut() == ch.to_ascii_lowercase())
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Sections that show entry data and refetch when opened.
    pub fn needs_entries(self) -> bool {
        !matches!(self, Self::Profile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

impl ToastState {
    pub fn new(message: impl Into<String>, level: ToastLevel, now: Instant) -> Self {
        Self {
            message: message.into(),
            level,
            expires_at: now + TOAST_TTL,
        }
    }
}

#[derive(Debug, Default)]
pub struct AuthState {
    pub mode: AuthMode,
    pub form: AuthForm,
    pub focus: usize,
    pub errors: FormErrors<AuthField>,
    /// Error not tied to a field.
    pub banner: Option<String>,
    /// Success note, e.g. after signup or a password reset.
    pub notice: Option<String>,
    pub show_password: bool,
}

impl AuthState {
    pub fn with_email(email: &str) -> Self {
        let mut state = Self::default();
        state.form.email = email.to_string();
        if !email.is_empty() {
            state.focus = 1;
        }
        state
    }

    pub fn focused_field(&self) -> AuthField {
        let fields = self.mode.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn next_focus(&mut self) {
        self.focus = (self.focus + 1) % self.mode.fields().len();
    }

    pub fn prev_focus(&mut self) {
        let len = self.mode.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn push_char(&mut self, ch: char) {
        let field = self.focused_field();
        self.form.field_mut(field).push(ch);
        self.errors.clear_field(field);
    }

    pub fn pop_char(&mut self) {
        let field = self.focused_field();
        self.form.field_mut(field).pop();
        self.errors.clear_field(field);
    }

    /// Flips login/signup and starts from an empty form.
    pub fn switch_mode(&mut self) {
        self.mode = self.mode.toggle();
        self.reset_form();
    }

    pub fn reset_form(&mut self) {
        self.form = AuthForm::default();
        self.focus = 0;
        self.errors = FormErrors::default();
        self.banner = None;
    }

    pub fn clear_feedback(&mut self) {
        self.errors = FormErrors::default();
        self.banner = None;
        self.notice = None;
    }

    /// Routes a server error to its field when the field is on screen.
    pub fn apply_server_error(&mut self, field: Option<&str>, message: String) {
        match field.and_then(AuthField::from_api) {
            Some(field) if self.mode.fields().contains(&field) => {
                self.errors.insert(field, message);
            }
            _ => self.banner = Some(message),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ForgotStep {
    #[default]
    Email,
    Otp,
}

#[derive(Debug, Default)]
pub struct ForgotState {
    pub step: ForgotStep,
    pub email: String,
    pub otp: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl ForgotState {
    pub fn input_mut(&mut self) -> &mut String {
        match self.step {
            ForgotStep::Email => &mut self.email,
            ForgotStep::Otp => &mut self.otp,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetField {
    #[default]
    Password,
    Confirm,
}

#[derive(Debug, Default)]
pub struct ResetState {
    pub reset_token: Option<String>,
    pub password: String,
    pub confirm: String,
    pub focus: ResetField,
    pub error: Option<String>,
    pub show_password: bool,
}

impl ResetState {
    pub fn input_mut(&mut self) -> &mut String {
        match self.focus {
            ResetField::Password => &mut self.password,
            ResetField::Confirm => &mut self.confirm,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            ResetField::Password => ResetField::Confirm,
            ResetField::Confirm => ResetField::Password,
        };
    }

    /// Checks the inputs before calling the API.
    pub fn check(&self) -> Result<&str, &'static str> {
        if self.password.is_empty() || self.confirm.is_empty() {
            return Err("Both fields are required");
        }
        if self.password != self.confirm {
            return Err("Passwords do not match");
        }
        self.reset_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or("No reset token found. Please restart the process.")
    }
}

#[derive(Debug, Default)]
pub struct EntriesState {
    pub filter: EntryFilter,
    pub order: SortOrder,
    pub selected: usize,
    pub confirm_delete: bool,
}

impl EntriesState {
    /// Entries in display order for the current filter and sort.
    pub fn visible<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        aggregate::filter_and_sort(entries, self.filter, self.order)
    }

    pub fn selected_entry<'a>(&self, entries: &'a [Entry]) -> Option<&'a Entry> {
        self.visible(entries).get(self.selected).copied()
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.selected = 0;
    }

    pub fn toggle_order(&mut self) {
        self.order = self.order.toggle();
        self.selected = 0;
    }
}

/// The add/edit modal.
#[derive(Debug)]
pub struct EntryFormState {
    pub form: EntryForm,
    /// `Some` when editing an existing entry.
    pub editing_id: Option<String>,
    pub focus: EntryField,
    pub errors: FormErrors<EntryField>,
    pub banner: Option<String>,
}

impl EntryFormState {
    pub fn add(today: NaiveDate) -> Self {
        Self {
            form: EntryForm::new(today),
            editing_id: None,
            focus: EntryField::Kind,
            errors: FormErrors::default(),
            banner: None,
        }
    }

    /// `None` when the entry has no server id to update.
    pub fn edit(entry: &Entry) -> Option<Self> {
        let id = entry.id.clone()?;
        Some(Self {
            form: EntryForm::from_entry(entry),
            editing_id: Some(id),
            focus: EntryField::Title,
            errors: FormErrors::default(),
            banner: None,
        })
    }

    pub fn title(&self) -> &'static str {
        if self.editing_id.is_some() {
            "Edit Entry"
        } else {
            "Add Entry"
        }
    }

    pub fn push_char(&mut self, ch: char) {
        if self.focus.is_choice() {
            if ch == ' ' {
                self.form.cycle(self.focus, true);
                self.errors.clear_field(self.focus);
            }
            return;
        }
        if let Some(buffer) = self.form.text_mut(self.focus) {
            buffer.push(ch);
            self.errors.clear_field(self.focus);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(buffer) = self.form.text_mut(self.focus) {
            buffer.pop();
            self.errors.clear_field(self.focus);
        }
    }

    pub fn cycle(&mut self, forward: bool) {
        self.form.cycle(self.focus, forward);
        self.errors.clear_field(self.focus);
    }
}

#[derive(Debug, Default)]
pub struct SummaryState {
    /// Which breakdown has the cursor.
    pub focus: BreakdownFocus,
    pub expense_slice: usize,
    pub income_slice: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BreakdownFocus {
    #[default]
    Expense,
    Income,
}

impl BreakdownFocus {
    pub fn kind(self) -> EntryKind {
        match self {
            Self::Expense => EntryKind::Expense,
            Self::Income => EntryKind::Income,
        }
    }
}

impl SummaryState {
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            BreakdownFocus::Expense => BreakdownFocus::Income,
            BreakdownFocus::Income => BreakdownFocus::Expense,
        };
    }

    pub fn selected(&self, kind: EntryKind) -> usize {
        match kind {
            EntryKind::Expense => self.expense_slice,
            EntryKind::Income => self.income_slice,
        }
    }

    pub fn clamp(&mut self, expense_len: usize, income_len: usize) {
        self.expense_slice = self.expense_slice.min(expense_len.saturating_sub(1));
        self.income_slice = self.income_slice.min(income_len.saturating_sub(1));
    }

    /// Moves the focused breakdown's selection within `len` slices.
    pub fn move_selection(&mut self, len: usize, forward: bool) {
        let slot = match self.focus {
            BreakdownFocus::Expense => &mut self.expense_slice,
            BreakdownFocus::Income => &mut self.income_slice,
        };
        if len == 0 {
            *slot = 0;
        } else if forward {
            *slot = (*slot + 1) % len;
        } else {
            *slot = (*slot + len - 1) % len;
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub section: Section,
    pub currency: Currency,
    /// Used for "today" defaults and displayed times.
    pub timezone: Tz,
    pub session: Option<Session>,
    pub auth: AuthState,
    pub forgot: ForgotState,
    pub reset: ResetState,
    /// Last list fetched from the server.
    pub entries: Vec<Entry>,
    pub load_error: Option<String>,
    pub entries_ui: EntriesState,
    pub form: Option<EntryFormState>,
    pub summary: SummaryState,
    pub toast: Option<ToastState>,
}

impl AppState {
    pub fn new(currency: Currency, timezone: Tz, email: &str) -> Self {
        Self {
            screen: Screen::Auth,
            section: Section::Home,
            currency,
            timezone,
            session: None,
            auth: AuthState::with_email(email),
            forgot: ForgotState::default(),
            reset: ResetState::default(),
            entries: Vec::new(),
            load_error: None,
            entries_ui: EntriesState::default(),
            form: None,
            summary: SummaryState::default(),
            toast: None,
        }
    }

    /// Mirrors a session change from the store into the screens.
    pub fn apply_session(&mut self, session: Option<Session>) {
        match session {
            Some(session) => {
                self.session = Some(session);
                self.screen = Screen::Shell;
                self.section = Section::Home;
                self.auth.form.password.clear();
                self.auth.form.confirm_password.clear();
                self.auth.clear_feedback();
            }
            None => {
                self.session = None;
                self.screen = Screen::Auth;
                self.entries.clear();
                self.entries_ui = EntriesState::default();
                self.summary = SummaryState::default();
                self.form = None;
                self.load_error = None;
            }
        }
    }

    pub fn set_entries(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
        self.load_error = None;
        let len = self.entries_ui.visible(&self.entries).len();
        self.entries_ui.clamp(len);
        self.summary.clamp(
            aggregate::category_buckets(&self.entries, EntryKind::Expense).len(),
            aggregate::category_buckets(&self.entries, EntryKind::Income).len(),
        );
    }

    /// Opens the edit modal for the selected entry.
    pub fn edit_selected(&mut self) {
        let Some(entry) = self.entries_ui.selected_entry(&self.entries) else {
            return;
        };
        match EntryFormState::edit(entry) {
            Some(form) => self.form = Some(form),
            None => self.toast(UNSAVED_ENTRY, ToastLevel::Error),
        }
    }

    /// Asks for delete confirmation when the selected entry can be deleted.
    pub fn request_delete_selected(&mut self) {
        let Some(entry) = self.entries_ui.selected_entry(&self.entries) else {
            return;
        };
        if entry.id.is_some() {
            self.entries_ui.confirm_delete = true;
        } else {
            self.toast(UNSAVED_ENTRY, ToastLevel::Error);
        }
    }

    pub fn toast(&mut self, message: impl Into<String>, level: ToastLevel) {
        self.toast = Some(ToastState::new(message, level, Instant::now()));
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.expires_at <= now) {
            self.toast = None;
        }
    }

    pub fn open_forgot_password(&mut self) {
        self.forgot = ForgotState {
            email: self.auth.form.email.trim().to_string(),
            ..ForgotState::default()
        };
        self.screen = Screen::ForgotPassword;
    }

    pub fn open_reset(&mut self, reset_token: String) {
        self.reset = ResetState {
            reset_token: Some(reset_token),
            ..ResetState::default()
        };
        self.screen = Screen::ResetPassword;
    }

    pub fn back_to_login(&mut self, notice: Option<String>) {
        self.auth.mode = AuthMode::Login;
        self.auth.reset_form();
        self.auth.notice = notice;
        self.screen = Screen::Auth;
    }
}
