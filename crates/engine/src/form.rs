//! Form-boundary validation.
//!
//! Screens collect free text; nothing reaches the API until it has been turned
//! into a typed payload here. Errors are reported per field so the view can
//! show them next to the input they belong to.

use api_types::{
    auth,
    entry::{Category, Entry, EntryDraft, EntryKind, PaidVia, TITLE_MAX_LEN},
};
use chrono::NaiveDate;

use crate::{MoneyCents, aggregate::entry_amount};

/// Per-field validation messages, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors<F> {
    errors: Vec<(F, String)>,
}

impl<F> Default for FormErrors<F> {
    fn default() -> Self {
        Self { errors: Vec::new() }
    }
}

impl<F: Copy + PartialEq> FormErrors<F> {
    /// Sets the message for `field`, replacing an earlier one.
    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        let message = message.into();
        match self.errors.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = message,
            None => self.errors.push((field, message)),
        }
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn clear_field(&mut self, field: F) {
        self.errors.retain(|(f, _)| *f != field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryField {
    Kind,
    Title,
    Amount,
    Date,
    Category,
    PaidVia,
    Notes,
}

impl EntryField {
    pub const ALL: [EntryField; 7] = [
        Self::Kind,
        Self::Title,
        Self::Amount,
        Self::Date,
        Self::Category,
        Self::PaidVia,
        Self::Notes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Kind => "Type",
            Self::Title => "Title",
            Self::Amount => "Amount",
            Self::Date => "Date",
            Self::Category => "Category",
            Self::PaidVia => "Paid Via",
            Self::Notes => "Notes (optional)",
        }
    }

    /// Fields cycled with ←/→ instead of typed into.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Kind | Self::Category | Self::PaidVia)
    }

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let pos = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(pos + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Raw state of the add/edit entry form.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    pub kind: EntryKind,
    pub title: String,
    pub amount: String,
    pub date: String,
    pub category: Option<Category>,
    pub paid_via: Option<PaidVia>,
    pub notes: String,
}

impl EntryForm {
    /// Empty form for a new expense dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            kind: EntryKind::Expense,
            title: String::new(),
            amount: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
            category: None,
            paid_via: None,
            notes: String::new(),
        }
    }

    /// Form pre-filled from an existing entry, for editing.
    ///
    /// A category outside the canonical list is left unselected, so saving
    /// forces the user to pick one.
    pub fn from_entry(entry: &Entry) -> Self {
        let amount = match entry.amount {
            Some(_) => entry_amount(entry).to_string(),
            None => String::new(),
        };
        Self {
            kind: entry.kind,
            title: entry.title.clone(),
            amount,
            date: entry.date.format("%Y-%m-%d").to_string(),
            category: Category::parse(&entry.category),
            paid_via: entry.paid_via,
            notes: entry.notes.clone().unwrap_or_default(),
        }
    }

    /// Text buffer behind a typed field; `None` for choice fields.
    pub fn text_mut(&mut self, field: EntryField) -> Option<&mut String> {
        match field {
            EntryField::Title => Some(&mut self.title),
            EntryField::Amount => Some(&mut self.amount),
            EntryField::Date => Some(&mut self.date),
            EntryField::Notes => Some(&mut self.notes),
            EntryField::Kind | EntryField::Category | EntryField::PaidVia => None,
        }
    }

    /// Moves a choice field one step forward (`forward`) or back.
    pub fn cycle(&mut self, field: EntryField, forward: bool) {
        match field {
            EntryField::Kind => self.kind = self.kind.toggle(),
            EntryField::Category => {
                self.category = Some(cycle_choice(&Category::ALL, self.category, forward));
            }
            EntryField::PaidVia => {
                self.paid_via = Some(cycle_choice(&PaidVia::ALL, self.paid_via, forward));
            }
            EntryField::Title | EntryField::Amount | EntryField::Date | EntryField::Notes => {}
        }
    }

    pub fn validate(&self) -> Result<EntryDraft, FormErrors<EntryField>> {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.insert(EntryField::Title, "Title is required");
        } else if title.chars().count() > TITLE_MAX_LEN {
            errors.insert(
                EntryField::Title,
                format!("Title must be at most {TITLE_MAX_LEN} characters"),
            );
        }

        let amount = if self.amount.trim().is_empty() {
            errors.insert(EntryField::Amount, "Amount is required");
            None
        } else {
            match self.amount.parse::<MoneyCents>() {
                Ok(amount) if amount.is_negative() => {
                    errors.insert(EntryField::Amount, "Amount cannot be negative");
                    None
                }
                Ok(amount) => Some(amount),
                Err(_) => {
                    errors.insert(EntryField::Amount, "Enter a valid amount");
                    None
                }
            }
        };

        let date = match NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.insert(EntryField::Date, "Date must be YYYY-MM-DD");
                None
            }
        };

        if self.category.is_none() {
            errors.insert(EntryField::Category, "Category is required");
        }
        if self.paid_via.is_none() {
            errors.insert(EntryField::PaidVia, "Payment method is required");
        }

        match (amount, date, self.category, self.paid_via) {
            (Some(amount), Some(date), Some(category), Some(paid_via)) if errors.is_empty() => {
                let notes = self.notes.trim();
                Ok(EntryDraft {
                    kind: self.kind,
                    title: title.to_string(),
                    amount: amount.to_major(),
                    date,
                    category,
                    paid_via,
                    notes: (!notes.is_empty()).then(|| notes.to_string()),
                })
            }
            _ => Err(errors),
        }
    }
}

fn cycle_choice<T: Copy + PartialEq>(all: &[T], current: Option<T>, forward: bool) -> T {
    let len = all.len();
    let next = match current.and_then(|c| all.iter().position(|v| *v == c)) {
        None if forward => 0,
        None => len - 1,
        Some(pos) if forward => (pos + 1) % len,
        Some(pos) => (pos + len - 1) % len,
    };
    all[next]
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Login => Self::Signup,
            Self::Signup => Self::Login,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Sign Up",
        }
    }

    /// Fields shown in this mode, in focus order.
    pub fn fields(self) -> &'static [AuthField] {
        match self {
            Self::Login => &[AuthField::Email, AuthField::Password],
            Self::Signup => &[
                AuthField::Name,
                AuthField::Email,
                AuthField::Password,
                AuthField::ConfirmPassword,
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

impl AuthField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Email => "Email Address",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm Password",
        }
    }

    pub fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::ConfirmPassword)
    }

    /// Maps the `field` of an API error body onto a form field.
    pub fn from_api(field: &str) -> Option<Self> {
        match field {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "password" => Some(Self::Password),
            "confirmPassword" => Some(Self::ConfirmPassword),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl AuthForm {
    pub fn field_mut(&mut self, field: AuthField) -> &mut String {
        match field {
            AuthField::Name => &mut self.name,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
            AuthField::ConfirmPassword => &mut self.confirm_password,
        }
    }

    pub fn field(&self, field: AuthField) -> &str {
        match field {
            AuthField::Name => &self.name,
            AuthField::Email => &self.email,
            AuthField::Password => &self.password,
            AuthField::ConfirmPassword => &self.confirm_password,
        }
    }

    pub fn validate(&self, mode: AuthMode) -> Result<(), FormErrors<AuthField>> {
        let mut errors = FormErrors::default();

        if mode == AuthMode::Signup && self.name.trim().is_empty() {
            errors.insert(AuthField::Name, "Name is required");
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.insert(AuthField::Email, "Email is required");
        } else if !is_valid_email(email) {
            errors.insert(AuthField::Email, "Invalid email address");
        }

        if self.password.is_empty() {
            errors.insert(AuthField::Password, "Password is required");
        } else if !is_strong_password(&self.password) {
            errors.insert(
                AuthField::Password,
                "Password must be at least 8 characters, including uppercase, lowercase, number, and special character",
            );
        }

        if mode == AuthMode::Signup && self.password != self.confirm_password {
            errors.insert(AuthField::ConfirmPassword, "Passwords do not match");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn login_payload(&self) -> auth::Login {
        auth::Login {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }

    pub fn signup_payload(&self) -> auth::Signup {
        auth::Signup {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let clean = |s: &str| !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '@');
    if !clean(local) || !clean(domain) {
        return false;
    }
    let chars: Vec<char> = domain.chars().collect();
    chars.len() >= 3 && chars[1..chars.len() - 1].contains(&'.')
}

/// At least 8 characters from letters, digits and `@$!%*?&`, with one of each class.
pub fn is_strong_password(password: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c);
    password.chars().count() >= 8
        && password.chars().all(allowed)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}
