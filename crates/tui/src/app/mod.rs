mod state;

use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{form::AuthMode, session::JwtExpiry};
use tokio::sync::watch;

use crate::{
    client::{Client, ClientError},
    config::{AppConfig, today_in},
    error::{AppError, Result},
    local_state::LocalState,
    session::{self, Access, SESSION_EXPIRED, Session, SessionStore},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use state::*;

pub struct App {
    config: AppConfig,
    client: Client,
    store: SessionStore,
    session_rx: watch::Receiver<Option<Session>>,
    validator: JwtExpiry,
    local: LocalState,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let currency = config.currency()?;
        let timezone = config.timezone()?;
        let local = LocalState::load(&config.state_path).unwrap_or_else(|err| {
            tracing::warn!(%err, path = %config.state_path, "ignoring unreadable local state");
            LocalState::default()
        });

        let email = if config.email.is_empty() {
            local.email.clone().unwrap_or_default()
        } else {
            config.email.clone()
        };

        let store = SessionStore::new();
        let session_rx = store.subscribe();

        Ok(Self {
            state: AppState::new(currency, timezone, &email),
            config,
            client,
            store,
            session_rx,
            validator: JwtExpiry,
            local,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.restore_session();
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    /// Signs in with the persisted token if it still passes the validator.
    fn restore_session(&mut self) {
        let Some(token) = self.local.token.clone() else {
            return;
        };
        match self.store.sign_in(token, &self.validator, Utc::now()) {
            Ok(_) => tracing::info!("restored previous session"),
            Err(err) => {
                tracing::info!(%err, "stored session not usable");
                self.local.forget_token();
                self.persist_local();
            }
        }
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            self.sync_session().await;
            self.state.expire_toast(Instant::now());

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key).await;
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Applies session changes published by the store since the last tick.
    async fn sync_session(&mut self) {
        if !self.session_rx.has_changed().unwrap_or(false) {
            return;
        }
        let session = self.session_rx.borrow_and_update().clone();
        let signed_in = session.is_some();
        self.state.apply_session(session);

        if signed_in {
            self.load_entries().await;
        } else {
            self.local.forget_token();
            self.persist_local();
        }
    }

    fn persist_local(&self) {
        if let Err(err) = self.local.save(&self.config.state_path) {
            tracing::warn!(%err, "failed to save local state");
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        match self.state.screen {
            Screen::Auth => self.handle_auth_key(action).await,
            Screen::ForgotPassword => self.handle_forgot_key(action).await,
            Screen::ResetPassword => self.handle_reset_key(action).await,
            Screen::Shell => {
                if self.state.form.is_some() {
                    self.handle_form_key(action).await;
                } else {
                    self.handle_shell_key(action).await;
                }
            }
        }
    }

    async fn handle_auth_key(&mut self, action: AppAction) {
        let auth = &mut self.state.auth;
        match action {
            AppAction::NextField | AppAction::Down => auth.next_focus(),
            AppAction::PrevField | AppAction::Up => auth.prev_focus(),
            AppAction::Backspace => auth.pop_char(),
            AppAction::Input(ch) => auth.push_char(ch),
            AppAction::ToggleSecret => auth.show_password = !auth.show_password,
            AppAction::SwitchMode => {
                auth.switch_mode();
                auth.notice = None;
            }
            AppAction::ForgotPassword => self.state.open_forgot_password(),
            AppAction::Cancel => auth.clear_feedback(),
            AppAction::Submit => self.submit_auth().await,
            _ => {}
        }
    }

    async fn submit_auth(&mut self) {
        let auth = &mut self.state.auth;
        auth.clear_feedback();
        if let Err(errors) = auth.form.validate(auth.mode) {
            auth.errors = errors;
            return;
        }

        match auth.mode {
            AuthMode::Signup => {
                let payload = auth.form.signup_payload();
                match self.client.signup(&payload).await {
                    Ok(res) => {
                        let notice = res
                            .message
                            .unwrap_or_else(|| "Account created. Please log in.".to_string());
                        self.state.back_to_login(Some(notice));
                    }
                    Err(err) => self.auth_failed(err),
                }
            }
            AuthMode::Login => {
                let payload = auth.form.login_payload();
                match self.client.login(&payload).await {
                    Ok(res) => {
                        match self.store.sign_in(res.token, &self.validator, Utc::now()) {
                            Ok(session) => {
                                self.local.remember_login(&payload.email, &session.token);
                                self.persist_local();
                            }
                            Err(err) => {
                                tracing::warn!(%err, "login returned an unusable token");
                                self.state.auth.banner =
                                    Some("Received an invalid session. Please try again.".to_string());
                            }
                        }
                    }
                    Err(err) => self.auth_failed(err),
                }
            }
        }
    }

    fn auth_failed(&mut self, err: ClientError) {
        tracing::info!(%err, "authentication failed");
        let field = match &err {
            ClientError::Validation { field, .. } => field.clone(),
            _ => None,
        };
        let message = describe(&err, "Something went wrong. Please try again.");
        self.state.auth.apply_server_error(field.as_deref(), message);
    }

    async fn handle_forgot_key(&mut self, action: AppAction) {
        let forgot = &mut self.state.forgot;
        match action {
            AppAction::Backspace => {
                forgot.input_mut().pop();
            }
            AppAction::Input(ch) => forgot.input_mut().push(ch),
            AppAction::Cancel => self.state.back_to_login(None),
            AppAction::Submit => match forgot.step {
                ForgotStep::Email => self.send_otp().await,
                ForgotStep::Otp => self.verify_otp().await,
            },
            _ => {}
        }
    }

    async fn send_otp(&mut self) {
        let forgot = &mut self.state.forgot;
        forgot.error = None;
        forgot.notice = None;
        if forgot.email.trim().is_empty() {
            forgot.error = Some("Email is required".to_string());
            return;
        }

        match self.client.send_otp(&forgot.email).await {
            Ok(res) => {
                forgot.notice = Some(
                    res.message
                        .unwrap_or_else(|| "OTP sent successfully!".to_string()),
                );
                forgot.step = ForgotStep::Otp;
            }
            Err(err) => forgot.error = Some(describe(&err, "Failed to send OTP.")),
        }
    }

    async fn verify_otp(&mut self) {
        let forgot = &mut self.state.forgot;
        forgot.error = None;
        if forgot.otp.trim().is_empty() {
            forgot.error = Some("Please enter the OTP".to_string());
            return;
        }

        match self.client.verify_otp(&forgot.email, &forgot.otp).await {
            Ok(res) => {
                forgot.notice = res.message;
                self.state.open_reset(res.reset_token);
            }
            Err(err) => forgot.error = Some(describe(&err, "Invalid or expired OTP.")),
        }
    }

    async fn handle_reset_key(&mut self, action: AppAction) {
        let reset = &mut self.state.reset;
        match action {
            AppAction::NextField | AppAction::PrevField | AppAction::Up | AppAction::Down => {
                reset.toggle_focus();
            }
            AppAction::Backspace => {
                reset.input_mut().pop();
            }
            AppAction::Input(ch) => reset.input_mut().push(ch),
            AppAction::ToggleSecret => reset.show_password = !reset.show_password,
            AppAction::Cancel => self.state.back_to_login(None),
            AppAction::Submit => self.reset_password().await,
            _ => {}
        }
    }

    async fn reset_password(&mut self) {
        let reset = &mut self.state.reset;
        reset.error = None;
        let reset_token = match reset.check() {
            Ok(token) => token.to_string(),
            Err(message) => {
                reset.error = Some(message.to_string());
                return;
            }
        };

        match self.client.reset_password(&reset_token, &reset.password).await {
            Ok(res) => {
                let notice = res
                    .message
                    .unwrap_or_else(|| "Password reset successful!".to_string());
                self.state.back_to_login(Some(notice));
            }
            Err(err) => {
                reset.error = Some(describe(&err, "Something went wrong. Try again."));
            }
        }
    }

    async fn handle_shell_key(&mut self, action: AppAction) {
        if self.state.entries_ui.confirm_delete {
            self.state.entries_ui.confirm_delete = false;
            if action == AppAction::Input('y') || action == AppAction::Input('Y') {
                self.delete_selected().await;
            }
            return;
        }

        match action {
            AppAction::NextField => self.switch_section(self.state.section.next()).await,
            AppAction::PrevField => self.switch_section(self.state.section.prev()).await,
            AppAction::Up => self.move_up(),
            AppAction::Down => self.move_down(),
            AppAction::Left | AppAction::Right if self.state.section == Section::Summary => {
                self.state.summary.toggle_focus();
            }
            AppAction::Input(ch) => self.handle_shell_char(ch).await,
            _ => {}
        }
    }

    async fn handle_shell_char(&mut self, ch: char) {
        if let Some(section) = Section::from_shortcut(ch) {
            self.switch_section(section).await;
            return;
        }

        match ch {
            'q' => self.should_quit = true,
            'x' => {
                tracing::info!("logout requested");
                self.store.sign_out();
            }
            'r' => self.load_entries().await,
            'j' => self.move_down(),
            'k' => self.move_up(),
            'a' if self.state.section == Section::Entries => {
                self.state.form = Some(EntryFormState::add(today_in(self.state.timezone)));
            }
            'e' if self.state.section == Section::Entries => self.state.edit_selected(),
            'd' if self.state.section == Section::Entries => {
                self.state.request_delete_selected();
            }
            'f' if self.state.section == Section::Entries => self.state.entries_ui.cycle_filter(),
            'o' if self.state.section == Section::Entries => self.state.entries_ui.toggle_order(),
            _ => {}
        }
    }

    fn move_up(&mut self) {
        match self.state.section {
            Section::Entries => self.state.entries_ui.select_prev(),
            Section::Summary => {
                let len = self.focused_bucket_count();
                self.state.summary.move_selection(len, false);
            }
            _ => {}
        }
    }

    fn move_down(&mut self) {
        match self.state.section {
            Section::Entries => {
                let len = self.state.entries_ui.visible(&self.state.entries).len();
                self.state.entries_ui.select_next(len);
            }
            Section::Summary => {
                let len = self.focused_bucket_count();
                self.state.summary.move_selection(len, true);
            }
            _ => {}
        }
    }

    fn focused_bucket_count(&self) -> usize {
        let kind = self.state.summary.focus.kind();
        engine::aggregate::category_buckets(&self.state.entries, kind).len()
    }

    /// Runs the guard, then opens `section` and refetches if it shows entries.
    async fn switch_section(&mut self, section: Section) {
        if self.authorized_token().is_none() {
            return;
        }
        self.state.section = section;
        if section.needs_entries() {
            self.load_entries().await;
        }
    }

    /// Token for an entry call, or `None` after the guard signed the user out.
    fn authorized_token(&mut self) -> Option<String> {
        match session::guard(&self.store, &self.validator, Utc::now()) {
            Access::Granted(session) => Some(session.token),
            Access::Denied(reason) => {
                if reason.is_some() {
                    self.state.toast(SESSION_EXPIRED, ToastLevel::Error);
                }
                None
            }
        }
    }

    fn session_expired(&mut self) {
        self.store.sign_out();
        self.state.toast(SESSION_EXPIRED, ToastLevel::Error);
    }

    async fn load_entries(&mut self) {
        let Some(token) = self.authorized_token() else {
            return;
        };
        match self.client.list_entries(&token).await {
            Ok(entries) => self.state.set_entries(entries),
            Err(ClientError::Unauthorized) => self.session_expired(),
            Err(err) => {
                tracing::warn!(%err, "failed to fetch entries");
                self.state.load_error = Some(describe(&err, "Failed to load entries."));
            }
        }
    }

    async fn handle_form_key(&mut self, action: AppAction) {
        let Some(modal) = self.state.form.as_mut() else {
            return;
        };
        match action {
            AppAction::Cancel => self.state.form = None,
            AppAction::NextField | AppAction::Down => modal.focus = modal.focus.next(),
            AppAction::PrevField | AppAction::Up => modal.focus = modal.focus.prev(),
            AppAction::Left => modal.cycle(false),
            AppAction::Right => modal.cycle(true),
            AppAction::Backspace => modal.pop_char(),
            AppAction::Input(ch) => modal.push_char(ch),
            AppAction::Submit => self.save_entry().await,
            _ => {}
        }
    }

    async fn save_entry(&mut self) {
        let Some(modal) = self.state.form.as_mut() else {
            return;
        };
        modal.banner = None;
        let draft = match modal.form.validate() {
            Ok(draft) => draft,
            Err(errors) => {
                modal.errors = errors;
                return;
            }
        };
        let editing_id = modal.editing_id.clone();

        let Some(token) = self.authorized_token() else {
            return;
        };
        let result = match editing_id.as_deref() {
            Some(id) => self.client.update_entry(&token, id, &draft).await,
            None => self.client.create_entry(&token, &draft).await,
        };

        match result {
            Ok(()) => {
                self.state.form = None;
                let message = if editing_id.is_some() {
                    "Entry updated"
                } else {
                    "Entry added"
                };
                self.state.toast(message, ToastLevel::Success);
                self.load_entries().await;
            }
            Err(ClientError::Unauthorized) => self.session_expired(),
            Err(err) => {
                tracing::warn!(%err, "failed to save entry");
                if let Some(modal) = self.state.form.as_mut() {
                    modal.banner = Some(describe(&err, "Failed to save entry."));
                }
            }
        }
    }

    async fn delete_selected(&mut self) {
        let Some(id) = self
            .state
            .entries_ui
            .selected_entry(&self.state.entries)
            .and_then(|e| e.id.clone())
        else {
            return;
        };
        let Some(token) = self.authorized_token() else {
            return;
        };

        match self.client.delete_entry(&token, &id).await {
            Ok(()) => {
                self.state.toast("Entry deleted", ToastLevel::Success);
                self.load_entries().await;
            }
            Err(ClientError::Unauthorized) => self.session_expired(),
            Err(err) => {
                tracing::warn!(%err, "failed to delete entry");
                self.state
                    .toast(describe(&err, "Failed to delete entry."), ToastLevel::Error);
            }
        }
    }
}

/// User-facing text for a client error: the server's message when it sent
/// one, otherwise `fallback`.
fn describe(err: &ClientError, fallback: &str) -> String {
    match err {
        ClientError::Transport(_) => "Cannot reach the server. Check your connection.".to_string(),
        ClientError::Decode(_) => "Unexpected response from the server.".to_string(),
        ClientError::Forbidden => "You are not allowed to do that.".to_string(),
        ClientError::NotFound => "Not found.".to_string(),
        _ => err
            .server_message()
            .filter(|m| *m != "unknown error")
            .unwrap_or(fallback)
            .to_string(),
    }
}
