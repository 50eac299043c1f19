//! Login screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::application::dto::LoginRequest;
use crate::presentation::theme::Theme;
use crate::presentation::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Input,
    Validating,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginFocus {
    Email,
    Password,
    Remember,
}

impl LoginFocus {
    const fn next(self) -> Self {
        match self {
            Self::Email => Self::Password,
            Self::Password => Self::Remember,
            Self::Remember => Self::Email,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Email => Self::Remember,
            Self::Password => Self::Email,
            Self::Remember => Self::Password,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAction {
    None,
    Submit,
    Quit,
}

/// Login screen UI.
pub struct LoginScreen {
    email_input: TextInput,
    password_input: TextInput,
    remember: bool,
    focus: LoginFocus,
    state: LoginState,
    error_message: Option<String>,
}

impl LoginScreen {
    /// Creates new login screen.
    #[must_use]
    pub fn new() -> Self {
        let mut screen = Self {
            email_input: TextInput::new("Email").placeholder("you@company.com"),
            password_input: TextInput::new("Password").password(),
            remember: true,
            focus: LoginFocus::Email,
            state: LoginState::Input,
            error_message: None,
        };
        screen.sync_focus();
        screen
    }

    /// Returns current state.
    #[must_use]
    pub const fn state(&self) -> LoginState {
        self.state
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub const fn remember(&self) -> bool {
        self.remember
    }

    /// Request built from the current input.
    #[must_use]
    pub fn request(&self) -> LoginRequest {
        let request = LoginRequest::new(self.email_input.value(), self.password_input.value());
        if self.remember {
            request
        } else {
            request.without_persistence()
        }
    }

    /// Sets validating state.
    pub fn set_validating(&mut self) {
        self.state = LoginState::Validating;
        self.error_message = None;
    }

    /// Sets error state; the password is cleared for the next attempt.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = LoginState::Error;
        self.error_message = Some(message.into());
        self.password_input.clear();
        self.focus = LoginFocus::Password;
        self.sync_focus();
    }

    /// Resets to input state.
    pub fn reset(&mut self) {
        self.state = LoginState::Input;
        self.error_message = None;
    }

    fn sync_focus(&mut self) {
        self.email_input.set_focused(self.focus == LoginFocus::Email);
        self.password_input
            .set_focused(self.focus == LoginFocus::Password);
    }

    fn can_submit(&self) -> bool {
        !self.email_input.value().trim().is_empty() && !self.password_input.value().is_empty()
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        if self.state == LoginState::Validating {
            return LoginAction::None;
        }

        if self.state == LoginState::Error {
            self.reset();
        }

        match key.code {
            KeyCode::Esc => return LoginAction::Quit,
            KeyCode::Enter => {
                if self.can_submit() {
                    return LoginAction::Submit;
                }
                self.focus = self.focus.next();
            }
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            _ => match self.focus {
                LoginFocus::Email => {
                    self.email_input.handle_key(key);
                }
                LoginFocus::Password => {
                    self.password_input.handle_key(key);
                }
                LoginFocus::Remember => {
                    if matches!(key.code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
                        self.remember = !self.remember;
                    }
                }
            },
        }

        self.sync_focus();
        LoginAction::None
    }

    fn render_with(&self, theme: &Theme, area: Rect, buf: &mut Buffer) {
        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(14),
            Constraint::Fill(1),
        ]);
        let [_, center, _] = vertical.areas(area);

        let horizontal = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(56),
            Constraint::Fill(1),
        ]);
        let [_, content_area, _] = horizontal.areas(center);

        Clear.render(content_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.focused_border_style)
            .title(Span::styled(" Backdesk sign in ", theme.title_style));

        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let [title, _, email, password, remember, _, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new("Sign in with your platform account")
            .style(theme.base_style)
            .render(title, buf);

        (&self.email_input).render(email, buf);
        (&self.password_input).render(password, buf);

        let checkbox = if self.remember { "[x]" } else { "[ ]" };
        let remember_style = if self.focus == LoginFocus::Remember {
            theme.selection_style
        } else {
            theme.base_style
        };
        Paragraph::new(Line::from(vec![
            Span::styled(checkbox, theme.title_style),
            Span::styled(" Keep me signed in", remember_style),
        ]))
        .render(remember, buf);

        let status_line = match self.state {
            LoginState::Input => Line::from(Span::styled(
                "Enter: sign in | Tab: next field | Esc: quit",
                theme.dimmed_style,
            )),
            LoginState::Validating => Line::from(Span::styled(
                "Signing in…",
                theme.title_style.add_modifier(Modifier::ITALIC),
            )),
            LoginState::Error => {
                let msg = self.error_message.as_deref().unwrap_or("Sign-in failed");
                Line::from(Span::styled(format!("Error: {msg}"), theme.error_style))
            }
        };
        Paragraph::new(status_line).render(status, buf);
    }
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LoginScreenWidget<'a> {
    screen: &'a LoginScreen,
    theme: &'a Theme,
}

impl<'a> LoginScreenWidget<'a> {
    #[must_use]
    pub fn new(screen: &'a LoginScreen, theme: &'a Theme) -> Self {
        Self { screen, theme }
    }
}

impl Widget for LoginScreenWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.screen.render_with(self.theme, area, buf);
    }
}
