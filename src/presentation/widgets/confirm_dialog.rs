use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::presentation::theme::Theme;
use crate::presentation::ui::utils::fixed_centered_rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    None,
    Confirm,
    Cancel,
}

/// Yes/no question guarding a destructive action.
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    title: String,
    message: String,
}

impl ConfirmDialog {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Delete confirmation for the record labelled `name`.
    #[must_use]
    pub fn delete(name: &str) -> Self {
        Self::new(
            "Confirm delete",
            format!("Delete \"{name}\"? This cannot be undone."),
        )
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn handle_key(&self, key: KeyEvent) -> ConfirmAction {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => ConfirmAction::Confirm,
            KeyCode::Char('n' | 'N') | KeyCode::Esc => ConfirmAction::Cancel,
            _ => ConfirmAction::None,
        }
    }
}

pub struct ConfirmDialogWidget<'a> {
    dialog: &'a ConfirmDialog,
    theme: &'a Theme,
}

impl<'a> ConfirmDialogWidget<'a> {
    #[must_use]
    pub fn new(dialog: &'a ConfirmDialog, theme: &'a Theme) -> Self {
        Self { dialog, theme }
    }
}

impl Widget for ConfirmDialogWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let message_width = u16::try_from(self.dialog.message.width()).unwrap_or(u16::MAX);
        let width = message_width.saturating_add(6).clamp(36, 64);
        let inner = width.saturating_sub(4).max(1);
        let height = message_width.div_ceil(inner).saturating_add(5);
        let popup = fixed_centered_rect(width, height, area);

        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.error_style)
            .title(Span::styled(
                format!(" {} ", self.dialog.title),
                self.theme.error_style.add_modifier(Modifier::BOLD),
            ));

        let lines = vec![
            Line::from(Span::styled(self.dialog.message.as_str(), self.theme.base_style)),
            Line::default(),
            Line::from(vec![
                Span::styled("[y]", self.theme.error_style.add_modifier(Modifier::BOLD)),
                Span::styled(" confirm   ", self.theme.dimmed_style),
                Span::styled("[n]", self.theme.title_style),
                Span::styled(" cancel", self.theme.dimmed_style),
            ]),
        ];

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(popup, buf);
    }
}
