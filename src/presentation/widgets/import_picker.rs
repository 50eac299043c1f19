use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use crate::domain::entities::DirectoryUser;
use crate::presentation::theme::Theme;
use crate::presentation::ui::utils::{centered_rect, format_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAction {
    None,
    Import,
    Cancel,
}

/// Checklist of auth accounts without a profile.
#[derive(Debug, Clone)]
pub struct ImportPicker {
    users: Vec<DirectoryUser>,
    checked: Vec<bool>,
    selected: usize,
    saving: bool,
    banner: Option<String>,
}

impl ImportPicker {
    #[must_use]
    pub fn new(users: Vec<DirectoryUser>) -> Self {
        let checked = vec![false; users.len()];
        Self {
            users,
            checked,
            selected: 0,
            saving: false,
            banner: None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    #[must_use]
    pub fn selected_users(&self) -> Vec<DirectoryUser> {
        self.users
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(user, _)| user.clone())
            .collect()
    }

    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.checked.iter().filter(|c| **c).count()
    }

    pub fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }

    pub fn set_banner(&mut self, banner: Option<String>) {
        self.banner = banner;
    }

    fn toggle_all(&mut self) {
        let all = self.checked.iter().all(|c| *c);
        self.checked.iter_mut().for_each(|c| *c = !all);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ImportAction {
        if self.saving {
            return ImportAction::None;
        }

        match key.code {
            KeyCode::Esc => return ImportAction::Cancel,
            KeyCode::Enter => return ImportAction::Import,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.users.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char(' ') => {
                if let Some(checked) = self.checked.get_mut(self.selected) {
                    *checked = !*checked;
                }
            }
            KeyCode::Char('a') => self.toggle_all(),
            _ => {}
        }
        ImportAction::None
    }
}

pub struct ImportPickerWidget<'a> {
    picker: &'a ImportPicker,
    theme: &'a Theme,
}

impl<'a> ImportPickerWidget<'a> {
    #[must_use]
    pub fn new(picker: &'a ImportPicker, theme: &'a Theme) -> Self {
        Self { picker, theme }
    }
}

impl Widget for ImportPickerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Self { picker, theme } = self;
        let popup = centered_rect(70, 70, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.focused_border_style)
            .title(Span::styled(
                format!(
                    " Import users ({} of {} selected) ",
                    picker.checked_count(),
                    picker.users.len()
                ),
                theme.title_style,
            ));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        if picker.users.is_empty() {
            Paragraph::new(Span::styled(
                "Every account already has a profile.",
                theme.dimmed_style,
            ))
            .render(rows[0], buf);
        } else {
            let items: Vec<ListItem> = picker
                .users
                .iter()
                .zip(&picker.checked)
                .map(|(user, checked)| {
                    let mark = if *checked { "[x] " } else { "[ ] " };
                    ListItem::new(Line::from(vec![
                        Span::styled(mark, theme.title_style),
                        Span::styled(format!("{:<28}", user.display_name()), theme.base_style),
                        Span::styled(format!("{:<36}", user.email), theme.dimmed_style),
                        Span::styled(format_date(user.created_at), theme.dimmed_style),
                    ]))
                })
                .collect();

            let mut state = ListState::default().with_selected(Some(picker.selected));
            StatefulWidget::render(
                List::new(items).highlight_style(theme.selection_style),
                rows[0],
                buf,
                &mut state,
            );
        }

        let footer = if let Some(banner) = &picker.banner {
            Span::styled(banner.as_str(), theme.error_style.add_modifier(Modifier::BOLD))
        } else if picker.saving {
            Span::styled("Importing…", theme.title_style)
        } else {
            Span::styled(
                "Space check · a all · Enter import · Esc cancel",
                theme.dimmed_style,
            )
        };
        Paragraph::new(Line::from(footer)).render(rows[1], buf);
    }
}
