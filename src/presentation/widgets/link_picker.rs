//! Dual-list picker for category/company links.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use crate::application::use_cases::{LinkOption, LinkSplit};
use crate::domain::entities::{CategoryOption, CompanyOption};
use crate::presentation::theme::Theme;
use crate::presentation::ui::utils::centered_rect;

/// Entry rendered in a picker column.
pub trait PickerItem: LinkOption {
    fn label(&self) -> String;
}

impl PickerItem for CompanyOption {
    fn label(&self) -> String {
        self.legal_name.clone()
    }
}

impl PickerItem for CategoryOption {
    fn label(&self) -> String {
        format!("{}  {}", self.code, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerColumn {
    Linked,
    Available,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPickerAction {
    None,
    Save,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct LinkPicker<T> {
    title: String,
    split: LinkSplit<T>,
    column: PickerColumn,
    linked_selected: usize,
    available_selected: usize,
    saving: bool,
    banner: Option<String>,
}

impl<T: PickerItem> LinkPicker<T> {
    pub fn new(title: impl Into<String>, split: LinkSplit<T>) -> Self {
        let column = if split.linked.is_empty() {
            PickerColumn::Available
        } else {
            PickerColumn::Linked
        };
        Self {
            title: title.into(),
            split,
            column,
            linked_selected: 0,
            available_selected: 0,
            saving: false,
            banner: None,
        }
    }

    #[must_use]
    pub const fn column(&self) -> PickerColumn {
        self.column
    }

    #[must_use]
    pub fn split(&self) -> &LinkSplit<T> {
        &self.split
    }

    #[must_use]
    pub fn linked_ids(&self) -> Vec<String> {
        self.split.linked_ids()
    }

    pub fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn set_banner(&mut self, banner: Option<String>) {
        self.banner = banner;
    }

    fn current(&self) -> (&[T], usize) {
        match self.column {
            PickerColumn::Linked => (&self.split.linked, self.linked_selected),
            PickerColumn::Available => (&self.split.available, self.available_selected),
        }
    }

    fn selected_mut(&mut self) -> &mut usize {
        match self.column {
            PickerColumn::Linked => &mut self.linked_selected,
            PickerColumn::Available => &mut self.available_selected,
        }
    }

    fn clamp(&mut self) {
        self.linked_selected = self
            .linked_selected
            .min(self.split.linked.len().saturating_sub(1));
        self.available_selected = self
            .available_selected
            .min(self.split.available.len().saturating_sub(1));
    }

    fn switch_column(&mut self) {
        self.column = match self.column {
            PickerColumn::Linked => PickerColumn::Available,
            PickerColumn::Available => PickerColumn::Linked,
        };
    }

    /// Moves the highlighted entry to the other column.
    fn transfer(&mut self) {
        let (items, index) = self.current();
        let Some(id) = items.get(index).map(|item| item.option_id().to_string()) else {
            return;
        };
        match self.column {
            PickerColumn::Linked => self.split.unlink(&id),
            PickerColumn::Available => self.split.link(&id),
        };
        self.clamp();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LinkPickerAction {
        if self.saving {
            return LinkPickerAction::None;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => return LinkPickerAction::Cancel,
            (KeyCode::Char('s'), _) => return LinkPickerAction::Save,
            (KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right, _) => {
                self.switch_column();
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
                let selected = self.selected_mut();
                *selected = selected.saturating_sub(1);
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
                let len = self.current().0.len();
                let selected = self.selected_mut();
                if *selected + 1 < len {
                    *selected += 1;
                }
            }
            (KeyCode::Enter | KeyCode::Char(' '), _) => self.transfer(),
            _ => {}
        }
        LinkPickerAction::None
    }
}

pub struct LinkPickerWidget<'a, T> {
    picker: &'a LinkPicker<T>,
    theme: &'a Theme,
}

impl<'a, T: PickerItem> LinkPickerWidget<'a, T> {
    #[must_use]
    pub fn new(picker: &'a LinkPicker<T>, theme: &'a Theme) -> Self {
        Self { picker, theme }
    }

    fn render_column(&self, column: PickerColumn, area: Rect, buf: &mut Buffer) {
        let (items, selected, title) = match column {
            PickerColumn::Linked => (
                &self.picker.split.linked,
                self.picker.linked_selected,
                "Linked",
            ),
            PickerColumn::Available => (
                &self.picker.split.available,
                self.picker.available_selected,
                "Available",
            ),
        };
        let focused = self.picker.column == column;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if focused {
                self.theme.focused_border_style
            } else {
                self.theme.border_style
            })
            .title(format!(" {title} ({}) ", items.len()));

        let list_items: Vec<ListItem> = items
            .iter()
            .map(|item| ListItem::new(item.label()).style(self.theme.base_style))
            .collect();

        let mut state = ListState::default();
        if focused && !items.is_empty() {
            state.select(Some(selected));
        }

        StatefulWidget::render(
            List::new(list_items)
                .block(block)
                .highlight_style(self.theme.selection_style)
                .highlight_symbol("▶ "),
            area,
            buf,
            &mut state,
        );
    }
}

impl<T: PickerItem> Widget for LinkPickerWidget<'_, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(80, 70, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.focused_border_style)
            .title(Span::styled(
                format!(" {} ", self.picker.title),
                self.theme.title_style,
            ));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        self.render_column(PickerColumn::Linked, columns[0], buf);
        self.render_column(PickerColumn::Available, columns[1], buf);

        let footer = if let Some(banner) = &self.picker.banner {
            Line::from(Span::styled(
                banner.as_str(),
                self.theme.error_style.add_modifier(Modifier::BOLD),
            ))
        } else if self.picker.saving {
            Line::from(Span::styled("Saving…", self.theme.title_style))
        } else {
            Line::from(Span::styled(
                "←→ column · Enter move · s save · Esc cancel",
                self.theme.dimmed_style,
            ))
        };
        Paragraph::new(footer).render(rows[1], buf);
    }
}
