//! Generic create/edit form shown over a tab.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::input::TextInput;
use crate::presentation::theme::Theme;
use crate::presentation::ui::utils::fixed_centered_rect;

const LABEL_WIDTH: usize = 18;
const MODAL_WIDTH: u16 = 72;

/// One entry of a select field; `value: None` stands for "no selection".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: Option<String>,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            label: label.into(),
        }
    }

    pub fn none(label: impl Into<String>) -> Self {
        Self {
            value: None,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text(TextInput),
    Select {
        options: Vec<SelectOption>,
        selected: usize,
    },
    Toggle(bool),
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub key: &'static str,
    pub label: String,
    pub kind: FieldKind,
    pub disabled: bool,
}

impl FormField {
    pub fn text(key: &'static str, label: impl Into<String>, value: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            key,
            kind: FieldKind::Text(TextInput::new(label.clone()).with_value(value)),
            label,
            disabled: false,
        }
    }

    /// Select field with `current` preselected when present among the options.
    pub fn select(
        key: &'static str,
        label: impl Into<String>,
        options: Vec<SelectOption>,
        current: Option<&str>,
    ) -> Self {
        let selected = options
            .iter()
            .position(|o| o.value.as_deref() == current)
            .unwrap_or(0);
        Self {
            key,
            label: label.into(),
            kind: FieldKind::Select { options, selected },
            disabled: false,
        }
    }

    pub fn toggle(key: &'static str, label: impl Into<String>, value: bool) -> Self {
        Self {
            key,
            label: label.into(),
            kind: FieldKind::Toggle(value),
            disabled: false,
        }
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        if let FieldKind::Text(input) = &mut self.kind {
            input.set_disabled(true);
        }
        self
    }

    fn value_text(&self) -> String {
        match &self.kind {
            FieldKind::Text(input) => input.display_text(),
            FieldKind::Select { options, selected } => options
                .get(*selected)
                .map_or_else(String::new, |o| format!("‹ {} ›", o.label)),
            FieldKind::Toggle(on) => if *on { "[x]" } else { "[ ]" }.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
    /// The value of the field with this key changed.
    Changed(&'static str),
}

#[derive(Debug, Clone)]
pub struct FormModal {
    title: String,
    fields: Vec<FormField>,
    focus: usize,
    banner: Option<String>,
    saving: bool,
}

impl FormModal {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        let mut modal = Self {
            title: title.into(),
            fields,
            focus: 0,
            banner: None,
            saving: false,
        };
        if modal.fields.first().is_some_and(|f| f.disabled) {
            modal.focus_next();
        }
        modal
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn focused_key(&self) -> Option<&'static str> {
        self.fields.get(self.focus).map(|f| f.key)
    }

    fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    /// Text of a text field, empty for unknown keys.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        match self.field(key).map(|f| &f.kind) {
            Some(FieldKind::Text(input)) => input.value().to_string(),
            _ => String::new(),
        }
    }

    #[must_use]
    pub fn select_value(&self, key: &str) -> Option<String> {
        match self.field(key).map(|f| &f.kind) {
            Some(FieldKind::Select { options, selected }) => {
                options.get(*selected).and_then(|o| o.value.clone())
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn toggle_value(&self, key: &str) -> bool {
        matches!(
            self.field(key).map(|f| &f.kind),
            Some(FieldKind::Toggle(true))
        )
    }

    #[must_use]
    pub fn is_disabled(&self, key: &str) -> bool {
        self.field(key).is_some_and(|f| f.disabled)
    }

    pub fn set_disabled(&mut self, key: &str, disabled: bool) {
        if let Some(field) = self.field_mut(key) {
            field.disabled = disabled;
            if let FieldKind::Text(input) = &mut field.kind {
                input.set_disabled(disabled);
            }
        }
        if self.fields.get(self.focus).is_some_and(|f| f.disabled) {
            self.focus_next();
        }
    }

    /// Selects the option holding `value`; unknown values select the first option.
    pub fn set_select(&mut self, key: &str, value: Option<&str>) {
        if let Some(FormField {
            kind: FieldKind::Select { options, selected },
            ..
        }) = self.field_mut(key)
        {
            *selected = options
                .iter()
                .position(|o| o.value.as_deref() == value)
                .unwrap_or(0);
        }
    }

    pub fn set_text(&mut self, key: &str, value: impl Into<String>) {
        if let Some(FormField {
            kind: FieldKind::Text(input),
            ..
        }) = self.field_mut(key)
        {
            input.set_value(value);
        }
    }

    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn set_banner(&mut self, banner: Option<String>) {
        self.banner = banner;
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }

    fn focus_next(&mut self) {
        let len = self.fields.len();
        for step in 1..=len {
            let i = (self.focus + step) % len;
            if !self.fields[i].disabled {
                self.focus = i;
                return;
            }
        }
    }

    fn focus_previous(&mut self) {
        let len = self.fields.len();
        for step in 1..=len {
            let i = (self.focus + len - step) % len;
            if !self.fields[i].disabled {
                self.focus = i;
                return;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if self.saving {
            return FormAction::None;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => return FormAction::Cancel,
            (KeyCode::Enter, _) | (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
                return FormAction::Submit;
            }
            (KeyCode::Tab | KeyCode::Down, _) => {
                self.focus_next();
                return FormAction::None;
            }
            (KeyCode::BackTab | KeyCode::Up, _) => {
                self.focus_previous();
                return FormAction::None;
            }
            _ => {}
        }

        let Some(field) = self.fields.get_mut(self.focus) else {
            return FormAction::None;
        };
        if field.disabled {
            return FormAction::None;
        }

        let changed = match &mut field.kind {
            FieldKind::Text(input) => {
                let before = input.value().to_string();
                input.handle_key(key);
                input.value() != before
            }
            FieldKind::Select { options, selected } => match key.code {
                KeyCode::Right | KeyCode::Char(' ') if !options.is_empty() => {
                    *selected = (*selected + 1) % options.len();
                    true
                }
                KeyCode::Left if !options.is_empty() => {
                    *selected = (*selected + options.len() - 1) % options.len();
                    true
                }
                _ => false,
            },
            FieldKind::Toggle(on) => match key.code {
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    *on = !*on;
                    true
                }
                _ => false,
            },
        };

        if changed {
            FormAction::Changed(field.key)
        } else {
            FormAction::None
        }
    }
}

pub struct FormModalWidget<'a> {
    modal: &'a FormModal,
    theme: &'a Theme,
}

impl<'a> FormModalWidget<'a> {
    #[must_use]
    pub fn new(modal: &'a FormModal, theme: &'a Theme) -> Self {
        Self { modal, theme }
    }

    fn field_line(&self, index: usize, field: &'a FormField) -> Line<'a> {
        let focused = index == self.modal.focus && !field.disabled;
        let label = format!("{:>width$} ", field.label, width = LABEL_WIDTH);

        let value_style = if field.disabled {
            self.theme.dimmed_style
        } else if focused {
            self.theme.selection_style
        } else {
            self.theme.base_style
        };

        let mut value = field.value_text();
        if focused && let FieldKind::Text(input) = &field.kind {
            if input.value().is_empty() {
                value.clear();
            }
            let column = input.cursor_column();
            if column >= value.chars().count() {
                value.push('▏');
            }
        }
        if field.disabled {
            value.push_str("  (locked)");
        }

        let label_style = if focused {
            self.theme.title_style
        } else {
            self.theme.dimmed_style
        };

        Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(format!(" {value} "), value_style),
        ])
    }
}

impl Widget for FormModalWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let banner_lines = u16::from(self.modal.banner.is_some()) * 2;
        let field_lines = u16::try_from(self.modal.fields.len()).unwrap_or(u16::MAX);
        let height = field_lines
            .saturating_add(banner_lines)
            .saturating_add(4);
        let popup = fixed_centered_rect(MODAL_WIDTH, height, area);

        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.focused_border_style)
            .title(Span::styled(
                format!(" {} ", self.modal.title),
                self.theme.title_style,
            ));

        let mut lines = Vec::new();
        if let Some(banner) = &self.modal.banner {
            lines.push(Line::from(Span::styled(
                banner.as_str(),
                self.theme.error_style.add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::default());
        }

        for (index, field) in self.modal.fields.iter().enumerate() {
            lines.push(self.field_line(index, field));
        }

        lines.push(Line::default());
        let hint = if self.modal.saving {
            Span::styled("Saving…", self.theme.title_style)
        } else {
            Span::styled(
                "Tab/↑↓ move · ←→ change · Enter save · Esc cancel",
                self.theme.dimmed_style,
            )
        };
        lines.push(Line::from(hint));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(popup, buf);
    }
}
