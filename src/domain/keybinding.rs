use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Quit,
    Logout,
    ToggleHelp,
    ToggleTheme,
    EditProfile,

    // Tabs / global filter
    NextTab,
    PreviousTab,
    CycleCompany,

    // Table navigation
    NavigateUp,
    NavigateDown,
    SelectFirst,
    SelectLast,
    Select,
    Cancel,

    // Row actions
    New,
    Edit,
    ToggleActive,
    Delete,
    LinkCompanies,
    BulkLink,
    NewGroup,
    ImportUsers,

    // Filters
    Search,
    CycleStatus,
    CycleKind,
    Refresh,
}

impl Action {
    /// Help overlay text.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::Logout => "Sign out",
            Self::ToggleHelp => "Toggle this help",
            Self::ToggleTheme => "Switch dark/light theme",
            Self::EditProfile => "Edit my profile",
            Self::NextTab => "Next tab",
            Self::PreviousTab => "Previous tab",
            Self::CycleCompany => "Cycle global company filter",
            Self::NavigateUp => "Move up",
            Self::NavigateDown => "Move down",
            Self::SelectFirst => "First row",
            Self::SelectLast => "Last row",
            Self::Select => "Edit selected row",
            Self::Cancel => "Close / clear search",
            Self::New => "New record",
            Self::Edit => "Edit selected row",
            Self::ToggleActive => "Activate / deactivate",
            Self::Delete => "Delete selected row",
            Self::LinkCompanies => "Link category to companies",
            Self::BulkLink => "Link categories to the selected company",
            Self::NewGroup => "New category group",
            Self::ImportUsers => "Import auth users",
            Self::Search => "Search",
            Self::CycleStatus => "Cycle status filter",
            Self::CycleKind => "Cycle kind filter",
            Self::Refresh => "Reload from server",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybind {
    pub key: KeyEvent,
    pub action: Action,
    pub label: Cow<'static, str>,
    pub key_display: Option<Cow<'static, str>>,
    pub visible_in_bar: bool,
}

impl Keybind {
    pub fn new(key: KeyEvent, action: Action, label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            key,
            action,
            label: label.into(),
            key_display: None,
            visible_in_bar: true,
        }
    }

    #[must_use]
    pub fn display(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.key_display = Some(text.into());
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible_in_bar = false;
        self
    }
}

/// Parses `"Ctrl+n"`, `"Shift+Tab"`, `"F2"`, `"/"` style key names.
#[must_use]
pub fn parse_key(text: &str) -> Option<KeyEvent> {
    let mut modifiers = KeyModifiers::NONE;
    let mut parts: Vec<&str> = text.split('+').map(str::trim).collect();

    // "Ctrl++" names the plus key itself.
    if text.ends_with("++") {
        parts.truncate(parts.len().saturating_sub(2));
        parts.push("+");
    }

    let key = parts.pop().filter(|k| !k.is_empty())?;

    for part in parts {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" | "c" => modifiers |= KeyModifiers::CONTROL,
            "alt" | "a" => modifiers |= KeyModifiers::ALT,
            "shift" | "s" => modifiers |= KeyModifiers::SHIFT,
            _ => return None,
        }
    }

    let code = match key.to_lowercase().as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "space" => KeyCode::Char(' '),
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        lower if lower.len() > 1 && lower.starts_with('f') => {
            KeyCode::F(lower[1..].parse().ok()?)
        }
        _ => {
            let mut chars = key.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            if c.is_ascii_uppercase() {
                modifiers |= KeyModifiers::SHIFT;
            }
            KeyCode::Char(c)
        }
    };

    Some(KeyEvent::new(code, modifiers))
}
