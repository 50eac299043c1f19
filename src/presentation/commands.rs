use crate::domain::keybinding::{Action, Keybind, parse_key};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::warn;

pub struct CommandRegistry {
    display_bindings: HashMap<Action, KeyEvent>,
    input_bindings: Vec<(KeyEvent, Action)>,
}

impl Default for CommandRegistry {
    #[allow(clippy::too_many_lines)]
    fn default() -> Self {
        let mut display_bindings = HashMap::new();
        let mut input_bindings = Vec::new();

        let mut register = |action: Action, key: KeyEvent, is_primary: bool| {
            if is_primary {
                display_bindings.insert(action, key);
            }
            input_bindings.push((key, action));
        };

        let plain = |c: char| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);

        register(
            Action::Quit,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            false,
        );
        register(Action::Quit, plain('q'), true);
        register(
            Action::Logout,
            KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL),
            true,
        );
        register(
            Action::ToggleHelp,
            KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE),
            true,
        );
        register(Action::ToggleHelp, plain('?'), false);
        register(
            Action::ToggleHelp,
            KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT),
            false,
        );
        register(
            Action::ToggleTheme,
            KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE),
            true,
        );
        register(Action::EditProfile, plain('p'), true);

        register(
            Action::NextTab,
            KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE),
            true,
        );
        register(
            Action::PreviousTab,
            KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            true,
        );
        register(
            Action::PreviousTab,
            KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE),
            false,
        );
        register(Action::CycleCompany, plain('c'), true);

        register(
            Action::NavigateUp,
            KeyEvent::new(KeyCode::Up, KeyModifiers::NONE),
            true,
        );
        register(
            Action::NavigateDown,
            KeyEvent::new(KeyCode::Down, KeyModifiers::NONE),
            true,
        );
        register(Action::NavigateDown, plain('j'), false);
        register(
            Action::SelectFirst,
            KeyEvent::new(KeyCode::Home, KeyModifiers::NONE),
            true,
        );
        register(
            Action::SelectLast,
            KeyEvent::new(KeyCode::End, KeyModifiers::NONE),
            true,
        );
        register(
            Action::Select,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            true,
        );
        register(
            Action::Cancel,
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            true,
        );

        register(Action::New, plain('n'), true);
        register(Action::Edit, plain('e'), true);
        register(Action::ToggleActive, plain('t'), true);
        register(Action::Delete, plain('d'), true);
        register(
            Action::Delete,
            KeyEvent::new(KeyCode::Delete, KeyModifiers::NONE),
            false,
        );
        register(Action::LinkCompanies, plain('l'), true);
        register(Action::BulkLink, plain('b'), true);
        register(Action::NewGroup, plain('g'), true);
        register(Action::ImportUsers, plain('i'), true);

        register(Action::Search, plain('/'), true);
        register(Action::CycleStatus, plain('s'), true);
        register(Action::CycleKind, plain('k'), true);
        register(Action::Refresh, plain('r'), true);
        register(
            Action::Refresh,
            KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE),
            false,
        );

        Self {
            display_bindings,
            input_bindings,
        }
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default bindings with the `"Ctrl+n" = "New"` entries of the config on top.
    ///
    /// An override replaces whatever the key was bound to and becomes the
    /// key shown for its action.
    pub fn with_overrides(overrides: &HashMap<String, Action>) -> Self {
        let mut registry = Self::default();

        for (name, action) in overrides {
            let Some(key) = parse_key(name) else {
                warn!(key = %name, action = ?action, "Ignoring unparsable keybinding");
                continue;
            };
            registry.input_bindings.retain(|(k, _)| !same_key(k, &key));
            registry.input_bindings.insert(0, (key, *action));
            registry.display_bindings.insert(*action, key);
            registry.reassign_display(*action, &key);
        }

        registry
    }

    /// Actions that were displayed under `key` fall back to another key they still have.
    fn reassign_display(&mut self, owner: Action, key: &KeyEvent) {
        let stolen: Vec<Action> = self
            .display_bindings
            .iter()
            .filter(|(action, k)| **action != owner && same_key(k, key))
            .map(|(action, _)| *action)
            .collect();

        for action in stolen {
            match self.input_bindings.iter().find(|(_, a)| *a == action) {
                Some((fallback, _)) => {
                    self.display_bindings.insert(action, *fallback);
                }
                None => {
                    self.display_bindings.remove(&action);
                }
            }
        }
    }

    pub fn get(&self, action: Action) -> Option<KeyEvent> {
        self.display_bindings.get(&action).copied()
    }

    pub fn find_action(&self, key: KeyEvent) -> Option<Action> {
        self.input_bindings
            .iter()
            .find(|(k, _)| same_key(k, &key))
            .map(|(_, a)| *a)
    }

    /// Footer entry for `action` under its display key.
    pub fn keybind(&self, action: Action, label: impl Into<Cow<'static, str>>) -> Option<Keybind> {
        self.get(action).map(|key| Keybind::new(key, action, label))
    }

    /// Every action with its display key, for the help overlay.
    pub fn all(&self) -> Vec<(Action, KeyEvent)> {
        let mut entries: Vec<(Action, KeyEvent)> = self
            .display_bindings
            .iter()
            .map(|(action, key)| (*action, *key))
            .collect();
        entries.sort_by_key(|(action, _)| format!("{action:?}"));
        entries
    }
}

fn same_key(a: &KeyEvent, b: &KeyEvent) -> bool {
    a.code == b.code && a.modifiers == b.modifiers
}

pub trait HasCommands {
    fn get_commands(&self, registry: &CommandRegistry) -> Vec<Keybind>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(KeyCode::Char('n'), KeyModifiers::NONE, Action::New ; "new")]
    #[test_case(KeyCode::Char('e'), KeyModifiers::NONE, Action::Edit ; "edit")]
    #[test_case(KeyCode::Enter, KeyModifiers::NONE, Action::Select ; "enter")]
    #[test_case(KeyCode::Char('t'), KeyModifiers::NONE, Action::ToggleActive ; "toggle")]
    #[test_case(KeyCode::Char('d'), KeyModifiers::NONE, Action::Delete ; "delete")]
    #[test_case(KeyCode::Char('d'), KeyModifiers::CONTROL, Action::Logout ; "logout")]
    #[test_case(KeyCode::Char('/'), KeyModifiers::NONE, Action::Search ; "search")]
    #[test_case(KeyCode::Char('k'), KeyModifiers::NONE, Action::CycleKind ; "kind")]
    #[test_case(KeyCode::F(2), KeyModifiers::NONE, Action::ToggleTheme ; "theme")]
    #[test_case(KeyCode::BackTab, KeyModifiers::SHIFT, Action::PreviousTab ; "previous_tab")]
    fn test_default_bindings(code: KeyCode, modifiers: KeyModifiers, expected: Action) {
        let registry = CommandRegistry::default();
        assert_eq!(
            registry.find_action(KeyEvent::new(code, modifiers)),
            Some(expected)
        );
    }

    #[test]
    fn test_override_replaces_key_and_display() {
        let overrides = HashMap::from([("Ctrl+n".to_string(), Action::New)]);
        let registry = CommandRegistry::with_overrides(&overrides);

        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(registry.find_action(ctrl_n), Some(Action::New));
        assert_eq!(registry.get(Action::New), Some(ctrl_n));
        assert_eq!(
            registry.find_action(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE)),
            Some(Action::New)
        );
    }

    #[test]
    fn test_override_steals_bound_key() {
        let overrides = HashMap::from([("r".to_string(), Action::CycleStatus)]);
        let registry = CommandRegistry::with_overrides(&overrides);

        assert_eq!(
            registry.find_action(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE)),
            Some(Action::CycleStatus)
        );
        let f5 = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(registry.find_action(f5), Some(Action::Refresh));
        assert_eq!(registry.get(Action::Refresh), Some(f5));
    }

    #[test]
    fn test_unparsable_override_is_ignored() {
        let overrides = HashMap::from([("Hyper+x".to_string(), Action::Quit)]);
        let registry = CommandRegistry::with_overrides(&overrides);

        assert_eq!(
            registry.get(Action::Quit),
            Some(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE))
        );
    }
}
