//! Presentation layer with UI components and event handling.

/// Keybinding registry.
pub mod commands;
/// Event handling.
pub mod events;
/// Terminal theme.
pub mod theme;
/// UI screens.
pub mod ui;
/// Reusable widgets.
pub mod widgets;

pub use ui::App;
