//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Status bar severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Idle, nothing pending.
    Info,
    /// A platform call is running.
    Busy,
    /// The last load failed.
    Error,
}

impl StatusLevel {
    /// Returns color for level.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Busy => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Status bar widget.
#[derive(Debug, Clone)]
pub struct StatusBar {
    left: String,
    center: String,
    right: String,
    level: StatusLevel,
}

impl StatusBar {
    /// Creates empty status bar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left: String::new(),
            center: String::new(),
            right: String::new(),
            level: StatusLevel::Info,
        }
    }

    /// Sets left content.
    #[must_use]
    pub fn left(mut self, content: impl Into<String>) -> Self {
        self.left = content.into();
        self
    }

    /// Sets center content.
    #[must_use]
    pub fn center(mut self, content: impl Into<String>) -> Self {
        self.center = content.into();
        self
    }

    /// Sets right content.
    #[must_use]
    pub fn right(mut self, content: impl Into<String>) -> Self {
        self.right = content.into();
        self
    }

    /// Sets status level.
    #[must_use]
    pub const fn level(mut self, level: StatusLevel) -> Self {
        self.level = level;
        self
    }

    /// Summary line for a loaded list.
    #[must_use]
    pub fn for_list(title: &str, shown: usize, total: usize, loading: bool) -> Self {
        let (center, level) = if loading {
            ("Loading…".to_string(), StatusLevel::Busy)
        } else {
            (String::new(), StatusLevel::Info)
        };

        Self::new()
            .left(format!(" {title}"))
            .center(center)
            .right(format!("{shown} of {total} shown "))
            .level(level)
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .fg(self.level.color())
            .add_modifier(Modifier::BOLD);

        let width = area.width as usize;

        let left_len = self.left.width();
        let center_len = self.center.width();
        let right_len = self.right.width();

        let center_start = width.saturating_sub(center_len) / 2;
        let right_start = width.saturating_sub(right_len);

        let mut spans = vec![Span::styled(self.left.as_str(), style)];

        let left_padding = center_start.saturating_sub(left_len);
        spans.push(Span::raw(" ".repeat(left_padding)));
        spans.push(Span::styled(self.center.as_str(), style));

        let current_len = left_len + left_padding + center_len;
        spans.push(Span::raw(" ".repeat(right_start.saturating_sub(current_len))));
        spans.push(Span::styled(self.right.as_str(), Style::default().fg(Color::DarkGray)));

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
