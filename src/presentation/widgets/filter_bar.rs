use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::domain::filter::{KindFilter, StatusFilter};
use crate::presentation::theme::Theme;

/// Search text plus the status (and, on categories, kind) toggles.
pub struct FilterBar<'a> {
    search: &'a str,
    editing: bool,
    status: StatusFilter,
    kind: Option<KindFilter>,
    theme: &'a Theme,
}

impl<'a> FilterBar<'a> {
    #[must_use]
    pub fn new(search: &'a str, status: StatusFilter, theme: &'a Theme) -> Self {
        Self {
            search,
            editing: false,
            status,
            kind: None,
            theme,
        }
    }

    #[must_use]
    pub const fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }

    #[must_use]
    pub const fn kind(mut self, kind: Option<KindFilter>) -> Self {
        self.kind = kind;
        self
    }

    fn spans(&self) -> Vec<Span<'a>> {
        let search_style = if self.editing {
            self.theme.selection_style
        } else {
            self.theme.base_style
        };
        let search = if self.search.is_empty() && !self.editing {
            Span::styled("press / to search", self.theme.dimmed_style)
        } else if self.editing {
            Span::styled(format!("{}▏", self.search), search_style)
        } else {
            Span::styled(self.search.to_string(), search_style)
        };

        let mut spans = vec![
            Span::styled(" Search: ", self.theme.title_style),
            search,
            Span::styled("  │ ", self.theme.border_style),
            Span::styled("Status: ", self.theme.title_style),
            Span::styled(self.status.label(), self.theme.base_style),
        ];

        if let Some(kind) = self.kind {
            spans.push(Span::styled("  │ ", self.theme.border_style));
            spans.push(Span::styled("Kind: ", self.theme.title_style));
            spans.push(Span::styled(kind.label(), self.theme.base_style));
        }
        spans
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(self.spans())).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(bar: &FilterBar) -> String {
        bar.spans().iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_placeholder_and_kind() {
        let theme = Theme::default();
        let bar = FilterBar::new("", StatusFilter::Active, &theme).kind(Some(KindFilter::Expense));
        let text = line(&bar);

        assert!(text.contains("press / to search"));
        assert!(text.contains("Status: Active"));
        assert!(text.contains("Kind: Expense"));
    }

    #[test]
    fn test_editing_shows_cursor() {
        let theme = Theme::default();
        let bar = FilterBar::new("acme", StatusFilter::All, &theme).editing(true);
        assert!(line(&bar).contains("acme▏"));
        assert!(!line(&bar).contains("Kind"));
    }
}
