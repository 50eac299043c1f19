use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Tabs, Widget},
};

use crate::presentation::theme::Theme;

pub struct TabBar<'a> {
    titles: &'a [&'a str],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    #[must_use]
    pub fn new(titles: &'a [&'a str], selected: usize, theme: &'a Theme) -> Self {
        Self {
            titles,
            selected,
            theme,
        }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let titles: Vec<Line> = self
            .titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                Line::from(vec![
                    Span::styled(format!("{}", i + 1), self.theme.dimmed_style),
                    Span::raw(" "),
                    Span::raw(*title),
                ])
            })
            .collect();

        Tabs::new(titles)
            .select(self.selected)
            .style(self.theme.base_style)
            .highlight_style(
                self.theme
                    .title_style
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .divider(Span::styled("│", self.theme.border_style))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_numbered_titles() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        TabBar::new(&["Users", "Companies"], 1, &theme).render(area, &mut buf);

        let line: String = (0..area.width).map(|x| buf[(x, 0)].symbol()).collect();
        assert!(line.contains("1 Users"));
        assert!(line.contains("2 Companies"));
    }
}
