use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::footer_bar::FooterBar;
use crate::presentation::commands::CommandRegistry;
use crate::presentation::theme::Theme;
use crate::presentation::ui::utils::fixed_centered_rect;

const KEY_WIDTH: usize = 12;

pub struct HelpPopup<'a> {
    registry: &'a CommandRegistry,
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    #[must_use]
    pub fn new(registry: &'a CommandRegistry, theme: &'a Theme) -> Self {
        Self { registry, theme }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let mut entries: Vec<(String, &'static str)> = self
            .registry
            .all()
            .into_iter()
            .map(|(action, key)| (FooterBar::format_key(&key), action.description()))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(&b.0)));
        entries.dedup_by(|a, b| a.1 == b.1);

        entries
            .into_iter()
            .map(|(key, description)| {
                Line::from(vec![
                    Span::styled(format!("{key:>KEY_WIDTH$}  "), self.theme.title_style),
                    Span::styled(description, self.theme.base_style),
                ])
            })
            .collect()
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
        let popup = fixed_centered_rect(58, height, area);

        Clear.render(popup, buf);
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.focused_border_style)
                    .title(Span::styled(" Keys ", self.theme.title_style)),
            )
            .render(popup, buf);
    }
}
