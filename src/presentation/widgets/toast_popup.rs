use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::domain::{Toast, ToastLevel};
use crate::presentation::theme::Theme;

const MAX_WIDTH: u16 = 60;
const MAX_HEIGHT: u16 = 8;

pub struct ToastPopup<'a> {
    toast: &'a Toast,
    theme: &'a Theme,
}

impl<'a> ToastPopup<'a> {
    #[must_use]
    pub fn new(toast: &'a Toast, theme: &'a Theme) -> Self {
        Self { toast, theme }
    }

    const fn title(&self) -> &'static str {
        match self.toast.level {
            ToastLevel::Success => " Done ",
            ToastLevel::Info => " Info ",
            ToastLevel::Error => " Error ",
        }
    }

    /// Top-right rectangle sized to the message.
    fn popup_area(&self, area: Rect) -> Rect {
        let message_width = u16::try_from(self.toast.message.width()).unwrap_or(u16::MAX);
        let title_width = u16::try_from(self.title().width()).unwrap_or(0);

        let width = message_width
            .max(title_width)
            .saturating_add(4)
            .min(MAX_WIDTH.min(area.width.saturating_sub(2)));

        let inner_width = width.saturating_sub(2).max(1);
        let lines = message_width.div_ceil(inner_width).max(1);
        let height = lines.saturating_add(2).min(MAX_HEIGHT);

        let x = area.x + area.width.saturating_sub(width).saturating_sub(2);
        let y = area.y + 2;

        area.intersection(Rect::new(x, y, width, height))
    }
}

impl Widget for ToastPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = self.popup_area(area);
        if popup.area() == 0 {
            return;
        }

        let color = match self.toast.level {
            ToastLevel::Success => Color::Green,
            ToastLevel::Info => self.theme.accent,
            ToastLevel::Error => Color::Red,
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .style(Style::default().fg(color));

        let para = Paragraph::new(self.toast.message.as_str())
            .block(block)
            .wrap(Wrap { trim: true })
            .style(Style::default().add_modifier(Modifier::BOLD));

        Clear.render(popup, buf);
        para.render(popup, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_fits_short_message() {
        let toast = Toast::new(ToastLevel::Success, "Client saved");
        let theme = Theme::default();
        let popup = ToastPopup::new(&toast, &theme).popup_area(Rect::new(0, 0, 100, 30));

        assert_eq!(popup.width, 16);
        assert_eq!(popup.height, 3);
        assert_eq!(popup.right(), 98);
    }

    #[test]
    fn test_long_message_wraps_within_limits() {
        let toast = Toast::new(ToastLevel::Error, "x".repeat(400));
        let theme = Theme::default();
        let popup = ToastPopup::new(&toast, &theme).popup_area(Rect::new(0, 0, 100, 30));

        assert_eq!(popup.width, MAX_WIDTH);
        assert_eq!(popup.height, MAX_HEIGHT);
    }
}
