use super::adapter::ColorConverter;
use crate::infrastructure::config::ThemeMode;
use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub mode: ThemeMode,
    pub base_style: Style,
    pub dimmed_style: Style,
    pub selection_style: Style,
    pub border_style: Style,
    pub focused_border_style: Style,
    pub title_style: Style,
    pub error_style: Style,
    pub success_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new("Cyan", ThemeMode::Dark)
    }
}

impl Theme {
    pub fn new(accent_color_str: &str, mode: ThemeMode) -> Self {
        Self::from_color(parse_color(accent_color_str), mode)
    }

    #[must_use]
    pub fn from_color(accent: Color, mode: ThemeMode) -> Self {
        let (foreground, muted, selection_lightness) = match mode {
            ThemeMode::Dark => (Color::White, Color::DarkGray, 0.2),
            ThemeMode::Light => (Color::Black, Color::Gray, 0.85),
        };

        let selection_bg = ColorConverter::shade(accent, selection_lightness, 0.3);

        Self {
            accent,
            mode,
            base_style: Style::default().fg(foreground),
            dimmed_style: Style::default().fg(muted),
            selection_style: Style::default()
                .bg(selection_bg)
                .fg(foreground)
                .add_modifier(Modifier::BOLD),
            border_style: Style::default().fg(muted),
            focused_border_style: Style::default().fg(accent),
            title_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            error_style: Style::default().fg(Color::Red),
            success_style: Style::default().fg(Color::Green),
        }
    }

    /// Same accent in the other mode.
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self::from_color(self.accent, self.mode.toggled())
    }
}

fn parse_color(s: &str) -> Color {
    if let Ok(c) = Color::from_str(s) {
        return c;
    }

    if s.starts_with('#')
        && let Ok((r, g, b)) = parse_hex_color(s)
    {
        return Color::Rgb(r, g, b);
    }

    match s.to_lowercase().as_str() {
        "orange" => Color::Indexed(208),
        _ => Color::Cyan,
    }
}

fn parse_hex_color(s: &str) -> Result<(u8, u8, u8), ()> {
    let s = s.trim_start_matches('#');

    if !s.is_ascii() {
        return Err(());
    }

    let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| ());

    match s.len() {
        6 => Ok((channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?)),
        3 => {
            let double = |i: usize| channel(&s[i..=i].repeat(2));
            Ok((double(0)?, double(1)?, double(2)?))
        }
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("Red"), Color::Red);
        assert_eq!(parse_color("blue"), Color::Blue);
        assert_eq!(parse_color("#FF0000"), Color::Rgb(255, 0, 0));
        assert_eq!(parse_color("#0f0"), Color::Rgb(0, 255, 0));
        assert_eq!(parse_color("Orange"), Color::Indexed(208));
        assert_eq!(parse_color("Invalid"), Color::Cyan);
    }

    #[test]
    fn test_toggle_switches_foreground() {
        let dark = Theme::new("Magenta", ThemeMode::Dark);
        let light = dark.toggled();

        assert_eq!(light.mode, ThemeMode::Light);
        assert_eq!(light.accent, Color::Magenta);
        assert_eq!(dark.base_style.fg, Some(Color::White));
        assert_eq!(light.base_style.fg, Some(Color::Black));
        assert_eq!(light.toggled().mode, ThemeMode::Dark);
    }
}
