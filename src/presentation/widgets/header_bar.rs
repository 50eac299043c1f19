use crate::domain::entities::UserRole;
use crate::presentation::theme::Theme;
use crate::presentation::theme::adapter::ColorConverter;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

trait UserRoleExt {
    fn badge(self) -> &'static str;
}

impl UserRoleExt for UserRole {
    fn badge(self) -> &'static str {
        match self {
            Self::Master => "MASTER",
            Self::Consultant => "CONSULTANT",
            Self::Client => "CLIENT",
        }
    }
}

pub struct HeaderBarStyle {
    pub background: Style,
    pub app_name: Style,
    pub version: Style,
    pub company: Style,
    pub user: Style,
    pub role_master: Style,
    pub role_other: Style,
}

impl HeaderBarStyle {
    #[must_use]
    pub fn from_theme(theme: &Theme) -> Self {
        let accent = theme.accent;
        let version_bg = ColorConverter::shade(accent, 0.08, 0.5);

        Self {
            app_name: Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            version: Style::default().bg(version_bg).fg(Color::White),
            company: theme.title_style,
            user: theme.base_style,
            role_master: Style::default()
                .bg(Color::Magenta)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            role_other: Style::default()
                .bg(Color::Green)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            ..Self::default()
        }
    }
}

impl Default for HeaderBarStyle {
    fn default() -> Self {
        Self {
            background: Style::default(),
            app_name: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            version: Style::default().fg(Color::DarkGray),
            company: Style::default().fg(Color::Cyan),
            user: Style::default(),
            role_master: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            role_other: Style::default().fg(Color::Green),
        }
    }
}

pub struct HeaderBar<'a> {
    app_name: &'a str,
    version: &'a str,
    user_name: &'a str,
    role: Option<UserRole>,
    company: &'a str,
    style: HeaderBarStyle,
}

impl<'a> HeaderBar<'a> {
    #[must_use]
    pub fn new(app_name: &'a str, version: &'a str) -> Self {
        Self {
            app_name,
            version,
            user_name: "",
            role: None,
            company: "",
            style: HeaderBarStyle::default(),
        }
    }

    /// Signed-in user; `role` is `None` when the profile could not be loaded.
    #[must_use]
    pub const fn user(mut self, name: &'a str, role: Option<UserRole>) -> Self {
        self.user_name = name;
        self.role = role;
        self
    }

    /// Label of the global company filter.
    #[must_use]
    pub const fn company(mut self, company: &'a str) -> Self {
        self.company = company;
        self
    }

    #[must_use]
    pub const fn style(mut self, style: HeaderBarStyle) -> Self {
        self.style = style;
        self
    }

    fn build_user_spans(&self) -> (Vec<Span<'static>>, u16) {
        let mut spans = vec![Span::styled(format!(" {} ", self.user_name), self.style.user)];

        if let Some(role) = self.role {
            let style = if role.is_master() {
                self.style.role_master
            } else {
                self.style.role_other
            };
            spans.push(Span::styled(format!(" {} ", role.badge()), style));
        }

        let width = spans.iter().map(|s| s.content.width()).sum::<usize>();
        (spans, u16::try_from(width).unwrap_or(u16::MAX))
    }
}

impl Widget for HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        for x in area.left()..area.right() {
            buf[(x, area.y)]
                .set_char(' ')
                .set_style(self.style.background);
        }

        let mut left_spans = vec![
            Span::styled(
                format!(" {} ", self.app_name.to_uppercase()),
                self.style.app_name,
            ),
            Span::raw(" "),
            Span::styled(format!(" v{} ", self.version), self.style.version),
        ];
        if !self.company.is_empty() {
            left_spans.push(Span::raw("  "));
            left_spans.push(Span::styled(format!("▸ {}", self.company), self.style.company));
        }

        let left_line = Line::from(left_spans);
        let left_width = u16::try_from(left_line.width()).unwrap_or(u16::MAX);
        let left_area = Rect::new(area.x, area.y, left_width.min(area.width), 1);
        Paragraph::new(left_line).render(left_area, buf);

        let (user_spans, user_width) = self.build_user_spans();

        if user_width < area.width.saturating_sub(left_width) {
            let right_x = area.right().saturating_sub(user_width);
            let right_area = Rect::new(right_x, area.y, user_width, 1);
            Paragraph::new(Line::from(user_spans)).render(right_area, buf);
        }
    }
}
