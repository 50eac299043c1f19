//! Record table shared by every tab.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::Modifier,
    text::Span,
    widgets::{
        Block, Borders, Cell, HighlightSpacing, Paragraph, Row, StatefulWidget, Table, TableState,
        Widget,
    },
};
use unicode_width::UnicodeWidthStr;

use crate::presentation::theme::Theme;

const HIGHLIGHT_SYMBOL: &str = "▶ ";

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub width: Constraint,
}

impl Column {
    #[must_use]
    pub const fn new(title: &'static str, width: Constraint) -> Self {
        Self { title, width }
    }
}

/// Display row. Headings (category groups) span the table in bold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub active: bool,
    pub heading: bool,
}

impl TableRow {
    #[must_use]
    pub fn new(cells: Vec<String>, active: bool) -> Self {
        Self {
            cells,
            active,
            heading: false,
        }
    }

    #[must_use]
    pub fn heading(title: impl Into<String>) -> Self {
        Self {
            cells: vec![title.into()],
            active: true,
            heading: true,
        }
    }
}

pub struct DataTable<'a> {
    title: &'a str,
    columns: &'a [Column],
    rows: &'a [TableRow],
    selected: Option<usize>,
    empty_message: &'a str,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> DataTable<'a> {
    #[must_use]
    pub fn new(columns: &'a [Column], rows: &'a [TableRow], theme: &'a Theme) -> Self {
        Self {
            title: "",
            columns,
            rows,
            selected: None,
            empty_message: "No records.",
            focused: true,
            theme,
        }
    }

    #[must_use]
    pub const fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub const fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub const fn empty_message(mut self, message: &'a str) -> Self {
        self.empty_message = message;
        self
    }

    #[must_use]
    pub const fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn row(&self, row: &'a TableRow) -> Row<'a> {
        if row.heading {
            // Painted across the full width by `paint_headings`.
            return Row::new(vec![Cell::default()]);
        }

        let style = if row.active {
            self.theme.base_style
        } else {
            self.theme.dimmed_style.add_modifier(Modifier::ITALIC)
        };
        Row::new(row.cells.iter().map(|c| Cell::from(c.as_str()))).style(style)
    }
}

impl Widget for DataTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.focused {
                self.theme.focused_border_style
            } else {
                self.theme.border_style
            })
            .title(Span::styled(format!(" {} ", self.title), self.theme.title_style));

        if self.rows.is_empty() {
            Paragraph::new(Span::styled(self.empty_message, self.theme.dimmed_style))
                .block(block)
                .render(area, buf);
            return;
        }

        let header = Row::new(self.columns.iter().map(|c| c.title))
            .style(self.theme.title_style.add_modifier(Modifier::BOLD))
            .bottom_margin(0);
        let widths: Vec<Constraint> = self.columns.iter().map(|c| c.width).collect();
        let rows: Vec<Row> = self.rows.iter().map(|row| self.row(row)).collect();

        let inner = block.inner(area);
        let mut state = TableState::default().with_selected(self.selected);
        StatefulWidget::render(
            Table::new(rows, widths)
                .header(header)
                .block(block)
                .row_highlight_style(self.theme.selection_style)
                .highlight_symbol(HIGHLIGHT_SYMBOL)
                .highlight_spacing(HighlightSpacing::Always),
            area,
            buf,
            &mut state,
        );

        self.paint_headings(inner, state.offset(), buf);
    }
}

impl DataTable<'_> {
    /// Group headings span every column instead of being clipped to the first one.
    fn paint_headings(&self, inner: Rect, offset: usize, buf: &mut Buffer) {
        let symbol_width = u16::try_from(HIGHLIGHT_SYMBOL.width()).unwrap_or(0);
        let x = inner.x.saturating_add(symbol_width);
        let width = inner.width.saturating_sub(symbol_width);
        let first_y = inner.y.saturating_add(1);
        let visible = usize::from(inner.height.saturating_sub(1));
        let style = self.theme.title_style.add_modifier(Modifier::BOLD);

        for (index, row) in self.rows.iter().enumerate().skip(offset).take(visible) {
            if !row.heading || width == 0 {
                continue;
            }
            let Ok(line) = u16::try_from(index - offset) else {
                break;
            };
            let y = first_y.saturating_add(line);
            for column in x..x + width {
                buf[(column, y)].set_symbol(" ");
            }
            let title = row.cells.first().map_or("", String::as_str);
            buf.set_stringn(x, y, format!("▾ {title}"), usize::from(width), style);
        }
    }
}
