//! Per-tab list state: loaded records, filters and selection.

use crossterm::event::KeyEvent;
use ratatui::layout::Constraint;

use crate::application::use_cases::CategoryTree;
use crate::domain::entities::{
    Category, CategoryGroup, Client, Company, Person, Service, UserProfile, format_cpf,
    format_tax_id,
};
use crate::domain::filter::{self, KindFilter, Searchable, StatusFilter};
use crate::presentation::ui::utils::{active_label, format_date, wrap_next, wrap_previous};
use crate::presentation::widgets::{Column, TableRow, TextInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Users,
    Companies,
    Clients,
    People,
    Services,
    Categories,
}

impl Tab {
    pub const ALL: [Self; 6] = [
        Self::Users,
        Self::Companies,
        Self::Clients,
        Self::People,
        Self::Services,
        Self::Categories,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Companies => "Companies",
            Self::Clients => "Clients",
            Self::People => "People",
            Self::Services => "Services",
            Self::Categories => "Categories",
        }
    }

    /// Name stored in `state.toml`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Companies => "companies",
            Self::Clients => "clients",
            Self::People => "people",
            Self::Services => "services",
            Self::Categories => "categories",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.name() == name)
    }

    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Lists narrowed by the global company filter.
    #[must_use]
    pub const fn is_company_scoped(self) -> bool {
        matches!(self, Self::Users | Self::Clients | Self::People | Self::Services)
    }

    #[must_use]
    pub const fn columns(self) -> &'static [Column] {
        match self {
            Self::Users => USER_COLUMNS,
            Self::Companies => COMPANY_COLUMNS,
            Self::Clients => CLIENT_COLUMNS,
            Self::People => PERSON_COLUMNS,
            Self::Services => SERVICE_COLUMNS,
            Self::Categories => CATEGORY_COLUMNS,
        }
    }
}

const USER_COLUMNS: &[Column] = &[
    Column::new("Name", Constraint::Percentage(24)),
    Column::new("Email", Constraint::Percentage(26)),
    Column::new("Role", Constraint::Length(11)),
    Column::new("Company", Constraint::Percentage(22)),
    Column::new("Status", Constraint::Length(9)),
    Column::new("Updated", Constraint::Length(11)),
];

const COMPANY_COLUMNS: &[Column] = &[
    Column::new("Legal name", Constraint::Percentage(30)),
    Column::new("Trade name", Constraint::Percentage(22)),
    Column::new("Tax id", Constraint::Length(19)),
    Column::new("Email", Constraint::Percentage(20)),
    Column::new("Status", Constraint::Length(9)),
    Column::new("Updated", Constraint::Length(11)),
];

const CLIENT_COLUMNS: &[Column] = &[
    Column::new("Code", Constraint::Length(7)),
    Column::new("Legal name", Constraint::Percentage(28)),
    Column::new("Trade name", Constraint::Percentage(20)),
    Column::new("Tax id", Constraint::Length(19)),
    Column::new("Company", Constraint::Percentage(18)),
    Column::new("Status", Constraint::Length(9)),
];

const PERSON_COLUMNS: &[Column] = &[
    Column::new("Code", Constraint::Length(7)),
    Column::new("Name", Constraint::Percentage(24)),
    Column::new("Role", Constraint::Length(13)),
    Column::new("CPF", Constraint::Length(15)),
    Column::new("Email", Constraint::Percentage(22)),
    Column::new("Company", Constraint::Percentage(16)),
    Column::new("Status", Constraint::Length(9)),
];

const SERVICE_COLUMNS: &[Column] = &[
    Column::new("Code", Constraint::Length(7)),
    Column::new("Name", Constraint::Percentage(28)),
    Column::new("Description", Constraint::Percentage(32)),
    Column::new("Company", Constraint::Percentage(18)),
    Column::new("Status", Constraint::Length(9)),
];

const CATEGORY_COLUMNS: &[Column] = &[
    Column::new("Code", Constraint::Length(8)),
    Column::new("Name", Constraint::Percentage(30)),
    Column::new("Kind", Constraint::Length(9)),
    Column::new("Description", Constraint::Percentage(34)),
    Column::new("Status", Constraint::Length(9)),
];

/// Records of one tab as last fetched.
#[derive(Debug, Clone)]
pub enum TabData {
    Users(Vec<UserProfile>),
    Companies(Vec<Company>),
    Clients(Vec<Client>),
    People(Vec<Person>),
    Services(Vec<Service>),
    Categories(CategoryTree),
}

impl TabData {
    #[must_use]
    pub fn empty(tab: Tab) -> Self {
        match tab {
            Tab::Users => Self::Users(Vec::new()),
            Tab::Companies => Self::Companies(Vec::new()),
            Tab::Clients => Self::Clients(Vec::new()),
            Tab::People => Self::People(Vec::new()),
            Tab::Services => Self::Services(Vec::new()),
            Tab::Categories => Self::Categories(CategoryTree::default()),
        }
    }

    #[must_use]
    pub const fn tab(&self) -> Tab {
        match self {
            Self::Users(_) => Tab::Users,
            Self::Companies(_) => Tab::Companies,
            Self::Clients(_) => Tab::Clients,
            Self::People(_) => Tab::People,
            Self::Services(_) => Tab::Services,
            Self::Categories(_) => Tab::Categories,
        }
    }

    fn total(&self) -> usize {
        match self {
            Self::Users(rows) => rows.len(),
            Self::Companies(rows) => rows.len(),
            Self::Clients(rows) => rows.len(),
            Self::People(rows) => rows.len(),
            Self::Services(rows) => rows.len(),
            Self::Categories(tree) => tree.categories().count(),
        }
    }
}

/// A visible row and the record behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRef<'a> {
    User(&'a UserProfile),
    Company(&'a Company),
    Client(&'a Client),
    Person(&'a Person),
    Service(&'a Service),
    Group(&'a CategoryGroup),
    /// Heading above the categories without a group.
    Ungrouped,
    Category(&'a Category),
}

impl RowRef<'_> {
    /// Label used in confirm dialogs and toasts.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::User(u) => u.display_name().to_string(),
            Self::Company(c) => c.legal_name.clone(),
            Self::Client(c) => format!("{} {}", c.code, c.legal_name),
            Self::Person(p) => format!("{} {}", p.code, p.name),
            Self::Service(s) => format!("{} {}", s.code, s.name),
            Self::Group(g) => g.name.clone(),
            Self::Ungrouped => "Ungrouped".to_string(),
            Self::Category(c) => format!("{} {}", c.code, c.name),
        }
    }

    fn table_row(&self) -> TableRow {
        match self {
            Self::User(u) => TableRow::new(
                vec![
                    u.name.clone(),
                    u.email.clone(),
                    u.role.label().to_string(),
                    u.company_name().to_string(),
                    active_label(u.active).to_string(),
                    format_date(u.updated_at),
                ],
                u.active,
            ),
            Self::Company(c) => TableRow::new(
                vec![
                    c.legal_name.clone(),
                    c.trade_name.clone(),
                    format_tax_id(&c.tax_id),
                    c.email.clone(),
                    active_label(c.active).to_string(),
                    format_date(c.updated_at),
                ],
                c.active,
            ),
            Self::Client(c) => TableRow::new(
                vec![
                    c.code.clone(),
                    c.legal_name.clone(),
                    c.trade_name.clone(),
                    format_tax_id(&c.tax_id),
                    c.company_name().to_string(),
                    active_label(c.active).to_string(),
                ],
                c.active,
            ),
            Self::Person(p) => TableRow::new(
                vec![
                    p.code.clone(),
                    p.name.clone(),
                    p.role.label().to_string(),
                    format_cpf(&p.individual_tax_id),
                    p.email.clone(),
                    p.company_name().to_string(),
                    active_label(p.active).to_string(),
                ],
                p.active,
            ),
            Self::Service(s) => TableRow::new(
                vec![
                    s.code.clone(),
                    s.name.clone(),
                    s.description.clone(),
                    s.company_name().to_string(),
                    active_label(s.active).to_string(),
                ],
                s.active,
            ),
            Self::Group(g) => TableRow::heading(g.name.clone()),
            Self::Ungrouped => TableRow::heading("Ungrouped"),
            Self::Category(c) => TableRow::new(
                vec![
                    format!("  {}", c.code),
                    c.name.clone(),
                    c.kind.label().to_string(),
                    c.description.clone(),
                    active_label(c.active).to_string(),
                ],
                c.active,
            ),
        }
    }
}

/// State of one tab.
#[derive(Debug, Clone)]
pub struct TabView {
    data: TabData,
    search: TextInput,
    searching: bool,
    status: StatusFilter,
    kind: KindFilter,
    selected: Option<usize>,
    loading: bool,
    loaded: bool,
}

impl TabView {
    #[must_use]
    pub fn new(tab: Tab, status: StatusFilter) -> Self {
        Self {
            data: TabData::empty(tab),
            search: TextInput::new("Search"),
            searching: false,
            status,
            kind: KindFilter::default(),
            selected: None,
            loading: false,
            loaded: false,
        }
    }

    #[must_use]
    pub const fn tab(&self) -> Tab {
        self.data.tab()
    }

    #[must_use]
    pub fn search(&self) -> &str {
        self.search.value()
    }

    #[must_use]
    pub const fn is_searching(&self) -> bool {
        self.searching
    }

    #[must_use]
    pub const fn status(&self) -> StatusFilter {
        self.status
    }

    #[must_use]
    pub const fn kind(&self) -> KindFilter {
        self.kind
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a fetch has completed since the view was created.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub const fn data(&self) -> &TabData {
        &self.data
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replaces the records, keeping the selection where possible.
    pub fn set_data(&mut self, data: TabData) {
        if data.tab() != self.tab() {
            return;
        }
        self.data = data;
        self.loading = false;
        self.loaded = true;
        self.clamp_selection();
    }

    /// Forces a fetch the next time the tab is shown.
    pub fn mark_stale(&mut self) {
        self.loaded = false;
    }

    pub fn cycle_status(&mut self) {
        self.status = self.status.cycle();
    }

    pub fn cycle_kind(&mut self) {
        self.kind = self.kind.cycle();
    }

    pub fn start_search(&mut self) {
        self.searching = true;
    }

    /// Leaves search mode; `clear` also drops the term.
    pub fn stop_search(&mut self, clear: bool) {
        self.searching = false;
        if clear && !self.search.value().is_empty() {
            self.search.clear();
            self.reset_selection();
        }
    }

    /// Edits the search term. Returns whether the key was consumed.
    pub fn search_key(&mut self, key: KeyEvent) -> bool {
        let before = self.search.value().to_string();
        let consumed = self.search.handle_key(key);
        if self.search.value() != before {
            self.reset_selection();
        }
        consumed
    }

    /// Rows after the search and status filters, in display order.
    #[must_use]
    pub fn rows(&self) -> Vec<RowRef<'_>> {
        let search = self.search.value();
        match &self.data {
            TabData::Users(rows) => filter::apply(rows, search, self.status)
                .into_iter()
                .map(RowRef::User)
                .collect(),
            TabData::Companies(rows) => filter::apply(rows, search, self.status)
                .into_iter()
                .map(RowRef::Company)
                .collect(),
            TabData::Clients(rows) => filter::apply(rows, search, self.status)
                .into_iter()
                .map(RowRef::Client)
                .collect(),
            TabData::People(rows) => filter::apply(rows, search, self.status)
                .into_iter()
                .map(RowRef::Person)
                .collect(),
            TabData::Services(rows) => filter::apply(rows, search, self.status)
                .into_iter()
                .map(RowRef::Service)
                .collect(),
            TabData::Categories(tree) => category_rows(tree, search),
        }
    }

    #[must_use]
    pub fn table_rows(&self) -> Vec<TableRow> {
        self.rows().iter().map(RowRef::table_row).collect()
    }

    /// Number of visible records (headings excluded) and of loaded records.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        let shown = self
            .rows()
            .iter()
            .filter(|row| !matches!(row, RowRef::Group(_) | RowRef::Ungrouped))
            .count();
        (shown, self.data.total())
    }

    #[must_use]
    pub fn selected_row(&self) -> Option<RowRef<'_>> {
        let index = self.selected?;
        self.rows().get(index).copied()
    }

    /// Every group of the loaded tree, for the category form.
    #[must_use]
    pub fn groups(&self) -> Vec<CategoryGroup> {
        match &self.data {
            TabData::Categories(tree) => tree.groups.iter().map(|n| n.group.clone()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn select_next(&mut self) {
        let len = self.rows().len();
        self.selected = wrap_next(self.selected, len);
    }

    pub fn select_previous(&mut self) {
        let len = self.rows().len();
        self.selected = wrap_previous(self.selected, len);
    }

    pub fn select_first(&mut self) {
        let len = self.rows().len();
        self.selected = if len == 0 { None } else { Some(0) };
    }

    pub fn select_last(&mut self) {
        let len = self.rows().len();
        self.selected = len.checked_sub(1);
    }

    fn reset_selection(&mut self) {
        self.select_first();
    }

    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        self.selected = match (self.selected, len) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
    }
}

fn category_rows<'a>(tree: &'a CategoryTree, search: &str) -> Vec<RowRef<'a>> {
    let search = search.trim();
    let matches = |category: &&Category| category.matches_search(search);

    let mut rows = Vec::new();
    for node in &tree.groups {
        let categories: Vec<&Category> = node.categories.iter().filter(matches).collect();
        if !search.is_empty() && categories.is_empty() {
            continue;
        }
        rows.push(RowRef::Group(&node.group));
        rows.extend(categories.into_iter().map(RowRef::Category));
    }

    let ungrouped: Vec<&Category> = tree.ungrouped.iter().filter(matches).collect();
    if !ungrouped.is_empty() {
        rows.push(RowRef::Ungrouped);
        rows.extend(ungrouped.into_iter().map(RowRef::Category));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::GroupNode;
    use crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::json;
    use test_case::test_case;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn clients() -> TabData {
        TabData::Clients(
            vec![
                json!({"id": "c1", "code": "C0001", "legal_name": "Acme Ltda", "active": true}),
                json!({"id": "c2", "code": "C0002", "legal_name": "Beta SA", "active": false}),
                json!({"id": "c3", "code": "C0003", "legal_name": "acme north", "active": true}),
            ]
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect(),
        )
    }

    fn category(id: &str, code: &str, name: &str, group: Option<&str>) -> Category {
        serde_json::from_value(json!({
            "id": id, "code": code, "name": name, "kind": "expense", "group_id": group, "active": true
        }))
        .unwrap()
    }

    fn tree() -> CategoryTree {
        let group: CategoryGroup =
            serde_json::from_value(json!({"id": "g1", "name": "Payroll"})).unwrap();
        let empty: CategoryGroup =
            serde_json::from_value(json!({"id": "g2", "name": "Travel"})).unwrap();
        CategoryTree {
            groups: vec![
                GroupNode {
                    group,
                    categories: vec![category("k1", "CAT001", "Salaries", Some("g1"))],
                },
                GroupNode {
                    group: empty,
                    categories: Vec::new(),
                },
            ],
            ungrouped: vec![category("k2", "CAT002", "Rent", None)],
        }
    }

    #[test_case("users", Some(Tab::Users) ; "users")]
    #[test_case("categories", Some(Tab::Categories) ; "categories")]
    #[test_case("chat", None ; "unknown")]
    fn test_tab_from_name(name: &str, expected: Option<Tab>) {
        assert_eq!(Tab::from_name(name), expected);
    }

    #[test]
    fn test_tab_cycle_wraps() {
        assert_eq!(Tab::Categories.next(), Tab::Users);
        assert_eq!(Tab::Users.previous(), Tab::Categories);
    }

    #[test]
    fn test_search_narrows_rows_and_resets_selection() {
        let mut view = TabView::new(Tab::Clients, StatusFilter::All);
        view.set_data(clients());
        view.select_last();
        assert_eq!(view.selected(), Some(2));

        view.start_search();
        for c in "acme".chars() {
            view.search_key(key(KeyCode::Char(c)));
        }

        assert_eq!(view.rows().len(), 2);
        assert_eq!(view.selected(), Some(0));
        assert_eq!(view.counts(), (2, 3));
    }

    #[test]
    fn test_status_applies_to_loaded_rows() {
        let mut view = TabView::new(Tab::Clients, StatusFilter::Active);
        view.set_data(clients());
        assert_eq!(view.rows().len(), 2);
    }

    #[test]
    fn test_stop_search_with_clear() {
        let mut view = TabView::new(Tab::Clients, StatusFilter::All);
        view.set_data(clients());
        view.start_search();
        view.search_key(key(KeyCode::Char('z')));
        assert!(view.rows().is_empty());
        assert_eq!(view.selected(), None);

        view.stop_search(true);
        assert!(!view.is_searching());
        assert_eq!(view.rows().len(), 3);
        assert_eq!(view.selected(), Some(0));
    }

    #[test]
    fn test_mismatched_data_is_ignored() {
        let mut view = TabView::new(Tab::People, StatusFilter::All);
        view.set_data(clients());
        assert!(!view.is_loaded());
        assert!(view.rows().is_empty());
    }

    #[test]
    fn test_category_rows_with_headings() {
        let mut view = TabView::new(Tab::Categories, StatusFilter::All);
        view.set_data(TabData::Categories(tree()));

        let labels: Vec<String> = view.rows().iter().map(RowRef::label).collect();
        assert_eq!(labels, ["Payroll", "CAT001 Salaries", "Travel", "Ungrouped", "CAT002 Rent"]);
        assert_eq!(view.counts(), (2, 2));
        assert_eq!(view.groups().len(), 2);
    }

    #[test]
    fn test_category_search_drops_empty_groups() {
        let mut view = TabView::new(Tab::Categories, StatusFilter::All);
        view.set_data(TabData::Categories(tree()));
        view.start_search();
        for c in "rent".chars() {
            view.search_key(key(KeyCode::Char(c)));
        }

        let labels: Vec<String> = view.rows().iter().map(RowRef::label).collect();
        assert_eq!(labels, ["Ungrouped", "CAT002 Rent"]);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut view = TabView::new(Tab::Clients, StatusFilter::All);
        view.set_data(clients());
        assert_eq!(view.selected(), Some(0));

        view.select_previous();
        assert_eq!(view.selected(), Some(2));
        view.select_next();
        assert_eq!(view.selected(), Some(0));
    }
}
