//! Main screen: one tab per record type plus the modals opened from it.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::Widget,
};
use tracing::{debug, warn};

use crate::application::services::ToastQueue;
use crate::domain::entities::{CategoryOption, CompanyOption, UserProfile};
use crate::domain::errors::OperationError;
use crate::domain::filter::StatusFilter;
use crate::domain::keybinding::{Action, Keybind};
use crate::presentation::commands::{CommandRegistry, HasCommands};
use crate::presentation::theme::Theme;
use crate::presentation::ui::forms::{FormContext, FormTarget};
use crate::presentation::ui::requests::{AppEvent, Request, Target};
use crate::presentation::ui::tabs::{Tab, TabView};
use crate::presentation::widgets::{
    ConfirmAction, ConfirmDialog, ConfirmDialogWidget, DataTable, FilterBar, FocusContext,
    FooterBar, FooterBarStyle, FormAction, FormModal, FormModalWidget, HeaderBar, HeaderBarStyle,
    HelpPopup, ImportAction, ImportPicker, ImportPickerWidget, LinkPicker, LinkPickerAction,
    LinkPickerWidget, StatusBar, TabBar, ToastPopup,
};

const TAB_TITLES: [&str; 6] = [
    Tab::Users.title(),
    Tab::Companies.title(),
    Tab::Clients.title(),
    Tab::People.title(),
    Tab::Services.title(),
    Tab::Categories.title(),
];

/// Behaviour taken from the `[ui]` config section.
#[derive(Debug, Clone, Copy)]
pub struct MainSettings {
    pub default_status: StatusFilter,
    pub confirm_delete: bool,
    pub toast_duration: Duration,
}

impl Default for MainSettings {
    fn default() -> Self {
        Self {
            default_status: StatusFilter::Active,
            confirm_delete: true,
            toast_duration: Duration::from_secs(4),
        }
    }
}

enum Overlay {
    None,
    /// Create form waiting for its sequential code.
    PendingCode(FormTarget),
    Form {
        target: FormTarget,
        modal: FormModal,
    },
    Confirm {
        dialog: ConfirmDialog,
        request: Request,
    },
    CompanyLinks {
        category_id: String,
        picker: LinkPicker<CompanyOption>,
    },
    CategoryLinks {
        company_id: String,
        picker: LinkPicker<CategoryOption>,
    },
    Import(ImportPicker),
    Help,
}

#[derive(Debug)]
pub enum MainAction {
    None,
    Quit,
    Logout,
    ToggleTheme,
    Dispatch(Vec<Request>),
}

pub struct MainScreen {
    email: String,
    profile: Option<UserProfile>,
    tabs: Vec<TabView>,
    current: Tab,
    companies: Vec<CompanyOption>,
    company_filter: Option<String>,
    overlay: Overlay,
    toasts: ToastQueue,
    registry: CommandRegistry,
    confirm_delete: bool,
}

impl MainScreen {
    /// `profile` is `None` when the signed-in account has no profile row.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        profile: Option<UserProfile>,
        registry: CommandRegistry,
        settings: MainSettings,
    ) -> Self {
        Self {
            email: email.into(),
            profile,
            tabs: Tab::ALL
                .iter()
                .map(|tab| TabView::new(*tab, settings.default_status))
                .collect(),
            current: Tab::Users,
            companies: Vec::new(),
            company_filter: None,
            overlay: Overlay::None,
            toasts: ToastQueue::new(settings.toast_duration),
            registry,
            confirm_delete: settings.confirm_delete,
        }
    }

    /// Reopens the tab and company filter of the previous run.
    #[must_use]
    pub fn restore(mut self, last_tab: Option<&str>, last_company: Option<String>) -> Self {
        if let Some(tab) = last_tab.and_then(Tab::from_name) {
            self.current = tab;
        }
        self.company_filter = last_company;
        self
    }

    /// Requests issued when the screen opens.
    pub fn start(&mut self) -> Vec<Request> {
        vec![Request::CompanyOptions, self.load(self.current)]
    }

    #[must_use]
    pub const fn current_tab(&self) -> Tab {
        self.current
    }

    #[must_use]
    pub fn company_filter(&self) -> Option<&str> {
        self.company_filter.as_deref()
    }

    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn tick(&mut self) {
        self.toasts.tick();
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.toasts.info(message);
    }

    /// Mouse wheel over the table; ignored while a modal is open.
    pub fn scroll(&mut self, up: bool) {
        if !matches!(self.overlay, Overlay::None) {
            return;
        }
        if up {
            self.view_mut().select_previous();
        } else {
            self.view_mut().select_next();
        }
    }

    #[must_use]
    pub fn focus_context(&self) -> FocusContext {
        match self.overlay {
            Overlay::None if self.view().is_searching() => FocusContext::Search,
            Overlay::None | Overlay::PendingCode(_) => FocusContext::Table,
            Overlay::Form { .. } => FocusContext::Form,
            Overlay::Confirm { .. } => FocusContext::Confirm,
            Overlay::CompanyLinks { .. } | Overlay::CategoryLinks { .. } | Overlay::Import(_) => {
                FocusContext::Picker
            }
            Overlay::Help => FocusContext::Help,
        }
    }

    fn view(&self) -> &TabView {
        &self.tabs[self.current.index()]
    }

    fn view_mut(&mut self) -> &mut TabView {
        &mut self.tabs[self.current.index()]
    }

    fn load(&mut self, tab: Tab) -> Request {
        let company = if tab.is_company_scoped() {
            self.company_filter.clone()
        } else {
            None
        };
        let view = &mut self.tabs[tab.index()];
        view.set_loading(true);
        Request::Load {
            tab,
            company,
            status: view.status(),
            kind: view.kind(),
        }
    }

    fn reload(&mut self) -> MainAction {
        MainAction::Dispatch(vec![self.load(self.current)])
    }

    fn company_label(&self) -> &str {
        self.company_filter.as_deref().map_or("All companies", |id| {
            self.companies
                .iter()
                .find(|c| c.id == id)
                .map_or(id, |c| c.legal_name.as_str())
        })
    }

    fn selected_target(&self) -> Option<Target> {
        self.view().selected_row().and_then(Target::from_row)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> MainAction {
        if !matches!(self.overlay, Overlay::None) {
            return self.overlay_key(key);
        }

        if self.view().is_searching() {
            match key.code {
                KeyCode::Enter => self.view_mut().stop_search(false),
                KeyCode::Esc => self.view_mut().stop_search(true),
                _ => {
                    self.view_mut().search_key(key);
                }
            }
            return MainAction::None;
        }

        if key.modifiers == KeyModifiers::NONE
            && let KeyCode::Char(c) = key.code
            && let Some(tab) = c
                .to_digit(10)
                .and_then(|n| n.checked_sub(1))
                .and_then(|n| usize::try_from(n).ok())
                .and_then(|n| Tab::ALL.get(n).copied())
        {
            return self.switch_tab(tab);
        }

        match self.registry.find_action(key) {
            Some(action) => self.perform(action),
            None => MainAction::None,
        }
    }

    fn perform(&mut self, action: Action) -> MainAction {
        debug!(action = ?action, tab = self.current.name(), "Main screen action");

        match action {
            Action::Quit => MainAction::Quit,
            Action::Logout => MainAction::Logout,
            Action::ToggleTheme => MainAction::ToggleTheme,
            Action::ToggleHelp => {
                self.overlay = Overlay::Help;
                MainAction::None
            }
            Action::EditProfile => match self.profile.clone() {
                Some(profile) => self.open_form(FormTarget::Profile(profile)),
                None => {
                    self.toasts.error("Your profile could not be loaded");
                    MainAction::None
                }
            },
            Action::NextTab => self.switch_tab(self.current.next()),
            Action::PreviousTab => self.switch_tab(self.current.previous()),
            Action::CycleCompany => self.cycle_company(),
            Action::NavigateUp => {
                self.view_mut().select_previous();
                MainAction::None
            }
            Action::NavigateDown => {
                self.view_mut().select_next();
                MainAction::None
            }
            Action::SelectFirst => {
                self.view_mut().select_first();
                MainAction::None
            }
            Action::SelectLast => {
                self.view_mut().select_last();
                MainAction::None
            }
            Action::Select | Action::Edit => self.edit_selected(),
            Action::Cancel => {
                self.view_mut().stop_search(true);
                MainAction::None
            }
            Action::New => self.open_form(self.new_target()),
            Action::NewGroup if self.current == Tab::Categories => {
                self.open_form(FormTarget::Group(None))
            }
            Action::ToggleActive => match self.selected_target() {
                Some(target) if target.has_status() => {
                    MainAction::Dispatch(vec![Request::ToggleActive(target)])
                }
                Some(_) => {
                    self.toasts.info("Groups have no active flag");
                    MainAction::None
                }
                None => MainAction::None,
            },
            Action::Delete => self.delete_selected(),
            Action::LinkCompanies => match self.selected_target() {
                Some(Target::Category(category)) => {
                    MainAction::Dispatch(vec![Request::CompanyLinks {
                        label: format!("{} {}", category.code, category.name),
                        category_id: category.id,
                    }])
                }
                _ => MainAction::None,
            },
            Action::BulkLink => self.bulk_link(),
            Action::ImportUsers if self.current == Tab::Users => {
                MainAction::Dispatch(vec![Request::Importable])
            }
            Action::Search => {
                self.view_mut().start_search();
                MainAction::None
            }
            Action::CycleStatus => {
                self.view_mut().cycle_status();
                self.reload()
            }
            Action::CycleKind if self.current == Tab::Categories => {
                self.view_mut().cycle_kind();
                self.reload()
            }
            Action::Refresh => {
                MainAction::Dispatch(vec![Request::CompanyOptions, self.load(self.current)])
            }
            Action::NewGroup | Action::ImportUsers | Action::CycleKind => MainAction::None,
        }
    }

    fn switch_tab(&mut self, tab: Tab) -> MainAction {
        self.current = tab;
        if self.view().is_loaded() || self.view().is_loading() {
            MainAction::None
        } else {
            self.reload()
        }
    }

    /// All companies, then each company in name order, then all again.
    fn cycle_company(&mut self) -> MainAction {
        if self.companies.is_empty() {
            self.toasts.info("No companies to filter by");
            return MainAction::None;
        }

        let next = match self.company_filter.as_deref() {
            None => self.companies.first(),
            Some(id) => self
                .companies
                .iter()
                .position(|c| c.id == id)
                .and_then(|i| self.companies.get(i + 1)),
        };
        self.company_filter = next.map(|c| c.id.clone());
        self.company_changed()
    }

    fn company_changed(&mut self) -> MainAction {
        for tab in Tab::ALL.into_iter().filter(|t| t.is_company_scoped()) {
            self.tabs[tab.index()].mark_stale();
        }
        if self.current.is_company_scoped() {
            self.reload()
        } else {
            MainAction::None
        }
    }

    fn new_target(&self) -> FormTarget {
        match self.current {
            Tab::Users => FormTarget::User(None),
            Tab::Companies => FormTarget::Company(None),
            Tab::Clients => FormTarget::Client(None),
            Tab::People => FormTarget::Person(None),
            Tab::Services => FormTarget::Service(None),
            Tab::Categories => FormTarget::Category(None),
        }
    }

    fn edit_selected(&mut self) -> MainAction {
        let Some(target) = self.selected_target() else {
            return MainAction::None;
        };
        let form = match target {
            Target::User(user) => FormTarget::User(Some(user)),
            Target::Company(company) => FormTarget::Company(Some(company)),
            Target::Client(client) => FormTarget::Client(Some(client)),
            Target::Person(person) => FormTarget::Person(Some(person)),
            Target::Service(service) => FormTarget::Service(Some(service)),
            Target::Category(category) => FormTarget::Category(Some(category)),
            Target::Group(group) => FormTarget::Group(Some(group)),
        };
        self.open_form(form)
    }

    fn delete_selected(&mut self) -> MainAction {
        let Some(target) = self.selected_target() else {
            return MainAction::None;
        };
        if self.confirm_delete {
            self.overlay = Overlay::Confirm {
                dialog: ConfirmDialog::delete(&target.label()),
                request: Request::Delete(target),
            };
            MainAction::None
        } else {
            MainAction::Dispatch(vec![Request::Delete(target)])
        }
    }

    fn bulk_link(&mut self) -> MainAction {
        match self.current {
            Tab::Companies => match self.selected_target() {
                Some(Target::Company(company)) => {
                    MainAction::Dispatch(vec![Request::CategoryLinks {
                        company_id: company.id,
                        label: company.legal_name,
                    }])
                }
                _ => MainAction::None,
            },
            Tab::Categories => match self.company_filter.clone() {
                Some(company_id) => MainAction::Dispatch(vec![Request::CategoryLinks {
                    label: self.company_label().to_string(),
                    company_id,
                }]),
                None => {
                    self.toasts
                        .error("Select a company in the global filter first");
                    MainAction::None
                }
            },
            _ => MainAction::None,
        }
    }

    fn open_form(&mut self, target: FormTarget) -> MainAction {
        if let Some(code) = target.needs_code() {
            self.overlay = Overlay::PendingCode(target);
            return MainAction::Dispatch(vec![Request::NextCode(code)]);
        }
        self.show_form(target, None);
        MainAction::None
    }

    fn show_form(&mut self, target: FormTarget, code: Option<&str>) {
        let groups = self.tabs[Tab::Categories.index()].groups();
        let ctx = FormContext {
            companies: &self.companies,
            groups: &groups,
            company_filter: self.company_filter.as_deref(),
        };
        let modal = target.build(ctx, code);
        self.overlay = Overlay::Form { target, modal };
    }

    fn overlay_key(&mut self, key: KeyEvent) -> MainAction {
        let company = self.company_filter.clone();

        match &mut self.overlay {
            Overlay::None => MainAction::None,
            Overlay::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Enter | KeyCode::F(1) | KeyCode::Char('?' | 'q')
                ) {
                    self.overlay = Overlay::None;
                }
                MainAction::None
            }
            Overlay::PendingCode(_) => {
                if key.code == KeyCode::Esc {
                    self.overlay = Overlay::None;
                }
                MainAction::None
            }
            Overlay::Form { target, modal } => match modal.handle_key(key) {
                FormAction::None => MainAction::None,
                FormAction::Cancel => {
                    self.overlay = Overlay::None;
                    MainAction::None
                }
                FormAction::Changed(field) => {
                    target.on_change(modal, field);
                    MainAction::None
                }
                FormAction::Submit => {
                    let request = target.request(modal, company.as_deref());
                    modal.set_banner(None);
                    modal.set_saving(true);
                    MainAction::Dispatch(vec![request])
                }
            },
            Overlay::Confirm { dialog, request } => match dialog.handle_key(key) {
                ConfirmAction::None => MainAction::None,
                ConfirmAction::Cancel => {
                    self.overlay = Overlay::None;
                    MainAction::None
                }
                ConfirmAction::Confirm => {
                    let request = request.clone();
                    self.overlay = Overlay::None;
                    MainAction::Dispatch(vec![request])
                }
            },
            Overlay::CompanyLinks {
                category_id,
                picker,
            } => match picker.handle_key(key) {
                LinkPickerAction::None => MainAction::None,
                LinkPickerAction::Cancel => {
                    self.overlay = Overlay::None;
                    MainAction::None
                }
                LinkPickerAction::Save => {
                    picker.set_saving(true);
                    MainAction::Dispatch(vec![Request::SaveCategoryLinks {
                        category_id: category_id.clone(),
                        company_ids: picker.linked_ids(),
                    }])
                }
            },
            Overlay::CategoryLinks { company_id, picker } => match picker.handle_key(key) {
                LinkPickerAction::None => MainAction::None,
                LinkPickerAction::Cancel => {
                    self.overlay = Overlay::None;
                    MainAction::None
                }
                LinkPickerAction::Save => {
                    picker.set_saving(true);
                    MainAction::Dispatch(vec![Request::SaveCompanyLinks {
                        company_id: company_id.clone(),
                        category_ids: picker.linked_ids(),
                    }])
                }
            },
            Overlay::Import(picker) => match picker.handle_key(key) {
                ImportAction::None => MainAction::None,
                ImportAction::Cancel => {
                    self.overlay = Overlay::None;
                    MainAction::None
                }
                ImportAction::Import if picker.checked_count() == 0 => {
                    picker.set_banner(Some("Select at least one user".to_string()));
                    MainAction::None
                }
                ImportAction::Import => {
                    picker.set_saving(true);
                    MainAction::Dispatch(vec![Request::Import {
                        users: picker.selected_users(),
                        company,
                    }])
                }
            },
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> MainAction {
        match event {
            AppEvent::Loaded { tab, result } => match result {
                Ok(data) => {
                    self.tabs[tab.index()].set_data(data);
                    MainAction::None
                }
                Err(e) => {
                    self.tabs[tab.index()].set_loading(false);
                    self.fail(&e)
                }
            },
            AppEvent::CompanyOptions(Ok(companies)) => {
                self.companies = companies;
                let missing = self
                    .company_filter
                    .as_deref()
                    .is_some_and(|id| !self.companies.iter().any(|c| c.id == id));
                if missing {
                    warn!("Saved company filter no longer exists, showing all companies");
                    self.company_filter = None;
                    return self.company_changed();
                }
                MainAction::None
            }
            AppEvent::CompanyOptions(Err(e)) | AppEvent::Importable(Err(e)) => self.fail(&e),
            AppEvent::NextCode { result, .. } => {
                if !matches!(self.overlay, Overlay::PendingCode(_)) {
                    debug!("Code arrived after the form was cancelled");
                    return MainAction::None;
                }
                let Overlay::PendingCode(target) =
                    std::mem::replace(&mut self.overlay, Overlay::None)
                else {
                    return MainAction::None;
                };
                match result {
                    Ok(code) => {
                        self.show_form(target, Some(&code));
                        MainAction::None
                    }
                    Err(e) => self.fail(&e),
                }
            }
            AppEvent::CompanyLinks {
                category_id,
                label,
                result,
            } => match result {
                Ok(split) => {
                    self.overlay = Overlay::CompanyLinks {
                        category_id,
                        picker: LinkPicker::new(format!("Companies for {label}"), split),
                    };
                    MainAction::None
                }
                Err(e) => self.fail(&e),
            },
            AppEvent::CategoryLinks {
                company_id,
                label,
                result,
            } => match result {
                Ok(split) => {
                    self.overlay = Overlay::CategoryLinks {
                        company_id,
                        picker: LinkPicker::new(format!("Categories for {label}"), split),
                    };
                    MainAction::None
                }
                Err(e) => self.fail(&e),
            },
            AppEvent::Importable(Ok(users)) => {
                if users.is_empty() {
                    self.toasts.info("Every auth user already has a profile");
                } else {
                    self.overlay = Overlay::Import(ImportPicker::new(users));
                }
                MainAction::None
            }
            AppEvent::Saved(Ok(message)) => {
                self.overlay = Overlay::None;
                if !message.is_empty() {
                    self.toasts.success(message);
                }
                self.after_mutation()
            }
            AppEvent::ProfileSaved(Ok(profile)) => {
                self.profile = Some(profile);
                self.overlay = Overlay::None;
                self.toasts.success("Profile updated");
                if self.current == Tab::Users {
                    self.reload()
                } else {
                    self.tabs[Tab::Users.index()].mark_stale();
                    MainAction::None
                }
            }
            AppEvent::Saved(Err(e)) | AppEvent::ProfileSaved(Err(e)) => self.save_failed(&e),
            AppEvent::LoginFinished(_) | AppEvent::SessionResolved(_) | AppEvent::SignedOut => {
                MainAction::None
            }
        }
    }

    fn after_mutation(&mut self) -> MainAction {
        for tab in Tab::ALL {
            if tab != self.current {
                self.tabs[tab.index()].mark_stale();
            }
        }
        let mut requests = vec![self.load(self.current)];
        if self.current == Tab::Companies {
            requests.push(Request::CompanyOptions);
        }
        MainAction::Dispatch(requests)
    }

    /// Open modals show the error in their banner and stay editable.
    fn save_failed(&mut self, error: &OperationError) -> MainAction {
        if error.requires_sign_in() {
            return MainAction::Logout;
        }

        let banner = Some(error.banner());
        match &mut self.overlay {
            Overlay::Form { modal, .. } => {
                modal.set_saving(false);
                modal.set_banner(banner);
            }
            Overlay::CompanyLinks { picker, .. } => {
                picker.set_saving(false);
                picker.set_banner(banner);
            }
            Overlay::CategoryLinks { picker, .. } => {
                picker.set_saving(false);
                picker.set_banner(banner);
            }
            Overlay::Import(picker) => {
                picker.set_saving(false);
                picker.set_banner(banner);
            }
            Overlay::None | Overlay::PendingCode(_) | Overlay::Confirm { .. } | Overlay::Help => {
                self.toasts.failure(error);
            }
        }
        MainAction::None
    }

    fn fail(&mut self, error: &OperationError) -> MainAction {
        if error.requires_sign_in() {
            return MainAction::Logout;
        }
        self.toasts.failure(error);
        MainAction::None
    }

    fn render_with(&self, theme: &Theme, area: Rect, buf: &mut Buffer) {
        let [header, tabs, filter, body, status, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let user_name = self
            .profile
            .as_ref()
            .map_or(self.email.as_str(), UserProfile::display_name);
        HeaderBar::new(crate::NAME, crate::VERSION)
            .user(user_name, self.profile.as_ref().map(|p| p.role))
            .company(self.company_label())
            .style(HeaderBarStyle::from_theme(theme))
            .render(header, buf);

        TabBar::new(&TAB_TITLES, self.current.index(), theme).render(tabs, buf);

        let view = self.view();
        FilterBar::new(view.search(), view.status(), theme)
            .editing(view.is_searching())
            .kind((self.current == Tab::Categories).then(|| view.kind()))
            .render(filter, buf);

        let rows = view.table_rows();
        let empty = if view.is_loading() {
            "Loading…"
        } else {
            "No records."
        };
        DataTable::new(self.current.columns(), &rows, theme)
            .title(self.current.title())
            .selected(view.selected())
            .empty_message(empty)
            .focused(matches!(self.overlay, Overlay::None))
            .render(body, buf);

        let (shown, total) = view.counts();
        (&StatusBar::for_list(self.current.title(), shown, total, view.is_loading()))
            .render(status, buf);

        let keybinds = self.get_commands(&self.registry);
        FooterBar::new(&keybinds)
            .focus_context(self.focus_context())
            .style(FooterBarStyle::from_theme(theme))
            .render(footer, buf);

        match &self.overlay {
            Overlay::None | Overlay::PendingCode(_) => {}
            Overlay::Help => HelpPopup::new(&self.registry, theme).render(area, buf),
            Overlay::Form { modal, .. } => FormModalWidget::new(modal, theme).render(area, buf),
            Overlay::Confirm { dialog, .. } => {
                ConfirmDialogWidget::new(dialog, theme).render(area, buf);
            }
            Overlay::CompanyLinks { picker, .. } => {
                LinkPickerWidget::new(picker, theme).render(area, buf);
            }
            Overlay::CategoryLinks { picker, .. } => {
                LinkPickerWidget::new(picker, theme).render(area, buf);
            }
            Overlay::Import(picker) => ImportPickerWidget::new(picker, theme).render(area, buf),
        }

        if let Some(toast) = self.toasts.current() {
            ToastPopup::new(toast, theme).render(area, buf);
        }
    }
}

impl HasCommands for MainScreen {
    fn get_commands(&self, registry: &CommandRegistry) -> Vec<Keybind> {
        let actions: &[(Action, &'static str)] = match self.focus_context() {
            FocusContext::Search => {
                return vec![
                    Keybind::new(KeyEvent::from(KeyCode::Enter), Action::Select, "Keep")
                        .display("Enter"),
                    Keybind::new(KeyEvent::from(KeyCode::Esc), Action::Cancel, "Clear")
                        .display("Esc"),
                ];
            }
            FocusContext::Form | FocusContext::Picker | FocusContext::Confirm | FocusContext::Help => {
                return vec![
                    Keybind::new(KeyEvent::from(KeyCode::Esc), Action::Cancel, "Close")
                        .display("Esc"),
                ];
            }
            FocusContext::Table => match self.current {
                Tab::Users => &[
                    (Action::New, "New"),
                    (Action::Edit, "Edit"),
                    (Action::ToggleActive, "Toggle"),
                    (Action::Delete, "Delete"),
                    (Action::ImportUsers, "Import"),
                    (Action::Search, "Search"),
                    (Action::CycleCompany, "Company"),
                    (Action::ToggleHelp, "Help"),
                ],
                Tab::Companies => &[
                    (Action::New, "New"),
                    (Action::Edit, "Edit"),
                    (Action::ToggleActive, "Toggle"),
                    (Action::Delete, "Delete"),
                    (Action::BulkLink, "Categories"),
                    (Action::Search, "Search"),
                    (Action::ToggleHelp, "Help"),
                ],
                Tab::Categories => &[
                    (Action::New, "New"),
                    (Action::NewGroup, "Group"),
                    (Action::Edit, "Edit"),
                    (Action::ToggleActive, "Toggle"),
                    (Action::Delete, "Delete"),
                    (Action::LinkCompanies, "Link"),
                    (Action::BulkLink, "Bulk"),
                    (Action::CycleKind, "Kind"),
                    (Action::ToggleHelp, "Help"),
                ],
                Tab::Clients | Tab::People | Tab::Services => &[
                    (Action::New, "New"),
                    (Action::Edit, "Edit"),
                    (Action::ToggleActive, "Toggle"),
                    (Action::Delete, "Delete"),
                    (Action::Search, "Search"),
                    (Action::CycleStatus, "Status"),
                    (Action::CycleCompany, "Company"),
                    (Action::ToggleHelp, "Help"),
                ],
            },
        };

        actions
            .iter()
            .filter_map(|(action, label)| registry.keybind(*action, *label))
            .collect()
    }
}

pub struct MainScreenWidget<'a> {
    screen: &'a MainScreen,
    theme: &'a Theme,
}

impl<'a> MainScreenWidget<'a> {
    #[must_use]
    pub fn new(screen: &'a MainScreen, theme: &'a Theme) -> Self {
        Self { screen, theme }
    }
}

impl Widget for MainScreenWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.screen.render_with(self.theme, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Category, Client, Company};
    use crate::domain::errors::ValidationError;
    use crate::presentation::ui::requests::CodeTarget;
    use crate::presentation::ui::tabs::TabData;
    use crate::application::use_cases::CategoryTree;
    use serde_json::json;
    use test_case::test_case;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> MainScreen {
        MainScreen::new(
            "ana@example.com",
            None,
            CommandRegistry::new(),
            MainSettings::default(),
        )
    }

    fn clients() -> TabData {
        let clients: Vec<Client> = serde_json::from_value(json!([
            {"id": "c1", "code": "C0001", "legal_name": "Joao", "active": true},
            {"id": "c2", "code": "C0002", "legal_name": "Maria", "active": true},
        ]))
        .unwrap();
        TabData::Clients(clients)
    }

    fn companies() -> Vec<CompanyOption> {
        serde_json::from_value(json!([
            {"id": "co1", "legal_name": "Acme"},
            {"id": "co2", "legal_name": "Beta"},
        ]))
        .unwrap()
    }

    fn on_clients() -> MainScreen {
        let mut screen = screen().restore(Some("clients"), None);
        screen.start();
        screen.handle_event(AppEvent::Loaded {
            tab: Tab::Clients,
            result: Ok(clients()),
        });
        screen
    }

    fn requests(action: MainAction) -> Vec<Request> {
        match action {
            MainAction::Dispatch(requests) => requests,
            other => panic!("expected requests, got {other:?}"),
        }
    }

    #[test_case(KeyCode::Char('q'), KeyModifiers::NONE ; "quit")]
    #[test_case(KeyCode::Char('c'), KeyModifiers::CONTROL ; "ctrl_c")]
    fn test_quit_keys(code: KeyCode, modifiers: KeyModifiers) {
        let mut screen = screen();
        assert!(matches!(
            screen.handle_key(KeyEvent::new(code, modifiers)),
            MainAction::Quit
        ));
    }

    #[test]
    fn test_logout_and_theme_keys() {
        let mut screen = screen();
        assert!(matches!(
            screen.handle_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            MainAction::Logout
        ));
        assert!(matches!(
            screen.handle_key(key(KeyCode::F(2))),
            MainAction::ToggleTheme
        ));
    }

    #[test]
    fn test_start_loads_options_and_restored_tab() {
        let mut screen = screen().restore(Some("services"), Some("co1".to_string()));
        let requests = screen.start();

        assert!(matches!(requests[0], Request::CompanyOptions));
        assert!(matches!(
            &requests[1],
            Request::Load { tab: Tab::Services, company: Some(id), .. } if id == "co1"
        ));
    }

    #[test]
    fn test_tab_is_fetched_once() {
        let mut screen = on_clients();

        let first = requests(screen.handle_key(key(KeyCode::Char('4'))));
        assert!(matches!(first[0], Request::Load { tab: Tab::People, .. }));

        screen.handle_key(key(KeyCode::Char('3')));
        assert!(matches!(
            screen.handle_key(key(KeyCode::Char('4'))),
            MainAction::None
        ));
    }

    #[test]
    fn test_company_cycle_reloads_scoped_tab() {
        let mut screen = on_clients();
        screen.handle_event(AppEvent::CompanyOptions(Ok(companies())));

        let reload = requests(screen.handle_key(key(KeyCode::Char('c'))));
        assert_eq!(screen.company_filter(), Some("co1"));
        assert!(matches!(
            &reload[0],
            Request::Load { tab: Tab::Clients, company: Some(id), .. } if id == "co1"
        ));

        screen.handle_key(key(KeyCode::Char('c')));
        screen.handle_key(key(KeyCode::Char('c')));
        assert_eq!(screen.company_filter(), None);
    }

    #[test]
    fn test_unknown_saved_company_is_dropped() {
        let mut screen = screen().restore(Some("clients"), Some("gone".to_string()));
        screen.start();

        let reload = requests(screen.handle_event(AppEvent::CompanyOptions(Ok(companies()))));
        assert_eq!(screen.company_filter(), None);
        assert!(matches!(
            reload[0],
            Request::Load { tab: Tab::Clients, company: None, .. }
        ));
    }

    #[test]
    fn test_new_client_waits_for_code() {
        let mut screen = on_clients();

        let pending = requests(screen.handle_key(key(KeyCode::Char('n'))));
        assert!(matches!(pending[0], Request::NextCode(CodeTarget::Client)));
        assert_eq!(screen.focus_context(), FocusContext::Table);

        screen.handle_event(AppEvent::NextCode {
            target: CodeTarget::Client,
            result: Ok("C0003".to_string()),
        });
        let Overlay::Form { modal, .. } = &screen.overlay else {
            panic!("form not open");
        };
        assert_eq!(modal.text("code"), "C0003");
    }

    #[test]
    fn test_edit_then_cancel() {
        let mut screen = on_clients();
        screen.handle_key(key(KeyCode::Char('e')));
        assert_eq!(screen.focus_context(), FocusContext::Form);

        screen.handle_key(key(KeyCode::Esc));
        assert_eq!(screen.focus_context(), FocusContext::Table);
    }

    #[test]
    fn test_failed_save_keeps_form_with_banner() {
        let mut screen = on_clients();
        screen.handle_key(key(KeyCode::Enter));
        let submitted = requests(screen.handle_key(key(KeyCode::Enter)));
        assert!(matches!(submitted[0], Request::SaveClient { existing: Some(_), .. }));

        screen.handle_event(AppEvent::Saved(Err(
            ValidationError::Required { field: "tax id" }.into(),
        )));

        let Overlay::Form { modal, .. } = &screen.overlay else {
            panic!("form closed on failure");
        };
        assert!(!modal.is_saving());
        assert!(modal.banner().is_some());
    }

    #[test]
    fn test_successful_save_closes_and_reloads() {
        let mut screen = on_clients();
        screen.handle_key(key(KeyCode::Char('e')));

        let reload = requests(screen.handle_event(AppEvent::Saved(Ok("Client C0001 updated".to_string()))));

        assert_eq!(screen.focus_context(), FocusContext::Table);
        assert!(matches!(reload[0], Request::Load { tab: Tab::Clients, .. }));
        assert_eq!(
            screen.toasts.current().map(|t| t.message.as_str()),
            Some("Client C0001 updated")
        );
    }

    #[test]
    fn test_delete_asks_for_confirmation() {
        let mut screen = on_clients();
        screen.handle_key(key(KeyCode::Down));

        assert!(matches!(screen.handle_key(key(KeyCode::Char('d'))), MainAction::None));
        assert_eq!(screen.focus_context(), FocusContext::Confirm);

        let confirmed = requests(screen.handle_key(key(KeyCode::Char('y'))));
        assert!(matches!(
            &confirmed[0],
            Request::Delete(Target::Client(client)) if client.code == "C0002"
        ));
    }

    #[test]
    fn test_delete_without_confirmation() {
        let mut screen = MainScreen::new(
            "ana@example.com",
            None,
            CommandRegistry::new(),
            MainSettings {
                confirm_delete: false,
                ..MainSettings::default()
            },
        )
        .restore(Some("clients"), None);
        screen.handle_event(AppEvent::Loaded {
            tab: Tab::Clients,
            result: Ok(clients()),
        });

        let deleted = requests(screen.handle_key(key(KeyCode::Char('d'))));
        assert!(matches!(deleted[0], Request::Delete(Target::Client(_))));
    }

    #[test]
    fn test_bulk_link_on_categories_needs_company() {
        let mut screen = screen().restore(Some("categories"), None);
        let category: Category =
            serde_json::from_value(json!({"id": "k1", "code": "CAT001", "name": "Rent", "kind": "expense", "active": true}))
                .unwrap();
        screen.handle_event(AppEvent::Loaded {
            tab: Tab::Categories,
            result: Ok(TabData::Categories(CategoryTree {
                groups: Vec::new(),
                ungrouped: vec![category],
            })),
        });

        assert!(matches!(screen.handle_key(key(KeyCode::Char('b'))), MainAction::None));
        assert!(screen.toasts.current().is_some());

        screen.handle_key(key(KeyCode::Down));
        let links = requests(screen.handle_key(key(KeyCode::Char('l'))));
        assert!(matches!(
            &links[0],
            Request::CompanyLinks { category_id, .. } if category_id == "k1"
        ));
    }

    #[test]
    fn test_bulk_link_from_companies_uses_selected_row() {
        let mut screen = screen().restore(Some("companies"), None);
        let companies: Vec<Company> =
            serde_json::from_value(json!([{"id": "co1", "legal_name": "Acme", "active": true}]))
                .unwrap();
        screen.handle_event(AppEvent::Loaded {
            tab: Tab::Companies,
            result: Ok(TabData::Companies(companies)),
        });

        let links = requests(screen.handle_key(key(KeyCode::Char('b'))));
        assert!(matches!(
            &links[0],
            Request::CategoryLinks { company_id, label } if company_id == "co1" && label == "Acme"
        ));
    }

    #[test]
    fn test_search_mode_captures_letters() {
        let mut screen = on_clients();
        screen.handle_key(key(KeyCode::Char('/')));
        assert_eq!(screen.focus_context(), FocusContext::Search);

        assert!(matches!(screen.handle_key(key(KeyCode::Char('q'))), MainAction::None));
        assert_eq!(screen.view().counts(), (0, 2));

        screen.handle_key(key(KeyCode::Esc));
        assert_eq!(screen.focus_context(), FocusContext::Table);
        assert_eq!(screen.view().counts(), (2, 2));
    }

    #[test]
    fn test_profile_missing_shows_error() {
        let mut screen = screen();
        assert!(matches!(screen.handle_key(key(KeyCode::Char('p'))), MainAction::None));
        assert!(screen.toasts.current().is_some());
    }
}
