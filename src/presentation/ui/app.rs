//! Main application orchestrator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, MouseEventKind};
use futures_util::StreamExt;
use ratatui::widgets::Block;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::application::dto::{LoginRequest, LoginResponse};
use crate::application::services::{SessionEvent, SessionHub};
use crate::application::use_cases::{
    LoginUseCase, RecordStore, ResolveSessionUseCase, ResolvedSession,
};
use crate::domain::entities::UserProfile;
use crate::domain::errors::AuthError;
use crate::domain::keybinding::Action;
use crate::domain::ports::{AuthPort, DataPort, SessionStoragePort};
use crate::infrastructure::{AppConfig, StateConfig, StorageManager};
use crate::presentation::commands::CommandRegistry;
use crate::presentation::events::EventHandler;
use crate::presentation::theme::Theme;
use crate::presentation::ui::login_screen::{LoginAction, LoginScreen, LoginScreenWidget};
use crate::presentation::ui::main_screen::{
    MainAction, MainScreen, MainScreenWidget, MainSettings,
};
use crate::presentation::ui::requests::{AppEvent, Dispatcher, Request};

const TICK_RATE: Duration = Duration::from_millis(250);
const SESSION_ENDED: &str = "Your session ended. Sign in again.";

enum CurrentScreen {
    Login(LoginScreen),
    Main(Box<MainScreen>),
}

pub struct App {
    running: bool,
    screen: CurrentScreen,
    theme: Theme,
    hub: Arc<SessionHub>,
    login_use_case: LoginUseCase,
    resolve_session_use_case: Arc<ResolveSessionUseCase>,
    dispatcher: Dispatcher,
    storage: StorageManager,
    state: StateConfig,
    keybindings: HashMap<String, Action>,
    settings: MainSettings,
    remember_requested: bool,
    action_tx: mpsc::UnboundedSender<AppEvent>,
    action_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    #[must_use]
    pub fn new(
        config: &AppConfig,
        storage: StorageManager,
        auth_port: Arc<dyn AuthPort>,
        data_port: Arc<dyn DataPort>,
        storage_port: Arc<dyn SessionStoragePort>,
    ) -> Self {
        let hub = Arc::new(SessionHub::new(auth_port.clone(), storage_port.clone()));
        let store = RecordStore::new(data_port, hub.clone());
        let login_use_case = LoginUseCase::new(
            auth_port.clone(),
            storage_port.clone(),
            hub.clone(),
            store.clone(),
        );
        let resolve_session_use_case = Arc::new(ResolveSessionUseCase::new(
            auth_port.clone(),
            storage_port,
            hub.clone(),
            store.clone(),
        ));
        let dispatcher = Dispatcher::new(
            store,
            auth_port,
            hub.clone(),
            config.temporary_password.clone(),
        );

        let state = storage.load_state().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load UI state, starting fresh");
            StateConfig::default()
        });
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            screen: CurrentScreen::Login(LoginScreen::new()),
            theme: Theme::new(&config.theme.accent_color, config.theme.mode),
            hub,
            login_use_case,
            resolve_session_use_case,
            dispatcher,
            storage,
            state,
            keybindings: config.keybindings.clone(),
            settings: MainSettings {
                default_status: config.ui.default_status,
                confirm_delete: config.ui.confirm_delete,
                toast_duration: Duration::from_secs(config.ui.notification_duration),
            },
            remember_requested: false,
            action_tx,
            action_rx,
        }
    }

    /// Restores a remembered session, then runs until the user quits.
    ///
    /// # Errors
    /// Returns error if the terminal cannot be drawn.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        self.resolve_session();
        self.run_event_loop(terminal).await?;

        self.save_state();
        info!("Application exiting normally");
        Ok(())
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut session_events = self.hub.subscribe();
        let mut tick = interval(TICK_RATE);

        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            tokio::select! {
                Some(event) = self.action_rx.recv() => {
                    self.handle_app_event(event);
                }

                Ok(event) = session_events.recv() => {
                    self.handle_session_event(event);
                }

                _ = tick.tick() => {
                    if let CurrentScreen::Main(main) = &mut self.screen {
                        main.tick();
                    }
                }

                Some(Ok(event)) = terminal_events.next() => {
                    self.handle_terminal_event(&event);
                }
            }

            terminal.draw(|frame| self.render(frame))?;
        }

        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(self.theme.base_style), area);

        match &self.screen {
            CurrentScreen::Login(login) => {
                frame.render_widget(LoginScreenWidget::new(login, &self.theme), area);
            }
            CurrentScreen::Main(main) => {
                frame.render_widget(MainScreenWidget::new(main, &self.theme), area);
            }
        }
    }

    fn handle_terminal_event(&mut self, event: &Event) {
        if let Event::Mouse(mouse) = event
            && let CurrentScreen::Main(main) = &mut self.screen
        {
            match mouse.kind {
                MouseEventKind::ScrollUp => main.scroll(true),
                MouseEventKind::ScrollDown => main.scroll(false),
                _ => {}
            }
            return;
        }

        let Some(key) = EventHandler::key_press(event) else {
            return;
        };
        if EventHandler::is_force_quit_event(&key) {
            self.running = false;
            return;
        }

        match &mut self.screen {
            CurrentScreen::Login(login) => match login.handle_key(key) {
                LoginAction::None => {}
                LoginAction::Quit => self.running = false,
                LoginAction::Submit => {
                    let request = login.request();
                    login.set_validating();
                    self.remember_requested = request.remember;
                    self.spawn_login(request);
                }
            },
            CurrentScreen::Main(main) => {
                let action = main.handle_key(key);
                self.apply(action);
            }
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoginFinished(result) => self.login_finished(result),
            AppEvent::SessionResolved(result) => self.session_resolved(result),
            AppEvent::SignedOut => debug!("Remote sign-out finished"),
            other => {
                if let CurrentScreen::Main(main) = &mut self.screen {
                    let action = main.handle_event(other);
                    self.apply(action);
                } else {
                    debug!("Dropping platform result that arrived after sign-out");
                }
            }
        }
    }

    fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::SignedOut => {
                if matches!(self.screen, CurrentScreen::Main(_)) {
                    info!("Session ended while signed in");
                    self.show_login(Some(SESSION_ENDED));
                }
            }
            SessionEvent::SignedIn(session) | SessionEvent::Refreshed(session) => {
                debug!(user_id = %session.user_id(), "Session updated");
            }
        }
    }

    fn apply(&mut self, action: MainAction) {
        match action {
            MainAction::None => {}
            MainAction::Quit => self.running = false,
            MainAction::ToggleTheme => self.theme = self.theme.toggled(),
            MainAction::Logout => self.logout(),
            MainAction::Dispatch(requests) => {
                for request in requests {
                    self.dispatch(request);
                }
            }
        }
    }

    fn dispatch(&self, request: Request) {
        let dispatcher = self.dispatcher.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let event = dispatcher.perform(request).await;
            if tx.send(event).is_err() {
                debug!("App closed before the request finished");
            }
        });
    }

    fn resolve_session(&mut self) {
        if let CurrentScreen::Login(login) = &mut self.screen {
            login.set_validating();
        }

        let use_case = self.resolve_session_use_case.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = use_case.execute().await;
            let _ = tx.send(AppEvent::SessionResolved(result));
        });
    }

    fn spawn_login(&self, request: LoginRequest) {
        let use_case = self.login_use_case.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = use_case.execute(request).await;
            let _ = tx.send(AppEvent::LoginFinished(result));
        });
    }

    fn login_finished(&mut self, result: Result<LoginResponse, AuthError>) {
        match result {
            Ok(response) => {
                let remembered_but_lost = self.remember_requested && !response.session_persisted;
                self.show_main(response.session.email(), response.profile);
                if remembered_but_lost
                    && let CurrentScreen::Main(main) = &mut self.screen
                {
                    main.notify("Could not save the session; you will have to sign in next time");
                }
            }
            Err(e) => {
                if let CurrentScreen::Login(login) = &mut self.screen {
                    login.set_error(e.to_string());
                }
            }
        }
    }

    fn session_resolved(&mut self, result: Result<Option<ResolvedSession>, AuthError>) {
        let CurrentScreen::Login(login) = &mut self.screen else {
            return;
        };
        match result {
            Ok(Some(resolved)) => {
                info!("Restored previous session");
                self.show_main(resolved.session.email(), resolved.profile);
            }
            Ok(None) => login.reset(),
            Err(e) => {
                warn!(error = %e, "Could not restore previous session");
                login.reset();
                login.set_error(e.to_string());
            }
        }
    }

    fn show_main(&mut self, email: &str, profile: Option<UserProfile>) {
        let registry = CommandRegistry::with_overrides(&self.keybindings);
        let mut main = MainScreen::new(email, profile, registry, self.settings).restore(
            self.state.last_tab.as_deref(),
            self.state.last_company_id.clone(),
        );
        let requests = main.start();
        self.screen = CurrentScreen::Main(Box::new(main));

        for request in requests {
            self.dispatch(request);
        }
    }

    fn show_login(&mut self, message: Option<&str>) {
        self.save_state();
        let mut login = LoginScreen::new();
        if let Some(message) = message {
            login.set_error(message);
        }
        self.screen = CurrentScreen::Login(login);
    }

    fn logout(&mut self) {
        let message = (!self.hub.is_signed_in()).then_some(SESSION_ENDED);
        self.show_login(message);

        let use_case = self.login_use_case.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            use_case.sign_out().await;
            let _ = tx.send(AppEvent::SignedOut);
        });
    }

    /// Stores the open tab and company filter for the next start.
    fn save_state(&mut self) {
        if let CurrentScreen::Main(main) = &self.screen {
            self.state = StateConfig {
                last_tab: Some(main.current_tab().name().to_string()),
                last_company_id: main.company_filter().map(str::to_string),
            };
        }
        if let Err(e) = self.storage.save_state(&self.state) {
            warn!(error = %e, "Failed to save UI state");
        }
    }
}
