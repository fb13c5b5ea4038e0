use crate::api::{build_source, ApiClient, Resource, ResourceFetcher, SnapshotSource};
use crate::config::DashboardConfig;
use crate::event::{AppEvent, Event, EventHandler};
use crate::view::ResourceView;
use crate::{log_error, log_info};
use color_eyre::Result;
use ratatui::{
    crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    DefaultTerminal,
};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Overview,
    Detail(Resource),
}

/// Application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Current app mode/screen
    pub mode: AppMode,
    pub config: DashboardConfig,
    /// Resources listed on the overview, in display order
    pub resources: Vec<Resource>,
    /// Index into `resources`
    pub selected: usize,
    /// The open resource screen, if any. Dropping it stops its poller.
    pub active_view: Option<ResourceView>,
    /// Event handler.
    pub events: EventHandler,
    fetcher: Arc<dyn ResourceFetcher>,
    /// Built on first open and kept for the life of the app, so an eager
    /// singleton fetches once no matter how often its screen is entered.
    sources: BTreeMap<Resource, Arc<dyn SnapshotSource>>,
}

impl App {
    /// Constructs a new instance of [`App`] talking to the configured server.
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let client = ApiClient::new(&config.base_url, config.cache, config.request_timeout())?;
        log_info!("Dashboard pointed at {}", client.base_url());
        Ok(Self::with_fetcher(config, Arc::new(client), EventHandler::new()))
    }

    pub fn with_fetcher(
        config: DashboardConfig,
        fetcher: Arc<dyn ResourceFetcher>,
        events: EventHandler,
    ) -> Self {
        Self {
            running: true,
            mode: AppMode::Overview,
            config,
            resources: Resource::all().to_vec(),
            selected: 0,
            active_view: None,
            events,
            fetcher,
            sources: BTreeMap::new(),
        }
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut needs_redraw = true;

        while self.running {
            if needs_redraw {
                terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
                needs_redraw = false;
            }

            match self.events.next().await {
                // Snapshots update in the background; repaint while a view is open.
                Ok(Event::Tick) => needs_redraw = self.active_view.is_some(),
                Ok(Event::Crossterm(CrosstermEvent::Key(key_event))) => {
                    self.handle_key_events(key_event);
                    needs_redraw = true;
                }
                Ok(Event::Crossterm(CrosstermEvent::Resize(_, _))) => needs_redraw = true,
                Ok(Event::Crossterm(_)) => {}
                Ok(Event::App(app_event)) => {
                    self.handle_app_event(app_event);
                    needs_redraw = true;
                }
                Err(e) => log_error!("Event error: {}", e),
            }
        }

        self.close_view();
        Ok(())
    }

    /// Handles the key events and queues the matching [`AppEvent`].
    pub fn handle_key_events(&mut self, key_event: KeyEvent) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        if let KeyCode::Char('c' | 'C') = key_event.code {
            if key_event.modifiers == KeyModifiers::CONTROL {
                self.events.send(AppEvent::Quit);
                return;
            }
        }

        match self.mode {
            AppMode::Overview => match key_event.code {
                KeyCode::Esc | KeyCode::Char('q') => self.events.send(AppEvent::Quit),
                KeyCode::Up | KeyCode::Char('k') => self.events.send(AppEvent::Previous),
                KeyCode::Down | KeyCode::Char('j') => self.events.send(AppEvent::Next),
                KeyCode::Enter | KeyCode::Char(' ') => self.events.send(AppEvent::Open),
                _ => {}
            },
            AppMode::Detail(_) => match key_event.code {
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => {
                    self.events.send(AppEvent::Back)
                }
                KeyCode::Char('r') => self.events.send(AppEvent::Refresh),
                KeyCode::Char('q') => self.events.send(AppEvent::Back),
                _ => {}
            },
        }
    }

    pub fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Next => self.next_resource(),
            AppEvent::Previous => self.prev_resource(),
            AppEvent::Open => self.open_selected(),
            AppEvent::Back => self.back_to_overview(),
            AppEvent::Refresh => {
                if let Some(view) = self.active_view.as_mut() {
                    view.refresh();
                }
            }
            AppEvent::Quit => self.quit(),
        }
    }

    pub fn selected_resource(&self) -> Option<Resource> {
        self.resources.get(self.selected).copied()
    }

    pub fn next_resource(&mut self) {
        if self.mode != AppMode::Overview || self.resources.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.resources.len();
    }

    pub fn prev_resource(&mut self) {
        if self.mode != AppMode::Overview || self.resources.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.resources.len() - 1
        } else {
            self.selected - 1
        };
    }

    /// Opens the selected resource's screen with a fresh, empty snapshot.
    pub fn open_selected(&mut self) {
        let Some(resource) = self.selected_resource() else {
            return;
        };
        self.close_view();

        let settings = self.config.view_settings(resource);
        let source = self
            .sources
            .entry(resource)
            .or_insert_with(|| build_source(settings.fetch_mode, self.fetcher.clone(), resource))
            .clone();
        self.active_view = Some(ResourceView::with_source(source, resource, settings));
        self.mode = AppMode::Detail(resource);
    }

    pub fn back_to_overview(&mut self) {
        self.close_view();
        self.mode = AppMode::Overview;
    }

    fn close_view(&mut self) {
        if let Some(mut view) = self.active_view.take() {
            view.deactivate();
        }
    }

    /// Set running to false to quit the application.
    pub fn quit(&mut self) {
        self.close_view();
        self.running = false;
    }
}
