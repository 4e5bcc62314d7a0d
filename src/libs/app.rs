//! Interactive event loop.
//!
//! [`HomeController`] holds all view state and performs every mutation. It
//! never spawns work itself; transitions that need background work return
//! [`Command`]s that [`App`] carries out:
//!
//! ```text
//!  key reader ─┐
//!  refresh ────┼──▶ AppEvent queue ──▶ App ──▶ HomeController ──▶ TaskService
//!  deselect ───┤                        │
//!  sync tasks ─┘                        └── spawns timers and sync workers
//! ```
//!
//! The key reader runs on its own thread and waits after every key until
//! the loop hands the terminal back, so it never competes with a dialog
//! for input.

use crate::api::{Redmine, RedmineConfig};
use crate::libs::actions::{find, home_actions, sync_actions, ActionContext, ActionKey, ActionKind};
use crate::libs::config::UiConfig;
use crate::libs::error::TaskError;
use crate::libs::messages::Message;
use crate::libs::modals::Modals;
use crate::libs::navigation::{DeselectTicket, NavigationState};
use crate::libs::repository::Repository;
use crate::libs::service::{FormattedWorkedDuration, StartStop, TaskService};
use crate::libs::sync::{spawn_activity_loading, spawn_submissions, Publish, SubmitRequest, SyncEvent, SyncSession};
use crate::libs::task::{SyncBatchEntry, Task};
use crate::libs::timers::{spawn_refresh, DeselectTimer};
use crate::libs::view::View;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use console::{Key, Term};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Key(ActionKey),
    KeyError(String),
    Refresh,
    Deselect(DeselectTicket),
    Sync(SyncEvent),
}

/// Background work requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    StartDeselect(DeselectTicket),
    CancelDeselect,
    LoadActivities(Vec<SyncBatchEntry>),
    Submit(Vec<SubmitRequest>),
}

pub enum Screen {
    Home,
    Sync(SyncSession),
}

pub struct HomeController<R: Repository, M: Modals> {
    service: TaskService<R>,
    modals: M,
    nav: NavigationState,
    tasks: Vec<Task>,
    worked: Option<FormattedWorkedDuration>,
    sync_count: usize,
    screen: Screen,
}

impl<R: Repository, M: Modals> HomeController<R, M> {
    pub fn new(service: TaskService<R>, modals: M, today: NaiveDate) -> Self {
        HomeController {
            service,
            modals,
            nav: NavigationState::new(today),
            tasks: Vec::new(),
            worked: None,
            sync_count: 0,
            screen: Screen::Home,
        }
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn service(&self) -> &TaskService<R> {
        &self.service
    }

    pub fn modals(&self) -> &M {
        &self.modals
    }

    pub fn modals_mut(&mut self) -> &mut M {
        &mut self.modals
    }

    pub fn sync_session(&self) -> Option<&SyncSession> {
        match &self.screen {
            Screen::Sync(session) => Some(session),
            Screen::Home => None,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.nav.selected().and_then(|index| self.tasks.get(index))
    }

    /// Reloads the day view data for the current date.
    pub fn load(&mut self) -> Result<(), TaskError> {
        let date = self.nav.date();
        let tasks = self.service.tasks_by_date(date)?;
        let worked = self.service.worked_duration(date)?;

        self.nav.set_task_count(tasks.len());
        self.tasks = tasks;
        self.worked = Some(worked.format());
        self.sync_count = self.service.tasks_to_sync().len();
        Ok(())
    }

    /// Loads, offering retry or quit while the load fails. Returns `false`
    /// when the user chose to quit.
    pub fn refresh(&mut self) -> Result<bool> {
        loop {
            match self.load() {
                Ok(()) => return Ok(true),
                Err(error) => {
                    error!(%error, "failed to load the day view");
                    let retry = self.with_modal(|modals| modals.retry_or_quit(&Message::RenderFailed(error.to_string()).to_string()))?;
                    if !retry {
                        return Ok(false);
                    }
                }
            }
        }
    }

    pub fn home_context(&self, today: NaiveDate) -> ActionContext {
        ActionContext {
            selection: self.selected_task().map(|task| task.reported),
            can_go_forward: self.nav.can_go_forward(today),
            sync_count: self.sync_count,
            ..ActionContext::default()
        }
    }

    pub fn sync_context(&self) -> ActionContext {
        match &self.screen {
            Screen::Sync(session) => ActionContext {
                sync_locked: session.is_locked(),
                all_resolved: session.all_resolved(),
                selected_row_has_activities: session.selected_row().is_some_and(|row| !row.activities().is_empty()),
                ..ActionContext::default()
            },
            Screen::Home => ActionContext::default(),
        }
    }

    pub fn draw(&self, today: NaiveDate) -> String {
        match &self.screen {
            Screen::Home => {
                let worked = self.worked.clone().unwrap_or_default();
                View::home(self.nav.date(), &self.tasks, &worked, self.nav.selected(), home_actions(), &self.home_context(today))
            }
            Screen::Sync(session) => View::sync(session, sync_actions(), &self.sync_context()),
        }
    }

    pub fn handle_key(&mut self, key: ActionKey, today: NaiveDate) -> Result<Vec<Command>> {
        match &self.screen {
            Screen::Home => {
                let ctx = self.home_context(today);
                match find(home_actions(), key, &ctx) {
                    Some(kind) => self.handle_home(kind, today),
                    None => Ok(Vec::new()),
                }
            }
            Screen::Sync(_) => {
                let ctx = self.sync_context();
                match find(sync_actions(), key, &ctx) {
                    Some(kind) => self.handle_sync(kind, today),
                    None => Ok(Vec::new()),
                }
            }
        }
    }

    fn handle_home(&mut self, kind: ActionKind, today: NaiveDate) -> Result<Vec<Command>> {
        let mut commands = Vec::new();

        match kind {
            ActionKind::Quit => commands.push(Command::Quit),
            ActionKind::PrevDay => {
                self.nav.prev_day();
                commands.push(Command::CancelDeselect);
                self.reload(&mut commands)?;
            }
            ActionKind::NextDay => {
                if self.nav.next_day(today) {
                    commands.push(Command::CancelDeselect);
                    self.reload(&mut commands)?;
                }
            }
            ActionKind::Today => {
                self.nav.goto_today(today);
                commands.push(Command::CancelDeselect);
                self.reload(&mut commands)?;
            }
            ActionKind::NextTask => commands.extend(self.nav.select_next().map(Command::StartDeselect)),
            ActionKind::PrevTask => commands.extend(self.nav.select_previous().map(Command::StartDeselect)),
            ActionKind::New => {
                let task = self.with_modal(|modals| modals.new_task())?;
                let result = self.service.create_task(&task.description, task.project.as_deref(), task.external_id.as_deref());
                self.after_create(result, today, &mut commands)?;
            }
            ActionKind::StartStop => {
                if let Some(id) = self.selected_task().map(|task| task.id) {
                    match self.service.start_stop_task(id) {
                        Ok(StartStop::Stopped(_)) => self.reload(&mut commands)?,
                        Ok(StartStop::Started(id)) => self.after_create(Ok(id), today, &mut commands)?,
                        Err(error) => self.report_error(error, &mut commands)?,
                    }
                }
            }
            ActionKind::Duplicate => {
                if let Some(task) = self.selected_task().cloned() {
                    let description = self.with_modal(|modals| modals.duplicate_task(&task))?;
                    let result = self.service.duplicate_task_with_description(task.id, &description);
                    self.after_create(result, today, &mut commands)?;
                }
            }
            ActionKind::Modify => {
                if let Some(task) = self.selected_task().cloned() {
                    let update = self.with_modal(|modals| modals.modify_task(&task))?;
                    match self.service.update_task(task.id, &update) {
                        Ok(_) => self.reload(&mut commands)?,
                        Err(error) => self.report_error(error, &mut commands)?,
                    }
                }
            }
            ActionKind::Delete => {
                if let Some(task) = self.selected_task().cloned() {
                    let prompt = Message::ConfirmDeleteTask(task.description.clone()).to_string();
                    if self.with_modal(|modals| modals.confirm(&prompt))? {
                        match self.service.delete_task(task.id) {
                            Ok(()) => self.reload(&mut commands)?,
                            Err(error) => self.report_error(error, &mut commands)?,
                        }
                    }
                }
            }
            ActionKind::Report => {
                if let Some(task) = self.selected_task().cloned() {
                    let prompt = Message::ConfirmReportTask(task.description.clone()).to_string();
                    if self.with_modal(|modals| modals.confirm(&prompt))? {
                        match self.service.set_task_as_reported(task.id) {
                            Ok(()) => self.reload(&mut commands)?,
                            Err(error) => self.report_error(error, &mut commands)?,
                        }
                    }
                }
            }
            ActionKind::Summary => {
                let date = self.nav.date();
                match self.service.summary_duration(date) {
                    Ok(summary) => {
                        let text = format!(
                            "{}\n\n{}\n{}",
                            Message::SummaryTitle(date.format("%Y-%m-%d").to_string()),
                            Message::SummaryReported(summary.reported_label()),
                            Message::SummaryNotReported(summary.not_reported_label())
                        );
                        self.with_modal(|modals| modals.alert(&text))?;
                    }
                    Err(error) => self.report_error(error, &mut commands)?,
                }
            }
            ActionKind::Sync => {
                let entries = self.service.tasks_to_sync();
                if !entries.is_empty() {
                    info!(entries = entries.len(), "sync session opened");
                    commands.push(Command::CancelDeselect);
                    self.nav.clear_selection();
                    self.screen = Screen::Sync(SyncSession::new(entries.clone()));
                    commands.push(Command::LoadActivities(entries));
                }
            }
            ActionKind::CloseSync | ActionKind::SubmitSync | ActionKind::SelectActivity => {}
        }

        Ok(commands)
    }

    fn handle_sync(&mut self, kind: ActionKind, _today: NaiveDate) -> Result<Vec<Command>> {
        let mut commands = Vec::new();

        match kind {
            ActionKind::CloseSync => {
                self.screen = Screen::Home;
                self.reload(&mut commands)?;
            }
            ActionKind::NextTask => {
                if let Screen::Sync(session) = &mut self.screen {
                    session.select_next();
                }
            }
            ActionKind::PrevTask => {
                if let Screen::Sync(session) = &mut self.screen {
                    session.select_previous();
                }
            }
            ActionKind::SubmitSync => {
                let count = self.sync_session().map(|session| session.rows().len()).unwrap_or(0);
                let prompt = Message::SyncConfirm(count).to_string();
                if self.with_modal(|modals| modals.confirm(&prompt))? {
                    if let Screen::Sync(session) = &mut self.screen {
                        match session.begin_sync() {
                            Ok(requests) => commands.push(Command::Submit(requests)),
                            Err(error) => warn!(%error, "sync refused"),
                        }
                    }
                }
            }
            ActionKind::SelectActivity => {
                let Some((index, row)) = self
                    .sync_session()
                    .and_then(|session| session.selected().zip(session.selected_row().cloned()))
                else {
                    return Ok(commands);
                };

                let prompt = Message::SelectActivityPrompt(row.entry.description.clone()).to_string();
                let picked = self.with_modal(|modals| modals.select_activity(&prompt, row.activities(), row.selected_activity.as_ref()))?;

                if let (Some(activity), Screen::Sync(session)) = (picked, &mut self.screen) {
                    if let Err(error) = session.override_activity(index, activity) {
                        warn!(%error, index, "activity override refused");
                    }
                }
            }
            _ => {}
        }

        Ok(commands)
    }

    /// Applies a worker result and marks the submitted tasks reported.
    pub fn apply_sync_event(&mut self, event: SyncEvent) {
        let Screen::Sync(session) = &mut self.screen else {
            debug!(?event, "sync event after the session was closed");
            return;
        };

        let finished = event == SyncEvent::SyncFinished;
        let ids = session.apply_event(event);
        for id in ids {
            if let Err(error) = self.service.set_task_as_reported(id) {
                error!(id, %error, "failed to mark task as reported");
            }
        }

        if finished {
            if let Screen::Sync(session) = &self.screen {
                info!("{}", Message::SyncFinished {
                    synced: session.synced_count(),
                    failed: session.failed_count(),
                });
            }
        }
    }

    /// The integration could not be set up for a freshly opened sync view.
    /// Alerts and returns to the day view.
    pub fn on_sync_unavailable(&mut self, error: &anyhow::Error) -> Result<Vec<Command>> {
        error!(%error, "failed to read integration settings");
        let mut commands = Vec::new();
        let message = Message::SyncUnavailable(error.to_string()).to_string();
        self.with_modal(|modals| modals.alert(&message))?;
        self.screen = Screen::Home;
        self.reload(&mut commands)?;
        Ok(commands)
    }

    /// The terminal could not be read; quit unless the user retries.
    pub fn on_key_error(&mut self, message: &str) -> Result<Vec<Command>> {
        error!(%message, "failed to read key");
        let retry = self.with_modal(|modals| modals.retry_or_quit(message))?;
        Ok(if retry { Vec::new() } else { vec![Command::Quit] })
    }

    pub fn on_deselect(&mut self, ticket: DeselectTicket) -> bool {
        self.nav.on_deselect_timeout(ticket)
    }

    /// Marks the end of a modal once the events queued during it were handled.
    pub fn settle(&mut self) -> Vec<Command> {
        if !self.nav.is_modal_open() {
            return Vec::new();
        }
        self.nav.close_modal().map(Command::StartDeselect).into_iter().collect()
    }

    fn with_modal<T>(&mut self, open: impl FnOnce(&mut M) -> Result<T>) -> Result<T> {
        self.nav.open_modal();
        open(&mut self.modals)
    }

    fn reload(&mut self, commands: &mut Vec<Command>) -> Result<()> {
        if !self.refresh()? {
            commands.push(Command::Quit);
        }
        Ok(())
    }

    fn after_create(&mut self, result: Result<i64, TaskError>, today: NaiveDate, commands: &mut Vec<Command>) -> Result<()> {
        match result {
            Ok(_) => {
                self.nav.goto_today(today);
                self.reload(commands)
            }
            Err(error) => self.report_error(error, commands),
        }
    }

    fn report_error(&mut self, error: TaskError, commands: &mut Vec<Command>) -> Result<()> {
        warn!(%error, "task operation failed");
        self.with_modal(|modals| modals.alert(&error.to_string()))?;
        if !error.is_validation() {
            self.reload(commands)?;
        }
        Ok(())
    }
}

pub struct App<R: Repository, M: Modals> {
    controller: HomeController<R, M>,
    ui: UiConfig,
}

impl<R: Repository, M: Modals> App<R, M> {
    pub fn new(service: TaskService<R>, modals: M, ui: UiConfig) -> Self {
        App {
            controller: HomeController::new(service, modals, today()),
            ui,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
        let resume = spawn_key_reader(tx.clone());
        let refresh = spawn_refresh(self.ui.refresh_interval(), tx.clone(), || AppEvent::Refresh);
        let mut deselect = DeselectTimer::new(self.ui.deselect_timeout());

        let result = self.event_loop(&tx, &mut rx, &resume, &mut deselect).await;

        refresh.abort();
        deselect.cancel();
        result
    }

    async fn event_loop(
        &mut self,
        tx: &UnboundedSender<AppEvent>,
        rx: &mut UnboundedReceiver<AppEvent>,
        resume: &std_mpsc::Sender<()>,
        deselect: &mut DeselectTimer,
    ) -> Result<()> {
        if !tokio::task::block_in_place(|| self.controller.refresh())? {
            return Ok(());
        }
        self.redraw()?;
        let _ = resume.send(());

        let mut integration: Option<Arc<Redmine>> = None;

        while let Some(event) = rx.recv().await {
            let mut read_key = is_key(&event);
            let mut commands = self.handle_event(event)?;

            // Events that queued up behind a modal are handled while it still
            // counts as open, so a stale deselect cannot clear the selection.
            while let Ok(queued) = rx.try_recv() {
                read_key |= is_key(&queued);
                commands.extend(self.handle_event(queued)?);
            }
            commands.extend(self.controller.settle());

            if commands.contains(&Command::Quit) {
                break;
            }

            for command in commands {
                match command {
                    Command::Quit => {}
                    Command::StartDeselect(ticket) => deselect.start(tx.clone(), AppEvent::Deselect(ticket)),
                    Command::CancelDeselect => deselect.cancel(),
                    Command::LoadActivities(entries) => match self.integration() {
                        Ok(redmine) => {
                            let redmine = Arc::new(redmine);
                            spawn_activity_loading(redmine.clone(), entries, publisher(tx));
                            integration = Some(redmine);
                        }
                        Err(error) => {
                            let mut follow_up = tokio::task::block_in_place(|| self.controller.on_sync_unavailable(&error))?;
                            follow_up.extend(self.controller.settle());
                            if follow_up.contains(&Command::Quit) {
                                return Ok(());
                            }
                            for command in follow_up {
                                if let Command::StartDeselect(ticket) = command {
                                    deselect.start(tx.clone(), AppEvent::Deselect(ticket));
                                }
                            }
                        }
                    },
                    Command::Submit(requests) => {
                        if let Some(redmine) = &integration {
                            spawn_submissions(redmine.clone(), requests, publisher(tx));
                        }
                    }
                }
            }

            self.redraw()?;
            if read_key {
                let _ = resume.send(());
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<Vec<Command>> {
        let today = today();
        match event {
            AppEvent::Key(key) => tokio::task::block_in_place(|| self.controller.handle_key(key, today)),
            AppEvent::KeyError(message) => tokio::task::block_in_place(|| self.controller.on_key_error(&message)),
            AppEvent::Refresh => {
                if self.controller.sync_session().is_none() {
                    if let Err(error) = self.controller.load() {
                        warn!(%error, "periodic refresh failed");
                    }
                }
                Ok(Vec::new())
            }
            AppEvent::Deselect(ticket) => {
                self.controller.on_deselect(ticket);
                Ok(Vec::new())
            }
            AppEvent::Sync(event) => {
                self.controller.apply_sync_event(event);
                Ok(Vec::new())
            }
        }
    }

    fn integration(&self) -> Result<Redmine> {
        let settings = self.controller.service().settings()?;
        let config = RedmineConfig::from_settings_blob(&settings.integration_config).unwrap_or_else(|error| {
            warn!(%error, "integration settings ignored");
            RedmineConfig::default()
        });
        Ok(Redmine::new(&config))
    }

    fn redraw(&self) -> Result<()> {
        View::print(&self.controller.draw(today()))?;
        Ok(())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn is_key(event: &AppEvent) -> bool {
    matches!(event, AppEvent::Key(_) | AppEvent::KeyError(_))
}

fn publisher(tx: &UnboundedSender<AppEvent>) -> Publish {
    let tx = tx.clone();
    Arc::new(move |event| {
        let _ = tx.send(AppEvent::Sync(event));
    })
}

/// Maps terminal keys to bindings; arrows mirror the vim-style letters.
pub fn map_key(key: Key) -> Option<ActionKey> {
    match key {
        Key::Char(c) => Some(ActionKey::Char(c.to_ascii_lowercase())),
        Key::Enter => Some(ActionKey::Enter),
        Key::Escape => Some(ActionKey::Esc),
        Key::ArrowLeft => Some(ActionKey::Char('h')),
        Key::ArrowRight => Some(ActionKey::Char('l')),
        Key::ArrowDown => Some(ActionKey::Char('j')),
        Key::ArrowUp => Some(ActionKey::Char('k')),
        _ => None,
    }
}

/// Reads keys on a dedicated thread. After each delivered key the reader
/// waits for a resume signal, which the loop sends once any dialog
/// opened for that key is closed.
fn spawn_key_reader(tx: UnboundedSender<AppEvent>) -> std_mpsc::Sender<()> {
    let (resume_tx, resume_rx) = std_mpsc::channel::<()>();

    thread::spawn(move || {
        let term = Term::stdout();
        while resume_rx.recv().is_ok() {
            let event = loop {
                match term.read_key() {
                    Ok(key) => {
                        if let Some(key) = map_key(key) {
                            break AppEvent::Key(key);
                        }
                    }
                    Err(error) => break AppEvent::KeyError(error.to_string()),
                }
            };
            if tx.send(event).is_err() {
                break;
            }
        }
    });

    resume_tx
}
