//! TUI runtime - owns the terminal, runs the event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here. The
//! reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Async handlers send `UiEvent`s directly to `inbox_tx`; the runtime
//! drains `inbox_rx` each frame. Tasks get a uniform
//! `TaskStarted`/`TaskCompleted` lifecycle so the reducer can gate stale
//! results.

mod handlers;

use std::future::Future;
use std::io::Stdout;

use anyhow::{Context, Result};
use crossterm::event;
use medgal_core::api::ApiClient;
use medgal_core::config::Config;
use medgal_core::session::SessionStore;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick cadence while tasks are in flight (spinner animation).
pub const ACTIVE_POLL_DURATION: std::time::Duration = std::time::Duration::from_millis(33);

/// Poll duration when idle. Longer timeout reduces CPU usage.
pub const IDLE_POLL_DURATION: std::time::Duration = std::time::Duration::from_millis(150);

type UiEventSender = mpsc::UnboundedSender<UiEvent>;
type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Terminal state is restored on drop, panic,
/// or Ctrl+C.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: std::time::Instant,
}

impl TuiRuntime {
    /// Creates a new TUI runtime and kicks off the session restore.
    pub fn new(config: Config, api: ApiClient, session: SessionStore) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let mut state = AppState::new(config, api, session);

        // All session transitions go to the log; views read the store via
        // the reducer, never by mutating it directly.
        state.tui.session.subscribe(|current| {
            tracing::info!(user_id = ?current.map(|i| i.user_id), "session changed");
        });

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            state,
            inbox_tx,
            inbox_rx,
            last_tick: std::time::Instant::now(),
        })
    }

    /// Runs the main event loop until quit.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        // Kick off the restore before the first frame; the route guard
        // defers every navigation until it lands.
        let restore_task = self.state.tui.task_seq.next_id();
        self.execute_effect(UiEffect::RestoreSession { task: restore_task });

        let result = self.event_loop();
        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let events = self.collect_events()?;

            for event in events {
                let effects = update::update(&mut self.state, event);
                dirty = true;
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Spin faster while work is in flight so the spinner animates and
        // inbox results are picked up promptly.
        let tick_interval = if self.state.tui.tasks.is_any_running() {
            ACTIVE_POLL_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        // Drain inbox - all async results arrive here.
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Poll terminal events: block until the next tick is due unless we
        // already have events to process.
        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            std::time::Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(std::time::Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = std::time::Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async task with a uniform TaskStarted/TaskCompleted
    /// lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, cancelable: bool, f: F)
    where
        F: FnOnce(Option<CancellationToken>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = cancelable.then(CancellationToken::new);
        let started = TaskStarted {
            id,
            cancel: cancel.clone(),
        };
        let _ = tx.send(UiEvent::TaskStarted { kind, started });
        tokio::spawn(async move {
            let inner = f(cancel).await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        let api = self.state.tui.api.clone();
        let gateway = self.state.tui.gateway.clone();

        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::OpenBrowser { url } => {
                let _ = open::that(&url);
            }
            UiEffect::CancelTask { token, .. } => {
                if let Some(cancel) = token {
                    cancel.cancel();
                }
            }
            UiEffect::ReleasePreview { handle } => {
                handle.release();
            }

            UiEffect::RestoreSession { task } => {
                let path = self.state.tui.session.path().to_path_buf();
                self.spawn_task(TaskKind::SessionRestore, task, false, move |_| {
                    handlers::restore_session(path)
                });
            }
            UiEffect::CheckHealth { task } => {
                self.spawn_task(TaskKind::HealthCheck, task, false, move |_| {
                    handlers::check_health(api)
                });
            }

            UiEffect::SendCode {
                task,
                contact,
                role,
            } => {
                self.spawn_task(TaskKind::SendCode, task, false, move |_| {
                    handlers::send_code(gateway, contact, role)
                });
            }
            UiEffect::VerifyCode {
                task,
                contact,
                code,
            } => {
                self.spawn_task(TaskKind::VerifyCode, task, false, move |_| {
                    handlers::verify_code(gateway, contact, code)
                });
            }
            UiEffect::CredentialSignIn {
                task,
                email,
                password,
            } => {
                self.spawn_task(TaskKind::CredentialAuth, task, false, move |_| {
                    handlers::credential_sign_in(gateway, email, password)
                });
            }
            UiEffect::CredentialSignUp {
                task,
                name,
                email,
                password,
                confirm,
                role,
            } => {
                self.spawn_task(TaskKind::CredentialAuth, task, false, move |_| {
                    handlers::credential_sign_up(gateway, name, email, password, confirm, role)
                });
            }
            UiEffect::FederatedFetchProfile { task, token } => {
                self.spawn_task(TaskKind::FederatedAuth, task, false, move |_| {
                    handlers::federated_fetch_profile(gateway, token)
                });
            }
            UiEffect::FederatedExchange {
                task,
                token,
                role,
                profile,
            } => {
                self.spawn_task(TaskKind::FederatedAuth, task, false, move |_| {
                    handlers::federated_exchange(gateway, token, role, profile)
                });
            }

            UiEffect::FetchPatientStats { task, user_id } => {
                self.spawn_task(TaskKind::StatsFetch, task, false, move |_| {
                    handlers::patient_stats(api, user_id)
                });
            }
            UiEffect::FetchPatientRecords { task, user_id } => {
                self.spawn_task(TaskKind::RecordsFetch, task, false, move |_| {
                    handlers::patient_records(api, user_id)
                });
            }
            UiEffect::FetchHospitalStats { task, user_id } => {
                self.spawn_task(TaskKind::StatsFetch, task, false, move |_| {
                    handlers::hospital_stats(api, user_id)
                });
            }
            UiEffect::FetchHospitalRecords { task, user_id } => {
                self.spawn_task(TaskKind::RecordsFetch, task, false, move |_| {
                    handlers::hospital_records(api, user_id)
                });
            }
            UiEffect::FetchHospitalPatients { task, user_id } => {
                self.spawn_task(TaskKind::PatientsFetch, task, false, move |_| {
                    handlers::hospital_patients(api, user_id)
                });
            }

            UiEffect::SearchRecords {
                task,
                query,
                hospital_scope,
            } => {
                self.spawn_task(TaskKind::Search, task, false, move |_| {
                    handlers::search_records(api, query, hospital_scope)
                });
            }
            UiEffect::UploadRecord {
                task,
                file_path,
                patient_access_code,
                record_type,
                notes,
                hospital_id,
            } => {
                self.spawn_task(TaskKind::Upload, task, false, move |_| {
                    handlers::upload_record(
                        api,
                        file_path,
                        patient_access_code,
                        record_type,
                        notes,
                        hospital_id,
                    )
                });
            }
            UiEffect::LookupPatient { task, access_code } => {
                self.spawn_task(TaskKind::PatientLookup, task, false, move |_| {
                    handlers::lookup_patient(api, access_code)
                });
            }
            UiEffect::GenerateShareCode { task, user_id } => {
                self.spawn_task(TaskKind::ShareCode, task, false, move |_| {
                    handlers::generate_share_code(api, user_id)
                });
            }
            UiEffect::FetchProfile { task, user_id } => {
                self.spawn_task(TaskKind::ProfileFetch, task, false, move |_| {
                    handlers::fetch_profile(api, user_id)
                });
            }
            UiEffect::SaveProfile {
                task,
                user_id,
                profile,
            } => {
                self.spawn_task(TaskKind::ProfileSave, task, false, move |_| {
                    handlers::save_profile(api, user_id, profile)
                });
            }

            UiEffect::LoadPreview {
                task,
                record_id,
                file_name,
            } => {
                self.spawn_task(TaskKind::Preview, task, true, move |cancel| {
                    handlers::load_preview(api, record_id, file_name, cancel)
                });
            }
            UiEffect::DownloadRecord {
                task,
                record_id,
                file_name,
            } => {
                self.spawn_task(TaskKind::Download, task, false, move |_| {
                    handlers::download_record(api, record_id, file_name)
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
