//! Application state composition.
//!
//! Top-level state hierarchy for the portal TUI:
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── session: SessionStore     (single source of truth for identity)
//! │   ├── route: Route              (current view, guard-resolved)
//! │   ├── login: LoginState         (three flow state machines)
//! │   ├── patient: PatientState     (patient dashboard)
//! │   ├── hospital: HospitalState   (hospital dashboard)
//! │   └── tasks: Tasks              (async task lifecycle)
//! └── overlay: Option<Overlay>      (modal overlays)
//! ```
//!
//! State is split between `TuiState` and `Option<Overlay>` so overlay
//! handlers can hold `&mut self` and `&mut TuiState` simultaneously.

use medgal_core::api::ApiClient;
use medgal_core::auth::AuthGateway;
use medgal_core::config::Config;
use medgal_core::session::SessionStore;

use crate::common::{TaskSeq, Tasks};
use crate::features::hospital::HospitalState;
use crate::features::login::LoginState;
use crate::features::patient::PatientState;
use crate::overlays::Overlay;
use crate::routes::Route;

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(config: Config, api: ApiClient, session: SessionStore) -> Self {
        Self {
            tui: TuiState::new(config, api, session),
            overlay: None,
        }
    }
}

/// TUI application state (non-overlay).
pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Resolved configuration (base URL, OAuth client id, default role).
    pub config: Config,
    /// Shared API client; handlers clone it into spawned tasks.
    pub api: ApiClient,
    /// Auth gateway driving the login flows.
    pub gateway: AuthGateway,
    /// The session store. Mutated only via set_identity/clear/finish_restore.
    pub session: SessionStore,
    /// Currently displayed route (guard-resolved).
    pub route: Route,
    /// Navigation requested while the session was still restoring.
    pub pending_path: Option<String>,
    /// Login screen state.
    pub login: LoginState,
    /// Patient dashboard state.
    pub patient: PatientState,
    /// Hospital dashboard state.
    pub hospital: HospitalState,
    /// Task id sequence for async operations.
    pub task_seq: TaskSeq,
    /// Task lifecycle state for async operations.
    pub tasks: Tasks,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(config: Config, api: ApiClient, session: SessionStore) -> Self {
        let gateway = AuthGateway::new(api.clone());
        let login = LoginState::new(config.default_role);
        Self {
            should_quit: false,
            config,
            api,
            gateway,
            session,
            route: Route::Landing,
            pending_path: None,
            login,
            patient: PatientState::new(),
            hospital: HospitalState::new(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            spinner_frame: 0,
        }
    }
}
