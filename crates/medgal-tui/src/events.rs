//! UI event types.
//!
//! All external inputs (terminal, async results) are converted to `UiEvent`
//! before being processed by the reducer.
//!
//! ## Inbox Pattern
//!
//! Async operations send events directly to the runtime's event inbox.
//! Results arrive as separate events wrapped in a uniform task lifecycle:
//! the runtime emits `TaskStarted` once a task is actually spawned and
//! `TaskCompleted` with the result event when done; the reducer is the only
//! place that mutates `TaskState`, and a completion whose id is stale is
//! dropped before its inner event is ever applied.

use std::path::PathBuf;

use crossterm::event::Event as CrosstermEvent;
use medgal_core::api::ApiError;
use medgal_core::auth::ProviderProfile;
use medgal_core::types::{
    HospitalStats, Identity, PatientEntry, PatientStats, Profile, RecordSummary,
};

use crate::common::{TaskCompleted, TaskKind, TaskStarted};
use crate::features::login::LoginFlow;
use crate::overlays::PreviewHandle;

/// Async results for the login feature.
#[derive(Debug)]
pub enum LoginUiEvent {
    /// Backend health probe finished.
    HealthChecked { online: bool },

    /// OTP send-code request finished. Ok carries the server's ack message.
    CodeSent {
        result: Result<Option<String>, ApiError>,
    },

    /// The provider's userinfo lookup finished (federated flow); the token
    /// is echoed back so the exchange can be chained.
    ProviderProfileFetched {
        token: String,
        result: Result<ProviderProfile, ApiError>,
    },

    /// A login attempt finished. Every flow funnels through this one event,
    /// which is the only place an identity reaches the session store.
    Authenticated {
        flow: LoginFlow,
        result: Result<Identity, ApiError>,
    },
}

/// Async results for the patient dashboard.
#[derive(Debug)]
pub enum PatientUiEvent {
    StatsLoaded(Result<PatientStats, ApiError>),
    RecordsLoaded(Result<Vec<RecordSummary>, ApiError>),
    SearchLoaded(Result<Vec<RecordSummary>, ApiError>),
    ShareCodeGenerated(Result<String, ApiError>),
    ProfileLoaded(Result<Profile, ApiError>),
    ProfileSaved(Result<Option<String>, ApiError>),
}

/// Async results for the hospital dashboard.
#[derive(Debug)]
pub enum HospitalUiEvent {
    StatsLoaded(Result<HospitalStats, ApiError>),
    RecordsLoaded(Result<Vec<RecordSummary>, ApiError>),
    PatientsLoaded(Result<Vec<PatientEntry>, ApiError>),
    SearchLoaded(Result<Vec<RecordSummary>, ApiError>),
    Uploaded(Result<Option<String>, ApiError>),
    PatientLookedUp(Result<Identity, ApiError>),
}

/// Unified event enum for the TUI.
#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick (for animation, polling).
    Tick,

    /// Terminal input event (key, paste, resize).
    Terminal(CrosstermEvent),

    /// Session restore read finished.
    SessionRestored { found: Option<Identity> },

    /// Preview bytes were fetched and written to a local resource handle.
    /// If the originating overlay is gone the reducer releases the handle
    /// immediately instead of installing it.
    PreviewLoaded {
        record_id: u64,
        result: Result<PreviewHandle, ApiError>,
    },

    /// A record download finished; Ok carries the written path.
    DownloadFinished {
        file_name: String,
        result: Result<PathBuf, ApiError>,
    },

    /// Task lifecycle: runtime started a task (cancel token optional).
    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },

    /// Task lifecycle: runtime completed a task (wraps the result event).
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    /// Login feature results.
    Login(LoginUiEvent),

    /// Patient dashboard results.
    Patient(PatientUiEvent),

    /// Hospital dashboard results.
    Hospital(HospitalUiEvent),
}
