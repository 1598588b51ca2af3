//! Modal overlays.
//!
//! Overlays temporarily take over keyboard input. Each overlay is
//! self-contained: it owns its state, key handler, and render function.
//! The split state architecture (overlay stored beside `TuiState`, not
//! inside it) lets a handler take `&mut self` and `&mut TuiState` at once.

pub mod preview;
pub mod record_detail;
pub mod render_utils;

use crossterm::event::KeyEvent;
use medgal_core::api::ApiError;
use medgal_core::types::RecordSummary;
pub use preview::{PreviewHandle, PreviewState};
use ratatui::Frame;
use ratatui::layout::Rect;
pub use record_detail::RecordDetailState;

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::state::AppState;

/// Requests to open a new overlay, returned by overlay key handlers.
#[derive(Debug)]
pub enum OverlayRequest {
    Preview { record: RecordSummary },
}

/// Transition returned by overlay key handlers.
#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    Close,
    Open(OverlayRequest),
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            effects: Vec::new(),
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    pub fn open(request: OverlayRequest) -> Self {
        Self::new(OverlayTransition::Open(request))
    }

    #[must_use]
    pub fn with_effects(mut self, effects: Vec<UiEffect>) -> Self {
        self.effects = effects;
        self
    }
}

/// Active modal overlay.
#[derive(Debug)]
pub enum Overlay {
    RecordDetail(RecordDetailState),
    Preview(PreviewState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::RecordDetail(state) => state.render(frame, area),
            Overlay::Preview(state) => state.render(frame, area),
        }
    }
}

/// Dispatches a key to the active overlay. Returns `None` when no overlay
/// is open so the caller falls through to route key handling.
pub fn handle_overlay_key(app: &mut AppState, key: KeyEvent) -> Option<Vec<UiEffect>> {
    let mut overlay = app.overlay.take()?;
    let update = match &mut overlay {
        Overlay::RecordDetail(state) => state.handle_key(&mut app.tui, key),
        Overlay::Preview(state) => state.handle_key(&mut app.tui, key),
    };
    app.overlay = Some(overlay);

    let mut effects = update.effects;
    match update.transition {
        OverlayTransition::Stay => {}
        OverlayTransition::Close => effects.extend(close_overlay(app)),
        OverlayTransition::Open(OverlayRequest::Preview { record }) => {
            effects.extend(open_preview(app, &record));
        }
    }
    Some(effects)
}

/// Opens the record detail overlay, replacing whatever was open.
pub fn open_record_detail(app: &mut AppState, record: RecordSummary) -> Vec<UiEffect> {
    let effects = close_overlay(app);
    app.overlay = Some(Overlay::RecordDetail(RecordDetailState::open(record)));
    effects
}

/// Opens the preview overlay for a record and starts the fetch. Any prior
/// overlay (including another preview and its resource handle) is closed
/// first, so at most one handle is outstanding.
pub fn open_preview(app: &mut AppState, record: &RecordSummary) -> Vec<UiEffect> {
    let mut effects = close_overlay(app);

    let file_name = record
        .file_name
        .clone()
        .unwrap_or_else(|| format!("record-{}", record.record_id));
    let task = app.tui.task_seq.next_id();
    app.overlay = Some(Overlay::Preview(PreviewState::loading(
        record.record_id,
        file_name.clone(),
    )));
    effects.push(UiEffect::LoadPreview {
        task,
        record_id: record.record_id,
        file_name,
    });
    effects
}

/// Closes the active overlay, releasing preview resources and cancelling
/// an in-flight preview fetch.
pub fn close_overlay(app: &mut AppState) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    match app.overlay.take() {
        Some(Overlay::Preview(mut state)) => {
            if let Some(handle) = state.take_handle() {
                effects.push(UiEffect::ReleasePreview { handle });
            }
            if app.tui.tasks.preview.is_running() {
                effects.push(UiEffect::CancelTask {
                    kind: TaskKind::Preview,
                    token: app.tui.tasks.preview.cancel.clone(),
                });
                app.tui.tasks.preview.clear();
            }
        }
        Some(Overlay::RecordDetail(_)) | None => {}
    }
    effects
}

/// Applies a preview fetch result. A result for an overlay that is gone,
/// or for a different record, releases its handle immediately instead of
/// installing it, so no resource dangles across open/close cycles.
pub fn handle_preview_loaded(
    app: &mut AppState,
    record_id: u64,
    result: Result<PreviewHandle, ApiError>,
) -> Vec<UiEffect> {
    match &mut app.overlay {
        Some(Overlay::Preview(state)) if state.record_id == record_id => {
            match result {
                Ok(handle) => state.install(handle),
                Err(e) => state.error = Some(e.message),
            }
            vec![]
        }
        _ => match result {
            Ok(handle) => vec![UiEffect::ReleasePreview { handle }],
            Err(_) => vec![],
        },
    }
}
