//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects. Navigation always goes through the
//! route guard: `navigate` re-resolves on every request and on every
//! session change, so redirect rules live in one place.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::login::{LoginMode, LoginState};
use crate::features::{hospital, login, patient};
use crate::overlays;
use crate::routes::{self, Resolution, Route};
use crate::state::AppState;

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }

        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),

        UiEvent::SessionRestored { found } => {
            app.tui.session.finish_restore(found);
            // A restored identity lands on its own dashboard; otherwise the
            // public landing page. A navigation requested mid-restore wins.
            let path = app.tui.pending_path.take().unwrap_or_else(|| {
                match app.tui.session.current() {
                    Some(identity) => Route::dashboard_for(identity.user_type).path().to_string(),
                    None => Route::Landing.path().to_string(),
                }
            });
            navigate(app, &path)
        }

        UiEvent::TaskStarted { kind, started } => {
            app.tui.tasks.state_mut(kind).on_started(&started);
            vec![]
        }

        UiEvent::TaskCompleted { kind, completed } => {
            let ok = app.tui.tasks.state_mut(kind).finish_if_active(completed.id);
            if ok {
                return update(app, *completed.result);
            }
            // A superseded preview still delivered a resource handle; it is
            // released, never installed.
            if let UiEvent::PreviewLoaded {
                result: Ok(handle), ..
            } = *completed.result
            {
                return vec![UiEffect::ReleasePreview { handle }];
            }
            vec![]
        }

        UiEvent::PreviewLoaded { record_id, result } => {
            overlays::handle_preview_loaded(app, record_id, result)
        }

        UiEvent::DownloadFinished { file_name, result } => {
            let message = match result {
                Ok(path) => format!("Saved {file_name} to {}", path.display()),
                Err(e) => format!("Download failed: {}", e.message),
            };
            match app.tui.route {
                Route::PatientDashboard => app.tui.patient.notice = Some(message),
                Route::HospitalDashboard => app.tui.hospital.notice = Some(message),
                _ => {}
            }
            vec![]
        }

        UiEvent::Login(login_event) => login::handle_event(app, login_event),
        UiEvent::Patient(patient_event) => patient::handle_event(app, patient_event),
        UiEvent::Hospital(hospital_event) => hospital::handle_event(app, hospital_event),
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Resolves a navigation request through the route guard and enters the
/// target. While the session is restoring the request is parked and
/// replayed once the restore settles.
pub fn navigate(app: &mut AppState, path: &str) -> Vec<UiEffect> {
    match routes::resolve(path, &app.tui.session) {
        Resolution::Pending => {
            app.tui.pending_path = Some(path.to_string());
            vec![]
        }
        Resolution::Goto(route) => enter_route(app, route),
    }
}

/// Enters a route: closes any overlay (releasing preview resources),
/// resets the target view's derived state, and issues its mount effects.
fn enter_route(app: &mut AppState, route: Route) -> Vec<UiEffect> {
    let mut effects = overlays::close_overlay(app);
    let tui = &mut app.tui;
    tui.route = route;

    match route {
        Route::Landing => {}
        Route::Login | Route::Register => {
            tui.login = LoginState::new(tui.config.default_role);
            if route == Route::Register {
                tui.login.set_mode(LoginMode::Register);
            }
            let task = tui.task_seq.next_id();
            effects.push(UiEffect::CheckHealth { task });
        }
        Route::PatientDashboard => {
            tui.patient = crate::features::patient::PatientState::new();
            effects.extend(patient::on_enter(tui));
        }
        Route::HospitalDashboard => {
            tui.hospital = crate::features::hospital::HospitalState::new();
            effects.extend(hospital::on_enter(tui));
        }
    }
    effects
}

fn logout(app: &mut AppState) -> Vec<UiEffect> {
    app.tui.session.clear();
    navigate(app, Route::Login.path())
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Paste(text) => {
            if app.overlay.is_none()
                && matches!(app.tui.route, Route::Login | Route::Register)
            {
                login::handle_paste(&mut app.tui.login, &text);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    // Modal overlays take the keyboard first.
    if let Some(effects) = overlays::handle_overlay_key(app, key) {
        return effects;
    }

    match app.tui.route {
        Route::Landing => handle_landing_key(app, key),
        Route::Login | Route::Register => login::handle_key(app, key),
        Route::PatientDashboard => {
            if ctrl && key.code == KeyCode::Char('l') {
                return logout(app);
            }
            patient::handle_key(app, key)
        }
        Route::HospitalDashboard => {
            if ctrl && key.code == KeyCode::Char('l') {
                return logout(app);
            }
            hospital::handle_key(app, key)
        }
    }
}

fn handle_landing_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Enter | KeyCode::Char('l') => navigate(app, Route::Login.path()),
        KeyCode::Char('r') => navigate(app, Route::Register.path()),
        KeyCode::Char('q') => vec![UiEffect::Quit],
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use medgal_core::api::{ApiClient, ApiError};
    use medgal_core::config::Config;
    use medgal_core::session::SessionStore;
    use medgal_core::types::{Identity, UserType};

    use super::*;
    use crate::events::LoginUiEvent;
    use crate::features::login::{LoginFlow, OtpPhase};

    fn test_app(dir: &tempfile::TempDir) -> AppState {
        let config = Config::default();
        let api = ApiClient::new("http://localhost:9090/api").unwrap();
        let session = SessionStore::new(dir.path().join("session.json"));
        AppState::new(config, api, session)
    }

    fn identity(role: UserType) -> Identity {
        Identity {
            user_id: 5,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            user_type: role,
            access_code: "AC-5".to_string(),
        }
    }

    #[test]
    fn test_restore_with_identity_lands_on_own_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);

        let effects = update(
            &mut app,
            UiEvent::SessionRestored {
                found: Some(identity(UserType::Hospital)),
            },
        );

        assert_eq!(app.tui.route, Route::HospitalDashboard);
        // Mount effects: stats + records + patients, all independent.
        assert_eq!(effects.len(), 3);
    }

    #[test]
    fn test_restore_without_identity_lands_on_landing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);

        update(&mut app, UiEvent::SessionRestored { found: None });
        assert_eq!(app.tui.route, Route::Landing);
    }

    #[test]
    fn test_successful_login_commits_once_and_navigates() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        update(&mut app, UiEvent::SessionRestored { found: None });

        let commits = std::rc::Rc::new(std::cell::RefCell::new(0u32));
        let counter = std::rc::Rc::clone(&commits);
        app.tui.session.subscribe(move |_| *counter.borrow_mut() += 1);

        let effects = update(
            &mut app,
            UiEvent::Login(LoginUiEvent::Authenticated {
                flow: LoginFlow::Otp,
                result: Ok(identity(UserType::Patient)),
            }),
        );

        assert_eq!(*commits.borrow(), 1);
        assert_eq!(app.tui.route, Route::PatientDashboard);
        assert_eq!(
            app.tui.session.current().unwrap().user_type,
            UserType::Patient
        );
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, UiEffect::FetchPatientStats { .. }))
        );
    }

    #[test]
    fn test_failed_otp_verify_returns_to_awaiting_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        update(&mut app, UiEvent::SessionRestored { found: None });
        navigate(&mut app, Route::Login.path());
        app.tui.login.contact.set("user@example.com");
        app.tui.login.otp = OtpPhase::Verifying;

        update(
            &mut app,
            UiEvent::Login(LoginUiEvent::Authenticated {
                flow: LoginFlow::Otp,
                result: Err(ApiError::rejected(Some("Invalid OTP".to_string()))),
            }),
        );

        assert_eq!(app.tui.login.otp, OtpPhase::AwaitingCode);
        assert_eq!(app.tui.login.error.as_deref(), Some("Invalid OTP"));
        assert_eq!(app.tui.login.contact.value(), "user@example.com");
        assert!(app.tui.session.current().is_none());
    }

    #[test]
    fn test_duplicate_submit_is_ignored_while_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        update(&mut app, UiEvent::SessionRestored { found: None });
        navigate(&mut app, Route::Login.path());
        app.tui.login.contact.set("user@example.com");

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let first = update(&mut app, UiEvent::Terminal(Event::Key(enter)));
        assert_eq!(first.len(), 1);
        assert_eq!(app.tui.login.otp, OtpPhase::Sending);

        // Second Enter while Sending spawns nothing.
        let second = update(&mut app, UiEvent::Terminal(Event::Key(enter)));
        assert!(second.is_empty());
    }

    #[test]
    fn test_stale_preview_completion_releases_its_handle() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        update(&mut app, UiEvent::SessionRestored { found: None });

        let handle =
            crate::overlays::PreviewHandle::create("scan.png", b"bytes").unwrap();
        let path = handle.path().to_path_buf();

        // Completion for a task that is no longer active.
        let stale_id = app.tui.task_seq.next_id();
        let effects = update(
            &mut app,
            UiEvent::TaskCompleted {
                kind: crate::common::TaskKind::Preview,
                completed: crate::common::TaskCompleted {
                    id: stale_id,
                    result: Box::new(UiEvent::PreviewLoaded {
                        record_id: 9,
                        result: Ok(handle),
                    }),
                },
            },
        );

        assert!(matches!(
            effects.as_slice(),
            [UiEffect::ReleasePreview { .. }]
        ));
        // Executing the effect removes the file; here we just confirm the
        // handle was routed to release rather than installed.
        assert!(app.overlay.is_none());
        assert!(path.exists());
    }

    #[test]
    fn test_logout_clears_session_and_returns_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        update(
            &mut app,
            UiEvent::SessionRestored {
                found: Some(identity(UserType::Patient)),
            },
        );
        assert_eq!(app.tui.route, Route::PatientDashboard);

        let key = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL);
        update(&mut app, UiEvent::Terminal(Event::Key(key)));

        assert!(app.tui.session.current().is_none());
        assert_eq!(app.tui.route, Route::Login);
    }
}
