//! Login feature reducer.
//!
//! Key handling drives the three flow state machines; result events either
//! advance a flow or funnel into the single `Authenticated` arm, the only
//! place in the portal that commits an identity to the session store.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use medgal_core::auth::{AuthGateway, OTP_LEN};

use super::state::{
    BackendStatus, CredentialPhase, FederatedPhase, LoginFlow, LoginMode, LoginState, OtpPhase,
};
use crate::effects::UiEffect;
use crate::events::LoginUiEvent;
use crate::routes::Route;
use crate::state::{AppState, TuiState};
use crate::update;

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => handle_escape(app),
        KeyCode::Char('r') if ctrl => {
            app.tui.login.toggle_role();
            vec![]
        }
        KeyCode::Char('o') if ctrl => {
            cycle_mode(&mut app.tui);
            vec![]
        }
        KeyCode::Tab | KeyCode::Down => {
            let count = app.tui.login.field_count();
            app.tui.login.focus = (app.tui.login.focus + 1) % count;
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            let count = app.tui.login.field_count();
            app.tui.login.focus = (app.tui.login.focus + count - 1) % count;
            vec![]
        }
        KeyCode::Enter => submit(&mut app.tui),
        KeyCode::Backspace => {
            if let Some(field) = app.tui.login.focused_field_mut() {
                field.backspace();
            }
            vec![]
        }
        KeyCode::Char(ch) if !ctrl => {
            insert_char(&mut app.tui.login, ch);
            vec![]
        }
        _ => vec![],
    }
}

/// Routes pasted text (a provider token, usually) into the focused field.
pub fn handle_paste(login: &mut LoginState, text: &str) {
    let code_focused = login.mode == LoginMode::Otp && login.otp == OtpPhase::AwaitingCode;
    if let Some(field) = login.focused_field_mut() {
        if code_focused {
            for ch in text.chars().filter(char::is_ascii_digit) {
                if field.value().len() < OTP_LEN {
                    field.push(ch);
                }
            }
        } else {
            field.push_str(text.trim());
        }
    }
}

fn insert_char(login: &mut LoginState, ch: char) {
    let code_focused = login.mode == LoginMode::Otp && login.otp == OtpPhase::AwaitingCode;
    if let Some(field) = login.focused_field_mut() {
        if code_focused {
            // Fixed-length numeric code: digits only, capped.
            if ch.is_ascii_digit() && field.value().len() < OTP_LEN {
                field.push(ch);
            }
        } else {
            field.push(ch);
        }
    }
}

fn cycle_mode(tui: &mut TuiState) {
    let modes = LoginMode::all();
    let index = modes.iter().position(|m| *m == tui.login.mode).unwrap_or(0);
    let next = modes[(index + 1) % modes.len()];
    tui.login.set_mode(next);
}

fn handle_escape(app: &mut AppState) -> Vec<UiEffect> {
    let login = &mut app.tui.login;
    if login.mode == LoginMode::Otp && login.otp == OtpPhase::AwaitingCode {
        // Back to the contact step; the entered contact survives.
        login.otp = OtpPhase::Idle;
        login.code.clear();
        login.error = None;
        return vec![];
    }
    if login.mode == LoginMode::Federated
        && matches!(login.federated, FederatedPhase::AwaitingProvider { .. })
    {
        // Provider cancellation is a user decision, not a connectivity
        // failure.
        login.federated = FederatedPhase::Idle;
        login.token_input.clear();
        login.error = Some("Google sign-in was cancelled.".to_string());
        return vec![];
    }
    update::navigate(app, Route::Landing.path())
}

fn submit(tui: &mut TuiState) -> Vec<UiEffect> {
    if tui.login.is_busy() {
        return vec![];
    }
    tui.login.error = None;
    tui.login.info = None;

    match tui.login.mode {
        LoginMode::Otp => submit_otp(tui),
        LoginMode::Credentials => submit_credentials(tui),
        LoginMode::Register => submit_register(tui),
        LoginMode::Federated => submit_federated(tui),
    }
}

fn submit_otp(tui: &mut TuiState) -> Vec<UiEffect> {
    match tui.login.otp {
        OtpPhase::Idle => {
            let contact = tui.login.contact.value().trim().to_string();
            if contact.is_empty() {
                tui.login.error = Some("Enter your email or phone number.".to_string());
                return vec![];
            }
            tui.login.otp = OtpPhase::Sending;
            let task = tui.task_seq.next_id();
            vec![UiEffect::SendCode {
                task,
                contact,
                role: tui.login.role,
            }]
        }
        OtpPhase::AwaitingCode => {
            // All digits must be present before anything leaves the machine.
            if tui.login.code.value().len() != OTP_LEN {
                tui.login.error = Some(format!("Enter the full {OTP_LEN}-digit code."));
                return vec![];
            }
            tui.login.otp = OtpPhase::Verifying;
            let task = tui.task_seq.next_id();
            vec![UiEffect::VerifyCode {
                task,
                contact: tui.login.contact.value().trim().to_string(),
                code: tui.login.code.value().to_string(),
            }]
        }
        OtpPhase::Sending | OtpPhase::Verifying => vec![],
    }
}

fn submit_credentials(tui: &mut TuiState) -> Vec<UiEffect> {
    if tui.login.email.is_empty() || tui.login.password.is_empty() {
        tui.login.error = Some("Email and password are required.".to_string());
        return vec![];
    }
    tui.login.credential = CredentialPhase::Submitting;
    let task = tui.task_seq.next_id();
    vec![UiEffect::CredentialSignIn {
        task,
        email: tui.login.email.value().to_string(),
        password: tui.login.password.value().to_string(),
    }]
}

fn submit_register(tui: &mut TuiState) -> Vec<UiEffect> {
    if tui.login.name.is_empty() || tui.login.email.is_empty() || tui.login.password.is_empty() {
        tui.login.error = Some("Name, email and password are required.".to_string());
        return vec![];
    }
    tui.login.credential = CredentialPhase::Submitting;
    let task = tui.task_seq.next_id();
    vec![UiEffect::CredentialSignUp {
        task,
        name: tui.login.name.value().to_string(),
        email: tui.login.email.value().to_string(),
        password: tui.login.password.value().to_string(),
        confirm: tui.login.confirm.value().to_string(),
        role: tui.login.role,
    }]
}

fn submit_federated(tui: &mut TuiState) -> Vec<UiEffect> {
    match tui.login.federated.clone() {
        FederatedPhase::Idle => {
            let Some(client_id) = tui.config.google_client_id.clone() else {
                tui.login.error = Some(
                    "Google sign-in is not configured (set google_client_id).".to_string(),
                );
                return vec![];
            };
            let state_nonce = uuid::Uuid::new_v4().to_string();
            let url = AuthGateway::build_authorize_url(&client_id, &state_nonce);
            tui.login.federated = FederatedPhase::AwaitingProvider { state_nonce };
            tui.login.info =
                Some("Complete sign-in in the browser, then paste the access token.".to_string());
            vec![UiEffect::OpenBrowser { url }]
        }
        FederatedPhase::AwaitingProvider { .. } => {
            let token = tui.login.token_input.value().trim().to_string();
            if token.is_empty() {
                tui.login.error = Some("Paste the provider access token.".to_string());
                return vec![];
            }
            tui.login.federated = FederatedPhase::Exchanging;
            let task = tui.task_seq.next_id();
            vec![UiEffect::FederatedFetchProfile { task, token }]
        }
        FederatedPhase::Exchanging => vec![],
    }
}

pub fn handle_event(app: &mut AppState, event: LoginUiEvent) -> Vec<UiEffect> {
    match event {
        LoginUiEvent::HealthChecked { online } => {
            let tui = &mut app.tui;
            tui.login.backend = if online {
                BackendStatus::Online
            } else {
                BackendStatus::Offline
            };
            if !online {
                tui.login.error = Some(format!(
                    "Cannot reach the server at {}. Is the backend running?",
                    tui.api.base_url()
                ));
            }
            vec![]
        }

        LoginUiEvent::CodeSent { result } => {
            let tui = &mut app.tui;
            match result {
                Ok(ack) => {
                    tui.login.otp = OtpPhase::AwaitingCode;
                    tui.login.focus = 0;
                    tui.login.info =
                        Some(ack.unwrap_or_else(|| "Code sent. Check your inbox.".to_string()));
                }
                Err(e) => {
                    tui.login.otp = OtpPhase::Idle;
                    tui.login.error = Some(e.message);
                }
            }
            vec![]
        }

        LoginUiEvent::ProviderProfileFetched { token, result } => match result {
            Ok(profile) => {
                let task = app.tui.task_seq.next_id();
                vec![UiEffect::FederatedExchange {
                    task,
                    token,
                    role: app.tui.login.role,
                    profile,
                }]
            }
            Err(e) => {
                app.tui.login.federated = FederatedPhase::Idle;
                app.tui.login.error = Some(e.message);
                vec![]
            }
        },

        LoginUiEvent::Authenticated { flow, result } => match result {
            Ok(identity) => {
                // The one and only set_identity call in the portal: every
                // successful attempt commits exactly once.
                let target = Route::dashboard_for(identity.user_type);
                app.tui.session.set_identity(identity);
                app.tui.login = LoginState::new(app.tui.config.default_role);
                update::navigate(app, target.path())
            }
            Err(e) => {
                let tui = &mut app.tui;
                match flow {
                    LoginFlow::Otp => {
                        // Back to the code input so the user can retry or
                        // request a fresh code; the contact stays put.
                        tui.login.otp = OtpPhase::AwaitingCode;
                    }
                    LoginFlow::Credential => {
                        tui.login.credential = CredentialPhase::Idle;
                    }
                    LoginFlow::Federated => {
                        tui.login.federated = FederatedPhase::Idle;
                        tui.login.token_input.clear();
                    }
                }
                tui.login.error = Some(e.message);
                vec![]
            }
        },
    }
}
