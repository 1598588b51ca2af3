//! Auth and session effect handlers.

use std::path::PathBuf;

use medgal_core::api::ApiClient;
use medgal_core::auth::{AuthGateway, ProviderProfile};
use medgal_core::session;
use medgal_core::types::UserType;

use crate::events::{LoginUiEvent, UiEvent};
use crate::features::login::LoginFlow;

/// Reads the persisted session off the reducer thread.
pub async fn restore_session(path: PathBuf) -> UiEvent {
    let found = tokio::task::spawn_blocking(move || session::read_persisted(&path))
        .await
        .unwrap_or_default();
    UiEvent::SessionRestored { found }
}

/// Probes backend reachability for the login banner.
pub async fn check_health(api: ApiClient) -> UiEvent {
    let online = api.health().await;
    UiEvent::Login(LoginUiEvent::HealthChecked { online })
}

pub async fn send_code(gateway: AuthGateway, contact: String, role: UserType) -> UiEvent {
    let result = gateway.send_code(&contact, role).await;
    UiEvent::Login(LoginUiEvent::CodeSent { result })
}

pub async fn verify_code(gateway: AuthGateway, contact: String, code: String) -> UiEvent {
    let result = gateway.verify_code(&contact, &code).await;
    UiEvent::Login(LoginUiEvent::Authenticated {
        flow: LoginFlow::Otp,
        result,
    })
}

pub async fn credential_sign_in(gateway: AuthGateway, email: String, password: String) -> UiEvent {
    let result = gateway.sign_in(&email, &password).await;
    UiEvent::Login(LoginUiEvent::Authenticated {
        flow: LoginFlow::Credential,
        result,
    })
}

pub async fn credential_sign_up(
    gateway: AuthGateway,
    name: String,
    email: String,
    password: String,
    confirm: String,
    role: UserType,
) -> UiEvent {
    let result = gateway
        .sign_up(&name, &email, &password, &confirm, role)
        .await;
    UiEvent::Login(LoginUiEvent::Authenticated {
        flow: LoginFlow::Credential,
        result,
    })
}

pub async fn federated_fetch_profile(gateway: AuthGateway, token: String) -> UiEvent {
    let result = gateway.fetch_provider_profile(&token).await;
    UiEvent::Login(LoginUiEvent::ProviderProfileFetched { token, result })
}

pub async fn federated_exchange(
    gateway: AuthGateway,
    token: String,
    role: UserType,
    profile: ProviderProfile,
) -> UiEvent {
    let result = gateway.exchange(&token, role, &profile).await;
    UiEvent::Login(LoginUiEvent::Authenticated {
        flow: LoginFlow::Federated,
        result,
    })
}
